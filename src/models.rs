use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<String>,
}

impl SitemapEntry {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
        }
    }
}

/// Publication date as printed on the page, plus the calendar date when it could be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDate {
    pub raw: String,
    pub parsed: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub url: String,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub date: Option<PostDate>,
    pub lastmod: Option<String>,
    pub filename: String,
}

impl PostRecord {
    pub fn fallback(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: url.to_string(),
            body: String::new(),
            image: None,
            date: None,
            lastmod: None,
            filename: crate::output::filename_for_url(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPost {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPost {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub written: Vec<WrittenPost>,
    pub skipped: Vec<SkippedPost>,
    pub index_written: bool,
}
