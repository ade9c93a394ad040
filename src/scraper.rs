use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;
use url::Url;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::models::{PostDate, PostRecord, SitemapEntry};
use crate::selectors::{PostField, SelectorTable, ValueSource};

// Subtrees of the body that never carry article text
static JUNK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "script, style, noscript, ins.adsbygoogle, .revenue_unit_wrap, .google-auto-placed, div[data-tistory-react-app]",
    )
    .expect("Failed to parse junk selector")
});

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol",
    "blockquote", "pre", "figure", "figcaption", "table", "tr", "hr",
];

/// Fetches one post and extracts its record.
pub fn scrape_post(fetcher: &dyn Fetch, entry: &SitemapEntry, table: &SelectorTable) -> Result<PostRecord> {
    let html = fetcher.fetch(&entry.loc)?;
    let mut record = extract_post(&html, &entry.loc, table);
    record.lastmod = entry.lastmod.clone();
    Ok(record)
}

/// Pure extraction: every field either comes from the first matching rule or falls back.
pub fn extract_post(html: &str, url: &str, table: &SelectorTable) -> PostRecord {
    let document = Html::parse_document(html);
    let base = Url::parse(url).ok();
    let mut record = PostRecord::fallback(url);

    if let Some(title) = first_value(&document, table, PostField::Title, base.as_ref()) {
        record.title = title;
    }
    let body = first_match(&document, table, PostField::Body, base.as_ref());
    // The representative image comes from the body that won, then the Image rules
    record.image = body
        .as_ref()
        .and_then(|(element, _)| content_image(*element, base.as_ref()))
        .or_else(|| first_value(&document, table, PostField::Image, base.as_ref()));
    if let Some((_, text)) = body {
        record.body = text;
    }
    record.date = first_value(&document, table, PostField::Date, base.as_ref()).map(|raw| PostDate {
        parsed: parse_date(&raw),
        raw,
    });

    record
}

fn first_value(document: &Html, table: &SelectorTable, field: PostField, base: Option<&Url>) -> Option<String> {
    first_match(document, table, field, base).map(|(_, value)| value)
}

fn first_match<'a>(
    document: &'a Html,
    table: &SelectorTable,
    field: PostField,
    base: Option<&Url>,
) -> Option<(ElementRef<'a>, String)> {
    for rule in table.rules_for(field) {
        for element in document.select(rule.selector()) {
            let value = match &rule.source {
                ValueSource::Text => Some(inline_text(element)),
                ValueSource::Content => Some(content_text(element)),
                ValueSource::Attr(name) => element.value().attr(name).map(|v| v.trim().to_string()),
            };
            let value = match (field, value) {
                (PostField::Image, Some(src)) if !src.is_empty() => resolve_url(base, &src),
                (_, value) => value,
            };
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                debug!("{:?} matched {:?}", field, rule.css);
                return Some((element, value));
            }
        }
    }
    debug!("{:?}: no selector matched, using fallback", field);
    None
}

fn inline_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of a body element: paragraphs separated by blank lines, `<br>` kept as line breaks.
pub fn content_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_content(element, &mut raw);
    format_paragraphs(&raw)
}

fn push_content(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if JUNK_SELECTOR.matches(&child_element) {
                continue;
            }
            let name = child_element.value().name();
            if name == "br" {
                out.push('\n');
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push_str("\n\n");
            }
            push_content(child_element, out);
            if block {
                out.push_str("\n\n");
            }
        } else if let Node::Text(text) = child.value() {
            for c in text.chars() {
                if c.is_whitespace() {
                    if !out.ends_with(' ') && !out.ends_with('\n') {
                        out.push(' ');
                    }
                } else {
                    out.push(c);
                }
            }
        }
    }
}

/// First `<img src>` of a body element in document order, outside ad and script subtrees.
fn content_image(element: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
    for child in element.children().filter_map(ElementRef::wrap) {
        if JUNK_SELECTOR.matches(&child) {
            continue;
        }
        let found = if child.value().name() == "img" {
            child
                .value()
                .attr("src")
                .map(str::trim)
                .filter(|src| !src.is_empty())
                .and_then(|src| resolve_url(base, src))
        } else {
            content_image(child, base)
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Trims every line and collapses runs of blank lines into a single paragraph break.
pub fn format_paragraphs(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_break = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            pending_break = true;
            continue;
        }
        if !result.is_empty() {
            result.push_str(if pending_break { "\n\n" } else { "\n" });
        }
        result.push_str(trimmed);
        pending_break = false;
    }

    result
}

fn resolve_url(base: Option<&Url>, src: &str) -> Option<String> {
    match Url::parse(src) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base.and_then(|base| base.join(src).ok()).map(|url| url.to_string()),
    }
}

/// Reads the first year/month/day number groups, e.g. `2024. 3. 15. 14:22` or `2024년 3월 15일`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let mut groups = raw.split(|c: char| !c.is_ascii_digit()).filter(|g| !g.is_empty());
    let year = groups.next()?;
    if year.len() != 4 {
        return None;
    }
    let month = groups.next()?.parse::<u32>().ok()?;
    let day = groups.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const POST_URL: &str = "https://blog.example.com/entry/hello-world";

    fn table() -> SelectorTable {
        SelectorTable::tistory().unwrap()
    }

    #[test]
    fn test_extract_full_post() {
        let html = r#"
            <html><head>
              <title>Hello World :: Blog</title>
              <meta property="og:image" content="https://cdn.example.com/og.png">
            </head><body>
              <h1 class="title_post">  Hello   World </h1>
              <span class="date">2024. 3. 15. 14:22</span>
              <div class="entry-content">
                <p>First paragraph.</p>
                <script>var ads = 1;</script>
                <ins class="adsbygoogle">ad</ins>
                <div data-tistory-react-app="x">widget</div>
                <p>Second<br>line</p>
                <img src="/attachment/pic.png">
              </div>
            </body></html>
        "#;
        let record = extract_post(html, POST_URL, &table());
        assert_eq!(record.url, POST_URL);
        assert_eq!(record.title, "Hello World");
        assert_eq!(record.body, "First paragraph.\n\nSecond\nline");
        assert_eq!(record.image.as_deref(), Some("https://blog.example.com/attachment/pic.png"));
        let date = record.date.unwrap();
        assert_eq!(date.raw, "2024. 3. 15. 14:22");
        assert_eq!(date.parsed, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(record.filename, "hello-world.html");
    }

    #[test]
    fn test_selector_priority() {
        let html = r#"
            <h1>Generic heading</h1>
            <h1 class="post-title">Specific title</h1>
            <div class="post_ct"><p>late body</p></div>
            <div class="article_view"><p>early body</p></div>
            <time>2023-01-02</time>
            <div class="entry-date">2022-12-31</div>
        "#;
        let record = extract_post(html, POST_URL, &table());
        assert_eq!(record.title, "Specific title");
        assert_eq!(record.body, "early body");
        assert_eq!(record.date.unwrap().raw, "2022-12-31");
    }

    #[test]
    fn test_empty_match_falls_through() {
        let html = r#"
            <h1 class="title_post">   </h1>
            <title>Document title</title>
            <div class="entry-content"><script>only()</script></div>
            <div class="post-content"><p>real body</p></div>
        "#;
        let record = extract_post(html, POST_URL, &table());
        assert_eq!(record.title, "Document title");
        assert_eq!(record.body, "real body");
    }

    #[test]
    fn test_no_selectors_match() {
        let record = extract_post("<html><body><span>nothing here</span></body></html>", POST_URL, &table());
        assert_eq!(record.title, POST_URL);
        assert_eq!(record.body, "");
        assert!(record.image.is_none());
        assert!(record.date.is_none());
    }

    #[test]
    fn test_image_falls_back_to_og_image() {
        let html = r#"
            <head><meta property="og:image" content="//cdn.example.com/og.png"></head>
            <div class="entry-content"><p>text only</p></div>
        "#;
        let record = extract_post(html, POST_URL, &table());
        assert_eq!(record.image.as_deref(), Some("https://cdn.example.com/og.png"));
    }

    #[test]
    fn test_image_skips_ads_inside_body() {
        let html = r#"
            <head><meta property="og:image" content="https://cdn.example.com/og.png"></head>
            <div class="entry-content">
              <div class="revenue_unit_wrap"><img src="/ad-banner.png"></div>
              <ins class="adsbygoogle"><img src="/ins.png"></ins>
              <p>text</p>
              <figure><img src="/real.png"></figure>
            </div>
        "#;
        let record = extract_post(html, POST_URL, &table());
        assert_eq!(record.body, "text");
        assert_eq!(record.image.as_deref(), Some("https://blog.example.com/real.png"));
    }

    #[test]
    fn test_image_comes_from_matched_body() {
        let html = r#"
            <div class="article_view"><p>body</p><img src="/body.png"></div>
            <div class="post_ct"><img src="/other.png"></div>
            <aside class="sidebar"><div class="entry-content"></div></aside>
        "#;
        let record = extract_post(html, POST_URL, &table());
        assert_eq!(record.body, "body");
        assert_eq!(record.image.as_deref(), Some("https://blog.example.com/body.png"));
    }

    #[test]
    fn test_malformed_date_keeps_raw_text() {
        let html = r#"<span class="date">yesterday</span>"#;
        let date = extract_post(html, POST_URL, &table()).date.unwrap();
        assert_eq!(date.raw, "yesterday");
        assert!(date.parsed.is_none());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date("2024-03-05"), expected);
        assert_eq!(parse_date("2024.03.05"), expected);
        assert_eq!(parse_date("2024. 3. 5. 09:10"), expected);
        assert_eq!(parse_date("2024년 3월 5일"), expected);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("5 March"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_format_paragraphs() {
        assert_eq!(format_paragraphs("\n\n  a \n b\n\n\n\n c  \n"), "a\nb\n\nc");
        assert_eq!(format_paragraphs("   \n  "), "");
    }

    struct StubFetcher;

    impl Fetch for StubFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            if url.ends_with("/missing") {
                Err(AppError::FetchError("404 Not Found".to_string()))
            } else {
                Ok(r#"<h1>Stub</h1><div class="entry-content"><p>body</p></div>"#.to_string())
            }
        }
    }

    #[test]
    fn test_scrape_post_carries_lastmod() {
        let entry = SitemapEntry {
            loc: POST_URL.to_string(),
            lastmod: Some("2024-03-15".to_string()),
        };
        let record = scrape_post(&StubFetcher, &entry, &table()).unwrap();
        assert_eq!(record.title, "Stub");
        assert_eq!(record.lastmod.as_deref(), Some("2024-03-15"));

        let missing = SitemapEntry::new("https://blog.example.com/entry/missing");
        assert!(matches!(
            scrape_post(&StubFetcher, &missing, &table()),
            Err(AppError::FetchError(_))
        ));
    }
}
