//! Ordered selector table used by the post extractor.
//!
//! Each field owns a list of rules tried in insertion order; the first rule that
//! yields a non-empty value wins. The built-in table targets the common Tistory
//! skins and falls back to generic markup.

use scraper::Selector;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Title,
    Body,
    Image,
    Date,
}

/// Where a rule reads its value from once the selector matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Inline text with whitespace collapsed.
    Text,
    /// Paragraph-preserving text with ads and scripts stripped.
    Content,
    /// The named attribute.
    Attr(String),
}

#[derive(Debug, Clone)]
pub struct SelectorRule {
    pub field: PostField,
    pub css: String,
    pub source: ValueSource,
    selector: Selector,
}

impl SelectorRule {
    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

const BODY_SELECTORS: [&str; 5] = [
    ".entry-content",
    ".article_view",
    ".post-content",
    ".contents_style",
    ".post_ct",
];

const TITLE_SELECTORS: [&str; 5] = ["h1.title_post", "h1.post-title", ".title_post", "h1", "title"];

const DATE_SELECTORS: [&str; 4] = [".date", ".post-date", ".entry-date", "time"];

#[derive(Debug, Clone, Default)]
pub struct SelectorTable {
    rules: Vec<SelectorRule>,
}

impl SelectorTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a rule after every existing rule of the same field.
    pub fn push(&mut self, field: PostField, css: &str, source: ValueSource) -> Result<()> {
        let selector = Selector::parse(css)
            .map_err(|e| AppError::ConfigError(format!("Invalid selector {:?}: {:?}", css, e)))?;
        self.rules.push(SelectorRule {
            field,
            css: css.to_string(),
            source,
            selector,
        });
        Ok(())
    }

    pub fn with_rule(mut self, field: PostField, css: &str, source: ValueSource) -> Result<Self> {
        self.push(field, css, source)?;
        Ok(self)
    }

    pub fn rules_for(&self, field: PostField) -> impl Iterator<Item = &SelectorRule> {
        self.rules.iter().filter(move |rule| rule.field == field)
    }

    /// Built-in table for Tistory-style blog skins.
    pub fn tistory() -> Result<Self> {
        let mut table = Self::empty();
        for css in TITLE_SELECTORS {
            table.push(PostField::Title, css, ValueSource::Text)?;
        }
        for css in BODY_SELECTORS {
            table.push(PostField::Body, css, ValueSource::Content)?;
        }
        table.push(
            PostField::Image,
            "meta[property='og:image']",
            ValueSource::Attr("content".to_string()),
        )?;
        for css in DATE_SELECTORS {
            table.push(PostField::Date, css, ValueSource::Text)?;
        }
        Ok(table)
    }
}
