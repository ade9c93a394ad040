//! HTML rendering for post pages and the index.
//!
//! Templates are plain `format!` strings; every value taken from a scraped page
//! goes through [`escape_html`] before it is embedded.

pub mod index;
pub mod page;

pub use index::render_index;
pub use page::render_page;

pub const DESCRIPTION_CHARS: usize = 150;

pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// First `max_chars` characters of `text` on one line, with `...` when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Turns paragraph text into HTML blocks.
///
/// Long paragraphs stay paragraphs, bullet lines become list items, short lines
/// are read as section headings and medium ones as emphasised paragraphs.
pub fn format_body(body: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut list: Vec<String> = Vec::new();

    for para in body.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let len = para.chars().count();
        let item = para.strip_prefix('•').or_else(|| para.strip_prefix('-'));

        if len <= 100 {
            if let Some(item) = item {
                list.push(format!("<li>{}</li>", inline_html(item.trim())));
                continue;
            }
        }
        if !list.is_empty() {
            blocks.push(format!("<ul>{}</ul>", list.join("")));
            list.clear();
        }

        let html = inline_html(para);
        blocks.push(if len > 100 {
            format!("<p>{}</p>", html)
        } else if len < 50 {
            format!("<h3>{}</h3>", html)
        } else {
            format!("<p><strong>{}</strong></p>", html)
        });
    }
    if !list.is_empty() {
        blocks.push(format!("<ul>{}</ul>", list.join("")));
    }

    if blocks.is_empty() {
        return "<p class=\"empty\">Content is not available.</p>".to_string();
    }
    blocks.join("\n")
}

fn inline_html(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}
