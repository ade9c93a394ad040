//! Sitemap parsing and post URL filtering.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use tracing::{debug, info};
use crate::error::{AppError, Result};
use crate::fetch::Fetch;
use crate::models::SitemapEntry;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Loc,
    Lastmod,
}

#[derive(Default)]
struct PendingUrl {
    loc: Option<String>,
    lastmod: Option<String>,
}

fn parse_error(err: impl std::fmt::Display) -> AppError {
    AppError::ParseError(format!("Malformed sitemap: {}", err))
}

/// Value of `&name;`: the predefined XML entities and numeric character references.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse::<u32>().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

pub fn fetch_sitemap(fetcher: &dyn Fetch, url: &str) -> Result<String> {
    info!("Downloading sitemap {}", url);
    let body = fetcher.fetch(url)?;
    info!("Sitemap downloaded: {} bytes", body.len());
    Ok(body)
}

/// Every `<loc>` of the document in order, each with the `<lastmod>` of its `<url>` element.
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut field: Option<Field> = None;
    let mut text = String::new();
    let mut current: Option<PendingUrl> = None;
    let mut url_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(elem) => {
                depth += 1;
                seen_root = true;
                // Only direct children of <url> count, so extension tags like <image:loc> are ignored
                let in_url = current.is_none() || depth == url_depth + 1;
                match elem.local_name().as_ref() {
                    b"url" if current.is_none() => {
                        current = Some(PendingUrl::default());
                        url_depth = depth;
                    }
                    b"loc" if in_url => {
                        field = Some(Field::Loc);
                        text.clear();
                    }
                    b"lastmod" if in_url => {
                        field = Some(Field::Lastmod);
                        text.clear();
                    }
                    _ => {}
                }
            }
            Event::Empty(_) => seen_root = true,
            Event::Text(t) if field.is_some() => text.push_str(&t.decode().map_err(parse_error)?),
            Event::CData(t) if field.is_some() => text.push_str(&t.decode().map_err(parse_error)?),
            Event::GeneralRef(r) if field.is_some() => {
                let name = r.decode().map_err(parse_error)?;
                let value = resolve_reference(&name)
                    .ok_or_else(|| parse_error(format!("unknown entity &{};", name)))?;
                text.push_str(&value);
            }
            Event::End(elem) => {
                let closing = depth;
                depth = depth.saturating_sub(1);
                match elem.local_name().as_ref() {
                    b"loc" if field == Some(Field::Loc) => {
                        field = None;
                        let loc = text.trim().to_string();
                        match current.as_mut() {
                            Some(pending) => pending.loc = Some(loc),
                            None if !loc.is_empty() => entries.push(SitemapEntry::new(loc)),
                            None => {}
                        }
                    }
                    b"lastmod" if field == Some(Field::Lastmod) => {
                        field = None;
                        let lastmod = text.trim().to_string();
                        if let Some(pending) = current.as_mut() {
                            pending.lastmod = Some(lastmod).filter(|v| !v.is_empty());
                        }
                    }
                    b"url" if current.is_some() && closing == url_depth => {
                        if let Some(PendingUrl { loc: Some(loc), lastmod }) = current.take() {
                            if !loc.is_empty() {
                                entries.push(SitemapEntry { loc, lastmod });
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(parse_error("document has no root element"));
    }
    if depth != 0 {
        return Err(parse_error(format!(
            "unexpected end of document at position {}",
            reader.buffer_position()
        )));
    }

    Ok(entries)
}

/// Keeps the entries whose URL contains `marker`, preserving document order.
pub fn filter_post_urls(xml: &str, marker: &str) -> Result<Vec<SitemapEntry>> {
    let entries = parse_sitemap(xml)?;
    let total = entries.len();
    let posts: Vec<SitemapEntry> = entries
        .into_iter()
        .filter(|entry| entry.loc.contains(marker))
        .collect();
    debug!("{} of {} sitemap locations contain {:?}", posts.len(), total, marker);
    info!("Found {} post URLs", posts.len());
    Ok(posts)
}
