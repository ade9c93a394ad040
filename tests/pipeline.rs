use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use blog_archiver::{pipeline, AppError, Config, Fetch, Result};

const SITEMAP_URL: &str = "https://blog.example.com/sitemap.xml";

/// Serves canned documents; anything unknown answers like a 404.
#[derive(Default)]
struct FakeFetcher {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl FakeFetcher {
    fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }
}

impl Fetch for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::FetchError(format!("HTTP status client error (404 Not Found) for url ({})", url)))
    }
}

fn sitemap(locs: &[&str]) -> String {
    let urls: String = locs
        .iter()
        .map(|loc| format!("  <url><loc>{}</loc><lastmod>2024-03-15</lastmod></url>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>",
        urls
    )
}

fn post_html(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{title} :: blog</title></head><body>
        <h1 class="title_post">{title}</h1>
        <span class="date">2024. 3. 15. 10:00</span>
        <div class="entry-content"><p>{body}</p><img src="/img/{title}.png"></div>
        </body></html>"#
    )
}

fn config(output_dir: &Path) -> Config {
    let mut config = Config::new(SITEMAP_URL);
    config.output_dir = output_dir.to_path_buf();
    config.request_delay = Duration::ZERO;
    config
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_full_run_writes_posts_and_index() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("site");
    let fetcher = FakeFetcher::default()
        .with_page(
            SITEMAP_URL,
            &sitemap(&[
                "https://blog.example.com/category/rust",
                "https://blog.example.com/entry/alpha",
                "https://blog.example.com/tag/notes",
            ]),
        )
        .with_page("https://blog.example.com/entry/alpha", &post_html("Alpha", "Alpha body text"));

    let summary = pipeline::run(&config(&out), &fetcher).unwrap();

    assert_eq!(summary.written.len(), 1);
    assert!(summary.skipped.is_empty());
    assert!(summary.index_written);
    assert_eq!(file_names(&out), vec!["alpha.html", "index.html"]);
    assert_eq!(
        *fetcher.requests.borrow(),
        vec![SITEMAP_URL.to_string(), "https://blog.example.com/entry/alpha".to_string()]
    );

    let page = fs::read_to_string(out.join("alpha.html")).unwrap();
    assert!(page.contains("<h1 class=\"post-title\">Alpha</h1>"));
    assert!(page.contains("<img src=\"https://blog.example.com/img/Alpha.png\""));
    assert!(page.contains("<time datetime=\"2024-03-15\">"));
    assert!(page.contains("<meta property=\"article:modified_time\" content=\"2024-03-15\">"));

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("href=\"alpha.html\""));
}

#[test]
fn test_sitemap_404_is_fatal_and_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("site");
    let fetcher = FakeFetcher::default();

    let err = pipeline::run(&config(&out), &fetcher).unwrap_err();

    assert!(matches!(err, AppError::FetchError(_)));
    assert!(!out.exists());
    assert_eq!(fetcher.requests.borrow().len(), 1);
}

#[test]
fn test_malformed_sitemap_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("site");
    let fetcher = FakeFetcher::default().with_page(SITEMAP_URL, "<urlset><url><loc>x</url>");

    let err = pipeline::run(&config(&out), &fetcher).unwrap_err();

    assert!(matches!(err, AppError::ParseError(_)));
    assert!(!out.exists());
}

#[test]
fn test_failed_post_is_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().to_path_buf();
    let fetcher = FakeFetcher::default()
        .with_page(
            SITEMAP_URL,
            &sitemap(&[
                "https://blog.example.com/entry/one",
                "https://blog.example.com/entry/two",
                "https://blog.example.com/entry/three",
            ]),
        )
        .with_page("https://blog.example.com/entry/one", &post_html("One", "first"))
        .with_page("https://blog.example.com/entry/three", &post_html("Three", "third"));

    let summary = pipeline::run(&config(&out), &fetcher).unwrap();

    assert_eq!(summary.written.len(), 2);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].url, "https://blog.example.com/entry/two");
    assert_eq!(file_names(&out), vec!["index.html", "one.html", "three.html"]);

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert_eq!(index.matches("class=\"post-card\"").count(), 2);
    assert!(index.contains("href=\"one.html\""));
    assert!(index.contains("href=\"three.html\""));
    assert!(!index.contains("two.html"));
    assert!(index.find("one.html").unwrap() < index.find("three.html").unwrap());
}

#[test]
fn test_write_failure_is_skipped_and_left_out_of_index() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().to_path_buf();
    // A directory in the way makes the page write fail
    fs::create_dir(out.join("one.html")).unwrap();
    let fetcher = FakeFetcher::default()
        .with_page(
            SITEMAP_URL,
            &sitemap(&["https://blog.example.com/entry/one", "https://blog.example.com/entry/three"]),
        )
        .with_page("https://blog.example.com/entry/one", &post_html("One", "first"))
        .with_page("https://blog.example.com/entry/three", &post_html("Three", "third"));

    let summary = pipeline::run(&config(&out), &fetcher).unwrap();

    assert_eq!(summary.written.len(), 1);
    assert_eq!(summary.written[0].filename, "three.html");
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].url, "https://blog.example.com/entry/one");
    assert!(summary.skipped[0].reason.contains("one.html"));
    assert!(summary.index_written);
    assert!(out.join("one.html").is_dir());
    assert_eq!(file_names(&out), vec!["index.html", "one.html", "three.html"]);

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(!index.contains("href=\"one.html\""));
    assert!(index.contains("href=\"three.html\""));
}

#[test]
fn test_post_without_known_selectors_still_rendered() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().to_path_buf();
    let url = "https://blog.example.com/entry/bare";
    let fetcher = FakeFetcher::default()
        .with_page(SITEMAP_URL, &sitemap(&[url]))
        .with_page(url, "<html><body><span>unknown skin</span></body></html>");

    pipeline::run(&config(&out), &fetcher).unwrap();

    let page = fs::read_to_string(out.join("bare.html")).unwrap();
    assert!(page.contains(&format!("<h1 class=\"post-title\">{}</h1>", url)));
    assert!(page.contains("<meta name=\"description\""));
    assert!(page.contains("<meta property=\"og:title\""));
    assert!(page.contains("Content is not available."));
}

#[test]
fn test_duplicates_and_colliding_names() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().to_path_buf();
    let fetcher = FakeFetcher::default()
        .with_page(
            SITEMAP_URL,
            &sitemap(&[
                "https://blog.example.com/entry/Same",
                "https://blog.example.com/entry/same",
                "https://blog.example.com/entry/Same",
                "https://blog.example.com/entry/index",
            ]),
        )
        .with_page("https://blog.example.com/entry/Same", &post_html("Upper", "a"))
        .with_page("https://blog.example.com/entry/same", &post_html("Lower", "b"))
        .with_page("https://blog.example.com/entry/index", &post_html("Index", "c"));

    let summary = pipeline::run(&config(&out), &fetcher).unwrap();

    let written: Vec<&str> = summary.written.iter().map(|w| w.filename.as_str()).collect();
    assert_eq!(written, vec!["same.html", "same-2.html", "index-2.html"]);
    assert_eq!(fetcher.requests.borrow().len(), 4);
    assert!(fs::read_to_string(out.join("index.html")).unwrap().contains("href=\"index-2.html\""));
}

#[test]
fn test_empty_sitemap_yields_empty_index() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().to_path_buf();
    let fetcher = FakeFetcher::default().with_page(SITEMAP_URL, &sitemap(&["https://blog.example.com/about"]));

    let summary = pipeline::run(&config(&out), &fetcher).unwrap();

    assert!(summary.written.is_empty());
    assert_eq!(file_names(&out), vec!["index.html"]);
    assert!(fs::read_to_string(out.join("index.html")).unwrap().contains("No posts yet."));
}

#[test]
fn test_rerun_is_byte_identical() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::default()
        .with_page(
            SITEMAP_URL,
            &sitemap(&["https://blog.example.com/entry/a", "https://blog.example.com/entry/b"]),
        )
        .with_page("https://blog.example.com/entry/a", &post_html("A", "aaa"))
        .with_page("https://blog.example.com/entry/b", &post_html("B", "bbb"));

    pipeline::run(&config(first.path()), &fetcher).unwrap();
    pipeline::run(&config(second.path()), &fetcher).unwrap();
    // Running again over an existing output directory must not rename anything
    pipeline::run(&config(first.path()), &fetcher).unwrap();

    assert_eq!(file_names(first.path()), file_names(second.path()));
    for name in file_names(first.path()) {
        assert_eq!(
            fs::read(first.path().join(&name)).unwrap(),
            fs::read(second.path().join(&name)).unwrap(),
            "{} differs",
            name
        );
    }
}
