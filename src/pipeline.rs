use std::collections::HashSet;
use std::thread;
use std::time::Instant;
use tracing::{error, info, warn};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::models::{PostRecord, RunSummary, SkippedPost, WrittenPost};
use crate::output::{FilenameAllocator, OutputWriter, INDEX_FILENAME};
use crate::render::{render_index, render_page};
use crate::scraper::scrape_post;
use crate::selectors::SelectorTable;
use crate::sitemap::{fetch_sitemap, filter_post_urls};

/// Runs the whole archive with the built-in selector table.
pub fn run(config: &Config, fetcher: &dyn Fetch) -> Result<RunSummary> {
    let table = SelectorTable::tistory()?;
    run_with_table(config, fetcher, &table)
}

/// Sitemap failures abort before anything touches the disk; post and file
/// failures are logged, recorded in the summary, and skipped.
pub fn run_with_table(config: &Config, fetcher: &dyn Fetch, table: &SelectorTable) -> Result<RunSummary> {
    let start_time = Instant::now();

    let sitemap = fetch_sitemap(fetcher, &config.sitemap_url)?;
    let entries = filter_post_urls(&sitemap, &config.post_path_marker)?;
    let writer = OutputWriter::create(&config.output_dir)?;

    let mut summary = RunSummary::default();
    let mut published: Vec<PostRecord> = Vec::new();
    let mut filenames = FilenameAllocator::new();
    let mut seen = HashSet::new();
    let total = entries.len();

    for (i, entry) in entries.iter().enumerate() {
        if !seen.insert(entry.loc.as_str()) {
            warn!("[{}/{}] Duplicate sitemap entry, already processed: {}", i + 1, total, entry.loc);
            continue;
        }
        if seen.len() > 1 && !config.request_delay.is_zero() {
            thread::sleep(config.request_delay);
        }

        info!("[{}/{}] Processing {}", i + 1, total, entry.loc);
        let mut record = match scrape_post(fetcher, entry, table) {
            Ok(record) => record,
            Err(err) => {
                warn!("Skipping {}: {}", entry.loc, err);
                summary.skipped.push(SkippedPost {
                    url: entry.loc.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        record.filename = filenames.allocate(&record.filename);
        let html = render_page(&record, &config.site);
        match writer.write(&record.filename, &html) {
            Ok(path) => {
                info!("Created {}", path.display());
                summary.written.push(WrittenPost {
                    url: record.url.clone(),
                    filename: record.filename.clone(),
                });
                published.push(record);
            }
            Err(err) => {
                warn!("Skipping {}: {}", entry.loc, err);
                summary.skipped.push(SkippedPost {
                    url: entry.loc.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let index = render_index(&published, summary.skipped.len(), &config.site);
    match writer.write(INDEX_FILENAME, &index) {
        Ok(path) => {
            info!("Created index {}", path.display());
            summary.index_written = true;
        }
        Err(err) => error!("Index not written: {}", err),
    }

    info!(
        "Run finished in {:?}: {} written, {} skipped, output in {}",
        start_time.elapsed(),
        summary.written.len(),
        summary.skipped.len(),
        writer.dir().display()
    );
    Ok(summary)
}
