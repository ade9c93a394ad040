use blog_archiver::{
    config::Config,
    fetch::HttpFetcher,
    logging::init_logging,
    pipeline,
};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration
    let config = Config::load().inspect_err(|e| error!("{}", e))?;
    info!(
        "Archiving {} into {}",
        config.sitemap_url,
        config.output_dir.display()
    );

    let fetcher = HttpFetcher::new(&config)?;

    // A non-zero exit only means the run could not happen at all
    let summary = pipeline::run(&config, &fetcher).inspect_err(|e| error!("Run aborted: {}", e))?;
    for skipped in &summary.skipped {
        info!("Skipped {}: {}", skipped.url, skipped.reason);
    }

    Ok(())
}
