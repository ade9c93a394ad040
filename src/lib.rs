pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod scraper;
pub mod selectors;
pub mod sitemap;

pub use config::Config;
pub use error::{AppError, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use models::{PostRecord, RunSummary};
