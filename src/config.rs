use std::env;
use std::path::PathBuf;
use std::time::Duration;
use crate::error::{AppError, Result};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    pub sitemap_url: String,
    pub output_dir: PathBuf,
    pub post_path_marker: String,
    pub request_timeout: Duration,
    pub request_delay: Duration,
    pub user_agent: String,
    pub site: SiteSettings,
}

/// Presentation settings shared by every rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub title: String,
    pub author: Option<String>,
    pub lang: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "Blog Archive".to_string(),
            author: None,
            lang: "ko".to_string(),
        }
    }
}

impl Config {
    /// Configuration with every optional value at its default.
    pub fn new(sitemap_url: impl Into<String>) -> Self {
        Config {
            sitemap_url: sitemap_url.into(),
            output_dir: PathBuf::from("output"),
            post_path_marker: "/entry/".to_string(),
            request_timeout: Duration::from_secs(30),
            request_delay: Duration::from_millis(1000),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            site: SiteSettings::default(),
        }
    }

    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let sitemap_url = var("SITEMAP_URL")
            .ok_or_else(|| AppError::ConfigError("SITEMAP_URL is not set".to_string()))?;
        url::Url::parse(&sitemap_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid SITEMAP_URL: {}", e)))?;

        let mut config = Config::new(sitemap_url);

        if let Some(dir) = var("OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(marker) = var("POST_PATH_MARKER") {
            config.post_path_marker = marker;
        }
        if let Some(secs) = var("REQUEST_TIMEOUT_SECS") {
            let secs = secs
                .parse::<u64>()
                .map_err(|e| AppError::ConfigError(format!("Invalid REQUEST_TIMEOUT_SECS: {}", e)))?;
            if secs == 0 {
                return Err(AppError::ConfigError(
                    "REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(millis) = var("REQUEST_DELAY_MS") {
            let millis = millis
                .parse::<u64>()
                .map_err(|e| AppError::ConfigError(format!("Invalid REQUEST_DELAY_MS: {}", e)))?;
            config.request_delay = Duration::from_millis(millis);
        }
        if let Some(agent) = var("USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(title) = var("SITE_TITLE") {
            config.site.title = title;
        }
        config.site.author = var("SITE_AUTHOR");
        if let Some(lang) = var("SITE_LANG") {
            config.site.lang = lang;
        }

        Ok(config)
    }
}
