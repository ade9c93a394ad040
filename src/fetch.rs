use reqwest::blocking::{Client, ClientBuilder};
use tracing::debug;
use crate::config::Config;
use crate::error::Result;

/// Source of remote documents. The pipeline only talks to the network through this.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout.min(std::time::Duration::from_secs(10)))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let body = response.text()?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}
