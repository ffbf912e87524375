use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

/// Page download capability. Any transport error, non-2xx status or timeout
/// must surface as an `Err` so the crawler can classify the URL as invalid
/// instead of aborting the run.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Default fetcher over reqwest. The per-request timeout lives on the
/// client, so a hanging server folds into the same failure classification
/// as a refused connection or an error status.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .gzip(true)
            .deflate(true)
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }
}
