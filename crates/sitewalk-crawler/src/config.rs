use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::urls::normalize_url;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlConfig {
    /// Absolute http(s) URL the crawl starts from.
    #[serde(default)]
    pub seed_url: String,

    /// Maximum link depth from the seed, 0 means only the seed page.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Delay in seconds between request starts.
    #[serde(default = "default_delay")]
    pub delay: f32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: f32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    #[serde(default = "default_handle_sigint")]
    pub handle_sigint: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            max_depth: default_max_depth(),
            delay: default_delay(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            concurrent_requests: default_concurrent_requests(),
            handle_sigint: default_handle_sigint(),
        }
    }
}

impl CrawlConfig {
    /// Validates `seed_url` and returns its normalized form. No crawl can
    /// proceed without a seed that carries an http(s) scheme and a host.
    pub fn seed(&self) -> Result<Url> {
        let url = Url::parse(&self.seed_url)
            .with_context(|| format!("Invalid seed URL `{}`", self.seed_url))?;
        ensure!(
            matches!(url.scheme(), "http" | "https"),
            "Invalid seed URL `{url}`: scheme must be http or https"
        );
        ensure!(url.has_host(), "Invalid seed URL `{url}`: missing host");
        Ok(normalize_url(&url))
    }

    pub fn delay(&self) -> Result<Duration> {
        ensure!(
            self.delay.is_finite() && self.delay >= 0.0,
            "Invalid delay `{}`: must be a non-negative number of seconds",
            self.delay
        );
        Ok(Duration::from_secs_f32(self.delay))
    }

    pub fn timeout(&self) -> Result<Duration> {
        ensure!(
            self.timeout.is_finite() && self.timeout > 0.0,
            "Invalid timeout `{}`: must be a positive number of seconds",
            self.timeout
        );
        Ok(Duration::from_secs_f32(self.timeout))
    }
}

fn default_max_depth() -> usize {
    3
}

fn default_delay() -> f32 {
    1.0
}

fn default_timeout() -> f32 {
    5.0
}

fn default_user_agent() -> String {
    String::from("sitewalk/0.1.0")
}

fn default_concurrent_requests() -> usize {
    8
}

fn default_handle_sigint() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let conf = CrawlConfig::default();
        assert_eq!(conf.max_depth, 3);
        assert_eq!(conf.delay, 1.0);
        assert_eq!(conf.timeout, 5.0);
        assert_eq!(conf.user_agent, "sitewalk/0.1.0");
        assert_eq!(conf.concurrent_requests, 8);
        assert!(conf.handle_sigint);
    }

    #[test]
    fn deserializes_with_defaults() {
        let conf: CrawlConfig =
            serde_yaml::from_str("seedUrl: http://example.com\nmaxDepth: 1\n").unwrap();
        assert_eq!(conf.seed_url, "http://example.com");
        assert_eq!(conf.max_depth, 1);
        assert_eq!(conf.delay, 1.0);
        assert_eq!(conf.timeout, 5.0);
    }

    #[test]
    fn seed_requires_an_absolute_http_url() {
        let mut conf = CrawlConfig::default();
        assert!(conf.seed().is_err());

        conf.seed_url = "example.com".into();
        assert!(conf.seed().is_err());

        conf.seed_url = "ftp://example.com".into();
        assert!(conf.seed().is_err());

        conf.seed_url = "http://example.com".into();
        assert_eq!(conf.seed().unwrap().as_str(), "http://example.com/");
    }

    #[test]
    fn seed_is_normalized() {
        let conf = CrawlConfig {
            seed_url: "https://example.com/home?lang=en#top".into(),
            ..Default::default()
        };
        assert_eq!(conf.seed().unwrap().as_str(), "https://example.com/home");
    }

    #[test]
    fn rejects_invalid_durations() {
        let mut conf = CrawlConfig::default();

        conf.delay = -1.0;
        assert!(conf.delay().is_err());
        conf.delay = f32::NAN;
        assert!(conf.delay().is_err());
        conf.delay = 0.0;
        assert_eq!(conf.delay().unwrap(), Duration::ZERO);

        conf.timeout = 0.0;
        assert!(conf.timeout().is_err());
        conf.timeout = 2.5;
        assert_eq!(conf.timeout().unwrap(), Duration::from_secs_f32(2.5));
    }
}
