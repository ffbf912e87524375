mod config;
mod crawler;
mod extract;
mod fetch;
mod frontier;
mod limiter;
mod urls;

pub use config::CrawlConfig;
pub use crawler::crawl_site;
pub use extract::{HtmlLinkExtractor, LinkExtractor};
pub use fetch::{HttpFetcher, PageFetcher};
pub use frontier::{CrawlReport, Frontier};
pub use limiter::RateLimiter;
pub use urls::{normalize_url, same_authority};

pub use anyhow;
pub use url;
