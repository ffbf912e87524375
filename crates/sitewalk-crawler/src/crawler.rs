use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, ensure, Result};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use url::Url;

use crate::config::CrawlConfig;
use crate::extract::LinkExtractor;
use crate::fetch::PageFetcher;
use crate::frontier::{CrawlReport, Frontier};
use crate::limiter::RateLimiter;
use crate::urls::normalize_url;

/// One pending page visit. Frames only enter the queue already claimed in
/// the frontier and with `depth <= max_depth`.
#[derive(Debug, Clone)]
struct Frame {
    url: Url,
    depth: usize,
}

/// Frame sender that counts in-flight frames. Every send increments the
/// counter; when the last frame retires the real sender is dropped, which
/// closes the channel and ends the crawl stream. Children are always sent
/// before their parent retires, so the counter cannot falsely reach zero.
#[derive(Debug, Clone)]
struct FrameTx {
    inner: Arc<FrameTxInner>,
}

#[derive(Debug)]
struct FrameTxInner {
    tx: Mutex<Option<mpsc::UnboundedSender<Frame>>>,
    pending: AtomicUsize,
}

impl FrameTx {
    fn new(tx: mpsc::UnboundedSender<Frame>) -> Self {
        Self {
            inner: Arc::new(FrameTxInner {
                tx: Mutex::new(Some(tx)),
                pending: AtomicUsize::new(0),
            }),
        }
    }

    fn send(&self, frame: Frame) {
        let tx = self.inner.tx.lock().unwrap();
        if let Some(tx) = tx.as_ref() {
            self.inner.pending.fetch_add(1, Ordering::SeqCst);
            if let Err(e) = tx.send(frame) {
                self.inner.pending.fetch_sub(1, Ordering::SeqCst);
                log::error!("Couldn't queue crawl frame: {e}");
            }
        }
    }

    fn retire(&self) {
        if self.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.tx.lock().unwrap().take();
        }
    }
}

async fn visit<F, X>(
    frame: Frame,
    max_depth: usize,
    frontier: &Frontier,
    limiter: &RateLimiter,
    fetcher: &F,
    extractor: &X,
    tx_frame: &FrameTx,
) where
    F: PageFetcher,
    X: LinkExtractor,
{
    let Frame { url, depth } = frame;

    limiter.acquire().await;

    log::debug!("Crawling {url} at depth {depth}");
    let page = match fetcher.fetch(&url).await {
        Ok(page) => {
            frontier.record_success(&url);
            page
        }
        Err(e) => {
            log::warn!("Failed to fetch {url}: {e:#}");
            frontier.record_failure(&url);
            return;
        }
    };

    // Relative hrefs resolve against the page that contained them.
    let links = extractor.extract_links(&page, &url);
    log::debug!("Found {} links on {url}", links.len());
    if depth >= max_depth {
        return;
    }
    for link in links {
        if !matches!(link.scheme(), "http" | "https") {
            continue;
        }
        if frontier.try_claim(&link) {
            tx_frame.send(Frame {
                url: normalize_url(&link),
                depth: depth + 1,
            });
        }
    }
}

/// Crawls the site reachable from `conf.seed_url`, staying on the seed's
/// authority, down to `conf.max_depth` link-hops. Per-URL fetch failures
/// are recorded in the report and never abort the run; only configuration
/// errors (and SIGINT when `conf.handle_sigint` is set) are fatal.
pub async fn crawl_site<F, X>(conf: &CrawlConfig, fetcher: &F, extractor: &X) -> Result<CrawlReport>
where
    F: PageFetcher,
    X: LinkExtractor,
{
    let seed = conf.seed()?;
    let delay = conf.delay()?;
    conf.timeout()?;
    ensure!(
        conf.concurrent_requests > 0,
        "concurrentRequests must be at least 1"
    );

    log::info!("Starting crawl at {seed}");

    let frontier = Frontier::new(seed.clone());
    let limiter = RateLimiter::new(delay);

    let (tx_frame, rx_frame) = mpsc::unbounded_channel();
    let tx_frame = FrameTx::new(tx_frame);

    frontier.try_claim(&seed);
    tx_frame.send(Frame { url: seed, depth: 0 });

    let crawl = {
        let frontier = &frontier;
        let limiter = &limiter;
        let max_depth = conf.max_depth;
        let tx_frame = tx_frame.clone();
        async move {
            UnboundedReceiverStream::new(rx_frame)
                .map(|frame| {
                    let tx_frame = tx_frame.clone();
                    async move {
                        visit(
                            frame, max_depth, frontier, limiter, fetcher, extractor, &tx_frame,
                        )
                        .await;
                        tx_frame.retire();
                    }
                })
                .buffer_unordered(conf.concurrent_requests)
                .collect::<Vec<_>>()
                .await;
        }
    };

    if conf.handle_sigint {
        tokio::select! {
            _ = crawl => (),
            _ = tokio::signal::ctrl_c() => bail!("Interrupted"),
        }
    } else {
        crawl.await;
    }

    let report = frontier.into_report();
    log::info!(
        "Crawl done: {} valid, {} invalid",
        report.valid_urls.len(),
        report.invalid_urls.len()
    );
    Ok(report)
}
