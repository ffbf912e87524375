use std::collections::HashSet;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::urls::{normalize_url, same_authority};

/// Final outcome of a crawl run: every fetch attempt lands in exactly one
/// of the two lists, ordered by completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    pub valid_urls: Vec<String>,
    pub invalid_urls: Vec<String>,
}

/// Single source of truth for which URLs have been claimed, and accumulator
/// of the two result lists. All state sits behind one mutex so that
/// check-eligibility-then-mark is a single critical section.
#[derive(Debug)]
pub struct Frontier {
    seed: Url,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    visited: HashSet<String>,
    valid_urls: Vec<String>,
    invalid_urls: Vec<String>,
}

impl Frontier {
    pub fn new(seed: Url) -> Self {
        Self {
            seed: normalize_url(&seed),
            state: Mutex::new(State::default()),
        }
    }

    /// True iff `url` is on the seed's authority and not yet claimed.
    pub fn is_eligible(&self, url: &Url) -> bool {
        same_authority(url, &self.seed)
            && !self
                .state
                .lock()
                .unwrap()
                .visited
                .contains(normalize_url(url).as_str())
    }

    /// Idempotent, inserting an already-present URL is a no-op.
    pub fn mark_visited(&self, url: &Url) {
        self.state
            .lock()
            .unwrap()
            .visited
            .insert(normalize_url(url).to_string());
    }

    /// Atomic eligibility check + visited mark. Returns true exactly once
    /// per normalized URL, so two workers can never claim the same page.
    pub fn try_claim(&self, url: &Url) -> bool {
        if !same_authority(url, &self.seed) {
            return false;
        }
        self.state
            .lock()
            .unwrap()
            .visited
            .insert(normalize_url(url).to_string())
    }

    pub fn record_success(&self, url: &Url) {
        self.state
            .lock()
            .unwrap()
            .valid_urls
            .push(normalize_url(url).to_string());
    }

    pub fn record_failure(&self, url: &Url) {
        self.state
            .lock()
            .unwrap()
            .invalid_urls
            .push(normalize_url(url).to_string());
    }

    /// Snapshot of the lists accumulated so far.
    pub fn report(&self) -> CrawlReport {
        let state = self.state.lock().unwrap();
        CrawlReport {
            valid_urls: state.valid_urls.clone(),
            invalid_urls: state.invalid_urls.clone(),
        }
    }

    pub fn into_report(self) -> CrawlReport {
        let state = self.state.into_inner().unwrap();
        CrawlReport {
            valid_urls: state.valid_urls,
            invalid_urls: state.invalid_urls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier() -> Frontier {
        Frontier::new(Url::parse("http://example.com").unwrap())
    }

    #[test]
    fn claims_each_url_once() {
        let frontier = frontier();
        let url = Url::parse("http://example.com/a").unwrap();
        assert!(frontier.try_claim(&url));
        assert!(!frontier.try_claim(&url));

        // Query and fragment variants are the same page.
        let variant = Url::parse("http://example.com/a?x=1#frag").unwrap();
        assert!(!frontier.try_claim(&variant));
    }

    #[test]
    fn rejects_foreign_hosts() {
        let frontier = frontier();
        let other = Url::parse("http://other.com/a").unwrap();
        assert!(!frontier.is_eligible(&other));
        assert!(!frontier.try_claim(&other));

        // Scheme mismatch alone does not make a URL foreign.
        let https = Url::parse("https://example.com/a").unwrap();
        assert!(frontier.is_eligible(&https));
    }

    #[test]
    fn mark_visited_is_idempotent() {
        let frontier = frontier();
        let url = Url::parse("http://example.com/a").unwrap();
        frontier.mark_visited(&url);
        frontier.mark_visited(&url);
        assert!(!frontier.is_eligible(&url));
    }

    #[test]
    fn report_keeps_completion_order() {
        let frontier = frontier();
        frontier.record_success(&Url::parse("http://example.com/").unwrap());
        frontier.record_failure(&Url::parse("http://example.com/missing").unwrap());
        frontier.record_success(&Url::parse("http://example.com/a#frag").unwrap());

        let report = frontier.report();
        assert_eq!(
            report.valid_urls,
            ["http://example.com/", "http://example.com/a"]
        );
        assert_eq!(report.invalid_urls, ["http://example.com/missing"]);
        assert_eq!(frontier.into_report(), report);
    }
}
