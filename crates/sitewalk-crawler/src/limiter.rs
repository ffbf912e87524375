use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{self, Instant};

/// Fixed-interval rate limiter shared by all crawl workers: request starts
/// are spaced `interval` apart, whichever worker asks. The first slot is
/// granted immediately.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Reserves the next free slot and sleeps until it.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(at) if at > now => at,
                _ => now,
            };
            *next_slot = Some(slot + self.interval);
            slot
        };
        time::sleep_until(slot).await;
    }
}
