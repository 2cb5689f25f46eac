//! Fetch issuance throttling
//!
//! Bounds how many fetches are outstanding at once and enforces a minimum
//! delay between successive fetch starts, independent of concurrency. A
//! counting semaphore covers the ceiling; a mutex-guarded "next allowed
//! start" instant covers pacing. Both queues admit waiters in FIFO order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;
use tracing::debug;

/// Throttle gate shared by all fetch units of a run.
#[derive(Debug)]
pub struct RateLimiter {
    permits: Arc<Semaphore>,
    next_start: Mutex<Instant>,
    delay: Duration,
}

/// Concurrency slot held for the duration of one fetch.
///
/// Dropping the ticket releases the slot; the pipeline drops it as soon as
/// the fetch finishes so scoring never occupies a network slot.
#[derive(Debug)]
pub struct RateLimitTicket {
    _permit: OwnedSemaphorePermit,
}

impl RateLimiter {
    /// `max_concurrency` outstanding fetches; `delay` between fetch starts
    /// (zero disables the pacing gate).
    pub fn new(max_concurrency: usize, delay: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
            next_start: Mutex::new(Instant::now()),
            delay,
        }
    }

    /// Wait until both a concurrency slot and the pacing gate allow another
    /// fetch to start, then return the held slot.
    pub async fn acquire(&self) -> RateLimitTicket {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("rate limiter semaphore is never closed");

        if !self.delay.is_zero() {
            // Holding the lock across the sleep keeps admissions spaced and
            // in FIFO order.
            let mut next_start = self.next_start.lock().await;
            let now = Instant::now();
            if *next_start > now {
                debug!(wait_ms = (*next_start - now).as_millis() as u64, "pacing fetch start");
                tokio::time::sleep_until(*next_start).await;
                *next_start += self.delay;
            } else {
                *next_start = now + self.delay;
            }
        }

        RateLimitTicket { _permit: permit }
    }

    /// Currently free concurrency slots.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}
