//! Scriptable ProfileFetcher implementations for pipeline tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use qualifier::ProfileFetcher;
use shared::{FetchError, RawProfile};

/// Fetcher that replays scripted per-URL responses, simulates fetch latency
/// and records concurrency so tests can assert the pipeline's bounds.
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, VecDeque<Result<RawProfile, FetchError>>>>,
    latency: Duration,
    calls: AtomicU32,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            latency: Duration::ZERO,
            calls: AtomicU32::new(0),
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Script a single response for a URL.
    pub fn respond(self, url: &str, response: Result<RawProfile, FetchError>) -> Self {
        self.respond_many(url, vec![response])
    }

    /// Script a sequence of responses for a URL; attempts consume them in
    /// order. Exhausted or unscripted URLs return NotFound.
    pub fn respond_many(
        self,
        url: &str,
        responses: Vec<Result<RawProfile, FetchError>>,
    ) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .extend(responses);
        self
    }

    /// Total fetch attempts observed.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously outstanding fetches observed.
    pub fn high_water(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileFetcher for ScriptedFetcher {
    async fn fetch_profile(&self, url: &str) -> Result<RawProfile, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(current, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(url) {
            Some(queue) => queue.pop_front().unwrap_or(Err(FetchError::NotFound)),
            None => Err(FetchError::NotFound),
        }
    }
}

/// Handle wrapper so a test can keep reading counters on a fetcher the
/// pipeline has taken ownership of.
pub struct SharedFetcher(pub Arc<ScriptedFetcher>);

#[async_trait]
impl ProfileFetcher for SharedFetcher {
    async fn fetch_profile(&self, url: &str) -> Result<RawProfile, FetchError> {
        self.0.fetch_profile(url).await
    }
}
