//! Concurrent fetch/score pipeline
//!
//! Fans identifiers out as independent fetch units bounded by the rate
//! limiter, pipes successful fetches through the scoring engine and collects
//! every outcome through a single mpsc channel. The collecting loop is the
//! only writer of the run statistics, so no counter needs a lock. A watch
//! channel carries the global cancellation signal (overall timeout or
//! max-results early-stop); abandoned units emit nothing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::core::{ResultAggregator, ScoringEngine};
use crate::error::PipelineResult;
use crate::services::{RateLimiter, RetryPolicy};
use crate::traits::ProfileFetcher;
use crate::types::FetchOutcome;
use shared::{FetchError, RunStatistics, ScoredLead};

/// Tunables for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Maximum concurrently outstanding fetches
    pub concurrency: usize,
    /// Minimum delay between successive fetch starts
    pub request_delay: Duration,
    /// Retry/backoff configuration for the fetch boundary
    pub retry: RetryPolicy,
    /// Qualification threshold on the 0-100 score
    pub minimum_score: f64,
    /// Cap on the qualified-lead list; None = unlimited
    pub max_results: Option<usize>,
    /// Overall wall-clock budget for the run; None = unlimited
    pub overall_timeout: Option<Duration>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            concurrency: 5,
            request_delay: Duration::from_millis(2000),
            retry: RetryPolicy::default(),
            minimum_score: 60.0,
            max_results: None,
            overall_timeout: None,
        }
    }
}

/// Final output of a run: the qualified leads plus frozen statistics.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub qualified_leads: Vec<ScoredLead>,
    pub stats: RunStatistics,
}

/// One outcome event per finished fetch unit.
enum UnitEvent {
    Scored {
        index: usize,
        lead: ScoredLead,
        attempts: u32,
    },
    Failed {
        url: String,
        error: FetchError,
        attempts: u32,
    },
}

/// Orchestrates a batch of identifiers through fetch, scoring and
/// aggregation. Owns no global state; concurrent runs do not interfere.
pub struct Pipeline<F> {
    fetcher: Arc<F>,
    engine: Arc<ScoringEngine>,
    settings: PipelineSettings,
}

impl<F> Pipeline<F>
where
    F: ProfileFetcher + 'static,
{
    pub fn new(fetcher: F, engine: ScoringEngine, settings: PipelineSettings) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            engine: Arc::new(engine),
            settings,
        }
    }

    /// Run the batch to completion (or cancellation) and aggregate.
    ///
    /// Per-profile failures never abort the batch; partial success is a
    /// normal outcome and the report always carries the run statistics.
    pub async fn run(&self, urls: Vec<String>) -> PipelineResult<RunReport> {
        let started = Instant::now();
        let total = urls.len();
        info!("🚀 Starting qualification run for {total} profiles");

        let limiter = Arc::new(RateLimiter::new(
            self.settings.concurrency,
            self.settings.request_delay,
        ));
        let (event_tx, mut event_rx) = mpsc::channel::<UnitEvent>(total.max(1));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        if let Some(timeout) = self.settings.overall_timeout {
            let cancel = cancel_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                if cancel.send(true).is_ok() {
                    warn!("⏱️ Overall timeout reached, abandoning remaining fetches");
                }
            });
        }

        let mut handles = Vec::with_capacity(total);
        for (index, url) in urls.into_iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let engine = Arc::clone(&self.engine);
            let limiter = Arc::clone(&limiter);
            let retry = self.settings.retry.clone();
            let tx = event_tx.clone();
            let cancel = cancel_rx.clone();
            handles.push(tokio::spawn(run_unit(
                index, url, fetcher, engine, limiter, retry, tx, cancel,
            )));
        }
        drop(event_tx);

        // Single-writer collection: statistics mutate only here.
        let mut stats = RunStatistics::new(total);
        let mut scored: Vec<(usize, ScoredLead)> = Vec::with_capacity(total);
        let mut qualified_seen = 0usize;
        let mut early_stopped = false;

        while let Some(event) = event_rx.recv().await {
            match event {
                UnitEvent::Scored {
                    index,
                    lead,
                    attempts,
                } => {
                    stats.successful_fetches += 1;
                    debug!(
                        url = %lead.profile.url,
                        attempts,
                        score = lead.total_score(),
                        "profile scored"
                    );

                    if lead.total_score() >= self.settings.minimum_score {
                        qualified_seen += 1;
                        if let Some(limit) = self.settings.max_results {
                            if qualified_seen >= limit && !early_stopped {
                                early_stopped = true;
                                info!(
                                    "🛑 Reached {limit} qualified leads, stopping remaining fetches"
                                );
                                let _ = cancel_tx.send(true);
                            }
                        }
                    }
                    scored.push((index, lead));
                }
                UnitEvent::Failed {
                    url,
                    error,
                    attempts,
                } => {
                    stats.failed_fetches += 1;
                    warn!(url = %url, attempts, %error, "profile fetch failed, skipping");
                }
            }
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!("fetch unit aborted abnormally: {e}");
            }
        }

        let leads = sort_scored(scored);
        stats.processing_time_seconds = started.elapsed().as_secs_f64();

        let aggregator =
            ResultAggregator::new(self.settings.minimum_score, self.settings.max_results);
        let (qualified_leads, stats) = aggregator.aggregate(&leads, stats);

        info!(
            "✅ Run complete: {} qualified of {} fetched ({} failed) in {:.1}s",
            stats.qualified_leads,
            stats.successful_fetches,
            stats.failed_fetches,
            stats.processing_time_seconds
        );

        Ok(RunReport {
            qualified_leads,
            stats,
        })
    }
}

/// One identifier's unit of work: gate, fetch with retries, score, report.
async fn run_unit<F>(
    index: usize,
    url: String,
    fetcher: Arc<F>,
    engine: Arc<ScoringEngine>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    tx: mpsc::Sender<UnitEvent>,
    mut cancel: watch::Receiver<bool>,
) where
    F: ProfileFetcher,
{
    if *cancel.borrow() {
        return;
    }

    let ticket = tokio::select! {
        ticket = limiter.acquire() => ticket,
        _ = cancelled(&mut cancel) => return,
    };

    let outcome = tokio::select! {
        outcome = retry.execute(fetcher.as_ref(), &url) => outcome,
        _ = cancelled(&mut cancel) => {
            drop(ticket);
            return;
        }
    };

    // Release the network slot before scoring; CPU work must not hold it.
    drop(ticket);

    let event = match outcome {
        FetchOutcome::Success { profile, attempts } => UnitEvent::Scored {
            index,
            lead: engine.qualify(&profile),
            attempts,
        },
        FetchOutcome::Failure {
            url,
            error,
            attempts,
        } => UnitEvent::Failed {
            url,
            error,
            attempts,
        },
    };

    // The receiver only disappears once the run is torn down.
    let _ = tx.send(event).await;
}

/// Resolves when the run is cancelled; never resolves otherwise.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|&flag| flag).await.is_err() {
        // Sender dropped without cancelling: the run is completing normally,
        // so this branch must never win a select.
        std::future::pending::<()>().await;
    }
}

/// Descending total score, ties broken by original input position.
fn sort_scored(mut scored: Vec<(usize, ScoredLead)>) -> Vec<ScoredLead> {
    scored.sort_by(|a, b| {
        b.1.total_score()
            .total_cmp(&a.1.total_score())
            .then(a.0.cmp(&b.0))
    });
    scored.into_iter().map(|(_, lead)| lead).collect()
}
