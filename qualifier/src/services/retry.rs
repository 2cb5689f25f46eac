//! Bounded retries with exponential backoff around the fetch boundary
//!
//! Every fetch runs through an explicit per-attempt state machine
//! (Pending → Attempting → {Succeeded, RetryWait, PermanentFailure,
//! RetriesExhausted}) so the attempt-count and backoff invariants are
//! testable without a fetcher. All failures are captured in the returned
//! outcome; nothing escapes this boundary, so one bad profile can never
//! abort the batch.

use std::time::Duration;

use tracing::{debug, warn};

use crate::traits::ProfileFetcher;
use crate::types::FetchOutcome;
use shared::FetchError;

/// Retry configuration for a run.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            multiplier: 2.0,
        }
    }
}

/// Lifecycle of one identifier's fetch attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptState {
    /// No attempt issued yet
    Pending,
    /// An attempt is in flight
    Attempting { attempt: u32 },
    /// A transient failure is waiting out its backoff
    RetryWait { attempt: u32, delay: Duration },
    /// Terminal: the fetch succeeded
    Succeeded { attempts: u32 },
    /// Terminal: a permanent error, retrying would not help
    PermanentFailure { attempts: u32 },
    /// Terminal: transient errors exhausted the attempt budget
    RetriesExhausted { attempts: u32 },
}

impl AttemptState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttemptState::Succeeded { .. }
                | AttemptState::PermanentFailure { .. }
                | AttemptState::RetriesExhausted { .. }
        )
    }
}

/// Explicit state machine driving one identifier through the retry policy.
#[derive(Debug)]
pub struct FetchStateMachine {
    max_attempts: u32,
    base_delay: Duration,
    multiplier: f64,
    state: AttemptState,
}

impl FetchStateMachine {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            base_delay: policy.base_delay,
            multiplier: policy.multiplier,
            state: AttemptState::Pending,
        }
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    /// Move into the next attempt and return its 1-based number.
    pub fn start_attempt(&mut self) -> u32 {
        let attempt = match self.state {
            AttemptState::Pending => 1,
            AttemptState::RetryWait { attempt, .. } => attempt + 1,
            // Restarting from any other state indicates a driver bug; keep
            // the machine consistent rather than panicking mid-batch.
            AttemptState::Attempting { attempt } => attempt,
            AttemptState::Succeeded { attempts }
            | AttemptState::PermanentFailure { attempts }
            | AttemptState::RetriesExhausted { attempts } => attempts,
        };
        self.state = AttemptState::Attempting { attempt };
        attempt
    }

    pub fn record_success(&mut self) {
        if let AttemptState::Attempting { attempt } = self.state {
            self.state = AttemptState::Succeeded { attempts: attempt };
        }
    }

    /// Record a failed attempt. Returns the backoff delay when another
    /// attempt should follow, None when the state is terminal.
    pub fn record_failure(&mut self, error: &FetchError) -> Option<Duration> {
        let attempt = match self.state {
            AttemptState::Attempting { attempt } => attempt,
            _ => return None,
        };

        if !error.is_transient() {
            self.state = AttemptState::PermanentFailure { attempts: attempt };
            return None;
        }
        if attempt >= self.max_attempts {
            self.state = AttemptState::RetriesExhausted { attempts: attempt };
            return None;
        }

        let delay = backoff_delay(self.base_delay, self.multiplier, attempt);
        self.state = AttemptState::RetryWait { attempt, delay };
        Some(delay)
    }
}

/// Exponential backoff after the n-th failed attempt (1-based):
/// base × multiplier^(n−1).
pub fn backoff_delay(base: Duration, multiplier: f64, attempt: u32) -> Duration {
    let factor = multiplier.powi(attempt.saturating_sub(1) as i32);
    base.mul_f64(factor.max(0.0))
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, multiplier: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            multiplier,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff delay after the given failed attempt number.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        backoff_delay(self.base_delay, self.multiplier, attempt)
    }

    /// Run one identifier through the fetcher under this policy.
    ///
    /// Transient errors retry with exponential backoff up to the attempt
    /// budget; permanent errors fail immediately. The returned outcome
    /// carries the attempt count either way.
    pub async fn execute<F>(&self, fetcher: &F, url: &str) -> FetchOutcome
    where
        F: ProfileFetcher + ?Sized,
    {
        let mut machine = FetchStateMachine::new(self);

        loop {
            let attempt = machine.start_attempt();
            debug!(url, attempt, "issuing fetch attempt");

            match fetcher.fetch_profile(url).await {
                Ok(profile) => {
                    machine.record_success();
                    return FetchOutcome::Success {
                        profile,
                        attempts: attempt,
                    };
                }
                Err(error) => match machine.record_failure(&error) {
                    Some(delay) => {
                        warn!(
                            url,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            %error,
                            "transient fetch failure, backing off"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        return FetchOutcome::Failure {
                            url: url.to_string(),
                            error,
                            attempts: attempt,
                        };
                    }
                },
            }
        }
    }
}
