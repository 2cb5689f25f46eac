//! Lead qualification pipeline
//!
//! Fetches professional profiles concurrently through a rate-limited,
//! retrying fetch boundary, scores each against user-defined qualification
//! criteria, and aggregates the qualified leads with run statistics.

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::RunConfig;
pub use core::{ResultAggregator, ScoringEngine};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Pipeline, PipelineSettings, RunReport};
pub use services::{HttpProfileFetcher, RateLimiter, RetryPolicy};
pub use traits::ProfileFetcher;
pub use types::FetchOutcome;
