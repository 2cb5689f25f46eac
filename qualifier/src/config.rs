//! Input configuration document
//!
//! The run is driven by one JSON document with camelCase keys: the profile
//! URL list, qualification criteria, scoring weights and processing options.
//! Parsing is lenient about omissions (every option has the documented
//! default); validation is strict and fatal before any fetch is issued.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::pipeline::PipelineSettings;
use crate::services::RetryPolicy;
use shared::{ConfigError, QualificationCriteria, ScoringWeights};

fn default_minimum_score() -> f64 {
    60.0
}

fn default_concurrency() -> usize {
    5
}

fn default_request_delay_ms() -> u64 {
    2000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

/// One batch run's worth of configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub profile_urls: Vec<String>,

    #[serde(default)]
    pub qualification_criteria: QualificationCriteria,

    #[serde(default)]
    pub scoring_weights: ScoringWeights,

    /// Qualification threshold on the 0-100 score
    #[serde(default = "default_minimum_score")]
    pub minimum_score: f64,

    /// Cap on the qualified-lead list; absent = unlimited
    #[serde(default)]
    pub max_results: Option<usize>,

    /// Maximum concurrently outstanding fetches
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Minimum delay between successive fetch starts
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Fetch attempt budget per profile
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Base delay for exponential retry backoff
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Overall wall-clock budget for the run
    #[serde(default)]
    pub overall_timeout_secs: Option<u64>,

    /// Emit full per-criterion breakdowns in the output document
    #[serde(default = "default_true")]
    pub include_score_breakdown: bool,
}

impl RunConfig {
    /// Read and parse the configuration document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Strict validation; any failure aborts the run before fetching.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profile_urls.is_empty() {
            return Err(ConfigError::NoProfiles);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::invalid_field("concurrency", self.concurrency));
        }
        if !(0.0..=100.0).contains(&self.minimum_score) {
            return Err(ConfigError::invalid_field(
                "minimumScore",
                self.minimum_score,
            ));
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::invalid_field(
                "retryAttempts",
                self.retry_attempts,
            ));
        }

        let weights = &self.scoring_weights;
        let named = [
            ("jobTitleWeight", weights.job_title_weight),
            ("industryWeight", weights.industry_weight),
            ("locationWeight", weights.location_weight),
            ("experienceWeight", weights.experience_weight),
            ("companySizeWeight", weights.company_size_weight),
            ("skillsWeight", weights.skills_weight),
        ];
        for (name, weight) in named {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::invalid_field(name, weight));
            }
        }
        if !weights.validate() {
            return Err(ConfigError::WeightSum {
                sum: weights.sum(),
                tolerance: shared::WEIGHT_SUM_TOLERANCE,
            });
        }

        Ok(())
    }

    /// Pipeline tunables derived from the document.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            concurrency: self.concurrency,
            request_delay: Duration::from_millis(self.request_delay_ms),
            retry: RetryPolicy::new(
                self.retry_attempts,
                Duration::from_millis(self.retry_backoff_ms),
                2.0,
            ),
            minimum_score: self.minimum_score,
            max_results: self.max_results,
            overall_timeout: self.overall_timeout_secs.map(Duration::from_secs),
        }
    }
}
