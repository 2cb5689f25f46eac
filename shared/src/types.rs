//! Core data model for the lead qualification pipeline

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tolerance applied when checking that scoring weights sum to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// User-defined target attributes a profile is scored against.
///
/// Criteria with empty target data are skipped at scoring time and their
/// weight is redistributed across the remaining criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualificationCriteria {
    pub target_job_titles: Vec<String>,
    pub target_industries: Vec<String>,
    pub target_locations: Vec<String>,
    pub min_experience_years: u32,
    pub target_company_sizes: Vec<CompanySizeBand>,
    pub required_skills: Vec<String>,
}

/// Weights controlling each criterion's maximum contribution to the total
/// score. Fractions in [0, 1]; must sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringWeights {
    pub job_title_weight: f64,
    pub industry_weight: f64,
    pub location_weight: f64,
    pub experience_weight: f64,
    pub company_size_weight: f64,
    pub skills_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            job_title_weight: 0.25,
            industry_weight: 0.20,
            location_weight: 0.15,
            experience_weight: 0.20,
            company_size_weight: 0.10,
            skills_weight: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.job_title_weight
            + self.industry_weight
            + self.location_weight
            + self.experience_weight
            + self.company_size_weight
            + self.skills_weight
    }

    /// Check that the weights sum to approximately 1.0.
    pub fn validate(&self) -> bool {
        (self.sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE
    }

    /// Rescale the weights so they sum to 1.0, preserving proportions.
    /// Leaves an all-zero weight set untouched.
    pub fn normalize(&mut self) {
        let total = self.sum();
        if total <= 0.0 {
            return;
        }
        self.job_title_weight /= total;
        self.industry_weight /= total;
        self.location_weight /= total;
        self.experience_weight /= total;
        self.company_size_weight /= total;
        self.skills_weight /= total;
    }
}

/// Enumerated company-size buckets in ascending headcount order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySizeBand {
    #[serde(rename = "1-10")]
    Micro,
    #[serde(rename = "11-50")]
    Small,
    #[serde(rename = "51-200")]
    Medium,
    #[serde(rename = "201-500")]
    Large,
    #[serde(rename = "501-1000")]
    VeryLarge,
    #[serde(rename = "1001-5000")]
    Enterprise,
    #[serde(rename = "5001-10000")]
    Corporate,
    #[serde(rename = "10000+")]
    Global,
}

impl CompanySizeBand {
    const ORDERED: [CompanySizeBand; 8] = [
        CompanySizeBand::Micro,
        CompanySizeBand::Small,
        CompanySizeBand::Medium,
        CompanySizeBand::Large,
        CompanySizeBand::VeryLarge,
        CompanySizeBand::Enterprise,
        CompanySizeBand::Corporate,
        CompanySizeBand::Global,
    ];

    /// Position in the ascending band order.
    pub fn rank(&self) -> usize {
        Self::ORDERED
            .iter()
            .position(|band| band == self)
            .unwrap_or(0)
    }

    /// Neighboring-rank test used for partial company-size credit.
    pub fn is_adjacent(&self, other: &CompanySizeBand) -> bool {
        self.rank().abs_diff(other.rank()) == 1
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompanySizeBand::Micro => "1-10",
            CompanySizeBand::Small => "11-50",
            CompanySizeBand::Medium => "51-200",
            CompanySizeBand::Large => "201-500",
            CompanySizeBand::VeryLarge => "501-1000",
            CompanySizeBand::Enterprise => "1001-5000",
            CompanySizeBand::Corporate => "5001-10000",
            CompanySizeBand::Global => "10000+",
        }
    }
}

impl fmt::Display for CompanySizeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CompanySizeBand {
    type Err = String;

    /// Lenient parse of display strings: commas, spaces and the "10,001+"
    /// style upper bucket are tolerated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect();
        let band = match normalized.as_str() {
            "1-10" => CompanySizeBand::Micro,
            "11-50" => CompanySizeBand::Small,
            "51-200" => CompanySizeBand::Medium,
            "201-500" => CompanySizeBand::Large,
            "501-1000" => CompanySizeBand::VeryLarge,
            "1001-5000" => CompanySizeBand::Enterprise,
            "5001-10000" => CompanySizeBand::Corporate,
            "10000+" | "10001+" => CompanySizeBand::Global,
            _ => return Err(format!("unrecognized company size band: {s}")),
        };
        Ok(band)
    }
}

/// Raw profile fields produced by a single successful fetch.
///
/// Every content field is optional; missing fields score as non-matches
/// rather than errors. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    pub url: String,
    pub name: Option<String>,
    pub headline: Option<String>,
    pub current_position: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub experience_years: Option<u32>,
    pub company_size: Option<CompanySizeBand>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    pub connections: Option<u32>,
    pub about: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl RawProfile {
    /// An empty profile shell for the given identifier.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            headline: None,
            current_position: None,
            current_company: None,
            location: None,
            industry: None,
            experience_years: None,
            company_size: None,
            skills: Vec::new(),
            education: Vec::new(),
            connections: None,
            about: None,
            fetched_at: Utc::now(),
        }
    }
}

/// Detailed breakdown of qualification scoring for one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub job_title_score: f64,
    pub job_title_match: Option<String>,

    pub industry_score: f64,
    pub industry_match: Option<String>,

    pub location_score: f64,
    pub location_match: Option<String>,

    pub experience_score: f64,
    pub experience_details: Option<String>,

    pub company_size_score: f64,
    pub company_size_match: Option<String>,

    pub skills_score: f64,
    pub skills_matched: Vec<String>,

    pub total_score: f64,
    pub qualification_reasons: Vec<String>,
}

/// A scored profile. Created by the scoring engine, never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLead {
    pub profile: RawProfile,
    pub breakdown: ScoreBreakdown,
}

impl ScoredLead {
    pub fn total_score(&self) -> f64 {
        self.breakdown.total_score
    }

    pub fn qualification_reasons(&self) -> &[String] {
        &self.breakdown.qualification_reasons
    }

    /// Reduced output record used when score breakdowns are excluded.
    pub fn summary(&self) -> LeadSummary {
        LeadSummary {
            url: self.profile.url.clone(),
            name: self.profile.name.clone(),
            headline: self.profile.headline.clone(),
            current_position: self.profile.current_position.clone(),
            current_company: self.profile.current_company.clone(),
            location: self.profile.location.clone(),
            industry: self.profile.industry.clone(),
            experience_years: self.profile.experience_years,
            skills: self.profile.skills.clone(),
            total_score: self.breakdown.total_score,
            qualification_reasons: self.breakdown.qualification_reasons.clone(),
            fetched_at: self.profile.fetched_at,
        }
    }
}

/// Flattened lead record for size-reduced exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSummary {
    pub url: String,
    pub name: Option<String>,
    pub headline: Option<String>,
    pub current_position: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub experience_years: Option<u32>,
    pub skills: Vec<String>,
    pub total_score: f64,
    pub qualification_reasons: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Failure reasons for profile fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum FetchError {
    /// Request timed out
    #[error("request timed out")]
    Timeout,
    /// Throttled by the profile source
    #[error("rate limited by profile source")]
    RateLimited,
    /// Network/connection error
    #[error("network error: {0}")]
    Network(String),
    /// Server-side error from the profile source
    #[error("server error: {0}")]
    ServerError(String),
    /// Profile does not exist
    #[error("profile not found")]
    NotFound,
    /// Authentication or authorization rejected
    #[error("access denied by profile source")]
    AccessDenied,
    /// Identifier is not a fetchable profile URL
    #[error("malformed profile URL: {0}")]
    MalformedUrl(String),
    /// Response body could not be turned into a usable profile
    #[error("invalid profile payload: {0}")]
    InvalidPayload(String),
}

impl FetchError {
    /// Transient failures are worth retrying; permanent ones are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout
                | FetchError::RateLimited
                | FetchError::Network(_)
                | FetchError::ServerError(_)
        )
    }
}

/// Statistics for a single pipeline run.
///
/// Accumulated by the run's single collecting loop, frozen at completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_profiles: usize,
    pub successful_fetches: usize,
    pub failed_fetches: usize,
    pub qualified_leads: usize,
    pub average_score: f64,
    pub processing_time_seconds: f64,
}

impl RunStatistics {
    pub fn new(total_profiles: usize) -> Self {
        Self {
            total_profiles,
            ..Default::default()
        }
    }

    /// Fraction of requested profiles that fetched successfully.
    pub fn success_rate(&self) -> f64 {
        if self.total_profiles == 0 {
            0.0
        } else {
            self.successful_fetches as f64 / self.total_profiles as f64
        }
    }

    /// Fraction of successfully fetched profiles that qualified.
    pub fn qualification_rate(&self) -> f64 {
        if self.successful_fetches == 0 {
            0.0
        } else {
            self.qualified_leads as f64 / self.successful_fetches as f64
        }
    }
}
