//! Profile and criteria fixtures shared by the integration tests

use qualifier::ScoringEngine;
use shared::{CompanySizeBand, QualificationCriteria, RawProfile, ScoringWeights};

/// Criteria the fixture profiles are tuned against.
pub fn standard_criteria() -> QualificationCriteria {
    QualificationCriteria {
        target_job_titles: vec!["Sales Manager".to_string()],
        target_industries: vec!["Technology".to_string()],
        target_locations: vec!["San Francisco".to_string()],
        min_experience_years: 5,
        target_company_sizes: vec![CompanySizeBand::Medium],
        required_skills: vec!["Salesforce".to_string(), "CRM".to_string()],
    }
}

pub fn standard_engine() -> ScoringEngine {
    ScoringEngine::new(standard_criteria(), ScoringWeights::default()).unwrap()
}

/// Matches every criterion; scores well above any sensible threshold.
pub fn strong_profile(url: &str) -> RawProfile {
    let mut profile = RawProfile::new(url);
    profile.name = Some("Ada Lovelace".to_string());
    profile.current_position = Some("Sales Manager".to_string());
    profile.industry = Some("Technology".to_string());
    profile.location = Some("San Francisco, California".to_string());
    profile.experience_years = Some(13);
    profile.company_size = Some(CompanySizeBand::Medium);
    profile.skills = vec!["Salesforce".to_string(), "CRM".to_string()];
    profile
}

/// Title, industry and half the skills: lands above a 60-point threshold
/// but clearly below a strong profile.
pub fn qualified_profile(url: &str) -> RawProfile {
    let mut profile = RawProfile::new(url);
    profile.name = Some("Grace Hopper".to_string());
    profile.current_position = Some("Sales Manager".to_string());
    profile.industry = Some("Technology".to_string());
    profile.experience_years = Some(5);
    profile.skills = vec!["Salesforce".to_string()];
    profile
}

/// Partial matches only: lands below a 60-point threshold.
pub fn borderline_profile(url: &str) -> RawProfile {
    let mut profile = RawProfile::new(url);
    profile.name = Some("Joan Clarke".to_string());
    profile.current_position = Some("Regional Sales Lead".to_string());
    profile.industry = Some("Technology".to_string());
    profile.experience_years = Some(4);
    profile
}
