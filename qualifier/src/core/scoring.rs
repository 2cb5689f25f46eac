//! Qualification scoring engine with configurable weights and detailed breakdowns
//!
//! Pure business logic: given a fetched profile, criteria and weights, produce
//! a per-criterion score breakdown with human-readable qualification reasons.
//! Total over any profile shape; missing fields score as non-matches.

use shared::{
    ConfigError, QualificationCriteria, RawProfile, ScoreBreakdown, ScoredLead, ScoringWeights,
    WEIGHT_SUM_TOLERANCE,
};

/// Profile locations treated as matching a "Remote" target location.
const REMOTE_KEYWORDS: [&str; 4] = ["remote", "worldwide", "global", "distributed"];

/// Engine for scoring fetched profiles against qualification criteria.
///
/// Criteria whose target data is empty are skipped: their weight is excluded
/// and the remaining weights are renormalized proportionally, so a criterion
/// the user did not configure can neither help nor hurt a profile. The
/// experience criterion is always active (a zero minimum simply scores 1.0).
pub struct ScoringEngine {
    criteria: QualificationCriteria,
    effective: EffectiveWeights,
}

/// Weights after excluding skipped criteria and renormalizing.
#[derive(Debug, Clone, Copy, Default)]
struct EffectiveWeights {
    job_title: f64,
    industry: f64,
    location: f64,
    experience: f64,
    company_size: f64,
    skills: f64,
}

impl EffectiveWeights {
    fn compute(criteria: &QualificationCriteria, weights: &ScoringWeights) -> Self {
        // (weight, active) per criterion, in the fixed criterion order.
        let entries = [
            (weights.job_title_weight, !criteria.target_job_titles.is_empty()),
            (weights.industry_weight, !criteria.target_industries.is_empty()),
            (weights.location_weight, !criteria.target_locations.is_empty()),
            (weights.experience_weight, true),
            (
                weights.company_size_weight,
                !criteria.target_company_sizes.is_empty(),
            ),
            (weights.skills_weight, !criteria.required_skills.is_empty()),
        ];

        let active_sum: f64 = entries
            .iter()
            .filter(|(_, active)| *active)
            .map(|(weight, _)| weight)
            .sum();

        if active_sum <= 0.0 {
            return EffectiveWeights::default();
        }

        let scaled = |(weight, active): (f64, bool)| if active { weight / active_sum } else { 0.0 };

        EffectiveWeights {
            job_title: scaled(entries[0]),
            industry: scaled(entries[1]),
            location: scaled(entries[2]),
            experience: scaled(entries[3]),
            company_size: scaled(entries[4]),
            skills: scaled(entries[5]),
        }
    }
}

impl ScoringEngine {
    /// Create an engine for one run. Fails if the weights do not sum to 1.0
    /// within tolerance; this is fatal before any fetch is issued.
    pub fn new(
        criteria: QualificationCriteria,
        weights: ScoringWeights,
    ) -> Result<Self, ConfigError> {
        if !weights.validate() {
            return Err(ConfigError::WeightSum {
                sum: weights.sum(),
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        let effective = EffectiveWeights::compute(&criteria, &weights);
        Ok(Self {
            criteria,
            effective,
        })
    }

    /// Score a profile against the engine's criteria.
    ///
    /// Pure and deterministic; never fails. An entirely empty profile yields
    /// total score 0 with an empty reasons list.
    pub fn score(&self, profile: &RawProfile) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::default();

        let (score, matched) = self.score_job_title(profile);
        breakdown.job_title_score = score;
        breakdown.job_title_match = matched;

        let (score, matched) = self.score_industry(profile);
        breakdown.industry_score = score;
        breakdown.industry_match = matched;

        let (score, matched) = self.score_location(profile);
        breakdown.location_score = score;
        breakdown.location_match = matched;

        let (score, details) = self.score_experience(profile);
        breakdown.experience_score = score;
        breakdown.experience_details = details;

        let (score, matched) = self.score_company_size(profile);
        breakdown.company_size_score = score;
        breakdown.company_size_match = matched;

        let (score, matched) = self.score_skills(profile);
        breakdown.skills_score = score;
        breakdown.skills_matched = matched;

        breakdown.total_score = 100.0
            * (self.effective.job_title * breakdown.job_title_score
                + self.effective.industry * breakdown.industry_score
                + self.effective.location * breakdown.location_score
                + self.effective.experience * breakdown.experience_score
                + self.effective.company_size * breakdown.company_size_score
                + self.effective.skills * breakdown.skills_score);

        breakdown.qualification_reasons = self.qualification_reasons(&breakdown);
        breakdown
    }

    /// Score a profile and wrap it as an immutable lead record.
    /// Threshold filtering happens downstream in the aggregator, not here.
    pub fn qualify(&self, profile: &RawProfile) -> ScoredLead {
        ScoredLead {
            profile: profile.clone(),
            breakdown: self.score(profile),
        }
    }

    fn score_job_title(&self, profile: &RawProfile) -> (f64, Option<String>) {
        if self.criteria.target_job_titles.is_empty() {
            return (0.0, None);
        }
        let position = match profile.current_position.as_deref() {
            Some(p) if !p.trim().is_empty() => p.to_lowercase(),
            _ => return (0.0, None),
        };

        for target in &self.criteria.target_job_titles {
            if target.to_lowercase() == position {
                return (1.0, Some(target.clone()));
            }
        }

        for target in &self.criteria.target_job_titles {
            let target_lower = target.to_lowercase();
            if position.contains(&target_lower)
                || target_lower.contains(&position)
                || shares_token(&position, &target_lower)
            {
                return (0.6, Some(target.clone()));
            }
        }

        (0.0, None)
    }

    fn score_industry(&self, profile: &RawProfile) -> (f64, Option<String>) {
        if self.criteria.target_industries.is_empty() {
            return (0.0, None);
        }
        let industry = match profile.industry.as_deref() {
            Some(i) if !i.trim().is_empty() => i.to_lowercase(),
            _ => return (0.0, None),
        };

        for target in &self.criteria.target_industries {
            if target.to_lowercase() == industry {
                return (1.0, Some(target.clone()));
            }
        }

        (0.0, None)
    }

    fn score_location(&self, profile: &RawProfile) -> (f64, Option<String>) {
        if self.criteria.target_locations.is_empty() {
            return (0.0, None);
        }
        let location = match profile.location.as_deref() {
            Some(l) if !l.trim().is_empty() => l.to_lowercase(),
            _ => return (0.0, None),
        };

        for target in &self.criteria.target_locations {
            let target_lower = target.to_lowercase();
            if location.contains(&target_lower) || target_lower.contains(&location) {
                return (1.0, Some(target.clone()));
            }
            if target_lower == "remote"
                && REMOTE_KEYWORDS.iter().any(|keyword| location.contains(keyword))
            {
                return (1.0, Some(target.clone()));
            }
        }

        // Same region component (state/country) earns partial credit.
        let profile_regions: Vec<&str> = region_components(&location);
        for target in &self.criteria.target_locations {
            let target_lower = target.to_lowercase();
            let shared = region_components(&target_lower)
                .iter()
                .any(|component| profile_regions.contains(component));
            if shared {
                return (0.5, Some(target.clone()));
            }
        }

        (0.0, None)
    }

    fn score_experience(&self, profile: &RawProfile) -> (f64, Option<String>) {
        let min_years = self.criteria.min_experience_years;
        if min_years == 0 {
            return (1.0, Some("no minimum experience required".to_string()));
        }

        let years = match profile.experience_years {
            Some(y) => y,
            None => return (0.0, Some("experience not available".to_string())),
        };

        if years >= min_years {
            // +0.05 per full two years above the minimum, capped at 1.0.
            let bonus = ((years - min_years) / 2) as f64 * 0.05;
            let score = (0.8 + bonus).min(1.0);
            let mut details = format!("{years} years (meets {min_years}+ requirement)");
            if bonus > 0.0 {
                details.push_str(&format!(" with {:.0}% bonus", bonus.min(0.2) * 100.0));
            }
            (score, Some(details))
        } else {
            let score = (years as f64 / min_years as f64).min(0.8);
            (
                score,
                Some(format!("{years} years (below {min_years} year minimum)")),
            )
        }
    }

    fn score_company_size(&self, profile: &RawProfile) -> (f64, Option<String>) {
        if self.criteria.target_company_sizes.is_empty() {
            return (0.0, None);
        }
        let band = match profile.company_size {
            Some(band) => band,
            None => return (0.0, None),
        };

        if self.criteria.target_company_sizes.contains(&band) {
            return (1.0, Some(band.label().to_string()));
        }

        for target in &self.criteria.target_company_sizes {
            if target.is_adjacent(&band) {
                return (0.5, Some(target.label().to_string()));
            }
        }

        (0.0, None)
    }

    fn score_skills(&self, profile: &RawProfile) -> (f64, Vec<String>) {
        let required = &self.criteria.required_skills;
        if required.is_empty() {
            return (0.0, Vec::new());
        }

        let profile_skills: Vec<String> = profile
            .skills
            .iter()
            .map(|skill| skill.to_lowercase())
            .collect();

        // Matched subset keeps the required-skill order for stable reasons.
        let matched: Vec<String> = required
            .iter()
            .filter(|skill| profile_skills.contains(&skill.to_lowercase()))
            .cloned()
            .collect();

        let score = matched.len() as f64 / required.len().max(1) as f64;
        (score, matched)
    }

    /// Human-readable reasons, one per contributing criterion, in the fixed
    /// criterion order so output is reproducible.
    fn qualification_reasons(&self, breakdown: &ScoreBreakdown) -> Vec<String> {
        let mut reasons = Vec::new();

        if breakdown.job_title_score > 0.0 {
            if let Some(matched) = &breakdown.job_title_match {
                if breakdown.job_title_score >= 1.0 {
                    reasons.push(format!("Perfect job title match: {matched}"));
                } else {
                    reasons.push(format!("Partial job title match: {matched}"));
                }
            }
        }

        if breakdown.industry_score > 0.0 {
            if let Some(matched) = &breakdown.industry_match {
                reasons.push(format!("Target industry match: {matched}"));
            }
        }

        if breakdown.location_score > 0.0 {
            if let Some(matched) = &breakdown.location_match {
                if breakdown.location_score >= 1.0 {
                    reasons.push(format!("Excellent location match: {matched}"));
                } else {
                    reasons.push(format!("Partial location match: {matched}"));
                }
            }
        }

        if breakdown.experience_score > 0.0 {
            if let Some(details) = &breakdown.experience_details {
                if breakdown.experience_score > 0.8 {
                    reasons.push(format!("Excellent experience level: {details}"));
                } else if breakdown.experience_score > 0.5 {
                    reasons.push(format!("Good experience level: {details}"));
                } else {
                    reasons.push(format!("Some experience: {details}"));
                }
            }
        }

        if breakdown.company_size_score > 0.0 {
            if let Some(matched) = &breakdown.company_size_match {
                if breakdown.company_size_score >= 1.0 {
                    reasons.push(format!("Company size match: {matched}"));
                } else {
                    reasons.push(format!("Adjacent company size: {matched}"));
                }
            }
        }

        if !breakdown.skills_matched.is_empty() {
            reasons.push(format!(
                "Has {} required skills: {}",
                breakdown.skills_matched.len(),
                breakdown.skills_matched.join(", ")
            ));
        }

        reasons
    }
}

/// Whether two lowercased strings share a meaningful word token.
fn shares_token(left: &str, right: &str) -> bool {
    let right_tokens: Vec<&str> = right
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 3)
        .collect();

    left.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 3)
        .any(|token| right_tokens.contains(&token))
}

/// Comma-separated location components, trimmed and non-empty.
fn region_components(location: &str) -> Vec<&str> {
    location
        .split(',')
        .map(str::trim)
        .filter(|component| !component.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CompanySizeBand;

    fn full_criteria() -> QualificationCriteria {
        QualificationCriteria {
            target_job_titles: vec!["VP of Sales".to_string()],
            target_industries: vec!["Technology".to_string()],
            target_locations: vec!["San Francisco".to_string()],
            min_experience_years: 5,
            target_company_sizes: vec![CompanySizeBand::Medium],
            required_skills: vec!["Salesforce".to_string(), "Negotiation".to_string()],
        }
    }

    fn matching_profile() -> RawProfile {
        let mut profile = RawProfile::new("https://example.com/in/ada");
        profile.name = Some("Ada Lovelace".to_string());
        profile.current_position = Some("VP of Sales".to_string());
        profile.industry = Some("Technology".to_string());
        profile.location = Some("San Francisco, California".to_string());
        profile.experience_years = Some(13);
        profile.company_size = Some(CompanySizeBand::Medium);
        profile.skills = vec!["Salesforce".to_string(), "negotiation".to_string()];
        profile
    }

    fn engine(criteria: QualificationCriteria) -> ScoringEngine {
        ScoringEngine::new(criteria, ScoringWeights::default()).unwrap()
    }

    #[test]
    fn perfect_match_scores_one_hundred() {
        let engine = engine(full_criteria());
        let breakdown = engine.score(&matching_profile());

        assert!(
            (breakdown.total_score - 100.0).abs() < 1e-6,
            "expected 100, got {}",
            breakdown.total_score
        );
        // One reason per criterion, fixed order.
        assert_eq!(breakdown.qualification_reasons.len(), 6);
        assert!(breakdown.qualification_reasons[0].starts_with("Perfect job title match"));
        assert!(breakdown.qualification_reasons[5].starts_with("Has 2 required skills"));
    }

    #[test]
    fn empty_profile_scores_zero_with_no_reasons() {
        let engine = engine(full_criteria());
        let breakdown = engine.score(&RawProfile::new("https://example.com/in/ghost"));

        assert_eq!(breakdown.total_score, 0.0);
        assert!(breakdown.qualification_reasons.is_empty());
    }

    #[test]
    fn total_score_stays_in_bounds() {
        let engine = engine(full_criteria());
        let mut partial = matching_profile();
        partial.experience_years = Some(2);
        partial.skills = vec!["Salesforce".to_string()];
        partial.location = Some("Berlin, Germany".to_string());

        for profile in [
            RawProfile::new("https://example.com/in/none"),
            partial,
            matching_profile(),
        ] {
            let breakdown = engine.score(&profile);
            assert!(breakdown.total_score >= 0.0);
            assert!(breakdown.total_score <= 100.0);
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let engine = engine(full_criteria());
        let profile = matching_profile();

        let first = engine.qualify(&profile);
        let second = engine.qualify(&profile);
        assert_eq!(first, second);
    }

    #[test]
    fn partial_title_match_scores_sixty_percent() {
        let mut criteria = full_criteria();
        criteria.target_job_titles = vec!["Sales Director".to_string()];
        let engine = engine(criteria);

        let mut profile = matching_profile();
        profile.current_position = Some("Senior Sales Manager".to_string());

        let breakdown = engine.score(&profile);
        assert_eq!(breakdown.job_title_score, 0.6);
        assert_eq!(breakdown.job_title_match.as_deref(), Some("Sales Director"));
        assert!(breakdown
            .qualification_reasons
            .iter()
            .any(|r| r == "Partial job title match: Sales Director"));
    }

    #[test]
    fn exact_title_match_is_case_insensitive() {
        let mut criteria = full_criteria();
        criteria.target_job_titles = vec!["Sales Manager".to_string()];
        let engine = engine(criteria);

        let mut profile = matching_profile();
        profile.current_position = Some("sales manager".to_string());

        let breakdown = engine.score(&profile);
        assert_eq!(breakdown.job_title_score, 1.0);
    }

    #[test]
    fn location_partial_credit_for_shared_region() {
        let mut criteria = full_criteria();
        criteria.target_locations = vec!["Dallas, Texas".to_string()];
        let engine = engine(criteria);

        let mut profile = matching_profile();
        profile.location = Some("Austin, Texas".to_string());

        let breakdown = engine.score(&profile);
        assert_eq!(breakdown.location_score, 0.5);
    }

    #[test]
    fn remote_target_matches_distributed_profiles() {
        let mut criteria = full_criteria();
        criteria.target_locations = vec!["Remote".to_string()];
        let engine = engine(criteria);

        let mut profile = matching_profile();
        profile.location = Some("Worldwide / Distributed".to_string());

        let breakdown = engine.score(&profile);
        assert_eq!(breakdown.location_score, 1.0);
    }

    #[test]
    fn experience_below_minimum_earns_linear_credit() {
        let mut criteria = full_criteria();
        criteria.min_experience_years = 10;
        let engine = engine(criteria);

        let mut profile = matching_profile();
        profile.experience_years = Some(5);
        assert_eq!(engine.score(&profile).experience_score, 0.5);

        // Close misses are capped below the meets-minimum base.
        profile.experience_years = Some(9);
        assert_eq!(engine.score(&profile).experience_score, 0.8);
    }

    #[test]
    fn experience_bonus_accrues_per_two_extra_years() {
        let engine = engine(full_criteria()); // minimum 5

        let mut profile = matching_profile();
        profile.experience_years = Some(6);
        assert_eq!(engine.score(&profile).experience_score, 0.8);

        profile.experience_years = Some(7);
        let breakdown = engine.score(&profile);
        assert!((breakdown.experience_score - 0.85).abs() < 1e-9);
        assert!(breakdown
            .experience_details
            .as_deref()
            .unwrap()
            .contains("with 5% bonus"));

        // Bonus caps the sub-score at 1.0.
        profile.experience_years = Some(40);
        assert_eq!(engine.score(&profile).experience_score, 1.0);
    }

    #[test]
    fn zero_minimum_experience_always_scores_full() {
        let mut criteria = full_criteria();
        criteria.min_experience_years = 0;
        let engine = engine(criteria);

        let profile = RawProfile::new("https://example.com/in/newcomer");
        assert_eq!(engine.score(&profile).experience_score, 1.0);
    }

    #[test]
    fn adjacent_company_size_earns_half_credit() {
        let engine = engine(full_criteria()); // target 51-200

        let mut profile = matching_profile();
        profile.company_size = Some(CompanySizeBand::Large);

        let breakdown = engine.score(&profile);
        assert_eq!(breakdown.company_size_score, 0.5);
        assert!(breakdown
            .qualification_reasons
            .iter()
            .any(|r| r == "Adjacent company size: 51-200"));
    }

    #[test]
    fn skills_fraction_and_reason_order() {
        let mut criteria = full_criteria();
        criteria.required_skills = vec![
            "CRM".to_string(),
            "Salesforce".to_string(),
            "Negotiation".to_string(),
        ];
        let engine = engine(criteria);

        let mut profile = matching_profile();
        profile.skills = vec!["salesforce".to_string(), "crm".to_string()];

        let breakdown = engine.score(&profile);
        assert!((breakdown.skills_score - 2.0 / 3.0).abs() < 1e-9);
        // Matched subset keeps the required-skill order.
        assert_eq!(breakdown.skills_matched, vec!["CRM", "Salesforce"]);
        assert!(breakdown
            .qualification_reasons
            .iter()
            .any(|r| r == "Has 2 required skills: CRM, Salesforce"));
    }

    #[test]
    fn empty_industry_targets_renormalize_remaining_weights() {
        let mut criteria = full_criteria();
        criteria.target_industries = Vec::new();
        let engine = engine(criteria);

        // Title is the only matching criterion; its default weight 0.25 is
        // rescaled by the active sum 0.80.
        let mut profile = RawProfile::new("https://example.com/in/title-only");
        profile.current_position = Some("VP of Sales".to_string());

        let breakdown = engine.score(&profile);
        assert!((breakdown.total_score - 31.25).abs() < 1e-6);
    }

    #[test]
    fn all_weight_on_skipped_criteria_scores_zero() {
        let mut criteria = full_criteria();
        criteria.target_industries = Vec::new();
        let weights = ScoringWeights {
            job_title_weight: 0.0,
            industry_weight: 1.0,
            location_weight: 0.0,
            experience_weight: 0.0,
            company_size_weight: 0.0,
            skills_weight: 0.0,
        };
        let engine = ScoringEngine::new(criteria, weights).unwrap();

        let breakdown = engine.score(&matching_profile());
        assert_eq!(breakdown.total_score, 0.0);
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let weights = ScoringWeights {
            job_title_weight: 0.9,
            ..ScoringWeights::default()
        };
        let result = ScoringEngine::new(full_criteria(), weights);
        assert!(matches!(result, Err(ConfigError::WeightSum { .. })));
    }
}
