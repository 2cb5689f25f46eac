//! Threshold filtering, ranking and final run statistics

use shared::{RunStatistics, ScoredLead};

/// Compiles the final qualified-lead list from the scored batch.
///
/// Filters to the minimum score, keeps the descending-score order stable
/// (ties preserve the order of the input sequence, which the pipeline has
/// already arranged by original input position) and truncates to the
/// configured maximum. Never mutates its input.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    min_score: f64,
    max_results: Option<usize>,
}

impl ResultAggregator {
    pub fn new(min_score: f64, max_results: Option<usize>) -> Self {
        Self {
            min_score,
            max_results,
        }
    }

    /// Filter, rank and truncate the scored leads, and freeze the run
    /// statistics with the qualified count and average qualified score.
    pub fn aggregate(
        &self,
        scored: &[ScoredLead],
        mut stats: RunStatistics,
    ) -> (Vec<ScoredLead>, RunStatistics) {
        let mut qualified: Vec<ScoredLead> = scored
            .iter()
            .filter(|lead| lead.total_score() >= self.min_score)
            .cloned()
            .collect();

        // Stable sort keeps input-order ties deterministic.
        qualified.sort_by(|a, b| b.total_score().total_cmp(&a.total_score()));

        if let Some(limit) = self.max_results {
            qualified.truncate(limit);
        }

        stats.qualified_leads = qualified.len();
        stats.average_score = if qualified.is_empty() {
            0.0
        } else {
            qualified.iter().map(ScoredLead::total_score).sum::<f64>() / qualified.len() as f64
        };

        (qualified, stats)
    }
}
