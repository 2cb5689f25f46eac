//! Pipeline-internal types

use shared::{FetchError, RawProfile};

/// Terminal result of the retrying fetch boundary for one identifier.
///
/// Failures carry the last error and how many attempts were spent; they are
/// recorded, never propagated, so a bad profile cannot abort the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success {
        profile: RawProfile,
        attempts: u32,
    },
    Failure {
        url: String,
        error: FetchError,
        attempts: u32,
    },
}

impl FetchOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            FetchOutcome::Success { attempts, .. } => *attempts,
            FetchOutcome::Failure { attempts, .. } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}
