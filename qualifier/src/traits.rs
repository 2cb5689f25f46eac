//! Capability boundaries for dependency injection

use async_trait::async_trait;

use shared::{FetchError, RawProfile};

/// Profile acquisition boundary.
///
/// The pipeline only requires the ability to fetch raw profile fields for an
/// identifier; the transport behind it (HTTP API, fixture, cache) is an
/// implementation detail. Implementations must be safe to share across the
/// concurrent fetch units of a run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// Fetch raw profile fields for the given identifier.
    async fn fetch_profile(&self, url: &str) -> Result<RawProfile, FetchError>;
}
