//! Tests for the pipeline services
//!
//! Covers the throttling and retry invariants with paused-clock tests and
//! the HTTP fetcher's failure mapping against a mock server.

pub mod http_fetcher;
