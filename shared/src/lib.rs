//! Shared types for the lead qualification pipeline
//!
//! Contains the data model exchanged between the pipeline core, its service
//! implementations and the output serializer, plus the fatal configuration
//! error taxonomy and tracing setup. Component-internal types stay in the
//! qualifier crate.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
