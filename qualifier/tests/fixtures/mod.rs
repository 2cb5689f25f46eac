//! Test fixtures and utilities

pub mod fetchers;
pub mod profiles;

#[allow(unused_imports)]
pub use fetchers::*;
#[allow(unused_imports)]
pub use profiles::*;
