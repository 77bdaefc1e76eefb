//! Fixtures shared by the integration tests.
//!
//! Provides:
//! - Specs with a known rule and category layout
//! - Handlers that record, delay or fail on demand
//! - File descriptor sets

pub mod fixtures;

pub use fixtures::*;
