//! Integration tests for rulekit.
//!
//! These tests drive the public API end to end with fixture specs.

pub mod check_tests;
pub mod cli_tests;
pub mod spec_tests;
