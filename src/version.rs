//! What `rulekit version` reports.
//!
//! Besides the build itself, a plugin binary reports the wire limits it
//! enforces and the size of the rule set it serves, so a host can tell two
//! builds of the same plugin apart.

use crate::catalog::{Catalog, DEFAULT_PAGE_SIZE};
use crate::request::CHECK_RULE_ID_PAGE_SIZE;
use serde::Serialize;
use std::fmt;

/// Build and catalog summary of a plugin binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_date: Option<&'static str>,
    pub target: &'static str,
    /// Most rule IDs one check call may carry
    pub max_rule_ids_per_check: usize,
    /// Page size of a listing that asks for none
    pub default_page_size: usize,
    pub rules: usize,
    pub default_rules: usize,
    pub categories: usize,
}

impl VersionInfo {
    /// Summary of this build serving `catalog`.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        VersionInfo {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("RULEKIT_GIT_HASH"),
            build_date: option_env!("RULEKIT_BUILD_DATE"),
            target: env!("TARGET"),
            max_rule_ids_per_check: CHECK_RULE_ID_PAGE_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
            rules: catalog.rules().len(),
            default_rules: catalog.default_rules().count(),
            categories: catalog.categories().len(),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rulekit {}", self.version)?;
        match (self.commit, self.build_date) {
            (Some(commit), Some(date)) => writeln!(f, " ({commit}, built {date})")?,
            (Some(commit), None) => writeln!(f, " ({commit})")?,
            (None, Some(date)) => writeln!(f, " (built {date})")?,
            (None, None) => writeln!(f)?,
        }
        writeln!(f, "Target: {}", self.target)?;
        writeln!(
            f,
            "Rules: {} ({} default) in {} categories",
            self.rules, self.default_rules, self.categories
        )?;
        write!(
            f,
            "Limits: {} rule IDs per check call, {} items per listing page",
            self.max_rule_ids_per_check, self.default_page_size
        )
    }
}
