//! Declarative plugin specification and its validation.
//!
//! A [`Spec`] is the raw input a plugin author writes: rules with their
//! handlers plus the categories they belong to. Nothing runs until
//! [`validate_spec`] accepts it; any violation aborts construction of the
//! catalog entirely.
//!
//! Checks, in order:
//! - at least one rule
//! - no duplicate IDs across rules and categories combined
//! - every rule: ID format, known categories, purpose sentence, type and
//!   handler set, not default and deprecated at once, replacements only when
//!   deprecated and only pointing at live rules
//! - every category: the same field checks, plus referenced by some rule
//! - plugin info, when present

pub mod category_spec;
pub mod rule_spec;

pub use category_spec::CategorySpec;
pub use rule_spec::RuleSpec;

use crate::engine::context::Context;
use crate::error::{Result, SpecError};
use crate::info::PluginInfo;
use crate::request::Request;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

pub(crate) const ID_MIN_LEN: usize = 3;
pub(crate) const ID_MAX_LEN: usize = 64;

static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Z0-9][A-Z0-9_]*[A-Z0-9]$").expect("ID pattern compiles"));
static PURPOSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Z].*[.]$").expect("purpose pattern compiles"));

/// Runs before any handler; may replace the request handlers see.
pub type BeforeHook = Arc<dyn Fn(&Context, Request) -> Result<Request> + Send + Sync>;

/// Everything a plugin declares.
#[derive(Clone, Default)]
pub struct Spec {
    pub rules: Vec<RuleSpec>,
    /// Required when any rule names a category
    pub categories: Vec<CategorySpec>,
    /// Documentation and license served by `get_plugin_info`
    pub info: Option<PluginInfo>,
    pub before: Option<BeforeHook>,
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spec")
            .field("rules", &self.rules)
            .field("categories", &self.categories)
            .field("info", &self.info)
            .field("before", &self.before.is_some())
            .finish()
    }
}

/// Validate a spec before any catalog is built from it.
pub fn validate_spec(spec: &Spec) -> Result<(), SpecError> {
    if spec.rules.is_empty() {
        return Err(SpecError::Spec("no rules specified".to_string()));
    }
    let duplicates = duplicate_ids(
        spec.rules
            .iter()
            .map(|r| r.id.as_str())
            .chain(spec.categories.iter().map(|c| c.id.as_str())),
    );
    if !duplicates.is_empty() {
        return Err(SpecError::Spec(format!(
            "duplicate rule or category IDs: {}",
            duplicates.join(", ")
        )));
    }
    let category_ids: HashSet<&str> = spec.categories.iter().map(|c| c.id.as_str()).collect();
    rule_spec::validate_rule_specs(&spec.rules, &category_ids)?;
    category_spec::validate_category_specs(&spec.categories, &spec.rules)?;
    match &spec.info {
        Some(info) => info.validate(),
        None => Ok(()),
    }
}

/// IDs that occur more than once, sorted.
pub(crate) fn duplicate_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in ids {
        *counts.entry(id).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id.to_string())
        .collect()
}

pub(crate) fn validate_id(id: &str) -> std::result::Result<(), String> {
    if id.is_empty() {
        return Err("ID is empty".to_string());
    }
    if id.len() < ID_MIN_LEN {
        return Err(format!("ID {:?} must be at least length {}", id, ID_MIN_LEN));
    }
    if id.len() > ID_MAX_LEN {
        return Err(format!("ID {:?} must be at most length {}", id, ID_MAX_LEN));
    }
    if !ID_REGEX.is_match(id) {
        return Err(format!("ID {:?} does not match {:?}", id, ID_REGEX.as_str()));
    }
    Ok(())
}

pub(crate) fn validate_purpose(id: &str, purpose: &str) -> std::result::Result<(), String> {
    if purpose.is_empty() {
        return Err(format!("purpose is empty for ID {:?}", id));
    }
    if !PURPOSE_REGEX.is_match(purpose) {
        return Err(format!(
            "purpose {:?} for ID {:?} does not match {:?}",
            purpose,
            id,
            PURPOSE_REGEX.as_str()
        ));
    }
    Ok(())
}
