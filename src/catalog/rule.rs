//! Validated rules and categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of check a rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Checks files in isolation
    Lint,
    /// Compares files against a previous version
    Breaking,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleType::Lint => write!(f, "lint"),
            RuleType::Breaking => write!(f, "breaking"),
        }
    }
}

/// A named grouping of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub(crate) id: String,
    pub(crate) purpose: String,
    pub(crate) deprecated: bool,
    pub(crate) replacement_ids: Vec<String>,
}

impl Category {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn replacement_ids(&self) -> &[String] {
        &self.replacement_ids
    }
}

/// One named, independently implemented check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub(crate) id: String,
    pub(crate) categories: Vec<Category>,
    pub(crate) default: bool,
    pub(crate) purpose: String,
    pub(crate) rule_type: RuleType,
    pub(crate) deprecated: bool,
    pub(crate) replacement_ids: Vec<String>,
}

impl Rule {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_ids(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(Category::id)
    }

    /// Runs when a request names no rules explicitly.
    pub fn is_default(&self) -> bool {
        self.default
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    pub fn deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn replacement_ids(&self) -> &[String] {
        &self.replacement_ids
    }
}

/// Items addressable by ID; used for pagination cursors.
pub trait HasId {
    fn id(&self) -> &str;
}

impl HasId for Rule {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for Category {
    fn id(&self) -> &str {
        &self.id
    }
}
