//! Built-in rules served by the `rulekit` binary.
//!
//! Rules are organized by kind:
//! - Lint: file hygiene checked on the current files alone
//! - Breaking: compatibility checked against the previous files
//!
//! Every rule reports findings as annotations and returns an error only when
//! it cannot do its job at all.

pub mod breaking;
pub mod lint;

use crate::info::{License, PluginInfo};
use crate::spec::{CategorySpec, Spec};

pub const CATEGORY_BASIC: &str = "BASIC";
pub const CATEGORY_FILE: &str = "FILE";

/// Spec of all built-in rules.
pub fn builtin_spec() -> Spec {
    let mut rules = lint::get_lint_rules();
    rules.extend(breaking::get_breaking_rules());
    Spec {
        rules,
        categories: vec![
            CategorySpec::new(CATEGORY_BASIC, "Checks basic file hygiene."),
            CategorySpec::new(CATEGORY_FILE, "Checks file-level compatibility."),
        ],
        info: Some(PluginInfo {
            doc_short: "Example lint and breaking change rules for compiled schema files."
                .to_string(),
            license: Some(License {
                spdx_license_id: "Apache-2.0".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        before: None,
    }
}
