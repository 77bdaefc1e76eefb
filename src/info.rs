//! Plugin documentation and license, served by `get_plugin_info`.

use crate::error::SpecError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static ABSOLUTE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[A-Za-z][A-Za-z0-9+.-]*://[^/?#]+").expect("URL pattern compiles")
});

/// Descriptive metadata about a plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginInfo {
    /// Home page of the plugin
    pub url: String,
    /// One-line description; required when `doc_long` is set
    pub doc_short: String,
    pub doc_long: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// License of a plugin. At most one of `text` and `url` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    pub spdx_license_id: String,
    pub text: String,
    pub url: String,
}

impl PluginInfo {
    /// Short and long documentation joined by a blank line.
    pub fn documentation(&self) -> String {
        if self.doc_long.is_empty() {
            self.doc_short.clone()
        } else {
            format!("{}\n\n{}", self.doc_short, self.doc_long)
        }
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if self.doc_short.is_empty() && !self.doc_long.is_empty() {
            return Err(SpecError::Spec(
                "plugin info has long documentation but no short documentation".to_string(),
            ));
        }
        if !self.url.is_empty() {
            validate_absolute_url(&self.url)?;
        }
        if let Some(license) = &self.license {
            if !license.text.is_empty() && !license.url.is_empty() {
                return Err(SpecError::Spec(
                    "plugin license has both text and a URL".to_string(),
                ));
            }
            if !license.url.is_empty() {
                validate_absolute_url(&license.url)?;
            }
        }
        Ok(())
    }
}

fn validate_absolute_url(url: &str) -> Result<(), SpecError> {
    if ABSOLUTE_URL_REGEX.is_match(url) {
        Ok(())
    } else {
        Err(SpecError::Spec(format!("URL {:?} must be absolute", url)))
    }
}
