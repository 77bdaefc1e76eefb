//! Messages exchanged between a client and a plugin process.
//!
//! Every message is plain serde data; the binary reads and writes them as
//! JSON. Conversions from the in-process types live here so the rest of the
//! crate never builds wire values by hand.

use crate::annotation::{Annotation, Location};
use crate::catalog::{Category, Rule, RuleType};
use crate::descriptor::FileDescriptor;
use crate::error::ErrorCode;
use crate::info::{License, PluginInfo};
use crate::options::Options;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckRequest {
    pub files: Vec<FileDescriptor>,
    pub against_files: Vec<FileDescriptor>,
    pub options: Options,
    /// At most 250; empty selects the default rules
    pub rule_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckResponse {
    pub annotations: Vec<WireAnnotation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireAnnotation {
    pub rule_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_location: Option<WireLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub against_file_location: Option<WireLocation>,
}

/// A location reduced to what the receiver needs to resolve it again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireLocation {
    pub file_name: String,
    pub source_path: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListRulesRequest {
    /// Zero or less selects the default page size
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListRulesResponse {
    pub rules: Vec<WireRule>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListCategoriesRequest {
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListCategoriesResponse {
    pub categories: Vec<WireCategory>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRule {
    pub id: String,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub default: bool,
    pub purpose: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub replacement_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCategory {
    pub id: String,
    pub purpose: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub replacement_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetPluginInfoResponse {
    pub url: String,
    pub documentation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// Failure reply of any call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&Location> for WireLocation {
    fn from(location: &Location) -> Self {
        WireLocation {
            file_name: location.file_name.clone(),
            source_path: location.source_path.clone(),
        }
    }
}

impl From<&Annotation> for WireAnnotation {
    fn from(annotation: &Annotation) -> Self {
        WireAnnotation {
            rule_id: annotation.rule_id.clone(),
            message: annotation.message.clone(),
            file_location: annotation.location.as_ref().map(WireLocation::from),
            against_file_location: annotation.against_location.as_ref().map(WireLocation::from),
        }
    }
}

impl From<&Rule> for WireRule {
    fn from(rule: &Rule) -> Self {
        WireRule {
            id: rule.id().to_string(),
            category_ids: rule.category_ids().map(str::to_string).collect(),
            default: rule.is_default(),
            purpose: rule.purpose().to_string(),
            rule_type: rule.rule_type(),
            deprecated: rule.deprecated(),
            replacement_ids: rule.replacement_ids().to_vec(),
        }
    }
}

impl From<&Category> for WireCategory {
    fn from(category: &Category) -> Self {
        WireCategory {
            id: category.id().to_string(),
            purpose: category.purpose().to_string(),
            deprecated: category.deprecated(),
            replacement_ids: category.replacement_ids().to_vec(),
        }
    }
}

impl From<WireCategory> for Category {
    fn from(category: WireCategory) -> Self {
        Category {
            id: category.id,
            purpose: category.purpose,
            deprecated: category.deprecated,
            replacement_ids: category.replacement_ids,
        }
    }
}

impl From<&PluginInfo> for GetPluginInfoResponse {
    fn from(info: &PluginInfo) -> Self {
        GetPluginInfoResponse {
            url: info.url.clone(),
            documentation: info.documentation(),
            license: info.license.clone(),
        }
    }
}

impl From<&crate::error::Error> for WireError {
    fn from(err: &crate::error::Error) -> Self {
        WireError {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<WireError> for crate::error::Error {
    fn from(err: WireError) -> Self {
        crate::error::Error::Remote {
            code: err.code,
            message: err.message,
        }
    }
}
