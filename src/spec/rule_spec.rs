//! Rule declarations.

use super::{validate_id, validate_purpose};
use crate::catalog::{Category, Rule, RuleType};
use crate::error::SpecError;
use crate::handler::RuleHandler;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A rule as declared by a plugin author.
#[derive(Clone, Default)]
pub struct RuleSpec {
    /// Required
    pub id: String,
    pub category_ids: Vec<String>,
    pub default: bool,
    /// Required; a capitalized sentence ending in a period
    pub purpose: String,
    /// Required
    pub rule_type: Option<RuleType>,
    pub deprecated: bool,
    pub replacement_ids: Vec<String>,
    /// Required
    pub handler: Option<Arc<dyn RuleHandler>>,
}

impl RuleSpec {
    pub fn new(
        id: impl Into<String>,
        purpose: impl Into<String>,
        rule_type: RuleType,
        handler: Arc<dyn RuleHandler>,
    ) -> Self {
        RuleSpec {
            id: id.into(),
            purpose: purpose.into(),
            rule_type: Some(rule_type),
            handler: Some(handler),
            ..Default::default()
        }
    }

    pub fn with_categories<I, S>(mut self, category_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_ids = category_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    /// Mark deprecated, pointing users at `replacement_ids`.
    pub fn deprecated_by<I, S>(mut self, replacement_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deprecated = true;
        self.replacement_ids = replacement_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Build the catalog entry. Assumes the spec was validated.
    pub(crate) fn to_rule(&self, categories: &HashMap<&str, &Category>) -> Result<Rule, SpecError> {
        let categories = self
            .category_ids
            .iter()
            .map(|id| {
                categories
                    .get(id.as_str())
                    .map(|c| (*c).clone())
                    .ok_or_else(|| SpecError::Rule(format!("no category has ID {:?}", id)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let rule_type = self
            .rule_type
            .ok_or_else(|| SpecError::Rule(format!("type is not set for ID {:?}", self.id)))?;
        Ok(Rule {
            id: self.id.clone(),
            categories,
            default: self.default,
            purpose: self.purpose.clone(),
            rule_type,
            deprecated: self.deprecated,
            replacement_ids: self.replacement_ids.clone(),
        })
    }
}

impl fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSpec")
            .field("id", &self.id)
            .field("category_ids", &self.category_ids)
            .field("default", &self.default)
            .field("purpose", &self.purpose)
            .field("rule_type", &self.rule_type)
            .field("deprecated", &self.deprecated)
            .field("replacement_ids", &self.replacement_ids)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

pub(crate) fn validate_rule_specs(
    rule_specs: &[RuleSpec],
    category_ids: &HashSet<&str>,
) -> Result<(), SpecError> {
    let mut by_id: HashMap<&str, &RuleSpec> = HashMap::with_capacity(rule_specs.len());
    for rule_spec in rule_specs {
        validate_id(&rule_spec.id).map_err(SpecError::Rule)?;
        by_id.insert(rule_spec.id.as_str(), rule_spec);
    }
    for rule_spec in rule_specs {
        let id = rule_spec.id.as_str();
        for category_id in &rule_spec.category_ids {
            if !category_ids.contains(category_id.as_str()) {
                return Err(SpecError::Rule(format!(
                    "ID {:?} references category {:?} which was not found",
                    id, category_id
                )));
            }
        }
        validate_purpose(id, &rule_spec.purpose).map_err(SpecError::Rule)?;
        if rule_spec.rule_type.is_none() {
            return Err(SpecError::Rule(format!("type is not set for ID {:?}", id)));
        }
        if rule_spec.handler.is_none() {
            return Err(SpecError::Rule(format!("handler is not set for ID {:?}", id)));
        }
        if rule_spec.default && rule_spec.deprecated {
            return Err(SpecError::Rule(format!(
                "ID {:?} is a default rule but is also deprecated",
                id
            )));
        }
        if !rule_spec.replacement_ids.is_empty() && !rule_spec.deprecated {
            return Err(SpecError::Rule(format!(
                "ID {:?} has replacement IDs but is not deprecated",
                id
            )));
        }
        for replacement_id in &rule_spec.replacement_ids {
            match by_id.get(replacement_id.as_str()) {
                None => {
                    return Err(SpecError::Rule(format!(
                        "ID {:?} specified replacement ID {:?} which was not found",
                        id, replacement_id
                    )))
                }
                Some(replacement) if replacement.deprecated => {
                    return Err(SpecError::Rule(format!(
                        "deprecated ID {:?} specified replacement ID {:?} which is also deprecated",
                        id, replacement_id
                    )))
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}
