//! Category declarations.

use super::{validate_id, validate_purpose, RuleSpec};
use crate::catalog::Category;
use crate::error::SpecError;
use std::collections::{HashMap, HashSet};

/// A category as declared by a plugin author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySpec {
    /// Required
    pub id: String,
    /// Required
    pub purpose: String,
    pub deprecated: bool,
    pub replacement_ids: Vec<String>,
}

impl CategorySpec {
    pub fn new(id: impl Into<String>, purpose: impl Into<String>) -> Self {
        CategorySpec {
            id: id.into(),
            purpose: purpose.into(),
            ..Default::default()
        }
    }

    pub fn deprecated_by<I, S>(mut self, replacement_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deprecated = true;
        self.replacement_ids = replacement_ids.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn to_category(&self) -> Category {
        Category {
            id: self.id.clone(),
            purpose: self.purpose.clone(),
            deprecated: self.deprecated,
            replacement_ids: self.replacement_ids.clone(),
        }
    }
}

pub(crate) fn validate_category_specs(
    category_specs: &[CategorySpec],
    rule_specs: &[RuleSpec],
) -> Result<(), SpecError> {
    let referenced: HashSet<&str> = rule_specs
        .iter()
        .flat_map(|r| r.category_ids.iter().map(String::as_str))
        .collect();
    let mut by_id: HashMap<&str, &CategorySpec> = HashMap::with_capacity(category_specs.len());
    for category_spec in category_specs {
        validate_id(&category_spec.id).map_err(SpecError::Category)?;
        by_id.insert(category_spec.id.as_str(), category_spec);
    }
    for category_spec in category_specs {
        let id = category_spec.id.as_str();
        validate_purpose(id, &category_spec.purpose).map_err(SpecError::Category)?;
        if !category_spec.replacement_ids.is_empty() && !category_spec.deprecated {
            return Err(SpecError::Category(format!(
                "ID {:?} has replacement IDs but is not deprecated",
                id
            )));
        }
        for replacement_id in &category_spec.replacement_ids {
            match by_id.get(replacement_id.as_str()) {
                None => {
                    return Err(SpecError::Category(format!(
                        "ID {:?} specified replacement ID {:?} which was not found",
                        id, replacement_id
                    )))
                }
                Some(replacement) if replacement.deprecated => {
                    return Err(SpecError::Category(format!(
                        "deprecated ID {:?} specified replacement ID {:?} which is also deprecated",
                        id, replacement_id
                    )))
                }
                Some(_) => {}
            }
        }
        if !referenced.contains(id) {
            return Err(SpecError::Category(format!(
                "no rule references category ID {:?}",
                id
            )));
        }
    }
    Ok(())
}
