//! Immutable, sorted snapshot of a validated spec.
//!
//! Built once when a plugin starts and read-only afterwards, so it can be
//! shared between concurrent check calls without locking.

pub mod page;
pub mod rule;

pub use page::{Page, DEFAULT_PAGE_SIZE};
pub use rule::{Category, HasId, Rule, RuleType};

use crate::error::{RequestError, SpecError};
use crate::spec::{validate_spec, Spec};
use std::collections::HashMap;

/// Validated rules and categories, sorted by ID.
#[derive(Debug, Clone)]
pub struct Catalog {
    rules: Vec<Rule>,
    categories: Vec<Category>,
    /// ID -> position in `rules`
    rule_index: HashMap<String, usize>,
    /// ID -> position in `categories`
    category_index: HashMap<String, usize>,
}

impl Catalog {
    /// Validate `spec` and build the catalog. No catalog exists for an
    /// invalid spec.
    pub fn new(spec: &Spec) -> Result<Self, SpecError> {
        validate_spec(spec)?;

        let mut categories: Vec<Category> =
            spec.categories.iter().map(|c| c.to_category()).collect();
        categories.sort_by(|a, b| a.id.cmp(&b.id));

        let by_id: HashMap<&str, &Category> =
            categories.iter().map(|c| (c.id.as_str(), c)).collect();
        let mut rules = spec
            .rules
            .iter()
            .map(|r| r.to_rule(&by_id))
            .collect::<Result<Vec<_>, _>>()?;
        rules.sort_by(|a, b| a.id.cmp(&b.id));

        let rule_index = index_by_id(&rules);
        let category_index = index_by_id(&categories);

        tracing::info!(
            rules = rules.len(),
            categories = categories.len(),
            "built rule catalog"
        );

        Ok(Catalog {
            rules,
            categories,
            rule_index,
            category_index,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rule_index.get(id).map(|&i| &self.rules[i])
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.category_index.get(id).map(|&i| &self.categories[i])
    }

    /// Rules that run when a request names none.
    pub fn default_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.default)
    }

    /// Page through rules in ID order.
    pub fn list_rules(&self, page_size: i32, page_token: &str) -> Result<Page<'_, Rule>, RequestError> {
        page::paginate(&self.rules, &self.rule_index, page_size, page_token)
    }

    /// Page through categories in ID order.
    pub fn list_categories(
        &self,
        page_size: i32,
        page_token: &str,
    ) -> Result<Page<'_, Category>, RequestError> {
        page::paginate(&self.categories, &self.category_index, page_size, page_token)
    }
}

fn index_by_id<T: HasId>(items: &[T]) -> HashMap<String, usize> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id().to_string(), i))
        .collect()
}
