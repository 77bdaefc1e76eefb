//! Client side of the plugin protocol.
//!
//! A [`Client`] talks to a plugin through a [`Transport`]. It hides the
//! wire limits: check requests with many rule IDs are split into several
//! calls and the replies merged, and listings walk every page.

use crate::annotation::{AnnotationOptions, Response};
use crate::catalog::{Category, Rule};
use crate::config::EngineConfig;
use crate::engine::aggregator::AnnotationAggregator;
use crate::engine::context::Context;
use crate::error::{Error, RequestError, Result};
use crate::request::Request;
use crate::server::{CheckService, Transport, LIST_PAGE_SIZE};
use crate::spec::{duplicate_ids, Spec};
use crate::wire;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Runs checks and lists rules through a transport.
#[derive(Debug)]
pub struct Client<T> {
    transport: T,
    cache_rules_and_categories: bool,
    rules: Mutex<Option<Vec<Rule>>>,
    categories: Mutex<Option<Vec<Category>>>,
}

impl Client<CheckService> {
    /// Client bound in-process to `spec`, for testing plugins.
    pub fn for_spec(spec: &Spec, config: &EngineConfig) -> Result<Self> {
        let service = CheckService::new(spec, config)?;
        Ok(Client::new(service).with_cache(config.cache_rules_and_categories))
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Client {
            transport,
            cache_rules_and_categories: false,
            rules: Mutex::new(None),
            categories: Mutex::new(None),
        }
    }

    /// Remember the first successful rule and category listing.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_rules_and_categories = enabled;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Check `request`, splitting it into as many calls as the wire limit
    /// requires.
    ///
    /// Calls go out one after another. The first failed call fails the
    /// whole check; otherwise the replies are merged into one sorted
    /// response.
    pub fn check(&self, ctx: &Context, request: &Request) -> Result<Response> {
        let aggregator = AnnotationAggregator::new(request);
        let messages = request.to_wire_requests();
        tracing::debug!(
            calls = messages.len(),
            rule_ids = request.rule_ids().len(),
            "sending check request"
        );
        for message in messages {
            let response = self.transport.check(ctx, message)?;
            for annotation in response.annotations {
                let mut options = AnnotationOptions::new().with_message(annotation.message);
                if let Some(location) = annotation.file_location {
                    options =
                        options.with_file_name_and_source_path(location.file_name, location.source_path);
                }
                if let Some(location) = annotation.against_file_location {
                    options = options
                        .with_against_file_name_and_source_path(location.file_name, location.source_path);
                }
                aggregator.add_annotation(&annotation.rule_id, options);
            }
        }
        aggregator.finalize()
    }

    /// Every rule of the plugin, sorted by ID.
    pub fn list_rules(&self, ctx: &Context) -> Result<Vec<Rule>> {
        if self.cache_rules_and_categories {
            if let Some(rules) = lock(&self.rules).as_ref() {
                return Ok(rules.clone());
            }
        }
        let rules = self.list_rules_uncached(ctx)?;
        if self.cache_rules_and_categories {
            *lock(&self.rules) = Some(rules.clone());
        }
        Ok(rules)
    }

    /// Every category of the plugin, sorted by ID.
    pub fn list_categories(&self, ctx: &Context) -> Result<Vec<Category>> {
        if self.cache_rules_and_categories {
            if let Some(categories) = lock(&self.categories).as_ref() {
                return Ok(categories.clone());
            }
        }
        let categories = self.list_categories_uncached(ctx)?;
        if self.cache_rules_and_categories {
            *lock(&self.categories) = Some(categories.clone());
        }
        Ok(categories)
    }

    pub fn get_plugin_info(&self, ctx: &Context) -> Result<wire::GetPluginInfoResponse> {
        self.transport.get_plugin_info(ctx)
    }

    fn list_rules_uncached(&self, ctx: &Context) -> Result<Vec<Rule>> {
        let mut wire_rules = Vec::new();
        let mut page_token = String::new();
        loop {
            let response = self.transport.list_rules(
                ctx,
                wire::ListRulesRequest {
                    page_size: LIST_PAGE_SIZE,
                    page_token,
                },
            )?;
            wire_rules.extend(response.rules);
            if response.next_page_token.is_empty() {
                break;
            }
            page_token = response.next_page_token;
        }

        // Rules are listed before categories.
        let categories = self.list_categories(ctx)?;
        let by_id: HashMap<&str, &Category> =
            categories.iter().map(|c| (c.id(), c)).collect();
        let mut rules = wire_rules
            .into_iter()
            .map(|rule| rule_from_wire(rule, &by_id))
            .collect::<Result<Vec<_>>>()?;
        reject_duplicates(rules.iter().map(Rule::id))?;
        rules.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(rules)
    }

    fn list_categories_uncached(&self, ctx: &Context) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = Vec::new();
        let mut page_token = String::new();
        loop {
            let response = self.transport.list_categories(
                ctx,
                wire::ListCategoriesRequest {
                    page_size: LIST_PAGE_SIZE,
                    page_token,
                },
            )?;
            categories.extend(response.categories.into_iter().map(Category::from));
            if response.next_page_token.is_empty() {
                break;
            }
            page_token = response.next_page_token;
        }
        reject_duplicates(categories.iter().map(Category::id))?;
        categories.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(categories)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reject_duplicates<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let duplicates = duplicate_ids(ids);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(RequestError::DuplicateIds(duplicates).into())
    }
}

fn rule_from_wire(rule: wire::WireRule, categories: &HashMap<&str, &Category>) -> Result<Rule> {
    let resolved = rule
        .category_ids
        .iter()
        .map(|id| {
            categories.get(id.as_str()).map(|c| (*c).clone()).ok_or_else(|| {
                Error::Internal(format!(
                    "rule {:?} references unknown category {:?}",
                    rule.id, id
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Rule {
        id: rule.id,
        categories: resolved,
        default: rule.default,
        purpose: rule.purpose,
        rule_type: rule.rule_type,
        deprecated: rule.deprecated,
        replacement_ids: rule.replacement_ids,
    })
}
