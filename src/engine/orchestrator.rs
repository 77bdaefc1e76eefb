//! Check execution orchestrator.
//!
//! Answers one check call: resolves the effective rules from the catalog,
//! runs each rule's handler on the scheduler against a fresh annotation
//! aggregator, and finalizes the aggregator into the response.
//!
//! # Failure handling
//!
//! - Unknown rule ID in the request: invalid argument, no handler runs
//! - Handler error: the call fails with every handler error joined
//! - Rejected annotation: the call fails, no partial response
//! - Rule without a handler: internal error, never a panic
//! - Handler panic: internal error for the call

use crate::annotation::Response;
use crate::catalog::{Catalog, Rule};
use crate::config::EngineConfig;
use crate::engine::aggregator::AnnotationAggregator;
use crate::engine::context::Context;
use crate::engine::scheduler::{parallelize, Job, ParallelizeOptions};
use crate::error::{Error, RequestError, Result};
use crate::handler::RuleHandler;
use crate::info::PluginInfo;
use crate::request::Request;
use crate::spec::{BeforeHook, Spec};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Check orchestrator, built once per plugin.
pub struct CheckOrchestrator {
    catalog: Catalog,
    handlers: HashMap<String, Arc<dyn RuleHandler>>,
    before: Option<BeforeHook>,
    info: Option<PluginInfo>,
    parallelism: usize,
}

impl fmt::Debug for CheckOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckOrchestrator")
            .field("catalog", &self.catalog)
            .field("info", &self.info)
            .field("parallelism", &self.parallelism)
            .finish_non_exhaustive()
    }
}

impl CheckOrchestrator {
    /// Validate `spec` and build the orchestrator.
    ///
    /// Parallelism is resolved here, once.
    pub fn new(spec: &Spec, config: &EngineConfig) -> Result<Self> {
        let catalog = Catalog::new(spec)?;
        let handlers = spec
            .rules
            .iter()
            .filter_map(|r| r.handler.clone().map(|h| (r.id.clone(), h)))
            .collect();
        Ok(CheckOrchestrator {
            catalog,
            handlers,
            before: spec.before.clone(),
            info: spec.info.clone(),
            parallelism: config.resolved_parallelism(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn info(&self) -> Option<&PluginInfo> {
        self.info.as_ref()
    }

    /// Maximum handlers run at once per call.
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Run the selected rules against `request`.
    pub fn check(&self, ctx: &Context, request: &Request) -> Result<Response> {
        let start = Instant::now();
        let request: Cow<'_, Request> = match &self.before {
            Some(before) => Cow::Owned(before(ctx, request.clone())?),
            None => Cow::Borrowed(request),
        };
        let rules = self.resolve_rules(&request)?;

        tracing::debug!(
            rules = rules.len(),
            files = request.files().len(),
            parallelism = self.parallelism,
            "starting check"
        );

        let aggregator = AnnotationAggregator::new(&request);
        let mut jobs: Vec<Job<'_>> = Vec::with_capacity(rules.len());
        for rule in rules {
            let handler = self.handlers.get(rule.id()).ok_or_else(|| {
                Error::Internal(format!("no handler registered for rule {:?}", rule.id()))
            })?;
            let writer = aggregator.writer(rule.id());
            let request: &Request = &request;
            jobs.push(Box::new(move |ctx: &Context| {
                handler.handle(ctx, &writer, request).map_err(|err| {
                    tracing::warn!(rule_id = writer.rule_id(), error = %err, "rule handler failed");
                    Error::handler(err)
                })
            }));
        }

        parallelize(
            ctx,
            jobs,
            ParallelizeOptions {
                parallelism: i64::try_from(self.parallelism).unwrap_or(i64::MAX),
                cancel_on_failure: false,
            },
        )?;
        let response = aggregator.finalize()?;

        tracing::debug!(
            annotations = response.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "finished check"
        );
        Ok(response)
    }

    /// Default rules, or exactly the requested ones.
    fn resolve_rules(&self, request: &Request) -> Result<Vec<&Rule>, RequestError> {
        if request.rule_ids().is_empty() {
            return Ok(self.catalog.default_rules().collect());
        }
        request
            .rule_ids()
            .iter()
            .map(|id| {
                self.catalog
                    .rule(id)
                    .ok_or_else(|| RequestError::UnknownRuleId(id.clone()))
            })
            .collect()
    }
}
