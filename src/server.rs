//! Wire-level service a plugin exposes.

use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::config::EngineConfig;
use crate::engine::context::Context;
use crate::engine::orchestrator::CheckOrchestrator;
use crate::error::{Error, RequestError, Result};
use crate::request::{Request, CHECK_RULE_ID_PAGE_SIZE};
use crate::spec::Spec;
use crate::wire;

/// Page size clients request when listing.
pub const LIST_PAGE_SIZE: i32 = DEFAULT_PAGE_SIZE as i32;

/// Blocking call contract between a client and a plugin.
///
/// Implementations may cross a process boundary; [`CheckService`]
/// implements it directly for in-process use.
pub trait Transport: Send + Sync {
    fn check(&self, ctx: &Context, request: wire::CheckRequest) -> Result<wire::CheckResponse>;

    fn list_rules(
        &self,
        ctx: &Context,
        request: wire::ListRulesRequest,
    ) -> Result<wire::ListRulesResponse>;

    fn list_categories(
        &self,
        ctx: &Context,
        request: wire::ListCategoriesRequest,
    ) -> Result<wire::ListCategoriesResponse>;

    fn get_plugin_info(&self, ctx: &Context) -> Result<wire::GetPluginInfoResponse>;
}

/// Serves a spec over wire messages.
#[derive(Debug)]
pub struct CheckService {
    orchestrator: CheckOrchestrator,
}

impl CheckService {
    /// Fails if the spec is invalid; an invalid spec never serves anything.
    pub fn new(spec: &Spec, config: &EngineConfig) -> Result<Self> {
        Ok(CheckService {
            orchestrator: CheckOrchestrator::new(spec, config)?,
        })
    }

    pub fn orchestrator(&self) -> &CheckOrchestrator {
        &self.orchestrator
    }
}

impl Transport for CheckService {
    fn check(&self, ctx: &Context, request: wire::CheckRequest) -> Result<wire::CheckResponse> {
        if request.rule_ids.len() > CHECK_RULE_ID_PAGE_SIZE {
            return Err(RequestError::TooManyRuleIds {
                count: request.rule_ids.len(),
                max: CHECK_RULE_ID_PAGE_SIZE,
            }
            .into());
        }
        let request = Request::from_wire(request)?;
        let response = self.orchestrator.check(ctx, &request)?;
        Ok(wire::CheckResponse {
            annotations: response
                .annotations()
                .iter()
                .map(wire::WireAnnotation::from)
                .collect(),
        })
    }

    fn list_rules(
        &self,
        _ctx: &Context,
        request: wire::ListRulesRequest,
    ) -> Result<wire::ListRulesResponse> {
        let page = self
            .orchestrator
            .catalog()
            .list_rules(request.page_size, &request.page_token)?;
        Ok(wire::ListRulesResponse {
            rules: page.items.iter().map(wire::WireRule::from).collect(),
            next_page_token: page.next_page_token,
        })
    }

    fn list_categories(
        &self,
        _ctx: &Context,
        request: wire::ListCategoriesRequest,
    ) -> Result<wire::ListCategoriesResponse> {
        let page = self
            .orchestrator
            .catalog()
            .list_categories(request.page_size, &request.page_token)?;
        Ok(wire::ListCategoriesResponse {
            categories: page.items.iter().map(wire::WireCategory::from).collect(),
            next_page_token: page.next_page_token,
        })
    }

    fn get_plugin_info(&self, _ctx: &Context) -> Result<wire::GetPluginInfoResponse> {
        self.orchestrator
            .info()
            .map(wire::GetPluginInfoResponse::from)
            .ok_or_else(|| Error::Unimplemented("plugin info is not configured".to_string()))
    }
}
