//! The unit of check logic bound to one rule ID.

use crate::engine::aggregator::ResponseWriter;
use crate::engine::context::Context;
use crate::request::Request;

/// Check logic for one rule.
///
/// A handler reports findings through `writer`, which stamps every
/// annotation with the handler's rule ID. Returning an error aborts the
/// whole check call; findings are never reported as errors.
///
/// Handlers of one call run concurrently and in no particular order.
/// Long-running handlers should poll `ctx` and return early once it is done.
pub trait RuleHandler: Send + Sync {
    fn handle(
        &self,
        ctx: &Context,
        writer: &ResponseWriter<'_>,
        request: &Request,
    ) -> anyhow::Result<()>;
}

impl<F> RuleHandler for F
where
    F: Fn(&Context, &ResponseWriter<'_>, &Request) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(
        &self,
        ctx: &Context,
        writer: &ResponseWriter<'_>,
        request: &Request,
    ) -> anyhow::Result<()> {
        self(ctx, writer, request)
    }
}
