//! Check call tests.
//!
//! Tests for rule selection, annotation collection, failure handling and
//! request chunking through the client.

use crate::mocks::*;
use rulekit::checkutil::rule_handler_fn;
use rulekit::engine::{parallelize, Job, ParallelizeOptions};
use rulekit::error::{AnnotationError, ContextError, ErrorCode, RequestError};
use rulekit::request::CHECK_RULE_ID_PAGE_SIZE;
use rulekit::wire;
use rulekit::{
    Annotation, AnnotationOptions, CheckOrchestrator, CheckService, Client, Context, EngineConfig,
    Error, Request, RuleSpec, RuleType, Spec, Transport,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn config(parallelism: i64) -> EngineConfig {
    EngineConfig {
        parallelism,
        ..Default::default()
    }
}

/// Records the shape of every check message before delegating.
struct RecordingTransport {
    inner: CheckService,
    checks: Mutex<Vec<(usize, usize, usize)>>,
}

impl RecordingTransport {
    fn new(spec: &Spec) -> Self {
        RecordingTransport {
            inner: CheckService::new(spec, &EngineConfig::default()).unwrap(),
            checks: Mutex::new(Vec::new()),
        }
    }

    /// (rule IDs, files, against files) per message, in send order.
    fn checks(&self) -> Vec<(usize, usize, usize)> {
        self.checks.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn check(&self, ctx: &Context, request: wire::CheckRequest) -> rulekit::Result<wire::CheckResponse> {
        self.checks.lock().unwrap().push((
            request.rule_ids.len(),
            request.files.len(),
            request.against_files.len(),
        ));
        self.inner.check(ctx, request)
    }

    fn list_rules(
        &self,
        ctx: &Context,
        request: wire::ListRulesRequest,
    ) -> rulekit::Result<wire::ListRulesResponse> {
        self.inner.list_rules(ctx, request)
    }

    fn list_categories(
        &self,
        ctx: &Context,
        request: wire::ListCategoriesRequest,
    ) -> rulekit::Result<wire::ListCategoriesResponse> {
        self.inner.list_categories(ctx, request)
    }

    fn get_plugin_info(&self, ctx: &Context) -> rulekit::Result<wire::GetPluginInfoResponse> {
        self.inner.get_plugin_info(ctx)
    }
}

/// Fails every check message after the first.
struct FailingSecondCall {
    inner: RecordingTransport,
}

impl Transport for FailingSecondCall {
    fn check(&self, ctx: &Context, request: wire::CheckRequest) -> rulekit::Result<wire::CheckResponse> {
        if !self.inner.checks().is_empty() {
            return Err(wire::WireError {
                code: ErrorCode::Unknown,
                message: "plugin crashed".to_string(),
            }
            .into());
        }
        self.inner.check(ctx, request)
    }

    fn list_rules(
        &self,
        ctx: &Context,
        request: wire::ListRulesRequest,
    ) -> rulekit::Result<wire::ListRulesResponse> {
        self.inner.list_rules(ctx, request)
    }

    fn list_categories(
        &self,
        ctx: &Context,
        request: wire::ListCategoriesRequest,
    ) -> rulekit::Result<wire::ListCategoriesResponse> {
        self.inner.list_categories(ctx, request)
    }

    fn get_plugin_info(&self, ctx: &Context) -> rulekit::Result<wire::GetPluginInfoResponse> {
        self.inner.get_plugin_info(ctx)
    }
}

fn annotation_keys(annotations: &[Annotation]) -> Vec<(String, String, String)> {
    annotations
        .iter()
        .map(|a| {
            (
                a.rule_id.clone(),
                a.location.as_ref().map(|l| l.file_name.clone()).unwrap_or_default(),
                a.message.clone(),
            )
        })
        .collect()
}

#[test]
fn test_default_rules_run_without_rule_ids() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut spec = three_rule_spec();
    for rule in &mut spec.rules {
        rule.handler = Some(counting_handler(calls.clone()));
    }
    let orchestrator = CheckOrchestrator::new(&spec, &config(2)).unwrap();
    let request = Request::new(files(&["a.proto"])).unwrap();
    orchestrator.check(&Context::background(), &request).unwrap();
    // Only RULE1 is a default rule.
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let request = request.to_builder().rule_ids(["RULE2", "RULE3"]).build().unwrap();
    orchestrator.check(&Context::background(), &request).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_unknown_rule_id_is_invalid_argument() {
    let orchestrator = CheckOrchestrator::new(&three_rule_spec(), &config(0)).unwrap();
    let request = Request::builder(files(&["a.proto"]))
        .rule_ids(["RULE1", "RULE9"])
        .build()
        .unwrap();
    let err = orchestrator.check(&Context::background(), &request).unwrap_err();
    assert!(matches!(err, Error::Request(RequestError::UnknownRuleId(ref id)) if id == "RULE9"));
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}

#[test]
fn test_conflicting_location_fails_whole_call() {
    let mut spec = three_rule_spec();
    spec.rules[1].handler = Some(rule_handler_fn(|_, writer, request| {
        let file = &request.files()[0];
        writer.add_annotation(
            AnnotationOptions::new()
                .with_descriptor(file.as_descriptor())
                .with_message("Valid."),
        );
        writer.add_annotation(
            AnnotationOptions::new()
                .with_descriptor(file.as_descriptor())
                .with_file_name(file.name.clone())
                .with_message("Conflicting."),
        );
        Ok(())
    }));
    let orchestrator = CheckOrchestrator::new(&spec, &config(0)).unwrap();
    let request = Request::new(files(&["a.proto"])).unwrap();
    let result = orchestrator.check(&Context::background(), &request);
    assert!(matches!(
        result,
        Err(Error::Annotation(AnnotationError::ConflictingLocation { against: false }))
    ));
}

#[test]
fn test_annotation_for_unknown_file_fails_whole_call() {
    let mut spec = three_rule_spec();
    spec.rules[1].handler = Some(rule_handler_fn(|_, writer, _| {
        writer.add_annotation(
            AnnotationOptions::new()
                .with_against_file_name("missing.proto")
                .with_message("Nowhere."),
        );
        Ok(())
    }));
    let orchestrator = CheckOrchestrator::new(&spec, &config(0)).unwrap();
    let request = Request::new(files(&["missing.proto"])).unwrap();
    let err = orchestrator.check(&Context::background(), &request).unwrap_err();
    // The file exists, but only on the primary side.
    assert!(matches!(
        err,
        Error::Annotation(AnnotationError::UnknownFile { against: true, .. })
    ));
}

#[test]
fn test_handler_errors_are_joined_not_annotated() {
    let mut spec = three_rule_spec();
    spec.rules[0].handler = Some(failing_handler("rule three broke"));
    spec.rules[2].handler = Some(failing_handler("rule two broke"));
    let orchestrator = CheckOrchestrator::new(&spec, &config(4)).unwrap();
    let request = Request::builder(files(&["a.proto"]))
        .rule_ids(["RULE1", "RULE2", "RULE3"])
        .build()
        .unwrap();
    let err = orchestrator.check(&Context::background(), &request).unwrap_err();
    let joined = match err {
        Error::Joined(joined) => joined,
        other => panic!("expected joined error, got {:?}", other),
    };
    assert_eq!(joined.len(), 2);
    let mut messages: Vec<String> = joined.iter().map(|e| e.to_string()).collect();
    messages.sort();
    assert_eq!(messages, vec!["rule three broke", "rule two broke"]);
}

#[test]
fn test_order_independent_of_completion_order() {
    let spec = Spec {
        rules: vec![
            RuleSpec::new(
                "RULE_SLOW",
                "Finishes last.",
                RuleType::Lint,
                delayed_handler(Duration::from_millis(40), "Slow."),
            )
            .as_default(),
            RuleSpec::new(
                "RULE_FAST",
                "Finishes first.",
                RuleType::Lint,
                delayed_handler(Duration::ZERO, "Fast."),
            )
            .as_default(),
        ],
        ..Default::default()
    };
    let orchestrator = CheckOrchestrator::new(&spec, &config(2)).unwrap();
    let request = Request::new(files(&["b.proto", "a.proto"])).unwrap();
    for _ in 0..3 {
        let response = orchestrator.check(&Context::background(), &request).unwrap();
        assert_eq!(
            annotation_keys(response.annotations()),
            vec![
                ("RULE_FAST".to_string(), "a.proto".to_string(), "Fast.".to_string()),
                ("RULE_FAST".to_string(), "b.proto".to_string(), "Fast.".to_string()),
                ("RULE_SLOW".to_string(), "a.proto".to_string(), "Slow.".to_string()),
                ("RULE_SLOW".to_string(), "b.proto".to_string(), "Slow.".to_string()),
            ]
        );
    }
}

#[test]
fn test_parallelism_does_not_change_response() {
    let spec = many_rule_spec(40);
    let request = Request::builder(files(&["a.proto", "b.proto"]))
        .rule_ids((0..40).map(many_rule_id))
        .build()
        .unwrap();
    let serial = CheckOrchestrator::new(&spec, &config(1))
        .unwrap()
        .check(&Context::background(), &request)
        .unwrap();
    let parallel = CheckOrchestrator::new(&spec, &config(8))
        .unwrap()
        .check(&Context::background(), &request)
        .unwrap();
    assert_eq!(serial.len(), 40);
    assert_eq!(serial, parallel);
}

#[test]
fn test_scheduler_with_cancelled_context_runs_nothing() {
    let (ctx, cancel) = Context::background().with_cancel();
    cancel.cancel();
    let ran = AtomicUsize::new(0);
    let jobs: Vec<Job<'_>> = (0..3)
        .map(|_| -> Job<'_> {
            let ran = &ran;
            Box::new(move |_ctx| {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        })
        .collect();
    let result = parallelize(
        &ctx,
        jobs,
        ParallelizeOptions {
            parallelism: 2,
            cancel_on_failure: false,
        },
    );
    assert!(matches!(result, Err(Error::Context(ContextError::Canceled))));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[test]
fn test_expired_deadline_fails_check() {
    let spec = many_rule_spec(4);
    let orchestrator = CheckOrchestrator::new(&spec, &config(2)).unwrap();
    let request = Request::builder(files(&["a.proto"]))
        .rule_ids((0..4).map(many_rule_id))
        .build()
        .unwrap();
    let (ctx, _cancel) = Context::background().with_timeout(Duration::ZERO);
    let err = orchestrator.check(&ctx, &request).unwrap_err();
    assert!(matches!(err, Error::Context(ContextError::DeadlineExceeded)));
}

#[test]
fn test_client_chunks_large_rule_selection() {
    let spec = many_rule_spec(561);
    let client = Client::new(RecordingTransport::new(&spec));
    let request = Request::builder(files(&["a.proto", "b.proto"]))
        .against_files(files(&["a.proto"]))
        .rule_ids((0..561).rev().map(many_rule_id))
        .build()
        .unwrap();

    let response = client.check(&Context::background(), &request).unwrap();

    assert_eq!(
        client.transport().checks(),
        vec![
            (CHECK_RULE_ID_PAGE_SIZE, 2, 1),
            (CHECK_RULE_ID_PAGE_SIZE, 2, 1),
            (61, 2, 1)
        ]
    );
    assert_eq!(response.len(), 561);
    let rule_ids: Vec<&str> = response.annotations().iter().map(|a| a.rule_id.as_str()).collect();
    let expected: Vec<String> = (0..561).map(many_rule_id).collect();
    assert_eq!(rule_ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_client_matches_direct_check() {
    let spec = three_rule_spec();
    let request = Request::new(files(&["a.proto"])).unwrap();
    let direct = CheckOrchestrator::new(&spec, &config(0))
        .unwrap()
        .check(&Context::background(), &request)
        .unwrap();
    let client = Client::for_spec(&spec, &config(0)).unwrap();
    let remote = client.check(&Context::background(), &request).unwrap();
    assert_eq!(direct, remote);
    assert_eq!(client.transport().orchestrator().catalog().rules().len(), 3);
}

#[test]
fn test_client_fails_on_any_failed_chunk() {
    let spec = many_rule_spec(300);
    let client = Client::new(FailingSecondCall {
        inner: RecordingTransport::new(&spec),
    });
    let request = Request::builder(files(&["a.proto"]))
        .rule_ids((0..300).map(many_rule_id))
        .build()
        .unwrap();
    let err = client.check(&Context::background(), &request).unwrap_err();
    assert!(matches!(err, Error::Remote { code: ErrorCode::Unknown, ref message } if message == "plugin crashed"));
    assert_eq!(client.transport().inner.checks().len(), 1);
}
