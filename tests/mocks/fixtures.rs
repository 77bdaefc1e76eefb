//! Spec, handler and file fixtures.

use rulekit::checkutil::rule_handler_fn;
use rulekit::{
    AnnotationOptions, CategorySpec, FileDescriptor, RuleHandler, RuleSpec, RuleType, SourceLocation,
    Spec,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Handler that reports nothing.
pub fn noop_handler() -> Arc<dyn RuleHandler> {
    rule_handler_fn(|_, _, _| Ok(()))
}

/// Handler that sleeps for `delay`, then annotates every request file with
/// `message`.
pub fn delayed_handler(delay: Duration, message: &str) -> Arc<dyn RuleHandler> {
    let message = message.to_string();
    rule_handler_fn(move |_, writer, request| {
        std::thread::sleep(delay);
        for file in request.files() {
            writer.add_annotation(
                AnnotationOptions::new()
                    .with_file_name(file.name.clone())
                    .with_message(message.clone()),
            );
        }
        Ok(())
    })
}

/// Handler that fails with `message`.
pub fn failing_handler(message: &'static str) -> Arc<dyn RuleHandler> {
    rule_handler_fn(move |_, _, _| Err(anyhow::anyhow!(message)))
}

/// Handler that counts its invocations.
pub fn counting_handler(calls: Arc<AtomicUsize>) -> Arc<dyn RuleHandler> {
    rule_handler_fn(move |_, _, _| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

/// Rules RULE1 (no category), RULE2 (CATEGORY1), RULE3 (CATEGORY1 and
/// CATEGORY2), declared out of order.
pub fn three_rule_spec() -> Spec {
    Spec {
        rules: vec![
            RuleSpec::new("RULE3", "Checks three.", RuleType::Lint, noop_handler())
                .with_categories(["CATEGORY1", "CATEGORY2"]),
            RuleSpec::new("RULE1", "Checks one.", RuleType::Lint, noop_handler()).as_default(),
            RuleSpec::new("RULE2", "Checks two.", RuleType::Breaking, noop_handler())
                .with_categories(["CATEGORY1"]),
        ],
        categories: vec![
            CategorySpec::new("CATEGORY2", "Groups the second set."),
            CategorySpec::new("CATEGORY1", "Groups the first set."),
        ],
        ..Default::default()
    }
}

/// ID of the `index`th rule of [`many_rule_spec`].
pub fn many_rule_id(index: usize) -> String {
    format!("RULE_{:04}", index)
}

/// `count` lint rules, each annotating the first request file with its own
/// ID as the message.
pub fn many_rule_spec(count: usize) -> Spec {
    let rules = (0..count)
        .map(|index| {
            let id = many_rule_id(index);
            let message = id.clone();
            RuleSpec::new(
                id,
                format!("Checks number {}.", index),
                RuleType::Lint,
                rule_handler_fn(move |_, writer, request| {
                    if let Some(file) = request.files().first() {
                        writer.add_annotation(
                            AnnotationOptions::new()
                                .with_file_name(file.name.clone())
                                .with_message(message.clone()),
                        );
                    }
                    Ok(())
                }),
            )
        })
        .collect();
    Spec {
        rules,
        ..Default::default()
    }
}

/// Plain files named `names`.
pub fn files(names: &[&str]) -> Vec<FileDescriptor> {
    names.iter().map(|name| FileDescriptor::new(*name)).collect()
}

/// A file whose package declaration (path [2]) sits on line 3.
pub fn file_with_package(name: &str, package: &str) -> FileDescriptor {
    FileDescriptor {
        name: name.to_string(),
        package: package.to_string(),
        source_locations: vec![SourceLocation {
            path: vec![2],
            start_line: 2,
            start_column: 0,
            end_line: 2,
            end_column: 9 + package.len() as i32,
            ..Default::default()
        }],
        ..Default::default()
    }
}
