//! Helpers for testing plugins in-process.
//!
//! [`spec_test`] validates a spec. [`CheckTest`] runs one request through a
//! [`Client`] bound to a spec and compares the response with the expected
//! annotations. Failures panic with both sides printed, so the helpers
//! belong in `#[test]` functions.
//!
//! ```
//! use rulekit::checktest::{spec_test, CheckTest, ExpectedAnnotation, ExpectedFileLocation};
//! use rulekit::rules::{builtin_spec, lint};
//! use rulekit::{FileDescriptor, Request};
//!
//! spec_test(&builtin_spec());
//!
//! let file = FileDescriptor {
//!     name: "a.proto".to_string(),
//!     is_syntax_unspecified: true,
//!     ..Default::default()
//! };
//! CheckTest {
//!     request: Request::new(vec![file]).unwrap(),
//!     spec: builtin_spec(),
//!     expected_annotations: vec![ExpectedAnnotation::new(lint::SYNTAX_SPECIFIED)
//!         .with_file_location(ExpectedFileLocation::new("a.proto"))],
//! }
//! .run();
//! ```

use crate::annotation::{Annotation, Location};
use crate::client::Client;
use crate::config::EngineConfig;
use crate::engine::context::Context;
use crate::request::Request;
use crate::spec::{validate_spec, Spec};
use std::fmt;

/// Panic unless `spec` is valid.
///
/// Almost every plugin should have a test calling this.
pub fn spec_test(spec: &Spec) {
    if let Err(err) = validate_spec(spec) {
        panic!("invalid spec: {err}");
    }
}

/// One check call to run against a spec.
#[derive(Debug)]
pub struct CheckTest {
    pub request: Request,
    pub spec: Spec,
    /// In response order: by rule ID, then location.
    pub expected_annotations: Vec<ExpectedAnnotation>,
}

impl CheckTest {
    /// Build a client for the spec, send the request and compare the
    /// annotations it returns.
    pub fn run(&self) {
        let client = match Client::for_spec(&self.spec, &EngineConfig::default()) {
            Ok(client) => client,
            Err(err) => panic!("cannot build client for spec: {err}"),
        };
        let response = match client.check(&Context::background(), &self.request) {
            Ok(response) => response,
            Err(err) => panic!("check failed: {err}"),
        };
        assert_annotations_equal(&self.expected_annotations, response.annotations());
    }
}

/// The parts of an [`Annotation`] a test compares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedAnnotation {
    /// Required
    pub rule_id: String,
    /// Not compared when empty.
    pub message: String,
    pub file_location: Option<ExpectedFileLocation>,
    pub against_file_location: Option<ExpectedFileLocation>,
}

impl ExpectedAnnotation {
    pub fn new(rule_id: impl Into<String>) -> Self {
        ExpectedAnnotation {
            rule_id: rule_id.into(),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_file_location(mut self, location: ExpectedFileLocation) -> Self {
        self.file_location = Some(location);
        self
    }

    pub fn with_against_file_location(mut self, location: ExpectedFileLocation) -> Self {
        self.against_file_location = Some(location);
        self
    }
}

impl From<&Annotation> for ExpectedAnnotation {
    fn from(annotation: &Annotation) -> Self {
        ExpectedAnnotation {
            rule_id: annotation.rule_id.clone(),
            message: annotation.message.clone(),
            file_location: annotation.location.as_ref().map(ExpectedFileLocation::from),
            against_file_location: annotation
                .against_location
                .as_ref()
                .map(ExpectedFileLocation::from),
        }
    }
}

impl fmt::Display for ExpectedAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rule_id={:?} message={:?} location={} against_location={}",
            self.rule_id,
            self.message,
            display_location(self.file_location.as_ref()),
            display_location(self.against_file_location.as_ref()),
        )
    }
}

/// A zero-based span in a named file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedFileLocation {
    pub file_name: String,
    pub start_line: i32,
    pub start_column: i32,
    pub end_line: i32,
    pub end_column: i32,
}

impl ExpectedFileLocation {
    /// Location with an empty span, as for a whole file.
    pub fn new(file_name: impl Into<String>) -> Self {
        ExpectedFileLocation {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn spanning(mut self, start_line: i32, start_column: i32, end_line: i32, end_column: i32) -> Self {
        self.start_line = start_line;
        self.start_column = start_column;
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }
}

impl From<&Location> for ExpectedFileLocation {
    fn from(location: &Location) -> Self {
        ExpectedFileLocation {
            file_name: location.file_name.clone(),
            start_line: location.start_line,
            start_column: location.start_column,
            end_line: location.end_line,
            end_column: location.end_column,
        }
    }
}

impl fmt::Display for ExpectedFileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} start_line={} start_column={} end_line={} end_column={}",
            self.file_name, self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

fn display_location(location: Option<&ExpectedFileLocation>) -> String {
    location.map_or_else(|| "none".to_string(), ToString::to_string)
}

fn listing(annotations: &[ExpectedAnnotation]) -> String {
    annotations
        .iter()
        .map(|a| format!("  {a}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic unless `actual` matches `expected` one for one.
///
/// An expected annotation with an empty message matches any message.
pub fn assert_annotations_equal(expected: &[ExpectedAnnotation], actual: &[Annotation]) {
    let mut actual: Vec<ExpectedAnnotation> = actual.iter().map(ExpectedAnnotation::from).collect();
    assert_eq!(
        expected.len(),
        actual.len(),
        "expected:\n{}\nactual:\n{}",
        listing(expected),
        listing(&actual)
    );
    for (expected, actual) in expected.iter().zip(actual.iter_mut()) {
        if expected.message.is_empty() {
            actual.message.clear();
        }
    }
    assert_eq!(
        expected,
        actual.as_slice(),
        "expected:\n{}\nactual:\n{}",
        listing(expected),
        listing(&actual)
    );
}
