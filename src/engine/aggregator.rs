//! Single-use sink that merges annotations from concurrent handlers.

use crate::annotation::{Annotation, AnnotationOptions, Location, Response};
use crate::descriptor::FileDescriptor;
use crate::error::{AnnotationError, Error, Result};
use crate::request::Request;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct State {
    annotations: Vec<Annotation>,
    /// Rejected annotations, reported together at finalize
    errors: Vec<AnnotationError>,
    finalized: bool,
}

/// Collects the annotations of one check call.
///
/// Invalid annotations do not fail the handler that adds them. They are
/// queued and fail the whole call at [`finalize`](Self::finalize), so
/// sibling handlers keep running undisturbed.
#[derive(Debug)]
pub struct AnnotationAggregator<'r> {
    files: HashMap<&'r str, &'r FileDescriptor>,
    against_files: HashMap<&'r str, &'r FileDescriptor>,
    state: RwLock<State>,
}

impl<'r> AnnotationAggregator<'r> {
    /// Aggregator resolving file names against `request`.
    pub fn new(request: &'r Request) -> Self {
        let index = |files: &'r [FileDescriptor]| {
            files
                .iter()
                .map(|f| (f.name.as_str(), f))
                .collect::<HashMap<_, _>>()
        };
        AnnotationAggregator {
            files: index(request.files()),
            against_files: index(request.against_files()),
            state: RwLock::new(State::default()),
        }
    }

    /// View that stamps every annotation with `rule_id`.
    pub fn writer<'a>(&'a self, rule_id: &'a str) -> ResponseWriter<'a> {
        ResponseWriter {
            aggregator: self,
            rule_id,
        }
    }

    pub fn add_annotation(&self, rule_id: &str, options: AnnotationOptions) {
        let result = self.build_annotation(rule_id, options);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let err = match result {
            Ok(_) if state.finalized => AnnotationError::CannotReuse,
            Ok(annotation) => {
                state.annotations.push(annotation);
                return;
            }
            Err(err) => err,
        };
        tracing::warn!(rule_id, error = %err, "rejected annotation");
        state.errors.push(err);
    }

    fn build_annotation(
        &self,
        rule_id: &str,
        options: AnnotationOptions,
    ) -> Result<Annotation, AnnotationError> {
        options.validate()?;
        let location = match options.primary.target() {
            Some((file_name, path)) => Some(resolve(&self.files, file_name, path, false)?),
            None => None,
        };
        let against_location = match options.against.target() {
            Some((file_name, path)) => Some(resolve(&self.against_files, file_name, path, true)?),
            None => None,
        };
        Ok(Annotation {
            rule_id: rule_id.to_string(),
            location,
            against_location,
            message: options.message,
        })
    }

    /// Close the aggregator and produce the sorted response.
    ///
    /// If any annotation was rejected, every rejection is returned joined,
    /// no response is produced and the aggregator stays open, so a repeated
    /// finalize reports the same errors. Only a successful finalize closes
    /// it: later adds and a second finalize then fail with
    /// [`AnnotationError::CannotReuse`].
    pub fn finalize(&self) -> Result<Response> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.finalized {
            return Err(AnnotationError::CannotReuse.into());
        }
        if let Some(err) = Error::join(state.errors.iter().cloned().map(Error::from)) {
            return Err(err);
        }
        state.finalized = true;
        Ok(Response::new(std::mem::take(&mut state.annotations)))
    }
}

fn resolve(
    files: &HashMap<&str, &FileDescriptor>,
    file_name: &str,
    path: &[i32],
    against: bool,
) -> Result<Location, AnnotationError> {
    let file = files
        .get(file_name)
        .ok_or_else(|| AnnotationError::UnknownFile {
            file_name: file_name.to_string(),
            against,
        })?;
    Ok(Location::resolve(file, path))
}

/// Per-rule view of an [`AnnotationAggregator`], handed to rule handlers.
#[derive(Debug, Clone, Copy)]
pub struct ResponseWriter<'a> {
    aggregator: &'a AnnotationAggregator<'a>,
    rule_id: &'a str,
}

impl ResponseWriter<'_> {
    pub fn rule_id(&self) -> &str {
        self.rule_id
    }

    /// Add an annotation for this writer's rule.
    ///
    /// Never fails here; a bad annotation fails the whole call later.
    pub fn add_annotation(&self, options: AnnotationOptions) {
        self.aggregator.add_annotation(self.rule_id, options);
    }
}
