//! Findings reported by rule handlers.
//!
//! [`Annotation`] and [`Location`] order by their fields in declaration
//! order, which is the canonical sort a [`Response`] is always returned in.

use crate::descriptor::{DescriptorRef, FileDescriptor};
use crate::error::AnnotationError;
use serde::{Deserialize, Serialize};

/// A resolved position inside a request file.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub file_name: String,
    pub start_line: i32,
    pub start_column: i32,
    pub end_line: i32,
    pub end_column: i32,
    pub source_path: Vec<i32>,
    pub leading_comments: String,
    pub trailing_comments: String,
    pub leading_detached_comments: Vec<String>,
}

impl Location {
    /// Location of `path` in `file`. An empty path means the whole file; a
    /// path without recorded source info keeps the path but has no span.
    pub(crate) fn resolve(file: &FileDescriptor, path: &[i32]) -> Self {
        let mut location = Location {
            file_name: file.name.clone(),
            source_path: path.to_vec(),
            ..Default::default()
        };
        if path.is_empty() {
            return location;
        }
        if let Some(source) = file.source_location(path) {
            location.start_line = source.start_line;
            location.start_column = source.start_column;
            location.end_line = source.end_line;
            location.end_column = source.end_column;
            location.leading_comments = source.leading_comments.clone();
            location.trailing_comments = source.trailing_comments.clone();
            location.leading_detached_comments = source.leading_detached_comments.clone();
        }
        location
    }
}

/// One finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub rule_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub against_location: Option<Location>,
    #[serde(default)]
    pub message: String,
}

/// The result of a successful check call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    annotations: Vec<Annotation>,
}

impl Response {
    pub(crate) fn new(mut annotations: Vec<Annotation>) -> Self {
        annotations.sort();
        Response { annotations }
    }

    /// Annotations in canonical order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }
}

/// Describes one annotation for
/// [`ResponseWriter::add_annotation`](crate::engine::aggregator::ResponseWriter::add_annotation).
///
/// Each side (primary and against) is located either through a descriptor
/// or through an explicit file name with an optional source path, never
/// both. A side with neither has no location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationOptions {
    pub(crate) message: String,
    pub(crate) primary: LocationOptions,
    pub(crate) against: LocationOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LocationOptions {
    pub(crate) descriptor: Option<DescriptorRef>,
    pub(crate) file_name: String,
    pub(crate) source_path: Vec<i32>,
}

impl LocationOptions {
    fn validate(&self, against: bool) -> Result<(), AnnotationError> {
        if self.descriptor.is_some() && (!self.file_name.is_empty() || !self.source_path.is_empty()) {
            return Err(AnnotationError::ConflictingLocation { against });
        }
        if self.file_name.is_empty() && !self.source_path.is_empty() {
            return Err(AnnotationError::MissingFileName { against });
        }
        Ok(())
    }

    /// The file name and source path this side points at, if any.
    pub(crate) fn target(&self) -> Option<(&str, &[i32])> {
        match &self.descriptor {
            Some(descriptor) => Some((descriptor.file_name.as_str(), descriptor.path.as_slice())),
            None if !self.file_name.is_empty() => {
                Some((self.file_name.as_str(), self.source_path.as_slice()))
            }
            None => None,
        }
    }
}

impl AnnotationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_descriptor(mut self, descriptor: DescriptorRef) -> Self {
        self.primary.descriptor = Some(descriptor);
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.primary.file_name = file_name.into();
        self
    }

    pub fn with_file_name_and_source_path(
        mut self,
        file_name: impl Into<String>,
        source_path: impl Into<Vec<i32>>,
    ) -> Self {
        self.primary.file_name = file_name.into();
        self.primary.source_path = source_path.into();
        self
    }

    pub fn with_against_descriptor(mut self, descriptor: DescriptorRef) -> Self {
        self.against.descriptor = Some(descriptor);
        self
    }

    pub fn with_against_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.against.file_name = file_name.into();
        self
    }

    pub fn with_against_file_name_and_source_path(
        mut self,
        file_name: impl Into<String>,
        source_path: impl Into<Vec<i32>>,
    ) -> Self {
        self.against.file_name = file_name.into();
        self.against.source_path = source_path.into();
        self
    }

    /// Check both sides are specified consistently.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        self.primary.validate(false)?;
        self.against.validate(true)
    }
}
