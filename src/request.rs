//! Check requests.

use crate::descriptor::FileDescriptor;
use crate::error::RequestError;
use crate::options::Options;
use crate::spec::duplicate_ids;
use crate::wire;
use std::collections::HashSet;

/// Most rule IDs one wire check request may carry.
pub const CHECK_RULE_ID_PAGE_SIZE: usize = 250;

/// A validated check request.
///
/// File names are unique within `files` and within `against_files`. Rule IDs
/// are unique and sorted; an empty list selects the default rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    files: Vec<FileDescriptor>,
    against_files: Vec<FileDescriptor>,
    options: Options,
    rule_ids: Vec<String>,
}

/// Builder for [`Request`]; validation happens in [`RequestBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    files: Vec<FileDescriptor>,
    against_files: Vec<FileDescriptor>,
    options: Options,
    rule_ids: Vec<String>,
}

impl RequestBuilder {
    pub fn against_files(mut self, against_files: Vec<FileDescriptor>) -> Self {
        self.against_files = against_files;
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn rule_ids<I, S>(mut self, rule_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule_ids = rule_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<Request, RequestError> {
        let duplicates = duplicate_ids(self.rule_ids.iter().map(String::as_str));
        if !duplicates.is_empty() {
            return Err(RequestError::DuplicateIds(duplicates));
        }
        let mut rule_ids = self.rule_ids;
        rule_ids.sort();
        validate_file_names(&self.files)?;
        validate_file_names(&self.against_files)?;
        Ok(Request {
            files: self.files,
            against_files: self.against_files,
            options: self.options,
            rule_ids,
        })
    }
}

fn validate_file_names(files: &[FileDescriptor]) -> Result<(), RequestError> {
    let mut seen = HashSet::with_capacity(files.len());
    for file in files {
        if !seen.insert(file.name.as_str()) {
            return Err(RequestError::DuplicateFileName(file.name.clone()));
        }
    }
    Ok(())
}

impl Request {
    pub fn builder(files: Vec<FileDescriptor>) -> RequestBuilder {
        RequestBuilder {
            files,
            ..Default::default()
        }
    }

    /// Request for `files` with default rules and no options.
    pub fn new(files: Vec<FileDescriptor>) -> Result<Self, RequestError> {
        Self::builder(files).build()
    }

    /// Builder seeded with this request's contents.
    pub fn to_builder(&self) -> RequestBuilder {
        RequestBuilder {
            files: self.files.clone(),
            against_files: self.against_files.clone(),
            options: self.options.clone(),
            rule_ids: self.rule_ids.clone(),
        }
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Previous versions of the files; empty for lint-only requests.
    pub fn against_files(&self) -> &[FileDescriptor] {
        &self.against_files
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Explicitly selected rule IDs, sorted.
    pub fn rule_ids(&self) -> &[String] {
        &self.rule_ids
    }

    pub fn from_wire(request: wire::CheckRequest) -> Result<Self, RequestError> {
        Self::builder(request.files)
            .against_files(request.against_files)
            .options(request.options)
            .rule_ids(request.rule_ids)
            .build()
    }

    /// Split into wire messages of at most [`CHECK_RULE_ID_PAGE_SIZE`] rule
    /// IDs each. Every message carries the full file sets and options.
    pub fn to_wire_requests(&self) -> Vec<wire::CheckRequest> {
        let message = |rule_ids: &[String]| wire::CheckRequest {
            files: self.files.clone(),
            against_files: self.against_files.clone(),
            options: self.options.clone(),
            rule_ids: rule_ids.to_vec(),
        };
        if self.rule_ids.is_empty() {
            return vec![message(&[])];
        }
        self.rule_ids
            .chunks(CHECK_RULE_ID_PAGE_SIZE)
            .map(message)
            .collect()
    }
}
