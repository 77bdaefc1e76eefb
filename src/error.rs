//! Error types for rulekit operations.
//!
//! Errors are grouped by the stage that produces them: spec validation at
//! construction time, request validation per call, annotation validation
//! while handlers run, and handler failures. Every error maps to one
//! [`ErrorCode`] at the call boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error class visible across the call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed request, unknown rule ID, unknown page token
    InvalidArgument,
    /// An optional capability was not configured
    Unimplemented,
    /// Anything else
    Unknown,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidArgument => write!(f, "invalid_argument"),
            ErrorCode::Unimplemented => write!(f, "unimplemented"),
            ErrorCode::Unknown => write!(f, "unknown"),
        }
    }
}

/// A Spec failed validation. Fatal: no catalog is ever built from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("invalid rule spec: {0}")]
    Rule(String),
    #[error("invalid category spec: {0}")]
    Category(String),
    #[error("invalid spec: {0}")]
    Spec(String),
}

/// A request was rejected before any handler ran.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("duplicate file name: {0:?}")]
    DuplicateFileName(String),
    #[error("duplicate rule or category IDs: {}", .0.join(", "))]
    DuplicateIds(Vec<String>),
    #[error("unknown rule ID: {0:?}")]
    UnknownRuleId(String),
    #[error("unknown page token: {0:?}")]
    UnknownPageToken(String),
    #[error("check request has {count} rule IDs, at most {max} are allowed")]
    TooManyRuleIds { count: usize, max: usize },
    #[error("malformed request: {0}")]
    Malformed(String),
}

/// A handler added an annotation that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("cannot use both a descriptor and an explicit file name for the {} location", side(.against))]
    ConflictingLocation { against: bool },
    #[error("a source path requires a non-empty file name for the {} location", side(.against))]
    MissingFileName { against: bool },
    #[error("cannot add annotation for unknown {} file: {file_name:?}", side(.against))]
    UnknownFile { file_name: String, against: bool },
    #[error("cannot reuse a finalized annotation aggregator")]
    CannotReuse,
}

fn side(against: &bool) -> &'static str {
    if *against {
        "against"
    } else {
        "primary"
    }
}

/// Why a [`Context`](crate::engine::context::Context) is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Crate-wide error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
    /// Returned by a rule handler, passed through untouched.
    #[error(transparent)]
    Handler(anyhow::Error),
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Broken internal invariant; never a panic.
    #[error("internal error: {0}")]
    Internal(String),
    #[error("unimplemented: {0}")]
    Unimplemented(String),
    #[error(transparent)]
    Joined(JoinedError),
    /// Error reported by the other side of a transport.
    #[error("{code}: {message}")]
    Remote { code: ErrorCode, message: String },
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an error returned by a rule handler.
    pub fn handler(err: impl Into<anyhow::Error>) -> Self {
        Error::Handler(err.into())
    }

    /// Combine errors into one.
    ///
    /// Nested joins are flattened. Returns `None` for an empty input and the
    /// error itself when there is exactly one.
    pub fn join(errors: impl IntoIterator<Item = Error>) -> Option<Error> {
        let mut flat = Vec::new();
        for err in errors {
            match err {
                Error::Joined(joined) => flat.extend(joined.errors),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Error::Joined(JoinedError { errors: flat })),
        }
    }

    /// Error class at the call boundary.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Request(_) => ErrorCode::InvalidArgument,
            Error::Unimplemented(_) => ErrorCode::Unimplemented,
            Error::Remote { code, .. } => *code,
            Error::Joined(joined) => {
                if joined
                    .iter()
                    .all(|e| e.code() == ErrorCode::InvalidArgument)
                {
                    ErrorCode::InvalidArgument
                } else {
                    ErrorCode::Unknown
                }
            }
            _ => ErrorCode::Unknown,
        }
    }
}

/// Several errors reported together; none is dropped.
#[derive(Debug)]
pub struct JoinedError {
    errors: Vec<Error>,
}

impl JoinedError {
    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for JoinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for JoinedError {}

impl<'a> IntoIterator for &'a JoinedError {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
