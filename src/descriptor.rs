//! File descriptors handed to rule handlers.
//!
//! Compiling schema sources into descriptors happens elsewhere; this module
//! only carries the compiled result and the source locations annotations
//! point at.

use serde::{Deserialize, Serialize};

/// One compiled schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Path-like name, unique within a request (e.g. "acme/v1/user.proto")
    pub name: String,
    #[serde(default)]
    pub package: String,
    /// Names of imported files, in declaration order
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// The file was pulled in as an import rather than checked directly
    #[serde(default)]
    pub is_import: bool,
    /// The file did not declare its syntax explicitly
    #[serde(default)]
    pub is_syntax_unspecified: bool,
    /// Indexes into `dependencies` that the compiler found unused
    #[serde(default)]
    pub unused_dependencies: Vec<usize>,
    #[serde(default)]
    pub source_locations: Vec<SourceLocation>,
}

/// Span and comments for one element of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLocation {
    pub path: Vec<i32>,
    pub start_line: i32,
    pub start_column: i32,
    pub end_line: i32,
    pub end_column: i32,
    pub leading_comments: String,
    pub trailing_comments: String,
    pub leading_detached_comments: Vec<String>,
}

/// Points at one element of a file: the file itself when `path` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorRef {
    pub file_name: String,
    pub path: Vec<i32>,
}

impl FileDescriptor {
    /// Create a descriptor with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        FileDescriptor {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Look up the source location recorded for `path`.
    pub fn source_location(&self, path: &[i32]) -> Option<&SourceLocation> {
        self.source_locations.iter().find(|loc| loc.path == path)
    }

    /// Reference to the file as a whole.
    pub fn as_descriptor(&self) -> DescriptorRef {
        DescriptorRef {
            file_name: self.name.clone(),
            path: Vec::new(),
        }
    }

    /// Reference to the element at `path` inside this file.
    pub fn descriptor_at(&self, path: &[i32]) -> DescriptorRef {
        DescriptorRef {
            file_name: self.name.clone(),
            path: path.to_vec(),
        }
    }

    /// Names of dependencies the compiler reported as unused.
    pub fn unused_dependency_names(&self) -> impl Iterator<Item = &str> {
        self.unused_dependencies
            .iter()
            .filter_map(|&i| self.dependencies.get(i).map(String::as_str))
    }
}
