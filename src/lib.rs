//! rulekit library
//!
//! Build check plugins out of rules. A plugin author declares rules and
//! categories in a [`Spec`]; rulekit validates it once into a [`Catalog`],
//! then answers check calls by running the selected rule handlers in
//! parallel and collecting their findings into a sorted [`Response`].
//!
//! The library covers:
//! - Spec validation and the immutable rule catalog
//! - Paginated rule and category listings
//! - Bounded-parallelism check execution with cancellation
//! - Thread-safe annotation collection with deterministic output
//! - A client that splits large requests and merges the replies
//! - Helpers for testing a plugin in-process
//!
//! # Example
//!
//! ```no_run
//! use rulekit::checkutil::{file_rule_handler, IteratorOptions};
//! use rulekit::{
//!     AnnotationOptions, CheckOrchestrator, Context, EngineConfig, FileDescriptor, Request,
//!     RuleSpec, RuleType, Spec,
//! };
//!
//! let spec = Spec {
//!     rules: vec![RuleSpec::new(
//!         "PACKAGE_DEFINED",
//!         "Checks that all files have a package.",
//!         RuleType::Lint,
//!         file_rule_handler(
//!             |writer, _, file| {
//!                 if file.package.is_empty() {
//!                     writer.add_annotation(
//!                         AnnotationOptions::new()
//!                             .with_descriptor(file.as_descriptor())
//!                             .with_message("File has no package."),
//!                     );
//!                 }
//!                 Ok(())
//!             },
//!             IteratorOptions::without_imports(),
//!         ),
//!     )
//!     .as_default()],
//!     ..Default::default()
//! };
//!
//! let orchestrator = CheckOrchestrator::new(&spec, &EngineConfig::default())?;
//! let request = Request::new(vec![FileDescriptor::new("a.proto")])?;
//! let response = orchestrator.check(&Context::background(), &request)?;
//! println!("{} annotations", response.len());
//! # Ok::<(), rulekit::Error>(())
//! ```

pub mod annotation;
pub mod catalog;
pub mod checktest;
pub mod checkutil;
pub mod cli;
pub mod client;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod handler;
pub mod info;
pub mod options;
pub mod request;
pub mod rules;
pub mod server;
pub mod spec;
pub mod version;
pub mod wire;

// Re-exports for public API
pub use annotation::{Annotation, AnnotationOptions, Location, Response};
pub use catalog::{Catalog, Category, Rule, RuleType};
pub use client::Client;
pub use config::EngineConfig;
pub use descriptor::{DescriptorRef, FileDescriptor, SourceLocation};
pub use engine::{CheckOrchestrator, Context, ResponseWriter};
pub use error::{Error, ErrorCode, Result};
pub use handler::RuleHandler;
pub use info::{License, PluginInfo};
pub use options::{OptionValue, Options};
pub use request::Request;
pub use server::{CheckService, Transport};
pub use spec::{CategorySpec, RuleSpec, Spec};
