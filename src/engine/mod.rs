//! Check engine.
//!
//! Provides cancellation contexts, the bounded-parallelism scheduler,
//! annotation aggregation, and the orchestrator that ties them together.

pub mod aggregator;
pub mod context;
pub mod orchestrator;
pub mod scheduler;

pub use aggregator::{AnnotationAggregator, ResponseWriter};
pub use context::{CancelHandle, Context};
pub use orchestrator::CheckOrchestrator;
pub use scheduler::{parallelize, Job, ParallelizeOptions};
