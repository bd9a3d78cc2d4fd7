//! Engine orchestration for redwire.
//!
//! Ties a host [`World`](redwire_core::World) to one scheduler and one
//! wire evaluator, both chosen from an [`EngineConfig`] at construction:
//!
//! - [`WireLevel`] adds wire behaviour to the world: power evaluation,
//!   the place and remove hooks, and the block mutation cascade
//!   (write, lifecycle, neighbour fan-out, shape updates).
//! - [`Engine`] is the facade callers drive. Each call is one update
//!   transaction.
//! - [`EngineMetrics`] accumulates evaluator reports and scheduler
//!   counters.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod level;
pub mod metrics;

pub use config::{ConfigError, EngineConfig, SchedulerKind};
pub use engine::Engine;
pub use level::WireLevel;
pub use metrics::EngineMetrics;
