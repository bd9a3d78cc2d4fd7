//! Test utilities and mock worlds for redwire development.
//!
//! - [`GridWorld`]: a `HashMap`-backed [`World`](redwire_core::World)
//!   with power sources, conductors, ground that carries wires, and
//!   failing and fragile block kinds.
//! - [`ChainLevel`]: a scripted [`Level`](redwire_core::Level) for
//!   exercising schedulers without any wire logic.
//! - [`GridLevel`]: a bare level over a `GridWorld` for running one
//!   evaluator call in isolation.
//! - [`scenarios`]: ready-made wire layouts.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod chain;
pub mod grid;
pub mod level;
pub mod scenarios;

pub use chain::{ChainLevel, Landing, Reaction, CHAIN};
pub use grid::{GridWorld, FAILING, FRAGILE, SOURCE, STONE};
pub use level::{FlaggedWrite, GridLevel};
