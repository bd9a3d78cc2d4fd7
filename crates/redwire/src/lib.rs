//! Redwire: wire signal propagation and bounded neighbour-update scheduling.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all redwire sub-crates. For most users, adding `redwire` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use redwire::prelude::*;
//! use std::collections::HashMap;
//!
//! const LEVER: BlockKind = BlockKind(2);
//!
//! // A world where levers power their six neighbours.
//! #[derive(Default)]
//! struct Bench(HashMap<BlockPos, BlockState>);
//!
//! impl World for Bench {
//!     fn block_state(&self, pos: BlockPos) -> BlockState {
//!         self.0.get(&pos).copied().unwrap_or_default()
//!     }
//!     fn set_block_state(&mut self, pos: BlockPos, state: BlockState) -> BlockState {
//!         self.0.insert(pos, state).unwrap_or_default()
//!     }
//!     fn is_conductor(&self, _pos: BlockPos, _state: BlockState) -> bool {
//!         false
//!     }
//!     fn direct_signal(&self, pos: BlockPos) -> u8 {
//!         Direction::ALL
//!             .iter()
//!             .map(|d| self.block_state(pos.relative(*d)))
//!             .filter(|s| s.is(LEVER))
//!             .map(|s| s.power())
//!             .max()
//!             .unwrap_or(0)
//!     }
//! }
//!
//! let mut engine = Engine::new(Bench::default(), EngineConfig::incremental()).unwrap();
//! for x in 1..=4 {
//!     engine.set_block_and_update(BlockPos::new(x, 0, 0), BlockState::wire(0)).unwrap();
//! }
//! engine.set_block_and_update(BlockPos::ORIGIN, BlockState::new(LEVER, 15)).unwrap();
//! assert_eq!(engine.power_at(BlockPos::new(4, 0, 0)), 12);
//!
//! // Switching off darkens the run in a single wave.
//! let before = engine.metrics();
//! engine.remove_block(BlockPos::ORIGIN).unwrap();
//! assert_eq!(engine.power_at(BlockPos::new(1, 0, 0)), 0);
//! let after = engine.metrics();
//! assert_eq!(after.evaluations - before.evaluations, 1);
//! assert_eq!(after.turn_off_visits - before.turn_off_visits, 4);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `redwire-core` | Positions, directions, orientations, block states, traits |
//! | [`update`] | `redwire-update` | Immediate and queued schedulers |
//! | [`wire`] | `redwire-wire` | Wire power evaluators |
//! | [`engine`] | `redwire-engine` | Config, wire-aware level, engine facade |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`redwire-core`).
///
/// Contains [`types::BlockPos`], [`types::Direction`], the 48-frame
/// [`types::Orientation`] table, block states, update flags, errors, and
/// the [`types::World`], [`types::Level`] and [`types::NeighborUpdater`]
/// traits.
pub use redwire_core as types;

/// Neighbour-update schedulers (`redwire-update`).
pub use redwire_update as update;

/// Wire power evaluators (`redwire-wire`).
///
/// [`wire::DefaultWireEvaluator`] recomputes one wire at a time;
/// [`wire::IncrementalWireEvaluator`] settles a whole region in one call.
pub use redwire_wire as wire;

/// Engine orchestration (`redwire-engine`).
pub use redwire_engine as engine;

/// Common imports for typical redwire usage.
///
/// ```rust
/// use redwire::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use redwire_core::{
        BlockKind, BlockPos, BlockState, Direction, Level, NeighborUpdater, Orientation, UpdateFlags,
        World,
    };

    // Errors
    pub use redwire_core::{BlockError, UpdateError};

    // Strategies
    pub use redwire_wire::EvaluatorKind;

    // Engine
    pub use redwire_engine::{ConfigError, Engine, EngineConfig, EngineMetrics, SchedulerKind};
}
