//! Core types and traits for the redwire signal propagation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the redwire workspace:
//! block positions, directions, the 48-frame [`Orientation`] algebra,
//! block states and update flags, error types, and the [`Level`] /
//! [`NeighborUpdater`] / [`World`] traits that tie schedulers,
//! evaluators and the host world together.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direction;
pub mod error;
pub mod orientation;
pub mod pos;
pub mod state;
pub mod traits;

pub use direction::{Axis, AxisDirection, Direction};
pub use error::{BlockError, OrientationError, UpdateError};
pub use orientation::{Orientation, SideBias, ORIENTATION_COUNT};
pub use pos::BlockPos;
pub use state::{BlockKind, BlockState, UpdateFlags, DEFAULT_UPDATE_LIMIT, MAX_POWER};
pub use traits::{
    execute_neighbor_update, execute_shape_update, Level, NeighborUpdater, ShapeUpdate, UpdaterStats,
    World,
};
