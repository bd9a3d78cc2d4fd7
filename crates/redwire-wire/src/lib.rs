//! Wire power evaluators for redwire.
//!
//! A [`WireEvaluator`] decides what power a wire should carry after
//! something near it changed, writes it, and tells the neighbourhood.
//! Two strategies share the [`SignalReader`] primitives:
//!
//! - [`DefaultWireEvaluator`] recomputes one cell and notifies its whole
//!   neighbourhood, leaving the rest of the network to the scheduler.
//! - [`IncrementalWireEvaluator`] settles the whole affected region in
//!   one call by running a turn-off wave and then a turn-on wave, and
//!   notifies along the direction each cell was reached from.
//!
//! The strategy is picked once, from an [`EvaluatorKind`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod default;
pub mod incremental;
pub mod signal;

use redwire_core::{BlockPos, BlockState, Level, NeighborUpdater, Orientation, UpdateError};
use std::fmt;

pub use default::DefaultWireEvaluator;
pub use incremental::IncrementalWireEvaluator;
pub use signal::{SignalReader, WorldSignals};

/// What one evaluator call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Positions popped from the turn-off queue.
    pub turn_off_visits: usize,
    /// Positions popped from the turn-on queue.
    pub turn_on_visits: usize,
    /// Wires whose new power was written.
    pub writes: usize,
}

/// A wire power strategy.
pub trait WireEvaluator: fmt::Debug {
    /// Which strategy this is.
    fn kind(&self) -> EvaluatorKind;

    /// Whether a wire re-evaluates when the notification came from
    /// another wire.
    ///
    /// Default: yes. A strategy that settles the whole region in one call
    /// has already accounted for every wire it touched.
    fn reacts_to_wire_notifications(&self) -> bool {
        true
    }

    /// Re-evaluate the wire at `pos`, previously read as `state`.
    ///
    /// `orientation` is the frame the triggering notification arrived
    /// with. `update_shape` is false when the caller already knows shapes
    /// are final.
    fn update_power_strength(
        &self,
        level: &mut dyn Level,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
        state: BlockState,
        orientation: Option<Orientation>,
        update_shape: bool,
    ) -> Result<EvaluationReport, UpdateError>;
}

/// Selects a [`WireEvaluator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvaluatorKind {
    /// [`DefaultWireEvaluator`].
    #[default]
    Default,
    /// [`IncrementalWireEvaluator`]. Needs orientation tracking.
    Incremental,
}

impl EvaluatorKind {
    /// Construct the evaluator.
    pub fn build(self) -> Box<dyn WireEvaluator> {
        match self {
            EvaluatorKind::Default => Box::new(DefaultWireEvaluator),
            EvaluatorKind::Incremental => Box::new(IncrementalWireEvaluator),
        }
    }

    /// Whether the level must have orientation tracking enabled.
    pub fn requires_orientation(self) -> bool {
        matches!(self, EvaluatorKind::Incremental)
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluatorKind::Default => f.write_str("default"),
            EvaluatorKind::Incremental => f.write_str("incremental"),
        }
    }
}
