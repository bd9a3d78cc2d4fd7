//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the builder-input for an [`Engine`](crate::Engine).
//! [`validate()`](EngineConfig::validate) checks it once at construction;
//! nothing downstream re-checks a flag per call.

use std::error::Error;
use std::fmt;

use redwire_core::{NeighborUpdater, DEFAULT_UPDATE_LIMIT};
use redwire_update::{
    CollectingNeighborUpdater, InstantNeighborUpdater, DEFAULT_MAX_CHAINED_NEIGHBOR_UPDATES,
};
use redwire_wire::EvaluatorKind;

// ── SchedulerKind ─────────────────────────────────────────────────

/// How neighbour notifications are delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SchedulerKind {
    /// Trampolined through a layered queue. Stack depth stays constant
    /// however long the chain gets.
    #[default]
    Queued,
    /// Run inside the call that requested them. Recursion depth grows
    /// with chain length.
    Immediate,
}

impl SchedulerKind {
    /// Construct the scheduler. `max_chained` only applies to
    /// [`Queued`](SchedulerKind::Queued).
    pub fn build(self, max_chained: Option<usize>) -> Box<dyn NeighborUpdater> {
        match self {
            SchedulerKind::Queued => Box::new(CollectingNeighborUpdater::new(max_chained)),
            SchedulerKind::Immediate => Box::new(InstantNeighborUpdater::new()),
        }
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerKind::Queued => f.write_str("queued"),
            SchedulerKind::Immediate => f.write_str("immediate"),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A chain cap of zero would drop every notification.
    ZeroChainCap,
    /// `update_limit` of zero disables every shape cascade and every
    /// evaluator write that relies on one.
    ZeroUpdateLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroChainCap => write!(
                f,
                "max_chained_neighbor_updates must be at least 1 (use None for unlimited)"
            ),
            Self::ZeroUpdateLimit => write!(f, "update_limit must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Cap on updates chained within one transaction. `None` = unlimited.
    /// Default: 1,000,000.
    pub max_chained_neighbor_updates: Option<usize>,
    /// Notification delivery strategy. Default: queued.
    pub scheduler: SchedulerKind,
    /// Wire power strategy. [`EvaluatorKind::Incremental`] also turns on
    /// orientation tracking. Default: [`EvaluatorKind::Default`].
    pub evaluator: EvaluatorKind,
    /// Recursion budget for shape cascades started by the engine.
    /// Default: 512.
    pub update_limit: u32,
    /// Seed for the orientation RNG.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_chained_neighbor_updates: Some(DEFAULT_MAX_CHAINED_NEIGHBOR_UPDATES),
            scheduler: SchedulerKind::default(),
            evaluator: EvaluatorKind::default(),
            update_limit: DEFAULT_UPDATE_LIMIT,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Default configuration with the incremental evaluator.
    pub fn incremental() -> Self {
        Self {
            evaluator: EvaluatorKind::Incremental,
            ..Self::default()
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chained_neighbor_updates == Some(0) {
            return Err(ConfigError::ZeroChainCap);
        }
        if self.update_limit == 0 {
            return Err(ConfigError::ZeroUpdateLimit);
        }
        Ok(())
    }

    /// Whether orientation tracking is on.
    pub fn experiments_enabled(&self) -> bool {
        self.evaluator.requires_orientation()
    }
}
