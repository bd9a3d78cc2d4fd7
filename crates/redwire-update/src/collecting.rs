//! The queued (trampoline) scheduler.
//!
//! Every request becomes an [`UpdateRecord`]. The first request of an
//! idle scheduler opens a transaction and drains it before returning;
//! requests made while draining land in a side buffer and are flushed
//! onto the stack as the next layer once the current record's step ends.
//!
//! Layering rules:
//!
//! - Within a layer, earlier requests run first (the buffer is pushed in
//!   reverse).
//! - A new layer runs to completion before the record that spawned it
//!   takes its next step.
//! - Every request counts against the transaction's chain cap, including
//!   ones that are dropped.

use redwire_core::{
    execute_neighbor_update, execute_shape_update, BlockKind, BlockPos, BlockState, Direction, Level,
    NeighborUpdater, Orientation, ShapeUpdate, UpdateError, UpdaterStats,
};
use smallvec::SmallVec;
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

/// Default cap on requests per transaction.
pub const DEFAULT_MAX_CHAINED_NEIGHBOR_UPDATES: usize = 1_000_000;

/// A pending request, carrying everything its remaining steps need.
#[derive(Clone, Copy, Debug)]
enum UpdateRecord {
    Shape(ShapeUpdate),
    /// Re-reads the target's state when it runs.
    SimpleNeighbor {
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
    },
    FullNeighbor {
        state: BlockState,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
        moved_by_piston: bool,
    },
    MultiNeighbor(FanOut),
}

/// Fan-out cursor over [`Direction::UPDATE_ORDER`].
#[derive(Clone, Copy, Debug)]
struct FanOut {
    source_pos: BlockPos,
    source_kind: BlockKind,
    orientation: Option<Orientation>,
    skip: Option<Direction>,
    idx: usize,
}

impl FanOut {
    fn new(
        source_pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
        skip: Option<Direction>,
    ) -> Self {
        let mut fan_out = Self {
            source_pos,
            source_kind,
            orientation,
            skip,
            idx: 0,
        };
        fan_out.skip_excluded();
        fan_out
    }

    fn skip_excluded(&mut self) {
        if self.idx < Direction::UPDATE_ORDER.len() && Some(Direction::UPDATE_ORDER[self.idx]) == self.skip {
            self.idx += 1;
        }
    }

    fn step(&mut self, level: &mut dyn Level, updater: &mut dyn NeighborUpdater) -> Result<bool, UpdateError> {
        let direction = Direction::UPDATE_ORDER[self.idx];
        self.idx += 1;
        let pos = self.source_pos.relative(direction);
        let state = level.block_state(pos);
        let orientation = if level.experiments_enabled() {
            let base = match self.orientation {
                Some(o) => o,
                None => {
                    let up = self.skip.map(Direction::opposite);
                    let Some(o) = level.initial_orientation(up, None) else {
                        return Err(UpdateError::InvariantViolation {
                            pos: self.source_pos,
                            reason: "orientation tracking enabled but no initial orientation".into(),
                        });
                    };
                    self.orientation = Some(o);
                    o
                }
            };
            Some(base.with_front(direction))
        } else {
            None
        };
        execute_neighbor_update(level, updater, state, pos, self.source_kind, orientation, false)?;
        self.skip_excluded();
        Ok(self.idx < Direction::UPDATE_ORDER.len())
    }
}

impl UpdateRecord {
    /// Position named when this record is dropped by the cap.
    fn pos(&self) -> BlockPos {
        match self {
            UpdateRecord::Shape(update) => update.pos,
            UpdateRecord::SimpleNeighbor { pos, .. } | UpdateRecord::FullNeighbor { pos, .. } => *pos,
            UpdateRecord::MultiNeighbor(fan_out) => fan_out.source_pos,
        }
    }

    /// Run the next atomic step. `Ok(true)` means more steps remain.
    fn step(&mut self, level: &mut dyn Level, updater: &mut dyn NeighborUpdater) -> Result<bool, UpdateError> {
        match self {
            UpdateRecord::Shape(update) => {
                execute_shape_update(level, updater, *update)?;
                Ok(false)
            }
            UpdateRecord::SimpleNeighbor {
                pos,
                source_kind,
                orientation,
            } => {
                let state = level.block_state(*pos);
                execute_neighbor_update(level, updater, state, *pos, *source_kind, *orientation, false)?;
                Ok(false)
            }
            UpdateRecord::FullNeighbor {
                state,
                pos,
                source_kind,
                orientation,
                moved_by_piston,
            } => {
                execute_neighbor_update(
                    level,
                    updater,
                    *state,
                    *pos,
                    *source_kind,
                    *orientation,
                    *moved_by_piston,
                )?;
                Ok(false)
            }
            UpdateRecord::MultiNeighbor(fan_out) => fan_out.step(level, updater),
        }
    }
}

/// Trampoline scheduler with a per-transaction chain cap.
///
/// # Examples
///
/// ```
/// use redwire_update::CollectingNeighborUpdater;
/// use redwire_core::NeighborUpdater;
///
/// let updater = CollectingNeighborUpdater::new(Some(64));
/// assert!(updater.is_idle());
/// assert_eq!(updater.stats().executed_steps, 0);
/// ```
#[derive(Debug)]
pub struct CollectingNeighborUpdater {
    max_chained: Option<usize>,
    stack: Vec<UpdateRecord>,
    added_this_layer: SmallVec<[UpdateRecord; 8]>,
    count: usize,
    stats: UpdaterStats,
}

impl CollectingNeighborUpdater {
    /// A scheduler that drops requests past `max_chained` per
    /// transaction. `None` means no cap.
    pub fn new(max_chained: Option<usize>) -> Self {
        Self {
            max_chained,
            stack: Vec::new(),
            added_this_layer: SmallVec::new(),
            count: 0,
            stats: UpdaterStats::default(),
        }
    }

    /// The configured chain cap.
    pub fn max_chained(&self) -> Option<usize> {
        self.max_chained
    }

    /// Whether no transaction is in progress and no state is left over.
    pub fn is_idle(&self) -> bool {
        self.count == 0 && self.stack.is_empty() && self.added_this_layer.is_empty()
    }

    fn add_and_run(&mut self, level: &mut dyn Level, record: UpdateRecord) -> Result<(), UpdateError> {
        let running = self.count > 0;
        let over_cap = self.max_chained.is_some_and(|cap| self.count >= cap);
        self.count += 1;
        if !over_cap {
            if running {
                self.added_this_layer.push(record);
            } else {
                self.stack.push(record);
            }
        } else {
            self.stats.dropped += 1;
            if Some(self.count - 1) == self.max_chained {
                let first_skipped = record.pos();
                warn!(
                    cap = self.count - 1,
                    first_skipped = %first_skipped,
                    "too many chained neighbor updates, skipping the rest"
                );
                self.stats.overflow_warnings += 1;
                self.stats.last_overflow = Some(first_skipped);
            }
        }
        if running {
            return Ok(());
        }
        let mut guard = DrainGuard(self);
        guard.run_updates(level)
    }

    fn run_updates(&mut self, level: &mut dyn Level) -> Result<(), UpdateError> {
        while !self.stack.is_empty() || !self.added_this_layer.is_empty() {
            while let Some(record) = self.added_this_layer.pop() {
                self.stack.push(record);
            }
            let Some(mut record) = self.stack.pop() else {
                break;
            };
            loop {
                let more = record.step(level, self)?;
                self.stats.executed_steps += 1;
                if !more {
                    break;
                }
                if !self.added_this_layer.is_empty() {
                    self.stack.push(record);
                    break;
                }
            }
        }
        debug!(chained = self.count, "neighbor update transaction drained");
        Ok(())
    }
}

impl Default for CollectingNeighborUpdater {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_CHAINED_NEIGHBOR_UPDATES))
    }
}

/// Clears the transaction state on every exit from a drain, including
/// error returns and unwinding panics.
struct DrainGuard<'a>(&'a mut CollectingNeighborUpdater);

impl Deref for DrainGuard<'_> {
    type Target = CollectingNeighborUpdater;

    fn deref(&self) -> &CollectingNeighborUpdater {
        self.0
    }
}

impl DerefMut for DrainGuard<'_> {
    fn deref_mut(&mut self) -> &mut CollectingNeighborUpdater {
        self.0
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.stack.clear();
        self.0.added_this_layer.clear();
        self.0.count = 0;
    }
}

impl NeighborUpdater for CollectingNeighborUpdater {
    fn shape_update(&mut self, level: &mut dyn Level, update: ShapeUpdate) -> Result<(), UpdateError> {
        self.add_and_run(level, UpdateRecord::Shape(update))
    }

    fn neighbor_changed(
        &mut self,
        level: &mut dyn Level,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
    ) -> Result<(), UpdateError> {
        self.add_and_run(
            level,
            UpdateRecord::SimpleNeighbor {
                pos,
                source_kind,
                orientation,
            },
        )
    }

    fn neighbor_changed_with_state(
        &mut self,
        level: &mut dyn Level,
        state: BlockState,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
        moved_by_piston: bool,
    ) -> Result<(), UpdateError> {
        self.add_and_run(
            level,
            UpdateRecord::FullNeighbor {
                state,
                pos,
                source_kind,
                orientation,
                moved_by_piston,
            },
        )
    }

    fn update_neighbors_at_except_from_facing(
        &mut self,
        level: &mut dyn Level,
        pos: BlockPos,
        source_kind: BlockKind,
        except: Option<Direction>,
        orientation: Option<Orientation>,
    ) -> Result<(), UpdateError> {
        self.add_and_run(
            level,
            UpdateRecord::MultiNeighbor(FanOut::new(pos, source_kind, orientation, except)),
        )
    }

    fn stats(&self) -> UpdaterStats {
        self.stats
    }
}
