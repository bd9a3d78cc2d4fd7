//! The immediate scheduler.

use redwire_core::{
    execute_neighbor_update, execute_shape_update, BlockKind, BlockPos, BlockState, Level,
    NeighborUpdater, Orientation, ShapeUpdate, UpdateError, UpdaterStats,
};

/// Runs every request synchronously, recursing into the level.
///
/// Suitable for shallow chains only: a long wire run recurses once per
/// cell.
#[derive(Debug, Default)]
pub struct InstantNeighborUpdater {
    executed_steps: u64,
}

impl InstantNeighborUpdater {
    /// A fresh scheduler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NeighborUpdater for InstantNeighborUpdater {
    fn shape_update(&mut self, level: &mut dyn Level, update: ShapeUpdate) -> Result<(), UpdateError> {
        self.executed_steps += 1;
        execute_shape_update(level, self, update)
    }

    fn neighbor_changed(
        &mut self,
        level: &mut dyn Level,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
    ) -> Result<(), UpdateError> {
        let state = level.block_state(pos);
        self.neighbor_changed_with_state(level, state, pos, source_kind, orientation, false)
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
        self.executed_steps += 1;
        execute_neighbor_update(level, self, state, pos, source_kind, orientation, moved_by_piston)
    }

    fn stats(&self) -> UpdaterStats {
        UpdaterStats {
            executed_steps: self.executed_steps,
            ..UpdaterStats::default()
        }
    }
}
