//! The whole-network evaluator.

use crate::signal::SignalReader;
use crate::{EvaluationReport, EvaluatorKind, WireEvaluator};
use indexmap::IndexSet;
use redwire_core::{
    BlockKind, BlockPos, BlockState, Direction, Level, NeighborUpdater, Orientation, UpdateError,
    UpdateFlags,
};
use tracing::trace;

/// Recomputes a single wire and notifies its neighbourhood.
///
/// Each change costs O(1) here but can set off up to seven further
/// evaluations; a long run settles only because the scheduler keeps
/// feeding them back.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultWireEvaluator;

impl SignalReader for DefaultWireEvaluator {}

impl WireEvaluator for DefaultWireEvaluator {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Default
    }

    fn update_power_strength(
        &self,
        level: &mut dyn Level,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
        state: BlockState,
        _orientation: Option<Orientation>,
        _update_shape: bool,
    ) -> Result<EvaluationReport, UpdateError> {
        let target = self.target_strength(level, pos);
        let mut report = EvaluationReport::default();
        if state.power() == target {
            return Ok(report);
        }
        trace!(%pos, from = state.power(), to = target, "wire power changed");

        // A stale read must not overwrite whatever replaced it.
        if level.block_state(pos) == state {
            let limit = level.update_limit();
            if level.set_block(updater, pos, state.with_power(target), UpdateFlags::CLIENTS, limit)? {
                report.writes += 1;
            }
        }

        let mut targets: IndexSet<BlockPos> = IndexSet::with_capacity(7);
        targets.insert(pos);
        targets.extend(Direction::ALL.iter().map(|d| pos.relative(*d)));
        for target_pos in targets {
            let orientation = level.initial_orientation(None, None);
            updater.update_neighbors_at(level, target_pos, BlockKind::WIRE, orientation)?;
        }
        Ok(report)
    }
}
