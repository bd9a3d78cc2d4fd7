//! The wire-aware [`Level`] over a host [`World`].
//!
//! [`WireLevel`] owns the world and supplies the block behaviour the
//! world does not: wire power evaluation, the wire place and remove
//! hooks, and the mutation cascade every write goes through.

use crate::metrics::EngineMetrics;
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use redwire_core::{
    BlockKind, BlockPos, BlockState, Direction, Level, NeighborUpdater, Orientation, ShapeUpdate,
    UpdateError, UpdateFlags, World,
};
use redwire_wire::{EvaluationReport, EvaluatorKind, WireEvaluator};
use std::rc::Rc;
use tracing::trace;

/// A [`World`] plus wire behaviour.
///
/// Never owns a scheduler; every mutating entry point takes the
/// [`NeighborUpdater`] alongside.
pub struct WireLevel<W: World> {
    world: W,
    // Shared so a call can hold the evaluator while lending out `self`.
    evaluator: Rc<dyn WireEvaluator>,
    rng: ChaCha8Rng,
    experiments: bool,
    update_limit: u32,
    metrics: EngineMetrics,
}

impl<W: World> WireLevel<W> {
    /// Wrap `world`, evaluating wires with `evaluator`.
    pub fn new(world: W, evaluator: EvaluatorKind, seed: u64, update_limit: u32) -> Self {
        Self {
            world,
            evaluator: Rc::from(evaluator.build()),
            rng: ChaCha8Rng::seed_from_u64(seed),
            experiments: evaluator.requires_orientation(),
            update_limit,
            metrics: EngineMetrics::default(),
        }
    }

    /// The wrapped world.
    pub fn world(&self) -> &W {
        &self.world
    }

    /// The wrapped world, mutably. Writes made here bypass every hook.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Unwrap the world.
    pub fn into_world(self) -> W {
        self.world
    }

    /// Which evaluator this level runs.
    pub fn evaluator_kind(&self) -> EvaluatorKind {
        self.evaluator.kind()
    }

    /// Evaluator counters. The scheduler part is left at its default.
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Run the evaluator on the wire at `pos`, read as `state`.
    pub fn evaluate(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
        state: BlockState,
        orientation: Option<Orientation>,
        update_shape: bool,
    ) -> Result<EvaluationReport, UpdateError> {
        let evaluator = Rc::clone(&self.evaluator);
        let report =
            evaluator.update_power_strength(self, updater, pos, state, orientation, update_shape)?;
        self.metrics.record(report);
        Ok(report)
    }

    fn on_wire_placed(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
        state: BlockState,
    ) -> Result<(), UpdateError> {
        self.evaluate(updater, pos, state, None, true)?;
        for direction in Direction::VERTICAL {
            self.notify_around(updater, pos.relative(direction))?;
        }
        self.update_neighbors_of_neighboring_wires(updater, pos)
    }

    fn on_wire_removed(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
        old: BlockState,
    ) -> Result<(), UpdateError> {
        for direction in Direction::ALL {
            self.notify_around(updater, pos.relative(direction))?;
        }
        self.evaluate(updater, pos, old, None, false)?;
        self.update_neighbors_of_neighboring_wires(updater, pos)
    }

    /// Wires that connect to `pos` around a corner change shape and power
    /// when it changes, so their neighbourhoods are told too.
    fn update_neighbors_of_neighboring_wires(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
    ) -> Result<(), UpdateError> {
        for direction in Direction::HORIZONTAL {
            self.check_corner_change_at(updater, pos.relative(direction))?;
        }
        for direction in Direction::HORIZONTAL {
            let neighbor = pos.relative(direction);
            let corner = if self.is_conductor(neighbor) {
                neighbor.above()
            } else {
                neighbor.below()
            };
            self.check_corner_change_at(updater, corner)?;
        }
        Ok(())
    }

    fn check_corner_change_at(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
    ) -> Result<(), UpdateError> {
        if !self.world.block_state(pos).is_wire() {
            return Ok(());
        }
        self.notify_around(updater, pos)?;
        for direction in Direction::ALL {
            self.notify_around(updater, pos.relative(direction))?;
        }
        Ok(())
    }

    fn can_survive(&self, pos: BlockPos) -> bool {
        let below = pos.below();
        self.world.supports_wire(below, self.world.block_state(below))
    }

    fn notify_around(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
    ) -> Result<(), UpdateError> {
        let orientation = self.initial_orientation(None, None);
        updater.update_neighbors_at(self, pos, BlockKind::WIRE, orientation)
    }
}

impl<W: World> Level for WireLevel<W> {
    fn block_state(&self, pos: BlockPos) -> BlockState {
        self.world.block_state(pos)
    }

    fn is_conductor(&self, pos: BlockPos) -> bool {
        self.world.is_conductor(pos, self.world.block_state(pos))
    }

    fn block_signal(&self, pos: BlockPos) -> u8 {
        self.world.direct_signal(pos)
    }

    fn experiments_enabled(&self) -> bool {
        self.experiments
    }

    fn random(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    fn update_limit(&self) -> u32 {
        self.update_limit
    }

    fn set_block(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
        state: BlockState,
        flags: UpdateFlags,
        recursion_left: u32,
    ) -> Result<bool, UpdateError> {
        let old = self.world.block_state(pos);
        if old == state {
            return Ok(false);
        }
        self.world.set_block_state(pos, state);
        trace!(%pos, %old, new = %state, "block set");

        let moved = flags.contains(UpdateFlags::MOVE_BY_PISTON);
        if old.is_wire() && !state.is_wire() && !moved {
            self.on_wire_removed(updater, pos, old)?;
        }
        if state.is_wire() && !old.is_wire() {
            self.on_wire_placed(updater, pos, state)?;
        }

        if flags.contains(UpdateFlags::NEIGHBORS) {
            let orientation = self.initial_orientation(None, None);
            updater.update_neighbors_at(self, pos, old.kind(), orientation)?;
        }

        if !flags.contains(UpdateFlags::KNOWN_SHAPE) && recursion_left > 0 {
            let cascade = flags.without(UpdateFlags::NEIGHBORS.with(UpdateFlags::SUPPRESS_DROPS));
            for direction in Direction::SHAPE_UPDATE_ORDER {
                updater.shape_update(
                    self,
                    ShapeUpdate {
                        direction: direction.opposite(),
                        pos: pos.relative(direction),
                        neighbor_pos: pos,
                        neighbor_state: state,
                        flags: cascade,
                        recursion_left: recursion_left - 1,
                    },
                )?;
            }
        }
        Ok(true)
    }

    fn update_shape_at(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        state: BlockState,
        update: ShapeUpdate,
    ) -> Result<(), UpdateError> {
        let reshaped = if state.is_wire() {
            // Only support is modelled for wires, not connection shapes.
            let unsupported = update.direction == Direction::Down
                && !self.world.supports_wire(update.neighbor_pos, update.neighbor_state);
            if unsupported {
                BlockState::AIR
            } else {
                state
            }
        } else {
            self.world.update_shape(
                state,
                update.direction,
                update.pos,
                update.neighbor_pos,
                update.neighbor_state,
            )
        };
        if reshaped == state {
            return Ok(());
        }
        let flags = if reshaped.is_air() {
            UpdateFlags::ALL
        } else {
            update.flags.without(UpdateFlags::SUPPRESS_DROPS)
        };
        self.set_block(updater, update.pos, reshaped, flags, update.recursion_left)?;
        Ok(())
    }

    fn neighbor_changed_at(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        state: BlockState,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
        moved_by_piston: bool,
    ) -> Result<(), UpdateError> {
        if !state.is_wire() {
            self.world
                .neighbor_changed(state, pos, source_kind, orientation, moved_by_piston)?;
            return Ok(());
        }
        if source_kind == BlockKind::WIRE && !self.evaluator.reacts_to_wire_notifications() {
            return Ok(());
        }
        if !self.can_survive(pos) {
            trace!(%pos, "unsupported wire removed");
            self.set_block(updater, pos, BlockState::AIR, UpdateFlags::ALL, self.update_limit)?;
            return Ok(());
        }
        self.evaluate(updater, pos, state, orientation, false)?;
        Ok(())
    }
}
