//! The traits that connect schedulers, evaluators and the host world.
//!
//! Three roles:
//!
//! - [`World`] is the external collaborator: cell storage, the conductor
//!   predicate, non-wire signal sources, and whatever non-wire blocks do
//!   when poked.
//! - [`Level`] is what propagation code runs against: reads, the block
//!   mutation primitive, and the two entry points a scheduled update
//!   lands on.
//! - [`NeighborUpdater`] is the notification contract. Implementations
//!   decide *when* a requested update runs (now, or later from a queue).
//!
//! A `Level` never owns its updater. Both are passed side by side so a
//! queued updater can hand itself to the level while it drains.

use crate::direction::Direction;
use crate::error::{BlockError, UpdateError};
use crate::orientation::{Orientation, SideBias};
use crate::pos::BlockPos;
use crate::state::{BlockKind, BlockState, UpdateFlags, DEFAULT_UPDATE_LIMIT};
use rand::RngCore;

/// Cell storage and block behaviour supplied by the host.
pub trait World {
    /// Current state at `pos`. Unknown cells read as air.
    fn block_state(&self, pos: BlockPos) -> BlockState;

    /// Overwrite the state at `pos` with no side effects, returning the
    /// previous state.
    fn set_block_state(&mut self, pos: BlockPos, state: BlockState) -> BlockState;

    /// Whether `state` at `pos` conducts power without being a wire.
    fn is_conductor(&self, pos: BlockPos, state: BlockState) -> bool;

    /// Strongest signal reaching `pos` from non-wire sources.
    fn direct_signal(&self, pos: BlockPos) -> u8;

    /// Whether `state` at `pos` can carry a wire resting on top of it.
    ///
    /// Default: every block can, so wires never pop.
    fn supports_wire(&self, pos: BlockPos, state: BlockState) -> bool {
        let _ = (pos, state);
        true
    }

    /// Recompute the shape of `state` at `pos` after the neighbour at
    /// `neighbor_pos` (lying in `direction`) became `neighbor_state`.
    ///
    /// Default: shapes never change.
    fn update_shape(
        &mut self,
        state: BlockState,
        direction: Direction,
        pos: BlockPos,
        neighbor_pos: BlockPos,
        neighbor_state: BlockState,
    ) -> BlockState {
        let _ = (direction, pos, neighbor_pos, neighbor_state);
        state
    }

    /// React to a neighbour change at a non-wire block.
    ///
    /// Default: no reaction.
    fn neighbor_changed(
        &mut self,
        state: BlockState,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
        moved_by_piston: bool,
    ) -> Result<(), BlockError> {
        let _ = (state, pos, source_kind, orientation, moved_by_piston);
        Ok(())
    }
}

/// One request to re-shape the block at `pos`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeUpdate {
    /// Side of `pos` the change came from.
    pub direction: Direction,
    /// Block to re-shape.
    pub pos: BlockPos,
    /// The neighbour that changed.
    pub neighbor_pos: BlockPos,
    /// The neighbour's new state.
    pub neighbor_state: BlockState,
    /// Flags to use if the re-shape writes.
    pub flags: UpdateFlags,
    /// Remaining cascade budget.
    pub recursion_left: u32,
}

/// The world as seen by schedulers and evaluators.
pub trait Level {
    /// Current state at `pos`.
    fn block_state(&self, pos: BlockPos) -> BlockState;

    /// Whether the block at `pos` is a conductor.
    fn is_conductor(&self, pos: BlockPos) -> bool;

    /// Strongest non-wire signal reaching `pos`.
    fn block_signal(&self, pos: BlockPos) -> u8;

    /// Whether orientation tracking (and the incremental evaluator) is on.
    fn experiments_enabled(&self) -> bool;

    /// Randomness for orientation seeding.
    fn random(&mut self) -> &mut dyn RngCore;

    /// Recursion budget for writes that start a fresh cascade.
    fn update_limit(&self) -> u32 {
        DEFAULT_UPDATE_LIMIT
    }

    /// Write `state` at `pos` and run the side effects `flags` ask for.
    ///
    /// Returns `Ok(false)` if the cell already held `state`.
    fn set_block(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
        state: BlockState,
        flags: UpdateFlags,
        recursion_left: u32,
    ) -> Result<bool, UpdateError>;

    /// Re-shape `state` at `update.pos`, writing the result if it changed.
    fn update_shape_at(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        state: BlockState,
        update: ShapeUpdate,
    ) -> Result<(), UpdateError>;

    /// Let the block at `pos` react to a change caused by `source_kind`.
    fn neighbor_changed_at(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        state: BlockState,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
        moved_by_piston: bool,
    ) -> Result<(), UpdateError>;

    /// Starting frame for a fresh propagation, or `None` when
    /// orientation tracking is off.
    ///
    /// Picks a random frame with left bias, then applies `up` and
    /// `front` if given.
    fn initial_orientation(
        &mut self,
        up: Option<Direction>,
        front: Option<Direction>,
    ) -> Option<Orientation> {
        if !self.experiments_enabled() {
            return None;
        }
        let mut orientation = Orientation::random(self.random()).with_side_bias(SideBias::Left);
        if let Some(up) = up {
            orientation = orientation.with_up(up);
        }
        if let Some(front) = front {
            orientation = orientation.with_front(front);
        }
        Some(orientation)
    }
}

/// Cumulative scheduler counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdaterStats {
    /// Atomic update steps executed.
    pub executed_steps: u64,
    /// Requests dropped because the chain cap was reached.
    pub dropped: u64,
    /// Transactions that hit the chain cap.
    pub overflow_warnings: u64,
    /// First dropped position of the most recent capped transaction.
    pub last_overflow: Option<BlockPos>,
}

/// The update-notification contract.
///
/// Every method asks the world to react to a change. Implementations
/// choose whether the reaction runs inside the call or later.
pub trait NeighborUpdater {
    /// Ask the block at `update.pos` to recompute its shape.
    fn shape_update(&mut self, level: &mut dyn Level, update: ShapeUpdate) -> Result<(), UpdateError>;

    /// Notify the block at `pos`, reading its state when the update runs.
    fn neighbor_changed(
        &mut self,
        level: &mut dyn Level,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
    ) -> Result<(), UpdateError>;

    /// Notify the block at `pos` whose state the caller already knows.
    fn neighbor_changed_with_state(
        &mut self,
        level: &mut dyn Level,
        state: BlockState,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
        moved_by_piston: bool,
    ) -> Result<(), UpdateError>;

    /// Notify the six neighbours of `pos` in [`Direction::UPDATE_ORDER`],
    /// skipping `except` if given.
    fn update_neighbors_at_except_from_facing(
        &mut self,
        level: &mut dyn Level,
        pos: BlockPos,
        source_kind: BlockKind,
        except: Option<Direction>,
        orientation: Option<Orientation>,
    ) -> Result<(), UpdateError> {
        for direction in Direction::UPDATE_ORDER {
            if Some(direction) == except {
                continue;
            }
            self.neighbor_changed(
                level,
                pos.relative(direction),
                source_kind,
                orientation.map(|o| o.with_front(direction)),
            )?;
        }
        Ok(())
    }

    /// Notify all six neighbours of `pos`.
    fn update_neighbors_at(
        &mut self,
        level: &mut dyn Level,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
    ) -> Result<(), UpdateError> {
        self.update_neighbors_at_except_from_facing(level, pos, source_kind, None, orientation)
    }

    /// Counters since construction.
    fn stats(&self) -> UpdaterStats {
        UpdaterStats::default()
    }
}

/// Run one shape update against the level.
///
/// Skipped when `update.flags` carries
/// [`UpdateFlags::SKIP_SHAPE_UPDATE_ON_WIRE`] and the target is a wire.
pub fn execute_shape_update(
    level: &mut dyn Level,
    updater: &mut dyn NeighborUpdater,
    update: ShapeUpdate,
) -> Result<(), UpdateError> {
    let state = level.block_state(update.pos);
    if update.flags.contains(UpdateFlags::SKIP_SHAPE_UPDATE_ON_WIRE) && state.is_wire() {
        return Ok(());
    }
    level
        .update_shape_at(updater, state, update)
        .map_err(|e| e.in_shape_update(update.pos, update.direction))
}

/// Run one neighbour update against the level.
///
/// A failure is reported with the source kind, position and state of the
/// block that was being updated.
pub fn execute_neighbor_update(
    level: &mut dyn Level,
    updater: &mut dyn NeighborUpdater,
    state: BlockState,
    pos: BlockPos,
    source_kind: BlockKind,
    orientation: Option<Orientation>,
    moved_by_piston: bool,
) -> Result<(), UpdateError> {
    level
        .neighbor_changed_at(updater, state, pos, source_kind, orientation, moved_by_piston)
        .map_err(|e| e.in_neighbor_update(source_kind, pos, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    /// Records every landing; knows one wire.
    struct Probe {
        rng: ChaCha8Rng,
        experiments: bool,
        cells: HashMap<BlockPos, BlockState>,
        shapes: Vec<BlockPos>,
        fail: bool,
    }

    impl Probe {
        fn new(experiments: bool) -> Self {
            Self {
                rng: ChaCha8Rng::seed_from_u64(1),
                experiments,
                cells: HashMap::new(),
                shapes: Vec::new(),
                fail: false,
            }
        }
    }

    impl Level for Probe {
        fn block_state(&self, pos: BlockPos) -> BlockState {
            self.cells.get(&pos).copied().unwrap_or_default()
        }
        fn is_conductor(&self, _pos: BlockPos) -> bool {
            false
        }
        fn block_signal(&self, _pos: BlockPos) -> u8 {
            0
        }
        fn experiments_enabled(&self) -> bool {
            self.experiments
        }
        fn random(&mut self) -> &mut dyn RngCore {
            &mut self.rng
        }
        fn set_block(
            &mut self,
            _updater: &mut dyn NeighborUpdater,
            pos: BlockPos,
            state: BlockState,
            _flags: UpdateFlags,
            _recursion_left: u32,
        ) -> Result<bool, UpdateError> {
            Ok(self.cells.insert(pos, state) != Some(state))
        }
        fn update_shape_at(
            &mut self,
            _updater: &mut dyn NeighborUpdater,
            _state: BlockState,
            update: ShapeUpdate,
        ) -> Result<(), UpdateError> {
            self.shapes.push(update.pos);
            if self.fail {
                return Err(BlockError::new("shape refused").into());
            }
            Ok(())
        }
        fn neighbor_changed_at(
            &mut self,
            _updater: &mut dyn NeighborUpdater,
            _state: BlockState,
            _pos: BlockPos,
            _source_kind: BlockKind,
            _orientation: Option<Orientation>,
            _moved_by_piston: bool,
        ) -> Result<(), UpdateError> {
            if self.fail {
                return Err(BlockError::new("neighbour refused").into());
            }
            Ok(())
        }
    }

    /// Logs the order of notifications without running them.
    #[derive(Default)]
    struct Log(Vec<(BlockPos, Option<Orientation>)>);

    impl NeighborUpdater for Log {
        fn shape_update(&mut self, _level: &mut dyn Level, _update: ShapeUpdate) -> Result<(), UpdateError> {
            Ok(())
        }
        fn neighbor_changed(
            &mut self,
            _level: &mut dyn Level,
            pos: BlockPos,
            _source_kind: BlockKind,
            orientation: Option<Orientation>,
        ) -> Result<(), UpdateError> {
            self.0.push((pos, orientation));
            Ok(())
        }
        fn neighbor_changed_with_state(
            &mut self,
            _level: &mut dyn Level,
            _state: BlockState,
            pos: BlockPos,
            _source_kind: BlockKind,
            orientation: Option<Orientation>,
            _moved_by_piston: bool,
        ) -> Result<(), UpdateError> {
            self.0.push((pos, orientation));
            Ok(())
        }
    }

    fn shape_at(pos: BlockPos, flags: UpdateFlags) -> ShapeUpdate {
        ShapeUpdate {
            direction: Direction::Down,
            pos,
            neighbor_pos: pos.below(),
            neighbor_state: BlockState::AIR,
            flags,
            recursion_left: 4,
        }
    }

    #[test]
    fn default_fan_out_follows_update_order_and_skips_facing() {
        let mut level = Probe::new(false);
        let mut log = Log::default();
        let origin = BlockPos::ORIGIN;
        log.update_neighbors_at_except_from_facing(
            &mut level,
            origin,
            BlockKind::WIRE,
            Some(Direction::Down),
            None,
        )
        .unwrap();
        let visited: Vec<_> = log.0.iter().map(|(p, _)| *p).collect();
        assert_eq!(
            visited,
            vec![
                origin.relative(Direction::West),
                origin.relative(Direction::East),
                origin.relative(Direction::Up),
                origin.relative(Direction::North),
                origin.relative(Direction::South),
            ]
        );
    }

    #[test]
    fn fan_out_rotates_orientation_towards_each_neighbour() {
        let mut level = Probe::new(true);
        let mut log = Log::default();
        let o = Orientation::of(Direction::Up, Direction::North, SideBias::Left);
        log.update_neighbors_at(&mut level, BlockPos::ORIGIN, BlockKind::WIRE, Some(o))
            .unwrap();
        assert_eq!(log.0.len(), 6);
        for ((pos, orientation), direction) in log.0.iter().zip(Direction::UPDATE_ORDER) {
            assert_eq!(*pos, BlockPos::ORIGIN.relative(direction));
            assert_eq!(orientation.map(|o| o.front()), Some(direction));
        }
    }

    #[test]
    fn initial_orientation_is_none_without_experiments() {
        let mut level = Probe::new(false);
        assert_eq!(level.initial_orientation(Some(Direction::Up), None), None);
    }

    #[test]
    fn initial_orientation_applies_up_then_front() {
        let mut level = Probe::new(true);
        for _ in 0..32 {
            let o = level
                .initial_orientation(Some(Direction::Up), Some(Direction::East))
                .unwrap();
            assert_eq!(o.up(), Direction::Up);
            assert_eq!(o.front(), Direction::East);
            assert_eq!(o.side_bias(), SideBias::Left);
        }
    }

    #[test]
    fn shape_update_skips_flagged_wire_targets_only() {
        let mut level = Probe::new(false);
        let mut log = Log::default();
        let wire = BlockPos::new(0, 0, 0);
        let stone = BlockPos::new(1, 0, 0);
        level.cells.insert(wire, BlockState::wire(3));
        level.cells.insert(stone, BlockState::new(BlockKind(7), 0));

        let skip = UpdateFlags::CLIENTS | UpdateFlags::SKIP_SHAPE_UPDATE_ON_WIRE;
        execute_shape_update(&mut level, &mut log, shape_at(wire, skip)).unwrap();
        execute_shape_update(&mut level, &mut log, shape_at(stone, skip)).unwrap();
        execute_shape_update(&mut level, &mut log, shape_at(wire, UpdateFlags::CLIENTS)).unwrap();
        assert_eq!(level.shapes, vec![stone, wire]);
    }

    #[test]
    fn failures_carry_update_context() {
        let mut level = Probe::new(false);
        level.fail = true;
        let mut log = Log::default();
        let pos = BlockPos::new(4, 5, 6);

        let err = execute_shape_update(&mut level, &mut log, shape_at(pos, UpdateFlags::NONE)).unwrap_err();
        assert!(matches!(err, UpdateError::ShapeUpdateFailed { pos: p, .. } if p == pos));

        let err = execute_neighbor_update(
            &mut level,
            &mut log,
            BlockState::wire(2),
            pos,
            BlockKind(9),
            None,
            false,
        )
        .unwrap_err();
        match err {
            UpdateError::NeighborUpdateFailed {
                source_kind,
                pos: p,
                state,
                ..
            } => {
                assert_eq!(source_kind, BlockKind(9));
                assert_eq!(p, pos);
                assert_eq!(state, BlockState::wire(2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
