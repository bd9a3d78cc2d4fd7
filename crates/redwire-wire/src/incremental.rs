//! The incremental wave evaluator.
//!
//! One call settles every wire the change can reach:
//!
//! 1. Seed. A wire at the trigger position is tracked at its current
//!    power and queued for turn-off; anything else pushes a zero-power
//!    change at its neighbours.
//! 2. Turn-off wave. Each popped wire drops to 0 if its neighbours can no
//!    longer hold it at its tracked power, otherwise takes the power they
//!    supply. Drops spread to neighbours that might have depended on it.
//! 3. Turn-on wave. Each popped wire rises to the best power available.
//!    It may never fall here.
//! 4. Write-back of every tracked wire whose power differs from the
//!    world, then notifications along each wire's recorded orientation.
//!
//! Tracked cells live in an insertion-ordered map from position to
//! `orientation index << 4 | power`.

use crate::signal::SignalReader;
use crate::{EvaluationReport, EvaluatorKind, WireEvaluator};
use indexmap::IndexMap;
use redwire_core::{
    BlockKind, BlockPos, BlockState, Direction, Level, NeighborUpdater, Orientation, SideBias, UpdateError,
    UpdateFlags,
};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// Settles the affected region in two waves.
///
/// Stateless: each call builds and drops its own [`Wave`], so nested
/// calls through the scheduler never share bookkeeping.
#[derive(Clone, Copy, Debug, Default)]
pub struct IncrementalWireEvaluator;

fn pack(orientation: Orientation, power: u8) -> u16 {
    ((orientation.index() as u16) << 4) | u16::from(power & 0xF)
}

fn unpack_power(packed: u16) -> u8 {
    (packed & 0xF) as u8
}

fn unpack_orientation(packed: u16) -> Orientation {
    Orientation::from_index(usize::from(packed >> 4)).expect("packed index was taken from an orientation")
}

/// FIFO that holds each position at most once.
#[derive(Debug, Default)]
struct UniqueQueue {
    order: VecDeque<BlockPos>,
    members: HashSet<BlockPos>,
}

impl UniqueQueue {
    fn push(&mut self, pos: BlockPos) {
        if self.members.insert(pos) {
            self.order.push_back(pos);
        }
    }

    fn pop(&mut self) -> Option<BlockPos> {
        let pos = self.order.pop_front()?;
        self.members.remove(&pos);
        Some(pos)
    }

    fn contains(&self, pos: BlockPos) -> bool {
        self.members.contains(&pos)
    }
}

/// Per-call bookkeeping.
#[derive(Debug, Default)]
pub(crate) struct Wave {
    tracked: IndexMap<BlockPos, u16>,
    to_turn_off: UniqueQueue,
    to_turn_on: UniqueQueue,
    turn_off_visits: usize,
    turn_on_visits: usize,
}

impl SignalReader for Wave {
    fn wire_signal(&self, pos: BlockPos, state: BlockState) -> u8 {
        match self.tracked.get(&pos) {
            Some(&packed) => unpack_power(packed),
            None if state.is_wire() => state.power(),
            None => 0,
        }
    }
}

impl Wave {
    /// Track `pos` at `power`, keeping its orientation if already tracked.
    fn set_power(&mut self, pos: BlockPos, power: u8, default_orientation: Orientation) {
        let entry = self.tracked.entry(pos).or_insert(pack(default_orientation, power));
        *entry = pack(unpack_orientation(*entry), power);
    }

    fn tracked(&self, pos: BlockPos) -> (Orientation, u8) {
        let packed = self.tracked[&pos];
        (unpack_orientation(packed), unpack_power(packed))
    }

    /// Run seed, turn-off and turn-on for a change at `pos`.
    pub(crate) fn calculate(level: &dyn Level, pos: BlockPos, orientation: Orientation) -> Result<Self, UpdateError> {
        let mut wave = Wave::default();
        let state = level.block_state(pos);
        if state.is_wire() {
            wave.set_power(pos, state.power(), orientation);
            wave.to_turn_off.push(pos);
        } else {
            wave.propagate(level, pos, 0, orientation, true);
        }
        wave.turn_off(level);
        wave.turn_on(level)?;
        Ok(wave)
    }

    fn turn_off(&mut self, level: &dyn Level) {
        while let Some(pos) = self.to_turn_off.pop() {
            self.turn_off_visits += 1;
            let (orientation, power) = self.tracked(pos);
            let block = self.block_signal(level, pos);
            let best = block.max(self.incoming_wire_signal(level, pos));
            let new_power = if best < power {
                if block > 0 && !self.to_turn_on.contains(pos) {
                    self.to_turn_on.push(pos);
                }
                0
            } else {
                best
            };
            if new_power != power {
                self.set_power(pos, new_power, orientation);
            }
            trace!(%pos, from = power, to = new_power, "turn-off step");
            self.propagate(level, pos, new_power, orientation, power > best);
        }
    }

    fn turn_on(&mut self, level: &dyn Level) -> Result<(), UpdateError> {
        while let Some(pos) = self.to_turn_on.pop() {
            self.turn_on_visits += 1;
            let (orientation, power) = self.tracked(pos);
            let best = self.block_signal(level, pos).max(self.incoming_wire_signal(level, pos));
            if best > power {
                self.set_power(pos, best, orientation);
            } else if best < power {
                return Err(UpdateError::InvariantViolation {
                    pos,
                    reason: format!("turn-on wave would lower power from {power} to {best}"),
                });
            }
            trace!(%pos, from = power, to = best, "turn-on step");
            self.propagate(level, pos, best, orientation, false);
        }
        Ok(())
    }

    /// Offer `power` from `pos` to every wire it can reach in one step.
    fn propagate(&mut self, level: &dyn Level, pos: BlockPos, power: u8, orientation: Orientation, can_turn_off: bool) {
        for &direction in orientation.horizontal_directions() {
            self.enqueue(level, pos.relative(direction), power, orientation.with_front(direction), can_turn_off);
        }
        for &vertical in orientation.vertical_directions() {
            let column = pos.relative(vertical);
            let column_conducts = level.is_conductor(column);
            for &direction in orientation.horizontal_directions() {
                // Mirrors `incoming_wire_signal`: a wire below only reads
                // this one back through the conductor it stands on.
                let reaches = match vertical {
                    Direction::Up => !column_conducts,
                    _ => column_conducts && !level.is_conductor(pos.relative(direction)),
                };
                if reaches {
                    self.enqueue(
                        level,
                        column.relative(direction),
                        power,
                        orientation.with_front(direction),
                        can_turn_off,
                    );
                }
            }
        }
    }

    fn enqueue(&mut self, level: &dyn Level, pos: BlockPos, power: u8, orientation: Orientation, can_turn_off: bool) {
        let state = level.block_state(pos);
        if !state.is_wire() {
            return;
        }
        let signal = self.wire_signal(pos, state);
        if i16::from(signal) < i16::from(power) - 1 && !self.to_turn_on.contains(pos) {
            self.to_turn_on.push(pos);
            self.set_power(pos, signal, orientation);
        }
        if can_turn_off && signal > power && !self.to_turn_off.contains(pos) {
            self.to_turn_off.push(pos);
            self.set_power(pos, signal, orientation);
        }
    }

    /// Tracked positions with their recorded frames, in insertion order.
    #[cfg(test)]
    pub(crate) fn frames(&self) -> Vec<(BlockPos, Orientation, u8)> {
        self.tracked
            .iter()
            .map(|(p, packed)| (*p, unpack_orientation(*packed), unpack_power(*packed)))
            .collect()
    }
}

/// Directions a wire delivers notifications along.
fn is_connected(direction: Direction) -> bool {
    direction != Direction::Up
}

impl IncrementalWireEvaluator {
    fn normalize(level: &mut dyn Level, orientation: Option<Orientation>) -> Orientation {
        let base = match orientation {
            Some(o) => o,
            None => Orientation::random(level.random()),
        };
        base.with_up(Direction::Up).with_side_bias(SideBias::Left)
    }

    fn cause_neighbor_updates(
        level: &mut dyn Level,
        updater: &mut dyn NeighborUpdater,
        tracked: &IndexMap<BlockPos, u16>,
    ) -> Result<(), UpdateError> {
        for (&pos, &packed) in tracked {
            let orientation = unpack_orientation(packed);
            for &direction in orientation.directions() {
                if !is_connected(direction) {
                    continue;
                }
                let neighbor = pos.relative(direction);
                let neighbor_state = level.block_state(neighbor);
                let toward = orientation.with_front_preserve_up(direction);
                updater.neighbor_changed_with_state(
                    level,
                    neighbor_state,
                    neighbor,
                    BlockKind::WIRE,
                    Some(toward),
                    false,
                )?;
                if level.is_conductor(neighbor) {
                    for &next in toward.directions().iter().filter(|d| **d != direction.opposite()) {
                        updater.neighbor_changed(
                            level,
                            neighbor.relative(next),
                            BlockKind::WIRE,
                            Some(toward.with_front_preserve_up(next)),
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl WireEvaluator for IncrementalWireEvaluator {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Incremental
    }

    fn reacts_to_wire_notifications(&self) -> bool {
        false
    }

    fn update_power_strength(
        &self,
        level: &mut dyn Level,
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
        _state: BlockState,
        orientation: Option<Orientation>,
        update_shape: bool,
    ) -> Result<EvaluationReport, UpdateError> {
        let orientation = Self::normalize(level, orientation);
        let Wave {
            mut tracked,
            turn_off_visits,
            turn_on_visits,
            ..
        } = Wave::calculate(level, pos, orientation)?;

        let mut writes = 0;
        let limit = level.update_limit();
        let mut first = true;
        let mut retained: IndexMap<BlockPos, u16> = IndexMap::with_capacity(tracked.len());
        for (wire_pos, packed) in tracked.drain(..) {
            let live = level.block_state(wire_pos);
            let power = unpack_power(packed);
            if live.is_wire() && live.power() != power {
                let mut flags = UpdateFlags::CLIENTS;
                if !update_shape || !first {
                    flags = flags | UpdateFlags::SKIP_SHAPE_UPDATE_ON_WIRE;
                }
                level.set_block(updater, wire_pos, live.with_power(power), flags, limit)?;
                writes += 1;
                retained.insert(wire_pos, packed);
            }
            first = false;
        }

        debug!(
            %pos,
            turn_off_visits,
            turn_on_visits,
            writes,
            "incremental wave settled"
        );
        Self::cause_neighbor_updates(level, updater, &retained)?;
        Ok(EvaluationReport {
            turn_off_visits,
            turn_on_visits,
            writes,
        })
    }
}
