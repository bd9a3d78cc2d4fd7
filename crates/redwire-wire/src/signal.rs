//! Signal-reading primitives shared by both evaluators.

use redwire_core::{BlockPos, BlockState, Direction, Level};

/// How an evaluator reads power out of the level.
///
/// All methods have the plain-world behaviour as their default. An
/// evaluator that keeps its own view of wire powers overrides
/// [`wire_signal`](SignalReader::wire_signal) and the other two follow.
pub trait SignalReader {
    /// Strongest signal at `pos` from non-wire sources.
    fn block_signal(&self, level: &dyn Level, pos: BlockPos) -> u8 {
        level.block_signal(pos)
    }

    /// Power of `state` at `pos` if it is a wire, else 0.
    fn wire_signal(&self, pos: BlockPos, state: BlockState) -> u8 {
        let _ = pos;
        if state.is_wire() {
            state.power()
        } else {
            0
        }
    }

    /// Best power a wire at `pos` receives from neighbouring wires, after
    /// one step of decay.
    ///
    /// Looks at the four horizontal neighbours. Through a conductor
    /// neighbour it also reads the wire on top of it, unless the block
    /// above `pos` is a conductor too; past a non-conductor it reads the
    /// wire one step down.
    fn incoming_wire_signal(&self, level: &dyn Level, pos: BlockPos) -> u8 {
        let mut best = 0;
        let above_conducts = level.is_conductor(pos.above());
        for direction in Direction::HORIZONTAL {
            let neighbor = pos.relative(direction);
            best = best.max(self.wire_signal(neighbor, level.block_state(neighbor)));
            let diagonal = if level.is_conductor(neighbor) {
                (!above_conducts).then(|| neighbor.above())
            } else {
                Some(neighbor.below())
            };
            if let Some(diagonal) = diagonal {
                best = best.max(self.wire_signal(diagonal, level.block_state(diagonal)));
            }
        }
        best.saturating_sub(1)
    }

    /// Power a wire at `pos` should settle at, given current readings.
    fn target_strength(&self, level: &dyn Level, pos: BlockPos) -> u8 {
        let block = self.block_signal(level, pos);
        if block >= redwire_core::MAX_POWER {
            return block;
        }
        block.max(self.incoming_wire_signal(level, pos))
    }
}

/// The plain-world reader.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorldSignals;

impl SignalReader for WorldSignals {}

#[cfg(test)]
mod tests {
    use super::*;
    use redwire_test_utils::{GridLevel, GridWorld};

    fn level(build: impl FnOnce(&mut GridWorld)) -> GridLevel {
        let mut world = GridWorld::new();
        build(&mut world);
        GridLevel::new(world)
    }

    #[test]
    fn wire_signal_ignores_other_kinds() {
        let r = WorldSignals;
        assert_eq!(r.wire_signal(BlockPos::ORIGIN, BlockState::wire(9)), 9);
        assert_eq!(r.wire_signal(BlockPos::ORIGIN, BlockState::AIR), 0);
    }

    #[test]
    fn incoming_decays_by_one() {
        let pos = BlockPos::ORIGIN;
        let l = level(|w| {
            w.put_wire(pos.relative(Direction::North), 7)
                .put_wire(pos.relative(Direction::East), 12);
        });
        assert_eq!(WorldSignals.incoming_wire_signal(&l, pos), 11);
    }

    #[test]
    fn incoming_never_underflows() {
        let l = level(|_| {});
        assert_eq!(WorldSignals.incoming_wire_signal(&l, BlockPos::ORIGIN), 0);
    }

    #[test]
    fn incoming_steps_up_onto_conductor() {
        let pos = BlockPos::ORIGIN;
        let east = pos.relative(Direction::East);
        let l = level(|w| {
            w.put_stone(east).put_wire(east.above(), 10);
        });
        assert_eq!(WorldSignals.incoming_wire_signal(&l, pos), 9);
    }

    #[test]
    fn conductor_overhead_blocks_the_step_up() {
        let pos = BlockPos::ORIGIN;
        let east = pos.relative(Direction::East);
        let l = level(|w| {
            w.put_stone(east).put_wire(east.above(), 10).put_stone(pos.above());
        });
        assert_eq!(WorldSignals.incoming_wire_signal(&l, pos), 0);
    }

    #[test]
    fn incoming_steps_down_past_non_conductor() {
        let pos = BlockPos::new(0, 1, 0);
        let west = pos.relative(Direction::West);
        let l = level(|w| {
            w.put_wire(west.below(), 6);
        });
        assert_eq!(WorldSignals.incoming_wire_signal(&l, pos), 5);
    }

    #[test]
    fn full_block_signal_skips_wire_reading() {
        let pos = BlockPos::ORIGIN;
        let l = level(|w| {
            w.put_source(pos.relative(Direction::West), 15)
                .put_wire(pos.relative(Direction::East), 3);
        });
        assert_eq!(WorldSignals.target_strength(&l, pos), 15);
    }
}
