//! A sparse voxel world for wire tests.

use redwire_core::{BlockError, BlockKind, BlockPos, BlockState, Direction, Orientation, World};
use std::collections::HashMap;

/// A power source. Its level is its output on every side, and it
/// strongly powers adjacent [`STONE`].
pub const SOURCE: BlockKind = BlockKind(2);

/// A conductor.
pub const STONE: BlockKind = BlockKind(3);

/// A block whose neighbour reaction always fails.
pub const FAILING: BlockKind = BlockKind(4);

/// A power source, like [`SOURCE`], that breaks on any shape update.
pub const FRAGILE: BlockKind = BlockKind(5);

/// `HashMap`-backed [`World`].
///
/// Every raw write is recorded in [`writes`](GridWorld::writes), every
/// neighbour notification reaching a non-wire block in
/// [`notified`](GridWorld::notified), and every shape update reaching a
/// non-wire block, with the neighbour state it was handed, in
/// [`shaped`](GridWorld::shaped).
///
/// Everything below `y = 0` is solid ground: it reads as air and
/// conducts nothing, but wires can rest on it. Above that only
/// [`STONE`] carries a wire.
#[derive(Clone, Debug, Default)]
pub struct GridWorld {
    cells: HashMap<BlockPos, BlockState>,
    pub writes: Vec<(BlockPos, BlockState)>,
    pub notified: Vec<(BlockPos, BlockKind)>,
    pub shaped: Vec<(BlockPos, BlockState)>,
}

impl GridWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `state` without recording a write. For building layouts.
    pub fn put(&mut self, pos: BlockPos, state: BlockState) -> &mut Self {
        if state.is_air() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, state);
        }
        self
    }

    pub fn put_wire(&mut self, pos: BlockPos, power: u8) -> &mut Self {
        self.put(pos, BlockState::wire(power))
    }

    pub fn put_stone(&mut self, pos: BlockPos) -> &mut Self {
        self.put(pos, BlockState::new(STONE, 0))
    }

    pub fn put_source(&mut self, pos: BlockPos, output: u8) -> &mut Self {
        self.put(pos, BlockState::new(SOURCE, output))
    }

    /// Power of the wire at `pos`, or `None` if there is no wire.
    pub fn wire_power(&self, pos: BlockPos) -> Option<u8> {
        let state = self.block_state(pos);
        state.is_wire().then_some(state.power())
    }

    /// Every wire and its power, sorted by position.
    pub fn wire_powers(&self) -> Vec<(BlockPos, u8)> {
        let mut wires: Vec<_> = self
            .cells
            .iter()
            .filter(|(_, s)| s.is_wire())
            .map(|(p, s)| (*p, s.power()))
            .collect();
        wires.sort();
        wires
    }

    /// Forget recorded writes, notifications and shape updates.
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.notified.clear();
        self.shaped.clear();
    }

    fn strong_power_into(&self, conductor: BlockPos) -> u8 {
        Direction::ALL
            .into_iter()
            .map(|d| self.block_state(conductor.relative(d)))
            .filter(|s| is_source(*s))
            .map(|s| s.power())
            .max()
            .unwrap_or(0)
    }
}

fn is_source(state: BlockState) -> bool {
    state.is(SOURCE) || state.is(FRAGILE)
}

impl World for GridWorld {
    fn block_state(&self, pos: BlockPos) -> BlockState {
        self.cells.get(&pos).copied().unwrap_or_default()
    }

    fn set_block_state(&mut self, pos: BlockPos, state: BlockState) -> BlockState {
        self.writes.push((pos, state));
        let old = self.block_state(pos);
        self.put(pos, state);
        old
    }

    fn is_conductor(&self, _pos: BlockPos, state: BlockState) -> bool {
        state.is(STONE)
    }

    fn direct_signal(&self, pos: BlockPos) -> u8 {
        let mut best = 0;
        for d in Direction::ALL {
            let n = pos.relative(d);
            let state = self.block_state(n);
            let signal = if is_source(state) {
                state.power()
            } else if state.is(STONE) {
                self.strong_power_into(n)
            } else {
                0
            };
            best = best.max(signal);
        }
        best
    }

    fn supports_wire(&self, pos: BlockPos, state: BlockState) -> bool {
        pos.y < 0 || state.is(STONE)
    }

    fn update_shape(
        &mut self,
        state: BlockState,
        _direction: Direction,
        pos: BlockPos,
        _neighbor_pos: BlockPos,
        neighbor_state: BlockState,
    ) -> BlockState {
        self.shaped.push((pos, neighbor_state));
        if state.is(FRAGILE) {
            BlockState::AIR
        } else {
            state
        }
    }

    fn neighbor_changed(
        &mut self,
        state: BlockState,
        pos: BlockPos,
        source_kind: BlockKind,
        _orientation: Option<Orientation>,
        _moved_by_piston: bool,
    ) -> Result<(), BlockError> {
        self.notified.push((pos, source_kind));
        if state.is(FAILING) {
            return Err(BlockError::new(format!("block at {pos} refuses updates")));
        }
        Ok(())
    }
}
