//! A scripted level for scheduler tests.
//!
//! [`ChainLevel`] holds no wires. Each position can be given a list of
//! [`Reaction`]s that it issues through the updater whenever it is
//! notified, which is enough to build chains, fan-outs and layered
//! graphs of arbitrary shape.

use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use redwire_core::{
    BlockError, BlockKind, BlockPos, BlockState, Direction, Level, NeighborUpdater,
    Orientation, ShapeUpdate, UpdateError, UpdateFlags,
};
use std::collections::{HashMap, HashSet};

/// Kind threaded through notifications issued by reactions.
pub const CHAIN: BlockKind = BlockKind(10);

/// What a notified position does next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    /// `neighbor_changed` at the target.
    Notify(BlockPos),
    /// `neighbor_changed_with_state` at the target.
    NotifyWithState(BlockPos),
    /// `update_neighbors_at` around the target.
    FanOut(BlockPos),
    /// `shape_update` of the target, coming from below.
    Reshape(BlockPos),
}

/// One executed update, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Landing {
    Shape {
        pos: BlockPos,
        direction: Direction,
    },
    Neighbor {
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
    },
}

impl Landing {
    pub fn pos(&self) -> BlockPos {
        match *self {
            Landing::Shape { pos, .. } | Landing::Neighbor { pos, .. } => pos,
        }
    }
}

/// Scripted [`Level`].
#[derive(Clone)]
pub struct ChainLevel {
    cells: HashMap<BlockPos, BlockState>,
    reactions: HashMap<BlockPos, Vec<Reaction>>,
    fail_at: HashSet<BlockPos>,
    panic_at: HashSet<BlockPos>,
    experiments: bool,
    rng: ChaCha8Rng,
    depth: usize,
    max_depth: usize,
    pub landings: Vec<Landing>,
}

impl ChainLevel {
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
            reactions: HashMap::new(),
            fail_at: HashSet::new(),
            panic_at: HashSet::new(),
            experiments: false,
            rng: ChaCha8Rng::seed_from_u64(0),
            depth: 0,
            max_depth: 0,
            landings: Vec::new(),
        }
    }

    /// Turn orientation tracking on, seeding the level's rng.
    pub fn with_experiments(mut self, seed: u64) -> Self {
        self.experiments = true;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// When `at` is notified, issue `reaction`.
    pub fn react(mut self, at: BlockPos, reaction: Reaction) -> Self {
        self.reactions.entry(at).or_default().push(reaction);
        self
    }

    /// A straight eastward chain: notifying `start` notifies the next
    /// cell, and so on for `links` hops.
    pub fn chain(mut self, start: BlockPos, links: usize) -> Self {
        let mut pos = start;
        for _ in 0..links {
            let next = pos.relative(Direction::East);
            self = self.react(pos, Reaction::Notify(next));
            pos = next;
        }
        self
    }

    /// Notifications landing at `pos` return an error.
    pub fn fail_at(mut self, pos: BlockPos) -> Self {
        self.fail_at.insert(pos);
        self
    }

    /// Notifications landing at `pos` panic.
    pub fn panic_at(mut self, pos: BlockPos) -> Self {
        self.panic_at.insert(pos);
        self
    }

    /// Positions of every landing, in order.
    pub fn landed_positions(&self) -> Vec<BlockPos> {
        self.landings.iter().map(Landing::pos).collect()
    }

    /// Deepest nesting of landings seen so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn land(&mut self, landing: Landing) -> Result<(), UpdateError> {
        let pos = landing.pos();
        self.landings.push(landing);
        if self.panic_at.contains(&pos) {
            panic!("scripted panic at {pos}");
        }
        if self.fail_at.contains(&pos) {
            return Err(BlockError::new(format!("scripted failure at {pos}")).into());
        }
        Ok(())
    }

    fn react_from(&mut self, updater: &mut dyn NeighborUpdater, pos: BlockPos) -> Result<(), UpdateError> {
        let reactions = self.reactions.get(&pos).cloned().unwrap_or_default();
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        let mut result = Ok(());
        for reaction in reactions {
            result = match reaction {
                Reaction::Notify(target) => updater.neighbor_changed(self, target, CHAIN, None),
                Reaction::NotifyWithState(target) => {
                    let state = self.block_state(target);
                    updater.neighbor_changed_with_state(self, state, target, CHAIN, None, false)
                }
                Reaction::FanOut(target) => updater.update_neighbors_at(self, target, CHAIN, None),
                Reaction::Reshape(target) => updater.shape_update(
                    self,
                    ShapeUpdate {
                        direction: Direction::Down,
                        pos: target,
                        neighbor_pos: target.below(),
                        neighbor_state: BlockState::AIR,
                        flags: UpdateFlags::ALL,
                        recursion_left: 1,
                    },
                ),
            };
            if result.is_err() {
                break;
            }
        }
        self.depth -= 1;
        result
    }
}

impl Default for ChainLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl Level for ChainLevel {
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
        updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
        state: BlockState,
        flags: UpdateFlags,
        _recursion_left: u32,
    ) -> Result<bool, UpdateError> {
        if self.cells.insert(pos, state) == Some(state) {
            return Ok(false);
        }
        if flags.contains(UpdateFlags::NEIGHBORS) {
            updater.update_neighbors_at(self, pos, state.kind(), None)?;
        }
        Ok(true)
    }

    fn update_shape_at(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        _state: BlockState,
        update: ShapeUpdate,
    ) -> Result<(), UpdateError> {
        self.land(Landing::Shape {
            pos: update.pos,
            direction: update.direction,
        })?;
        self.react_from(updater, update.pos)
    }

    fn neighbor_changed_at(
        &mut self,
        updater: &mut dyn NeighborUpdater,
        _state: BlockState,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
        _moved_by_piston: bool,
    ) -> Result<(), UpdateError> {
        self.land(Landing::Neighbor {
            pos,
            source_kind,
            orientation,
        })?;
        self.react_from(updater, pos)
    }
}
