//! A bare [`Level`] over a [`GridWorld`].
//!
//! Writes go straight to the world with no lifecycle hooks and no shape
//! cascade; notifications are only recorded. Enough to exercise a single
//! evaluator call in isolation.

use crate::grid::GridWorld;
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use redwire_core::{
    BlockKind, BlockPos, BlockState, Level, NeighborUpdater, Orientation, ShapeUpdate, UpdateError,
    UpdateFlags, World,
};

/// A write made through [`Level::set_block`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlaggedWrite {
    pub pos: BlockPos,
    pub state: BlockState,
    pub flags: UpdateFlags,
}

pub struct GridLevel {
    pub world: GridWorld,
    pub set_blocks: Vec<FlaggedWrite>,
    pub notifications: Vec<(BlockPos, BlockKind, Option<Orientation>)>,
    experiments: bool,
    rng: ChaCha8Rng,
}

impl GridLevel {
    pub fn new(world: GridWorld) -> Self {
        Self {
            world,
            set_blocks: Vec::new(),
            notifications: Vec::new(),
            experiments: false,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    pub fn with_experiments(mut self, seed: u64) -> Self {
        self.experiments = true;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn clear_log(&mut self) {
        self.set_blocks.clear();
        self.notifications.clear();
        self.world.clear_log();
    }
}

impl Level for GridLevel {
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

    fn set_block(
        &mut self,
        _updater: &mut dyn NeighborUpdater,
        pos: BlockPos,
        state: BlockState,
        flags: UpdateFlags,
        _recursion_left: u32,
    ) -> Result<bool, UpdateError> {
        if self.world.block_state(pos) == state {
            return Ok(false);
        }
        self.world.set_block_state(pos, state);
        self.set_blocks.push(FlaggedWrite { pos, state, flags });
        Ok(true)
    }

    fn update_shape_at(
        &mut self,
        _updater: &mut dyn NeighborUpdater,
        _state: BlockState,
        _update: ShapeUpdate,
    ) -> Result<(), UpdateError> {
        Ok(())
    }

    fn neighbor_changed_at(
        &mut self,
        _updater: &mut dyn NeighborUpdater,
        _state: BlockState,
        pos: BlockPos,
        source_kind: BlockKind,
        orientation: Option<Orientation>,
        _moved_by_piston: bool,
    ) -> Result<(), UpdateError> {
        self.notifications.push((pos, source_kind, orientation));
        Ok(())
    }
}
