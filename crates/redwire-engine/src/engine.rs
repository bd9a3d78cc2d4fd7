//! The engine facade.

use crate::config::{ConfigError, EngineConfig};
use crate::level::WireLevel;
use crate::metrics::EngineMetrics;
use redwire_core::{BlockKind, BlockPos, BlockState, Level, NeighborUpdater, UpdateError, UpdateFlags, World};
use tracing::debug;

/// A wire world with its scheduler and evaluator fixed at construction.
///
/// Every mutating call is one transaction: it returns once the change
/// and everything it set off have settled, or the first failure.
///
/// ```
/// use redwire_core::{BlockPos, BlockState, Direction, World};
/// use redwire_engine::{Engine, EngineConfig};
/// # use redwire_core::BlockKind;
/// # #[derive(Default)]
/// # struct Flat(std::collections::HashMap<BlockPos, BlockState>);
/// # impl World for Flat {
/// #     fn block_state(&self, pos: BlockPos) -> BlockState {
/// #         self.0.get(&pos).copied().unwrap_or_default()
/// #     }
/// #     fn set_block_state(&mut self, pos: BlockPos, state: BlockState) -> BlockState {
/// #         self.0.insert(pos, state).unwrap_or_default()
/// #     }
/// #     fn is_conductor(&self, _: BlockPos, _: BlockState) -> bool { false }
/// #     fn direct_signal(&self, pos: BlockPos) -> u8 {
/// #         Direction::ALL.iter()
/// #             .map(|d| self.block_state(pos.relative(*d)))
/// #             .filter(|s| s.is(BlockKind(2)))
/// #             .map(|s| s.power()).max().unwrap_or(0)
/// #     }
/// # }
///
/// let mut engine = Engine::new(Flat::default(), EngineConfig::incremental()).unwrap();
/// for x in 1..=3 {
///     engine.set_block_and_update(BlockPos::new(x, 0, 0), BlockState::wire(0)).unwrap();
/// }
/// engine.set_block_and_update(BlockPos::ORIGIN, BlockState::new(BlockKind(2), 15)).unwrap();
/// assert_eq!(engine.power_at(BlockPos::new(3, 0, 0)), 13);
/// ```
pub struct Engine<W: World> {
    level: WireLevel<W>,
    updater: Box<dyn NeighborUpdater>,
    config: EngineConfig,
}

impl<W: World> Engine<W> {
    /// Validate `config` and wrap `world`.
    pub fn new(world: W, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            scheduler = %config.scheduler,
            evaluator = %config.evaluator,
            max_chained = ?config.max_chained_neighbor_updates,
            "engine ready"
        );
        Ok(Self {
            level: WireLevel::new(world, config.evaluator, config.seed, config.update_limit),
            updater: config.scheduler.build(config.max_chained_neighbor_updates),
            config,
        })
    }

    /// The wrapped world.
    pub fn world(&self) -> &W {
        self.level.world()
    }

    /// The wrapped world, mutably. Writes made here set off nothing.
    pub fn world_mut(&mut self) -> &mut W {
        self.level.world_mut()
    }

    /// Unwrap the world.
    pub fn into_world(self) -> W {
        self.level.into_world()
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Counters since construction.
    pub fn metrics(&self) -> EngineMetrics {
        EngineMetrics {
            scheduler: self.updater.stats(),
            ..self.level.metrics().clone()
        }
    }

    /// Write `state` at `pos` and run what `flags` ask for.
    ///
    /// Returns `Ok(false)` when the cell already held `state`.
    pub fn set_block(
        &mut self,
        pos: BlockPos,
        state: BlockState,
        flags: UpdateFlags,
    ) -> Result<bool, UpdateError> {
        let limit = self.config.update_limit;
        self.level
            .set_block(self.updater.as_mut(), pos, state, flags, limit)
    }

    /// [`set_block`](Engine::set_block) with [`UpdateFlags::ALL`].
    pub fn set_block_and_update(&mut self, pos: BlockPos, state: BlockState) -> Result<bool, UpdateError> {
        self.set_block(pos, state, UpdateFlags::ALL)
    }

    /// Replace the block at `pos` with air.
    pub fn remove_block(&mut self, pos: BlockPos) -> Result<bool, UpdateError> {
        self.set_block_and_update(pos, BlockState::AIR)
    }

    /// Notify the six neighbours of `pos` that a `source_kind` block there
    /// changed.
    pub fn update_neighbors_at(&mut self, pos: BlockPos, source_kind: BlockKind) -> Result<(), UpdateError> {
        let orientation = self.level.initial_orientation(None, None);
        self.updater
            .update_neighbors_at(&mut self.level, pos, source_kind, orientation)
    }

    /// Notify the block at `pos` that a `source_kind` neighbour changed.
    pub fn neighbor_changed(&mut self, pos: BlockPos, source_kind: BlockKind) -> Result<(), UpdateError> {
        let orientation = self.level.initial_orientation(None, None);
        self.updater
            .neighbor_changed(&mut self.level, pos, source_kind, orientation)
    }

    /// Re-run the evaluator on the wire at `pos`. Does nothing for
    /// other blocks.
    pub fn update_power_strength(&mut self, pos: BlockPos) -> Result<(), UpdateError> {
        let state = self.level.block_state(pos);
        if !state.is_wire() {
            return Ok(());
        }
        self.level
            .evaluate(self.updater.as_mut(), pos, state, None, true)?;
        Ok(())
    }

    /// Power of the wire at `pos`, or 0 if there is none.
    pub fn power_at(&self, pos: BlockPos) -> u8 {
        let state = self.level.block_state(pos);
        if state.is_wire() {
            state.power()
        } else {
            0
        }
    }
}

impl<W: World + std::fmt::Debug> std::fmt::Debug for Engine<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("world", self.level.world())
            .field("evaluator", &self.level.evaluator_kind())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerKind;
    use redwire_test_utils::scenarios::wire_line;
    use redwire_test_utils::{GridWorld, SOURCE};

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = EngineConfig {
            update_limit: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::new(GridWorld::new(), cfg),
            Err(ConfigError::ZeroUpdateLimit)
        ));
    }

    #[test]
    fn power_at_reads_zero_off_wire() {
        let mut world = GridWorld::new();
        world.put_source(BlockPos::ORIGIN, 15);
        let engine = Engine::new(world, EngineConfig::default()).unwrap();
        assert_eq!(engine.power_at(BlockPos::ORIGIN), 0);
        assert_eq!(engine.power_at(BlockPos::new(5, 5, 5)), 0);
    }

    #[test]
    fn metrics_surface_scheduler_stats() {
        let line = wire_line(3);
        let mut engine = Engine::new(line.world, EngineConfig::default()).unwrap();
        engine
            .set_block_and_update(line.source, BlockState::new(SOURCE, 15))
            .unwrap();
        let m = engine.metrics();
        assert!(m.scheduler.executed_steps > 0);
        assert!(m.evaluations > 0);
        assert_eq!(m.scheduler.dropped, 0);
    }

    #[test]
    fn immediate_scheduler_settles_a_short_line() {
        let line = wire_line(4);
        let cfg = EngineConfig {
            scheduler: SchedulerKind::Immediate,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(line.world, cfg).unwrap();
        engine
            .set_block_and_update(line.source, BlockState::new(SOURCE, 15))
            .unwrap();
        let powers: Vec<u8> = line.wires.iter().map(|p| engine.power_at(*p)).collect();
        assert_eq!(powers, vec![15, 14, 13, 12]);
    }

    #[test]
    fn non_wire_update_power_strength_is_a_no_op() {
        let mut engine = Engine::new(GridWorld::new(), EngineConfig::default()).unwrap();
        engine.update_power_strength(BlockPos::ORIGIN).unwrap();
        assert_eq!(engine.metrics().evaluations, 0);
    }
}
