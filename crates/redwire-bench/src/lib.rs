//! Benchmark profiles for the redwire propagation engine.
//!
//! Provides pre-built layouts and configurations for benchmarks:
//!
//! - [`line_profile`]: a long straight run fed by one source slot
//! - [`plate_profile`]: a square plate of wires with a source slot in
//!   the middle, so one toggle reaches a diamond of ~450 wires
//! - [`engine_config`]: the configuration every profile runs under

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use redwire_core::{BlockPos, BlockState};
use redwire_engine::{EngineConfig, SchedulerKind};
use redwire_test_utils::scenarios::wire_line;
use redwire_test_utils::{GridWorld, SOURCE};
use redwire_wire::EvaluatorKind;

/// A world plus the slot to toggle a source in.
pub struct Profile {
    /// Unsettled layout. The source slot is empty.
    pub world: GridWorld,
    /// Where the source goes.
    pub source: BlockPos,
}

/// `len` wires in a straight line.
pub fn line_profile(len: usize) -> Profile {
    let line = wire_line(len);
    Profile {
        world: line.world,
        source: line.source,
    }
}

/// A `side` x `side` plate of wires at `y = 0` with the source slot at
/// its centre.
pub fn plate_profile(side: i32) -> Profile {
    let mut world = GridWorld::new();
    for x in 0..side {
        for z in 0..side {
            world.put_wire(BlockPos::new(x, 0, z), 0);
        }
    }
    let source = BlockPos::new(side / 2, 0, side / 2);
    world.put(source, BlockState::AIR);
    Profile { world, source }
}

/// A full-strength source.
pub fn source_state() -> BlockState {
    BlockState::new(SOURCE, 15)
}

/// Default chain cap and update limit, fixed seed.
pub fn engine_config(evaluator: EvaluatorKind, scheduler: SchedulerKind) -> EngineConfig {
    EngineConfig {
        evaluator,
        scheduler,
        seed: 42,
        ..EngineConfig::default()
    }
}
