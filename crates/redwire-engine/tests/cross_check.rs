//! The legacy and incremental evaluators settle random networks to the
//! same powers. Flat networks also match a breadth-first reference;
//! terrain adds step paths and wires losing their support.

use proptest::prelude::*;
use redwire_core::{BlockPos, BlockState, Direction, UpdateError, World};
use redwire_engine::{Engine, EngineConfig, SchedulerKind};
use redwire_test_utils::scenarios::{flat_network, reference_powers, terrain, Cell, Column};
use redwire_test_utils::{GridWorld, SOURCE};
use redwire_wire::EvaluatorKind;

const WIDTH: usize = 6;

fn arb_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        4 => Just(Cell::Wire),
        2 => Just(Cell::Air),
        1 => Just(Cell::Stone),
        1 => (1u8..=15).prop_map(Cell::Source),
    ]
}

/// Sources strongly power what they touch, so the blocks around each
/// touched block hear about it too.
fn toggle(engine: &mut Engine<GridWorld>, pos: BlockPos, state: BlockState) -> Result<(), UpdateError> {
    engine.set_block_and_update(pos, state)?;
    for direction in Direction::ALL {
        engine.update_neighbors_at(pos.relative(direction), SOURCE)?;
    }
    Ok(())
}

fn run(
    cells: &[Cell],
    evaluator: EvaluatorKind,
    scheduler: SchedulerKind,
) -> (Vec<(BlockPos, u8)>, Vec<(BlockPos, u8)>, Engine<GridWorld>) {
    let (world, sources) = flat_network(cells, WIDTH);
    let cfg = EngineConfig {
        evaluator,
        scheduler,
        seed: 3,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(world, cfg).unwrap();
    for (pos, state) in &sources {
        toggle(&mut engine, *pos, *state).unwrap();
    }
    let lit = engine.world().wire_powers();
    for (pos, _) in &sources {
        toggle(&mut engine, *pos, BlockState::AIR).unwrap();
    }
    let dark = engine.world().wire_powers();
    (lit, dark, engine)
}

fn arb_column() -> impl Strategy<Value = Column> {
    prop_oneof![
        3 => Just(Column::Flat),
        3 => Just(Column::Pillar),
        1 => Just(Column::Empty),
        1 => (1u8..=15).prop_map(Column::Source),
    ]
}

/// Wire powers after each stage of a terrain run: lit, with the masked
/// supports removed, and dark.
type Stages = [Vec<(BlockPos, u8)>; 3];

fn run_terrain(
    columns: &[Column],
    removed: &[bool],
    evaluator: EvaluatorKind,
) -> Result<(Stages, Engine<GridWorld>), UpdateError> {
    let t = terrain(columns, 5);
    let cfg = EngineConfig {
        evaluator,
        seed: 3,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(t.world, cfg).unwrap();
    for (pos, state) in &t.sources {
        toggle(&mut engine, *pos, *state)?;
    }
    let lit = engine.world().wire_powers();
    for (support, remove) in t.supports.iter().zip(removed) {
        if *remove {
            engine.remove_block(*support)?;
        }
    }
    let cut = engine.world().wire_powers();
    for (pos, _) in &t.sources {
        toggle(&mut engine, *pos, BlockState::AIR)?;
    }
    let dark = engine.world().wire_powers();
    Ok(([lit, cut, dark], engine))
}

fn every_wire_supported(world: &GridWorld) -> bool {
    world
        .wire_powers()
        .iter()
        .all(|(pos, _)| world.supports_wire(pos.below(), world.block_state(pos.below())))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn evaluators_agree_with_reference(cells in prop::collection::vec(arb_cell(), 1..42)) {
        let (legacy_lit, legacy_dark, legacy) =
            run(&cells, EvaluatorKind::Default, SchedulerKind::Queued);
        let (wave_lit, wave_dark, _) =
            run(&cells, EvaluatorKind::Incremental, SchedulerKind::Queued);

        let (mut lit_world, sources) = flat_network(&cells, WIDTH);
        for (pos, state) in sources {
            lit_world.put(pos, state);
        }
        let expected = reference_powers(&lit_world);

        prop_assert_eq!(&legacy_lit, &expected);
        prop_assert_eq!(&wave_lit, &expected);
        prop_assert!(legacy_dark.iter().all(|(_, p)| *p == 0));
        prop_assert_eq!(legacy_dark, wave_dark);
        prop_assert_eq!(legacy.metrics().scheduler.dropped, 0);
    }

    #[test]
    fn schedulers_agree(cells in prop::collection::vec(arb_cell(), 1..30)) {
        for evaluator in [EvaluatorKind::Default, EvaluatorKind::Incremental] {
            let (queued_lit, _, _) = run(&cells, evaluator, SchedulerKind::Queued);
            let (immediate_lit, _, _) = run(&cells, evaluator, SchedulerKind::Immediate);
            prop_assert_eq!(queued_lit, immediate_lit);
        }
    }

    #[test]
    fn incremental_writes_no_more_than_legacy(cells in prop::collection::vec(arb_cell(), 1..42)) {
        let (_, _, legacy) = run(&cells, EvaluatorKind::Default, SchedulerKind::Queued);
        let (_, _, wave) = run(&cells, EvaluatorKind::Incremental, SchedulerKind::Queued);
        prop_assert!(wave.metrics().wire_writes <= legacy.metrics().wire_writes);
    }

    #[test]
    fn evaluators_agree_on_terrain_losing_support(
        columns in prop::collection::vec(arb_column(), 1..25),
        removed in prop::collection::vec(any::<bool>(), 25),
    ) {
        let (legacy, legacy_engine) = run_terrain(&columns, &removed, EvaluatorKind::Default).unwrap();
        let (wave, wave_engine) = run_terrain(&columns, &removed, EvaluatorKind::Incremental).unwrap();

        prop_assert_eq!(&legacy, &wave);
        prop_assert!(legacy[2].iter().all(|(_, p)| *p == 0));
        prop_assert!(every_wire_supported(legacy_engine.world()));
        prop_assert!(every_wire_supported(wave_engine.world()));
    }
}
