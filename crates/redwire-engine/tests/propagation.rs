//! End-to-end wire behaviour under every scheduler and evaluator pairing.

use redwire_core::{BlockPos, BlockState};
use redwire_engine::{Engine, EngineConfig, SchedulerKind};
use redwire_test_utils::scenarios::{bridge, vertical_step, wire_line};
use redwire_test_utils::{GridWorld, SOURCE};
use redwire_wire::EvaluatorKind;

fn configs() -> Vec<EngineConfig> {
    let mut out = Vec::new();
    for evaluator in [EvaluatorKind::Default, EvaluatorKind::Incremental] {
        for scheduler in [SchedulerKind::Queued, SchedulerKind::Immediate] {
            out.push(EngineConfig {
                evaluator,
                scheduler,
                seed: 42,
                ..EngineConfig::default()
            });
        }
    }
    out
}

fn source(output: u8) -> BlockState {
    BlockState::new(SOURCE, output)
}

fn powers(engine: &Engine<GridWorld>, wires: &[BlockPos]) -> Vec<u8> {
    wires.iter().map(|p| engine.power_at(*p)).collect()
}

#[test]
fn power_decays_along_a_line() {
    for cfg in configs() {
        let line = wire_line(20);
        let label = format!("{}/{}", cfg.evaluator, cfg.scheduler);
        let mut engine = Engine::new(line.world, cfg).unwrap();
        engine.set_block_and_update(line.source, source(15)).unwrap();

        let expected: Vec<u8> = (0..20u8).map(|i| 15u8.saturating_sub(i)).collect();
        assert_eq!(powers(&engine, &line.wires), expected, "{label}");
    }
}

#[test]
fn switching_off_darkens_the_line() {
    for cfg in configs() {
        let line = wire_line(5);
        let label = format!("{}/{}", cfg.evaluator, cfg.scheduler);
        let mut engine = Engine::new(line.world, cfg).unwrap();
        engine.set_block_and_update(line.source, source(15)).unwrap();
        assert_eq!(powers(&engine, &line.wires), vec![15, 14, 13, 12, 11], "{label}");

        engine.remove_block(line.source).unwrap();
        assert_eq!(powers(&engine, &line.wires), vec![0; 5], "{label}");
    }
}

#[test]
fn incremental_switch_off_visits_each_wire_once() {
    let line = wire_line(5);
    let mut engine = Engine::new(line.world, EngineConfig::incremental()).unwrap();
    engine.set_block_and_update(line.source, source(15)).unwrap();
    let lit = engine.metrics();
    assert_eq!(lit.evaluations, 1);
    assert_eq!(lit.turn_off_visits, 1);
    assert_eq!(lit.turn_on_visits, 4);
    assert_eq!(lit.wire_writes, 5);

    engine.remove_block(line.source).unwrap();
    let dark = engine.metrics();
    assert_eq!(dark.evaluations - lit.evaluations, 1);
    assert_eq!(dark.turn_off_visits - lit.turn_off_visits, 5);
    assert_eq!(dark.turn_on_visits, lit.turn_on_visits);
    assert_eq!(dark.wire_writes - lit.wire_writes, 5);
}

#[test]
fn legacy_needs_many_evaluations_for_the_same_line() {
    let line = wire_line(5);
    let mut engine = Engine::new(line.world, EngineConfig::default()).unwrap();
    engine.set_block_and_update(line.source, source(15)).unwrap();
    let m = engine.metrics();
    assert_eq!(m.wire_writes, 5);
    assert!(m.evaluations > 5);
    assert_eq!(m.turn_off_visits, 0);
}

#[test]
fn power_climbs_onto_conductors() {
    for cfg in configs() {
        let step = vertical_step();
        let label = format!("{}/{}", cfg.evaluator, cfg.scheduler);
        let mut engine = Engine::new(step.world, cfg).unwrap();
        engine.set_block_and_update(step.source, source(15)).unwrap();
        assert_eq!(powers(&engine, &step.wires), vec![15, 14, 13], "{label}");
    }
}

#[test]
fn wire_pops_when_its_support_is_removed() {
    for cfg in configs() {
        let step = vertical_step();
        let [low, high, far] = step.wires;
        let label = format!("{}/{}", cfg.evaluator, cfg.scheduler);
        let mut engine = Engine::new(step.world, cfg).unwrap();
        engine.set_block_and_update(step.source, source(15)).unwrap();

        engine.remove_block(high.below()).unwrap();
        assert_eq!(engine.world().wire_power(high), None, "{label}");
        assert_eq!(engine.power_at(low), 15, "{label}");
        assert_eq!(engine.power_at(far), 0, "{label}");
    }
}

#[test]
fn placing_wires_one_by_one_reaches_the_same_state() {
    for cfg in configs() {
        for reversed in [false, true] {
            let step = vertical_step();
            let label = format!("{}/{} reversed={reversed}", cfg.evaluator, cfg.scheduler);
            let mut world = step.world;
            for wire in step.wires {
                world.put(wire, BlockState::AIR);
            }
            world.put_source(step.source, 15);
            let mut engine = Engine::new(world, cfg.clone()).unwrap();

            let mut order = step.wires.to_vec();
            if reversed {
                order.reverse();
            }
            for wire in order {
                engine.set_block_and_update(wire, BlockState::wire(0)).unwrap();
            }
            assert_eq!(powers(&engine, &step.wires), vec![15, 14, 13], "{label}");
        }
    }
}

#[test]
fn two_sources_take_the_maximum() {
    for cfg in configs() {
        let b = bridge(5);
        let label = format!("{}/{}", cfg.evaluator, cfg.scheduler);
        let mut engine = Engine::new(b.world, cfg).unwrap();
        engine.set_block_and_update(b.west, source(15)).unwrap();
        engine.set_block_and_update(b.east, source(12)).unwrap();
        assert_eq!(powers(&engine, &b.wires), vec![15, 14, 13, 12, 12], "{label}");

        engine.remove_block(b.west).unwrap();
        assert_eq!(powers(&engine, &b.wires), vec![8, 9, 10, 11, 12], "{label}");
    }
}

#[test]
fn removing_a_wire_cuts_the_line() {
    for cfg in configs() {
        let line = wire_line(5);
        let label = format!("{}/{}", cfg.evaluator, cfg.scheduler);
        let mut engine = Engine::new(line.world, cfg).unwrap();
        engine.set_block_and_update(line.source, source(15)).unwrap();

        engine.remove_block(line.wires[2]).unwrap();
        assert_eq!(powers(&engine, &line.wires), vec![15, 14, 0, 0, 0], "{label}");

        engine
            .set_block_and_update(line.wires[2], BlockState::wire(0))
            .unwrap();
        assert_eq!(powers(&engine, &line.wires), vec![15, 14, 13, 12, 11], "{label}");
    }
}

#[test]
fn settled_network_is_idempotent() {
    for cfg in configs() {
        let line = wire_line(8);
        let label = format!("{}/{}", cfg.evaluator, cfg.scheduler);
        let mut engine = Engine::new(line.world, cfg).unwrap();
        engine.set_block_and_update(line.source, source(15)).unwrap();
        let before = powers(&engine, &line.wires);
        let writes = engine.metrics().wire_writes;

        for wire in &line.wires {
            engine.update_power_strength(*wire).unwrap();
            let last = engine.metrics().last_evaluation.unwrap();
            assert_eq!(last.writes, 0, "{label}");
        }
        assert_eq!(engine.metrics().wire_writes, writes, "{label}");
        assert_eq!(powers(&engine, &line.wires), before, "{label}");
    }
}

#[test]
fn same_seed_gives_the_same_run() {
    let run = || {
        let b = bridge(9);
        let mut engine = Engine::new(b.world, EngineConfig::incremental()).unwrap();
        engine.set_block_and_update(b.west, source(15)).unwrap();
        engine.set_block_and_update(b.east, source(15)).unwrap();
        engine.remove_block(b.west).unwrap();
        let m = engine.metrics();
        (engine.into_world().writes, m)
    };
    assert_eq!(run(), run());
}
