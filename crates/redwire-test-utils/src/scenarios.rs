//! Ready-made wire layouts.
//!
//! Builders place blocks with [`GridWorld::put`], so the layout starts
//! unsettled: wires sit at power 0 and source slots are empty. Tests then
//! drive the engine (placing a source, removing it) and inspect the
//! result.

use crate::grid::{GridWorld, SOURCE, STONE};
use redwire_core::{BlockPos, BlockState, Direction, World, MAX_POWER};
use std::collections::VecDeque;

/// A straight eastward run of wires with an empty source slot at the west
/// end.
pub struct Line {
    pub world: GridWorld,
    pub source: BlockPos,
    pub wires: Vec<BlockPos>,
}

/// `len` wires from `(1, 0, 0)` eastward; source slot at the origin.
pub fn wire_line(len: usize) -> Line {
    let mut world = GridWorld::new();
    let source = BlockPos::ORIGIN;
    let mut wires = Vec::with_capacity(len);
    let mut pos = source;
    for _ in 0..len {
        pos = pos.relative(Direction::East);
        world.put_wire(pos, 0);
        wires.push(pos);
    }
    Line {
        world,
        source,
        wires,
    }
}

/// A run that climbs one block onto a conductor halfway along.
pub struct Step {
    pub world: GridWorld,
    pub source: BlockPos,
    /// Low wire, high wire on the conductor, then the wire after it.
    pub wires: [BlockPos; 3],
}

/// ```text
///  y=2          B  C
///  y=1   S  A  [#][#]
///  y=0     [#]
/// ```
pub fn vertical_step() -> Step {
    let mut world = GridWorld::new();
    let source = BlockPos::new(0, 1, 0);
    let a = BlockPos::new(1, 1, 0);
    let b = BlockPos::new(2, 2, 0);
    let c = BlockPos::new(3, 2, 0);
    world
        .put_stone(a.below())
        .put_wire(a, 0)
        .put_stone(b.below())
        .put_wire(b, 0)
        .put_stone(c.below())
        .put_wire(c, 0);
    Step {
        world,
        source,
        wires: [a, b, c],
    }
}

/// A line with source slots at both ends.
pub struct Bridge {
    pub world: GridWorld,
    pub west: BlockPos,
    pub east: BlockPos,
    pub wires: Vec<BlockPos>,
}

/// `len` wires between two empty source slots.
pub fn bridge(len: usize) -> Bridge {
    let Line {
        world,
        source,
        wires,
    } = wire_line(len);
    let east = wires
        .last()
        .copied()
        .unwrap_or(source)
        .relative(Direction::East);
    Bridge {
        world,
        west: source,
        east,
        wires,
    }
}

/// One cell of a [`flat_network`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Air,
    Wire,
    Stone,
    Source(u8),
}

/// A single-layer network at `y = 0`, `width` cells wide, laid out row by
/// row. Sources are returned separately and not placed, so the caller
/// can switch them on through the engine.
pub fn flat_network(cells: &[Cell], width: usize) -> (GridWorld, Vec<(BlockPos, BlockState)>) {
    let mut world = GridWorld::new();
    let mut sources = Vec::new();
    let width = width.max(1);
    for (i, cell) in cells.iter().enumerate() {
        let pos = BlockPos::new((i % width) as i32, 0, (i / width) as i32);
        match *cell {
            Cell::Air => {}
            Cell::Wire => {
                world.put_wire(pos, 0);
            }
            Cell::Stone => {
                world.put(pos, BlockState::new(STONE, 0));
            }
            Cell::Source(output) => sources.push((pos, BlockState::new(SOURCE, output))),
        }
    }
    (world, sources)
}

/// One column of a [`terrain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    /// Bare ground.
    Empty,
    /// A wire lying on the ground.
    Flat,
    /// A one-block stone pillar with a wire on top.
    Pillar,
    /// A source slot on the ground with the given output.
    Source(u8),
}

/// A stone ground layer with pillars and wires on it.
pub struct Terrain {
    pub world: GridWorld,
    /// Sources, not placed.
    pub sources: Vec<(BlockPos, BlockState)>,
    /// The block each wire rests on, in column order.
    pub supports: Vec<BlockPos>,
}

/// Stone ground at `y = 0` under every column, `width` columns wide,
/// laid out row by row. Flat wires sit at `y = 1`, pillar wires at
/// `y = 2`, so neighbouring columns of different kinds are joined by
/// step-up and step-down paths.
pub fn terrain(columns: &[Column], width: usize) -> Terrain {
    let mut world = GridWorld::new();
    let mut sources = Vec::new();
    let mut supports = Vec::new();
    let width = width.max(1);
    for (i, column) in columns.iter().enumerate() {
        let ground = BlockPos::new((i % width) as i32, 0, (i / width) as i32);
        world.put_stone(ground);
        match *column {
            Column::Empty => {}
            Column::Flat => {
                world.put_wire(ground.above(), 0);
                supports.push(ground);
            }
            Column::Pillar => {
                let top = ground.above();
                world.put_stone(top).put_wire(top.above(), 0);
                supports.push(top);
            }
            Column::Source(output) => sources.push((ground.above(), BlockState::new(SOURCE, output))),
        }
    }
    Terrain {
        world,
        sources,
        supports,
    }
}

/// Settled wire powers of a single-layer world, computed by a max-decay
/// breadth-first search from every directly powered wire.
///
/// Only valid when every block sits at one height: no step-up or
/// step-down paths are followed.
pub fn reference_powers(world: &GridWorld) -> Vec<(BlockPos, u8)> {
    let wires = world.wire_powers();
    let mut best: std::collections::HashMap<BlockPos, u8> =
        wires.iter().map(|(p, _)| (*p, 0)).collect();
    let mut queue = VecDeque::new();
    for (pos, _) in &wires {
        let direct = world.direct_signal(*pos).min(MAX_POWER);
        if direct > 0 {
            best.insert(*pos, direct);
            queue.push_back(*pos);
        }
    }
    while let Some(pos) = queue.pop_front() {
        let power = best[&pos];
        if power <= 1 {
            continue;
        }
        for d in Direction::HORIZONTAL {
            let n = pos.relative(d);
            if let Some(p) = best.get_mut(&n) {
                if *p < power - 1 {
                    *p = power - 1;
                    queue.push_back(n);
                }
            }
        }
    }
    let mut out: Vec<_> = best.into_iter().collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_layout() {
        let line = wire_line(3);
        assert_eq!(line.wires.len(), 3);
        assert_eq!(line.wires[0], BlockPos::new(1, 0, 0));
        assert!(line.world.block_state(line.source).is_air());
    }

    #[test]
    fn terrain_layout() {
        let t = terrain(
            &[Column::Flat, Column::Pillar, Column::Source(9), Column::Empty],
            2,
        );
        assert_eq!(t.supports, vec![BlockPos::new(0, 0, 0), BlockPos::new(1, 1, 0)]);
        assert_eq!(t.world.wire_power(BlockPos::new(0, 1, 0)), Some(0));
        assert_eq!(t.world.wire_power(BlockPos::new(1, 2, 0)), Some(0));
        assert_eq!(t.sources, vec![(BlockPos::new(0, 1, 1), BlockState::new(SOURCE, 9))]);
        assert!(t.world.block_state(BlockPos::new(1, 0, 1)).is(STONE));
    }

    #[test]
    fn reference_decays_along_line() {
        let mut line = wire_line(4);
        line.world.put_source(line.source, 15);
        let powers: Vec<u8> = reference_powers(&line.world).into_iter().map(|(_, p)| p).collect();
        assert_eq!(powers, vec![15, 14, 13, 12]);
    }

    #[test]
    fn reference_takes_max_of_two_sources() {
        let mut b = bridge(5);
        b.world.put_source(b.west, 15).put_source(b.east, 12);
        let powers: Vec<u8> = reference_powers(&b.world).into_iter().map(|(_, p)| p).collect();
        assert_eq!(powers, vec![15, 14, 13, 12, 12]);
    }
}
