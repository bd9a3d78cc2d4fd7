//! Axis-aligned [`Direction`]s and their axes.
//!
//! Declaration order (`Down, Up, North, South, West, East`) is
//! load-bearing: [`Direction::ordinal`] feeds the orientation index and
//! the per-frame transition tables.

use std::fmt;

/// One of the three spatial axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// East-west.
    X,
    /// Vertical.
    Y,
    /// North-south.
    Z,
}

impl Axis {
    /// Whether this is the vertical axis.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Axis::Y)
    }
}

/// Sign of a direction along its axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    /// Towards positive coordinates.
    Positive,
    /// Towards negative coordinates.
    Negative,
}

impl AxisDirection {
    /// `0` for positive, `1` for negative.
    pub const fn ordinal(self) -> usize {
        match self {
            AxisDirection::Positive => 0,
            AxisDirection::Negative => 1,
        }
    }
}

/// The six canonical axis-aligned directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Negative Y.
    Down,
    /// Positive Y.
    Up,
    /// Negative Z.
    North,
    /// Positive Z.
    South,
    /// Negative X.
    West,
    /// Positive X.
    East,
}

impl Direction {
    /// All directions in declaration order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// The horizontal plane, clockwise from north.
    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The vertical plane.
    pub const VERTICAL: [Direction; 2] = [Direction::Up, Direction::Down];

    /// Order in which neighbour-change fan-outs visit the six neighbours.
    pub const UPDATE_ORDER: [Direction; 6] = [
        Direction::West,
        Direction::East,
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
    ];

    /// Order in which a changed block asks its neighbours to re-shape.
    pub const SHAPE_UPDATE_ORDER: [Direction; 6] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
        Direction::Down,
        Direction::Up,
    ];

    /// Position in [`Direction::ALL`].
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Inverse of [`ordinal`](Self::ordinal).
    pub const fn from_ordinal(ordinal: usize) -> Option<Direction> {
        if ordinal < 6 {
            Some(Self::ALL[ordinal])
        } else {
            None
        }
    }

    /// The direction pointing the other way.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// The axis this direction lies on.
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    /// Sign along [`axis`](Self::axis).
    pub const fn axis_direction(self) -> AxisDirection {
        match self {
            Direction::Up | Direction::South | Direction::East => AxisDirection::Positive,
            Direction::Down | Direction::North | Direction::West => AxisDirection::Negative,
        }
    }

    /// Unit step `[dx, dy, dz]`.
    pub const fn normal(self) -> [i32; 3] {
        match self {
            Direction::Down => [0, -1, 0],
            Direction::Up => [0, 1, 0],
            Direction::North => [0, 0, -1],
            Direction::South => [0, 0, 1],
            Direction::West => [-1, 0, 0],
            Direction::East => [1, 0, 0],
        }
    }

    /// The direction whose unit step is exactly `normal`, if any.
    pub fn from_normal(normal: [i32; 3]) -> Option<Direction> {
        Self::ALL.into_iter().find(|d| d.normal() == normal)
    }

    /// The direction best aligned with an arbitrary integer vector.
    ///
    /// Returns `None` for the zero vector. Ties resolve to the earliest
    /// direction in declaration order.
    pub fn nearest(v: [i32; 3]) -> Option<Direction> {
        let mut best: Option<(Direction, i64)> = None;
        for d in Self::ALL {
            let n = d.normal();
            let dot = n[0] as i64 * v[0] as i64 + n[1] as i64 * v[1] as i64 + n[2] as i64 * v[2] as i64;
            if dot > 0 && best.is_none_or(|(_, b)| dot > b) {
                best = Some((d, dot));
            }
        }
        best.map(|(d, _)| d)
    }

    /// Quarter turn clockwise around `axis`, looking from its positive end.
    ///
    /// Directions on `axis` itself are fixed points.
    pub const fn clockwise_around(self, axis: Axis) -> Direction {
        match axis {
            Axis::Y => match self {
                Direction::North => Direction::East,
                Direction::East => Direction::South,
                Direction::South => Direction::West,
                Direction::West => Direction::North,
                other => other,
            },
            Axis::X => match self {
                Direction::Down => Direction::North,
                Direction::North => Direction::Up,
                Direction::Up => Direction::South,
                Direction::South => Direction::Down,
                other => other,
            },
            Axis::Z => match self {
                Direction::Down => Direction::West,
                Direction::West => Direction::Up,
                Direction::Up => Direction::East,
                Direction::East => Direction::Down,
                other => other,
            },
        }
    }

    /// Quarter turn clockwise around the vertical axis.
    pub const fn clockwise(self) -> Direction {
        self.clockwise_around(Axis::Y)
    }

    /// Lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Integer cross product `a × b`.
pub(crate) const fn cross(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution_on_same_axis() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_eq!(d.opposite().axis(), d.axis());
            assert_ne!(d.opposite().axis_direction(), d.axis_direction());
        }
    }

    #[test]
    fn ordinals_round_trip() {
        for (i, d) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(d.ordinal(), i);
            assert_eq!(Direction::from_ordinal(i), Some(d));
        }
        assert_eq!(Direction::from_ordinal(6), None);
    }

    #[test]
    fn clockwise_cycles_horizontal_plane() {
        let mut d = Direction::North;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(d);
            d = d.clockwise();
        }
        assert_eq!(d, Direction::North);
        assert_eq!(seen, Direction::HORIZONTAL.to_vec());
        assert_eq!(Direction::Up.clockwise(), Direction::Up);
    }

    #[test]
    fn four_quarter_turns_are_identity_on_every_axis() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            for d in Direction::ALL {
                let mut r = d;
                for _ in 0..4 {
                    r = r.clockwise_around(axis);
                }
                assert_eq!(r, d);
            }
        }
    }

    #[test]
    fn nearest_picks_dominant_component() {
        assert_eq!(Direction::nearest([5, 1, -2]), Some(Direction::East));
        assert_eq!(Direction::nearest([0, -3, 1]), Some(Direction::Down));
        assert_eq!(Direction::nearest([0, 0, 0]), None);
    }

    #[test]
    fn cross_of_north_and_up_points_east() {
        let v = cross(Direction::North.normal(), Direction::Up.normal());
        assert_eq!(Direction::from_normal(v), Some(Direction::East));
    }

    #[test]
    fn update_orders_are_permutations() {
        for order in [Direction::UPDATE_ORDER, Direction::SHAPE_UPDATE_ORDER] {
            let mut sorted = order.to_vec();
            sorted.sort();
            assert_eq!(sorted, Direction::ALL.to_vec());
        }
    }
}
