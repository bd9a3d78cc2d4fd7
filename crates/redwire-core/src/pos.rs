//! The [`BlockPos`] coordinate type.

use crate::direction::Direction;
use std::fmt;

/// A cell coordinate in the host world.
///
/// Positions are plain values: equality and hashing are by coordinate.
/// The world owns whatever lives at a position; this crate only refers
/// to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    /// East-west coordinate (east is positive).
    pub x: i32,
    /// Vertical coordinate (up is positive).
    pub y: i32,
    /// North-south coordinate (south is positive).
    pub z: i32,
}

impl BlockPos {
    /// The world origin.
    pub const ORIGIN: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    /// Create a position from its three coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Translate by an arbitrary offset.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// The adjacent position one step in `direction`.
    pub const fn relative(self, direction: Direction) -> Self {
        let [dx, dy, dz] = direction.normal();
        self.offset(dx, dy, dz)
    }

    /// The position directly above.
    pub const fn above(self) -> Self {
        self.relative(Direction::Up)
    }

    /// The position directly below.
    pub const fn below(self) -> Self {
        self.relative(Direction::Down)
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(self, other: BlockPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self { x, y, z }
    }
}
