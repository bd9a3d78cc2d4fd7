//! Block identity, block state, and update flags.

use std::fmt;
use std::ops::BitOr;

/// Highest power level a wire can carry.
pub const MAX_POWER: u8 = 15;

/// Default recursion budget for shape-update cascades.
pub const DEFAULT_UPDATE_LIMIT: u32 = 512;

/// Opaque identity of a block type.
///
/// Threaded through notifications so receivers can tell who caused an
/// update. Only [`BlockKind::AIR`] and [`BlockKind::WIRE`] carry meaning
/// inside the engine; every other value belongs to the host world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKind(pub u16);

impl BlockKind {
    /// Empty space.
    pub const AIR: BlockKind = BlockKind(0);
    /// A signal-carrying wire.
    pub const WIRE: BlockKind = BlockKind(1);
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BlockKind::AIR => f.write_str("air"),
            BlockKind::WIRE => f.write_str("wire"),
            BlockKind(id) => write!(f, "block#{id}"),
        }
    }
}

impl From<u16> for BlockKind {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// The state of one cell: its kind plus a small level value.
///
/// For wires the level is the stored power. Other kinds may use it for
/// whatever the host world needs (a lever's output, a lamp's lit flag).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockState {
    kind: BlockKind,
    level: u8,
}

impl BlockState {
    /// An empty cell.
    pub const AIR: BlockState = BlockState {
        kind: BlockKind::AIR,
        level: 0,
    };

    /// A state of arbitrary kind. `level` is clamped to [`MAX_POWER`].
    pub const fn new(kind: BlockKind, level: u8) -> Self {
        let level = if level > MAX_POWER { MAX_POWER } else { level };
        Self { kind, level }
    }

    /// A wire carrying `power` (clamped to [`MAX_POWER`]).
    pub const fn wire(power: u8) -> Self {
        Self::new(BlockKind::WIRE, power)
    }

    /// Kind of block in this cell.
    pub const fn kind(self) -> BlockKind {
        self.kind
    }

    /// Whether the cell is empty.
    pub fn is_air(self) -> bool {
        self.kind == BlockKind::AIR
    }

    /// Whether the cell holds a wire.
    pub fn is_wire(self) -> bool {
        self.kind == BlockKind::WIRE
    }

    /// Whether the cell holds a block of `kind`.
    pub fn is(self, kind: BlockKind) -> bool {
        self.kind == kind
    }

    /// The level value; a wire's power.
    pub const fn power(self) -> u8 {
        self.level
    }

    /// Same kind with a different level.
    pub const fn with_power(self, power: u8) -> Self {
        Self::new(self.kind, power)
    }
}

impl Default for BlockState {
    fn default() -> Self {
        Self::AIR
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[power={}]", self.kind, self.level)
    }
}

/// Bitmask controlling the side effects of a block write.
///
/// Bit values match the host world's historical flag layout so hosts can
/// pass their own masks straight through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct UpdateFlags(pub u32);

impl UpdateFlags {
    /// No side effects.
    pub const NONE: UpdateFlags = UpdateFlags(0);
    /// Notify the six neighbours that this cell changed.
    pub const NEIGHBORS: UpdateFlags = UpdateFlags(1);
    /// Sync the change to observers.
    pub const CLIENTS: UpdateFlags = UpdateFlags(2);
    /// Do not re-render.
    pub const INVISIBLE: UpdateFlags = UpdateFlags(4);
    /// Re-render immediately.
    pub const IMMEDIATE: UpdateFlags = UpdateFlags(8);
    /// The caller already knows the final shape; skip shape updates.
    pub const KNOWN_SHAPE: UpdateFlags = UpdateFlags(16);
    /// Do not drop items if the write destroys a block.
    pub const SUPPRESS_DROPS: UpdateFlags = UpdateFlags(32);
    /// The change is caused by an external mover.
    pub const MOVE_BY_PISTON: UpdateFlags = UpdateFlags(64);
    /// Shape updates issued by this write must not re-shape wires.
    pub const SKIP_SHAPE_UPDATE_ON_WIRE: UpdateFlags = UpdateFlags(128);
    /// `NEIGHBORS | CLIENTS`.
    pub const ALL: UpdateFlags = UpdateFlags(3);

    /// Whether every bit of `other` is set.
    pub const fn contains(self, other: UpdateFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// `self` with `other`'s bits set.
    pub const fn with(self, other: UpdateFlags) -> UpdateFlags {
        UpdateFlags(self.0 | other.0)
    }

    /// `self` with `other`'s bits cleared.
    pub const fn without(self, other: UpdateFlags) -> UpdateFlags {
        UpdateFlags(self.0 & !other.0)
    }
}

impl BitOr for UpdateFlags {
    type Output = UpdateFlags;

    fn bitor(self, rhs: UpdateFlags) -> UpdateFlags {
        self.with(rhs)
    }
}
