//! The [`Orientation`] frame algebra.
//!
//! An orientation is a local directional frame: an `up` vector, a `front`
//! vector on a different axis, and a [`SideBias`] that picks which of the
//! two remaining directions is the `side`. There are exactly 48 such
//! frames. They are generated once, by closing over every `with_*`
//! transition starting from a single seed frame, and stored in a flat
//! table. An [`Orientation`] value is a one-byte handle into that table,
//! so every transition is an array lookup.

use crate::direction::{cross, Axis, Direction};
use crate::error::OrientationError;
use rand::Rng;
use std::fmt;
use std::sync::LazyLock;

/// Number of distinct orientation frames.
pub const ORIENTATION_COUNT: usize = 48;

/// Which of the two directions perpendicular to both `up` and `front`
/// is the frame's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SideBias {
    /// Side is the opposite of `front × up`.
    Left,
    /// Side is `front × up`.
    Right,
}

impl SideBias {
    /// Both biases, in ordinal order.
    pub const ALL: [SideBias; 2] = [SideBias::Left, SideBias::Right];

    /// `0` for left, `1` for right.
    pub const fn ordinal(self) -> usize {
        match self {
            SideBias::Left => 0,
            SideBias::Right => 1,
        }
    }

    /// The other bias.
    pub const fn opposite(self) -> SideBias {
        match self {
            SideBias::Left => SideBias::Right,
            SideBias::Right => SideBias::Left,
        }
    }

    /// Lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            SideBias::Left => "left",
            SideBias::Right => "right",
        }
    }
}

impl fmt::Display for SideBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the orientation table.
#[derive(Clone, Copy, Debug)]
struct Frame {
    index: u8,
    up: Direction,
    front: Direction,
    side: Direction,
    side_bias: SideBias,
    // front.opposite, front, side, side.opposite, up.opposite, up.
    // The first four never share up's axis, the last two always do.
    directions: [Direction; 6],
    with_front: [u8; 6],
    with_up: [u8; 6],
    with_side_bias: [u8; 2],
}

impl Frame {
    fn new(up: Direction, front: Direction, side_bias: SideBias) -> Result<Self, OrientationError> {
        let index = frame_index(up, front, side_bias)? as u8;
        let toward = Direction::from_normal(cross(front.normal(), up.normal()))
            .expect("perpendicular unit vectors have a unit cross product");
        let side = match side_bias {
            SideBias::Right => toward,
            SideBias::Left => toward.opposite(),
        };
        Ok(Self {
            index,
            up,
            front,
            side,
            side_bias,
            directions: [
                front.opposite(),
                front,
                side,
                side.opposite(),
                up.opposite(),
                up,
            ],
            with_front: [0; 6],
            with_up: [0; 6],
            with_side_bias: [0; 2],
        })
    }
}

/// Dense index of `(up, front, side_bias)` in `0..48`.
fn frame_index(up: Direction, front: Direction, side_bias: SideBias) -> Result<usize, OrientationError> {
    if up.axis() == front.axis() {
        return Err(OrientationError::SharedAxis { up, front });
    }
    let plane = if up.axis().is_vertical() {
        front.axis() == Axis::X
    } else {
        front.axis() == Axis::Y
    };
    let local = (usize::from(plane) << 1) | front.axis_direction().ordinal();
    Ok((((up.ordinal() << 2) + local) << 1) + side_bias.ordinal())
}

static FRAMES: LazyLock<[Frame; ORIENTATION_COUNT]> = LazyLock::new(build_frames);

/// Closes the transition graph from the seed frame, filling every
/// `with_front` / `with_up` / `with_side_bias` entry.
fn build_frames() -> [Frame; ORIENTATION_COUNT] {
    let mut slots: [Option<Frame>; ORIENTATION_COUNT] = [None; ORIENTATION_COUNT];
    let mut pending = Vec::with_capacity(ORIENTATION_COUNT);
    visit(&mut slots, &mut pending, Direction::Up, Direction::North, SideBias::Left);

    while let Some(idx) = pending.pop() {
        let Some(frame) = slots[idx] else { continue };
        let (up, front, bias) = (frame.up, frame.front, frame.side_bias);

        let mut with_side_bias = [0u8; 2];
        for b in SideBias::ALL {
            with_side_bias[b.ordinal()] = visit(&mut slots, &mut pending, up, front, b);
        }

        let mut with_front = [0u8; 6];
        for d in Direction::ALL {
            let new_up = if d == up {
                front.opposite()
            } else if d == up.opposite() {
                front
            } else {
                up
            };
            with_front[d.ordinal()] = visit(&mut slots, &mut pending, new_up, d, bias);
        }

        let mut with_up = [0u8; 6];
        for d in Direction::ALL {
            let new_front = if d == front {
                up.opposite()
            } else if d == front.opposite() {
                up
            } else {
                front
            };
            with_up[d.ordinal()] = visit(&mut slots, &mut pending, d, new_front, bias);
        }

        if let Some(slot) = slots[idx].as_mut() {
            slot.with_side_bias = with_side_bias;
            slot.with_front = with_front;
            slot.with_up = with_up;
        }
    }

    slots.map(|slot| slot.expect("orientation closure reaches every frame"))
}

fn visit(
    slots: &mut [Option<Frame>; ORIENTATION_COUNT],
    pending: &mut Vec<usize>,
    up: Direction,
    front: Direction,
    side_bias: SideBias,
) -> u8 {
    let frame = Frame::new(up, front, side_bias)
        .expect("transitions keep up and front on different axes");
    let idx = frame.index as usize;
    if slots[idx].is_none() {
        slots[idx] = Some(frame);
        pending.push(idx);
    }
    idx as u8
}

/// An interned directional frame.
///
/// Cheap to copy and compare; all accessors and transitions read the
/// shared table.
///
/// # Examples
///
/// ```
/// use redwire_core::{Direction, Orientation, SideBias};
///
/// let o = Orientation::of(Direction::Up, Direction::North, SideBias::Left);
/// assert_eq!(o.side(), Direction::West);
///
/// let turned = o.with_front(Direction::East);
/// assert_eq!(turned.up(), Direction::Up);
/// assert_eq!(turned.front(), Direction::East);
/// assert_eq!(Orientation::from_index(turned.index()), Some(turned));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation(u8);

impl Orientation {
    /// The canonical frame for `(up, front, side_bias)`.
    ///
    /// # Panics
    ///
    /// Panics if `up` and `front` lie on the same axis. Use
    /// [`try_of`](Self::try_of) for a fallible variant.
    pub fn of(up: Direction, front: Direction, side_bias: SideBias) -> Orientation {
        match Self::try_of(up, front, side_bias) {
            Ok(o) => o,
            Err(e) => panic!("{e}"),
        }
    }

    /// The canonical frame for `(up, front, side_bias)`, or an error if
    /// `up` and `front` share an axis.
    pub fn try_of(
        up: Direction,
        front: Direction,
        side_bias: SideBias,
    ) -> Result<Orientation, OrientationError> {
        frame_index(up, front, side_bias).map(|i| Orientation(i as u8))
    }

    /// The frame with the given dense index, if `index < 48`.
    pub fn from_index(index: usize) -> Option<Orientation> {
        (index < ORIENTATION_COUNT).then_some(Orientation(index as u8))
    }

    /// Uniformly random frame.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Orientation {
        Orientation(rng.gen_range(0..ORIENTATION_COUNT as u8))
    }

    /// Every frame in index order.
    pub fn all() -> impl Iterator<Item = Orientation> {
        (0..ORIENTATION_COUNT as u8).map(Orientation)
    }

    fn frame(self) -> &'static Frame {
        &FRAMES[self.0 as usize]
    }

    /// Dense index in `0..48`.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The up vector.
    pub fn up(self) -> Direction {
        self.frame().up
    }

    /// The front vector.
    pub fn front(self) -> Direction {
        self.frame().front
    }

    /// The derived side vector.
    pub fn side(self) -> Direction {
        self.frame().side
    }

    /// Which perpendicular the side was taken from.
    pub fn side_bias(self) -> SideBias {
        self.frame().side_bias
    }

    /// Same frame rotated so `up` points along `up`.
    pub fn with_up(self, up: Direction) -> Orientation {
        Orientation(self.frame().with_up[up.ordinal()])
    }

    /// Same frame rotated so `front` points along `front`.
    pub fn with_front(self, front: Direction) -> Orientation {
        Orientation(self.frame().with_front[front.ordinal()])
    }

    /// Like [`with_front`](Self::with_front), but a no-op when `front`
    /// lies on the up axis.
    pub fn with_front_preserve_up(self, front: Direction) -> Orientation {
        if front.axis() == self.up().axis() {
            self
        } else {
            self.with_front(front)
        }
    }

    /// Like [`with_front`](Self::with_front), flipping the side bias when
    /// the new front lands on the current side.
    pub fn with_front_adjust_side_bias(self, front: Direction) -> Orientation {
        let turned = self.with_front(front);
        if front == self.side() {
            turned.with_mirror()
        } else {
            turned
        }
    }

    /// Same up and front with the given bias.
    pub fn with_side_bias(self, side_bias: SideBias) -> Orientation {
        Orientation(self.frame().with_side_bias[side_bias.ordinal()])
    }

    /// Same up and front with the bias flipped.
    pub fn with_mirror(self) -> Orientation {
        self.with_side_bias(self.side_bias().opposite())
    }

    /// All six directions: front-opposite, front, side, side-opposite,
    /// up-opposite, up.
    pub fn directions(self) -> &'static [Direction; 6] {
        &self.frame().directions
    }

    /// The four directions not on the up axis, in [`directions`](Self::directions) order.
    pub fn horizontal_directions(self) -> &'static [Direction] {
        &self.frame().directions[..4]
    }

    /// The two directions on the up axis, in [`directions`](Self::directions) order.
    pub fn vertical_directions(self) -> &'static [Direction] {
        &self.frame().directions[4..]
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[up={},front={},sideBias={}]",
            self.up(),
            self.front(),
            self.side_bias()
        )
    }
}

impl fmt::Debug for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Orientation#{}{}", self.0, self)
    }
}
