//! Error types for the redwire engine.
//!
//! Organized by subsystem: orientation construction, host-world block
//! reactions, and the update pipeline that carries both.

use crate::direction::Direction;
use crate::pos::BlockPos;
use crate::state::{BlockKind, BlockState};
use std::error::Error;
use std::fmt;

/// Errors from building an [`Orientation`](crate::Orientation).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrientationError {
    /// `up` and `front` lie on the same axis, so no frame exists.
    SharedAxis {
        /// Requested up vector.
        up: Direction,
        /// Requested front vector.
        front: Direction,
    },
}

impl fmt::Display for OrientationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SharedAxis { up, front } => {
                write!(f, "up ({up}) and front ({front}) can not be on the same axis")
            }
        }
    }
}

impl Error for OrientationError {}

/// A failure raised by the host world while a block reacts to an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockError {
    /// Human-readable description of the failure.
    pub reason: String,
}

impl BlockError {
    /// Create a block error from any message.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl Error for BlockError {}

/// Errors that abort an update transaction.
///
/// Any of these escaping a scheduler means the transaction stopped at the
/// failing notification; nothing queued behind it ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateError {
    /// A block failed while reacting to a neighbour change.
    NeighborUpdateFailed {
        /// Kind of the block that caused the notification.
        source_kind: BlockKind,
        /// Position of the block being updated.
        pos: BlockPos,
        /// State of the block being updated.
        state: BlockState,
        /// The underlying failure.
        reason: Box<UpdateError>,
    },
    /// A block failed while recomputing its shape.
    ShapeUpdateFailed {
        /// Position of the block being re-shaped.
        pos: BlockPos,
        /// Side the change came from.
        direction: Direction,
        /// The underlying failure.
        reason: Box<UpdateError>,
    },
    /// Propagation bookkeeping reached an impossible state.
    InvariantViolation {
        /// Position being processed when the violation was detected.
        pos: BlockPos,
        /// What went wrong.
        reason: String,
    },
    /// The host world rejected an operation.
    Block(BlockError),
}

impl UpdateError {
    /// Attach neighbour-update context, unless already attached further in.
    pub fn in_neighbor_update(self, source_kind: BlockKind, pos: BlockPos, state: BlockState) -> Self {
        match self {
            wrapped @ Self::NeighborUpdateFailed { .. } => wrapped,
            other => Self::NeighborUpdateFailed {
                source_kind,
                pos,
                state,
                reason: Box::new(other),
            },
        }
    }

    /// Attach shape-update context, unless any context is already attached.
    pub fn in_shape_update(self, pos: BlockPos, direction: Direction) -> Self {
        match self {
            wrapped @ (Self::NeighborUpdateFailed { .. } | Self::ShapeUpdateFailed { .. }) => wrapped,
            other => Self::ShapeUpdateFailed {
                pos,
                direction,
                reason: Box::new(other),
            },
        }
    }
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeighborUpdateFailed {
                source_kind,
                pos,
                state,
                reason,
            } => write!(
                f,
                "exception while updating neighbours: {state} at {pos} (source {source_kind}): {reason}"
            ),
            Self::ShapeUpdateFailed {
                pos,
                direction,
                reason,
            } => write!(f, "shape update at {pos} from {direction} failed: {reason}"),
            Self::InvariantViolation { pos, reason } => {
                write!(f, "invariant violated at {pos}: {reason}")
            }
            Self::Block(e) => write!(f, "block error: {e}"),
        }
    }
}

impl Error for UpdateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NeighborUpdateFailed { reason, .. } | Self::ShapeUpdateFailed { reason, .. } => {
                Some(reason.as_ref())
            }
            Self::Block(e) => Some(e),
            Self::InvariantViolation { .. } => None,
        }
    }
}

impl From<BlockError> for UpdateError {
    fn from(e: BlockError) -> Self {
        Self::Block(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_context_is_attached_once() {
        let inner = UpdateError::from(BlockError::new("boom"));
        let once = inner.in_neighbor_update(BlockKind(5), BlockPos::new(1, 2, 3), BlockState::wire(4));
        let twice = once
            .clone()
            .in_neighbor_update(BlockKind(6), BlockPos::ORIGIN, BlockState::AIR);
        assert_eq!(once, twice);
        assert!(once.to_string().contains("1, 2, 3"));
        assert!(once.to_string().contains("boom"));
    }

    #[test]
    fn source_chain_reaches_block_error() {
        let e = UpdateError::from(BlockError::new("bad"))
            .in_shape_update(BlockPos::ORIGIN, Direction::Up);
        let inner = e.source().unwrap();
        assert!(inner.to_string().contains("bad"));
    }
}
