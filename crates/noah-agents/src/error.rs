//! Error types for the noah-agents crate.
//!
//! A [`ProtocolViolation`] means a strategy broke the turn contract. The
//! engine treats every violation as fatal: the run aborts and the error
//! names the offending helper.

use noah_types::{AnimalId, CellCoord, HelperId, Position};

/// A strategy broke one of the per-turn invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolViolation {
    /// The move target is out of bounds or farther than one step.
    #[error("helper {helper} made an illegal move from {from} to {to}")]
    IllegalMove {
        /// Offending helper.
        helper: HelperId,
        /// Position before the move.
        from: Position,
        /// Requested target.
        to: Position,
    },

    /// The animal is not free in the helper's current cell.
    #[error("helper {helper} tried to obtain animal {animal} which is not in cell {cell}")]
    ObtainNotInCell {
        /// Offending helper.
        helper: HelperId,
        /// Requested animal.
        animal: AnimalId,
        /// The helper's cell.
        cell: CellCoord,
    },

    /// Obtain was requested with a full flock.
    #[error("helper {helper} tried to obtain with a full flock (capacity {capacity})")]
    FlockFull {
        /// Offending helper.
        helper: HelperId,
        /// Flock capacity.
        capacity: usize,
    },

    /// The released animal is not in the helper's flock.
    #[error("helper {helper} tried to release animal {animal} which is not in its flock")]
    ReleaseNotInFlock {
        /// Offending helper.
        helper: HelperId,
        /// Requested animal.
        animal: AnimalId,
    },

    /// Noah returned an action other than no-op.
    #[error("Noah ({helper}) must not act, but returned a {action} action")]
    NoahActed {
        /// Noah's id.
        helper: HelperId,
        /// Kind of the returned action.
        action: &'static str,
    },

    /// The observation callback returned a value that is not a byte.
    #[error("helper {helper} returned message {value}, outside 0..=255")]
    MessageOutOfRange {
        /// Offending helper.
        helper: HelperId,
        /// Raw returned value.
        value: u32,
    },
}

impl ProtocolViolation {
    /// The helper that broke the protocol.
    pub const fn helper(&self) -> HelperId {
        match self {
            Self::IllegalMove { helper, .. }
            | Self::ObtainNotInCell { helper, .. }
            | Self::FlockFull { helper, .. }
            | Self::ReleaseNotInFlock { helper, .. }
            | Self::NoahActed { helper, .. }
            | Self::MessageOutOfRange { helper, .. } => *helper,
        }
    }
}
