//! Error types for the `noah-world` crate.
//!
//! Grid mutations return [`WorldError`]. Sight queries return the separate
//! [`SightError`]: asking a sight for a cell it does not cover is a caller
//! contract breach on a query API, not a turn-resolution failure.

use noah_types::{AnimalId, CellCoord, HelperId};

/// Errors that can occur during grid and ark operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The grid dimensions are unusable.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A coordinate lies outside the grid.
    #[error("cell {coord} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The offending coordinate.
        coord: CellCoord,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// An animal handle does not exist in the arena.
    #[error("unknown animal {0}")]
    UnknownAnimal(AnimalId),

    /// The animal is not free in the given cell.
    #[error("animal {animal} is not free in cell {coord}")]
    AnimalNotInCell {
        /// The animal.
        animal: AnimalId,
        /// The cell that was expected to hold it.
        coord: CellCoord,
    },

    /// The helper is not registered in the given cell.
    #[error("helper {helper} is not in cell {coord}")]
    HelperNotInCell {
        /// The helper.
        helper: HelperId,
        /// The cell that was expected to hold it.
        coord: CellCoord,
    },

    /// The arena cannot hand out more handles.
    #[error("animal arena is full")]
    ArenaFull,
}

/// Errors raised by [`Sight`](crate::Sight) queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SightError {
    /// The requested cell is not within the observer's sight.
    #[error("coordinate ({x}, {y}) is not in sight")]
    OutOfSight {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
    },
}
