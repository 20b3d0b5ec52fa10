//! Core value types: continuous positions, integer cell coordinates, and
//! ground-truth animal records.

use serde::{Deserialize, Serialize};

use crate::enums::Gender;
use crate::ids::{AnimalId, SpeciesId};

/// Integer coordinate of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    /// Column, growing east.
    pub x: u32,
    /// Row, growing south.
    pub y: u32,
}

impl CellCoord {
    /// Create a coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The cell's corner as a continuous position.
    pub fn corner(self) -> Position {
        Position::new(f64::from(self.x), f64::from(self.y))
    }

    /// The cell's center as a continuous position.
    pub fn center(self) -> Position {
        Position::new(f64::from(self.x) + 0.5, f64::from(self.y) + 0.5)
    }
}

impl core::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A continuous position on the map, in kilometres.
///
/// Helpers move with sub-cell precision; the cell they occupy is
/// `(floor(x), floor(y))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// East-west coordinate.
    pub x: f64,
    /// North-south coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// The cell containing this position.
    ///
    /// Negative coordinates clamp to 0; callers validate bounds separately.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cell(self) -> CellCoord {
        // Float-to-int `as` casts saturate, so out-of-range values clamp.
        CellCoord::new(self.x.floor() as u32, self.y.floor() as u32)
    }

    /// Whether both coordinates lie within `epsilon` of `other`.
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Ground-truth animal record.
///
/// Identity is the arena handle `id`, never the `(species, gender)` pair:
/// many animals share the same species and gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Animal {
    /// Arena handle.
    pub id: AnimalId,
    /// Species of the animal.
    pub species: SpeciesId,
    /// Real gender; never `Unknown`.
    pub gender: Gender,
}
