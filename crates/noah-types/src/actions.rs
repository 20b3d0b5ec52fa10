//! The action a helper proposes to the engine each turn.
//!
//! Strategies return `Option<Action>`; `None` is the no-op. The engine never
//! trusts an action blindly: every variant is validated against ground
//! truth before it is applied.

use serde::{Deserialize, Serialize};

use crate::ids::AnimalId;
use crate::structs::Position;

/// A single discrete action proposed by a helper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Move to the given continuous position.
    Move {
        /// Target east-west coordinate.
        x: f64,
        /// Target north-south coordinate.
        y: f64,
    },
    /// Pick up a free animal standing in the helper's cell.
    Obtain(AnimalId),
    /// Put down an animal from the helper's flock into its current cell.
    Release(AnimalId),
}

impl Action {
    /// Build a move to the given position.
    pub const fn move_to(target: Position) -> Self {
        Self::Move {
            x: target.x,
            y: target.y,
        }
    }

    /// Short lowercase name of the action kind, for logs and errors.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Obtain(_) => "obtain",
            Self::Release(_) => "release",
        }
    }
}
