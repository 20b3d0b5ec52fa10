//! Tunable constants of the world.
//!
//! [`Rules`] bundles the grid geometry and every constant the turn protocol
//! depends on. It deserializes from the `rules` section of the simulation
//! configuration; every field has a default matching the standard game.

use noah_types::{CellCoord, Position};
use serde::Deserialize;

/// Geometry and protocol constants shared by the world, agents, and engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rules {
    /// Number of cell columns.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Number of cell rows.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Radius of the visibility disk, in kilometres.
    #[serde(default = "default_sight_radius")]
    pub sight_radius: f64,

    /// Maximum distance between two helpers that can exchange messages.
    #[serde(default = "default_communication_radius")]
    pub communication_radius: f64,

    /// Maximum distance a helper may move in one turn.
    #[serde(default = "default_max_step")]
    pub max_step: f64,

    /// Maximum number of animals a helper can carry.
    #[serde(default = "default_flock_capacity")]
    pub flock_capacity: usize,

    /// Tolerance used when deciding whether a helper stands on the ark.
    #[serde(default = "default_ark_epsilon")]
    pub ark_epsilon: f64,

    /// Per-turn probability that a free animal wanders to a neighbor cell.
    #[serde(default = "default_animal_move_probability")]
    pub animal_move_probability: f64,

    /// Score for a species with both genders on the ark.
    #[serde(default = "default_score_both_genders")]
    pub score_both_genders: u32,

    /// Score for a species with exactly one gender on the ark.
    #[serde(default = "default_score_single_gender")]
    pub score_single_gender: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            sight_radius: default_sight_radius(),
            communication_radius: default_communication_radius(),
            max_step: default_max_step(),
            flock_capacity: default_flock_capacity(),
            ark_epsilon: default_ark_epsilon(),
            animal_move_probability: default_animal_move_probability(),
            score_both_genders: default_score_both_genders(),
            score_single_gender: default_score_single_gender(),
        }
    }
}

impl Rules {
    /// Whether a continuous position lies inside `[0, width) x [0, height)`.
    pub fn contains(&self, position: Position) -> bool {
        (0.0..f64::from(self.width)).contains(&position.x)
            && (0.0..f64::from(self.height)).contains(&position.y)
    }

    /// Whether a cell coordinate lies inside the grid.
    pub const fn contains_cell(&self, coord: CellCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Number of whole cells the sight disk can reach along one axis.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sight_extent(&self) -> u32 {
        // Saturating float-to-int cast; a negative radius sees nothing extra.
        self.sight_radius.max(0.0).ceil() as u32
    }
}

const fn default_width() -> u32 {
    1000
}

const fn default_height() -> u32 {
    1000
}

const fn default_sight_radius() -> f64 {
    5.0
}

const fn default_communication_radius() -> f64 {
    5.0
}

const fn default_max_step() -> f64 {
    1.0
}

const fn default_flock_capacity() -> usize {
    4
}

const fn default_ark_epsilon() -> f64 {
    1e-6
}

const fn default_animal_move_probability() -> f64 {
    0.2
}

const fn default_score_both_genders() -> u32 {
    2
}

const fn default_score_single_gender() -> u32 {
    1
}
