//! Geography, animals, visibility, and scoring for the Noah's Ark simulation.
//!
//! This crate models the physical world: a fixed rectangular grid of cells
//! holding free animals and helpers, the arena that owns every animal record,
//! the sight disk through which helpers observe the grid, and the ark that
//! collects delivered animals and scores them.
//!
//! # Modules
//!
//! - [`arena`] -- [`AnimalArena`], the owner of all animal records.
//! - [`ark`] -- [`Ark`] delivery set and diversity scoring.
//! - [`error`] -- Error types for grid and sight operations.
//! - [`grid`] -- [`Grid`] and [`Cell`]: the lattice, occupancy, neighbors.
//! - [`rules`] -- [`Rules`], the tunable constants of the world.
//! - [`sight`] -- [`Sight`], the per-helper visible disk of cells.

pub mod arena;
pub mod ark;
pub mod error;
pub mod grid;
pub mod rules;
pub mod sight;

// Re-export primary types at crate root.
pub use arena::AnimalArena;
pub use ark::{Ark, GenderPresence, SpeciesCount};
pub use error::{SightError, WorldError};
pub use grid::{Cell, Grid};
pub use rules::Rules;
pub use sight::{FlockIndex, Sight};
