//! Shared type definitions for the Noah's Ark simulation.
//!
//! This crate is the single source of truth for the values exchanged between
//! the world model, the turn engine, and the pluggable player strategies.
//!
//! # Modules
//!
//! - [`ids`] -- Integer handle wrappers for animals, helpers, and species
//! - [`enums`] -- Gender and helper role enumerations
//! - [`structs`] -- Core value types (positions, cell coordinates, animals)
//! - [`actions`] -- The action a helper proposes each turn
//! - [`views`] -- Redacted, read-only renderings handed to strategies

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;
pub mod views;

// Re-export all public types at crate root for convenience.
pub use actions::Action;
pub use enums::{Gender, Kind};
pub use ids::{AnimalId, HelperId, SpeciesId};
pub use structs::{Animal, CellCoord, Position};
pub use views::{ArkView, CellView, HelperView, Message, VisibleAnimal};
