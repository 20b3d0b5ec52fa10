//! Helper state, movement, and action rules for the Noah's Ark simulation.
//!
//! This crate holds the logic that operates on helper state without driving
//! the turn loop. It sits between `noah-world` (grid, sight, ark) and
//! `noah-core` (the engine that sequences turns).
//!
//! # Modules
//!
//! - [`actions`] -- Action validation and obtain conflict resolution.
//! - [`error`] -- [`ProtocolViolation`], the fatal strategy contract breaches.
//! - [`helper`] -- [`HelperState`], the engine-owned record of a helper.
//! - [`movement`] -- Move legality and stepping towards a target.

pub mod actions;
pub mod error;
pub mod helper;
pub mod movement;

// Re-export primary types at crate root for convenience.
pub use actions::conflict::{ObtainBook, ObtainClaim, resolve_obtain_conflict};
pub use actions::validation::{ValidatedAction, validate_action};
pub use error::ProtocolViolation;
pub use helper::{HelperState, flock_index};
pub use movement::{can_move_to, move_towards};
