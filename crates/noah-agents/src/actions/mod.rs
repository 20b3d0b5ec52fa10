//! Action validation and conflict resolution for helper actions.
//!
//! # Submodules
//!
//! - [`validation`] -- Checks a proposed action against ground truth.
//! - [`conflict`] -- Resolves several helpers obtaining the same animal.

pub mod conflict;
pub mod validation;
