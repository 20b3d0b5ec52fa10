//! Reference helper strategies for the Noah's Ark simulation.
//!
//! # Modules
//!
//! - [`registry`] -- Maps short command-line keys to strategy factories.
//! - [`random`] -- [`RandomPlayer`], the baseline wanderer.
//! - [`greedy`] -- [`GreedyPlayer`], a nearest-animal collector that heads
//!   home when the rain starts.
//!
//! [`RandomPlayer`]: random::RandomPlayer
//! [`GreedyPlayer`]: greedy::GreedyPlayer

pub mod greedy;
pub mod random;
pub mod registry;

mod scan;

pub use greedy::GreedyPlayer;
pub use random::RandomPlayer;
pub use registry::lookup;
