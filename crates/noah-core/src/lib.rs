//! Turn clock, turn engine, and orchestration for the Noah's Ark simulation.
//!
//! This crate owns the per-turn protocol: snapshots go out, one-byte
//! messages are exchanged, actions come back and are validated, contested
//! obtains are resolved, and free animals wander.
//!
//! # Modules
//!
//! - [`clock`] -- Turn counter and the rain deadline.
//! - [`config`] -- Configuration loading from `noah-config.yaml` into
//!   strongly-typed structs.
//! - [`messaging`] -- Communication graph and message routing.
//! - [`player`] -- [`Player`] trait, [`PlayerInit`], and [`IdlePlayer`].
//! - [`runner`] -- Runs a simulation to completion.
//! - [`setup`] -- Seeded world generation.
//! - [`snapshot`] -- Per-helper snapshot assembly.
//! - [`tick`] -- The turn cycle engine loop.
//!
//! [`Player`]: player::Player
//! [`PlayerInit`]: player::PlayerInit
//! [`IdlePlayer`]: player::IdlePlayer

pub mod clock;
pub mod config;
pub mod messaging;
pub mod player;
pub mod runner;
pub mod setup;
pub mod snapshot;
pub mod tick;

pub use player::{IdlePlayer, Player, PlayerFactory, PlayerInit};
pub use snapshot::Snapshot;
