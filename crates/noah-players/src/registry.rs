//! Strategy lookup by short key.
//!
//! The engine binary selects the strategy every helper runs with a one-letter
//! key such as `r`. Keys are matched exactly.

use noah_core::{IdlePlayer, PlayerFactory};

use crate::greedy::GreedyPlayer;
use crate::random::RandomPlayer;

/// Every registered strategy, by key.
pub const PLAYERS: &[(&str, PlayerFactory)] = &[
    ("r", RandomPlayer::boxed),
    ("i", IdlePlayer::boxed),
    ("g", GreedyPlayer::boxed),
];

/// Find the factory registered under `key`.
pub fn lookup(key: &str) -> Option<PlayerFactory> {
    PLAYERS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, factory)| factory)
}

/// Registered keys, in registration order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    PLAYERS.iter().map(|&(name, _)| name)
}
