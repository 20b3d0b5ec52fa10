//! The strategy contract and the idle strategy.
//!
//! During each turn the engine calls [`Player::observe`] on every helper,
//! routes the returned bytes, then calls [`Player::act`] with the messages
//! the helper received. Anything that implements [`Player`] can drive a
//! helper, including the scripted stubs used in tests.
//!
//! Strategies are built through a [`PlayerFactory`] from a [`PlayerInit`]
//! that carries everything a helper knows before the first turn. Per-helper
//! state lives in the strategy value itself; the engine offers no other
//! shared channel between helpers besides messages.

use std::collections::BTreeMap;

use noah_types::{Action, CellCoord, HelperId, Kind, Message, SpeciesId};
use noah_world::Rules;

use crate::snapshot::Snapshot;

/// A pluggable helper strategy.
pub trait Player {
    /// Inspect this turn's snapshot and return the message to broadcast.
    ///
    /// Values above 255 are masked or rejected according to the configured
    /// message policy.
    fn observe(&mut self, snapshot: &Snapshot) -> u32;

    /// Choose this turn's action given the messages received. `None` is the
    /// no-op; Noah must always return `None`.
    fn act(&mut self, messages: &[Message]) -> Option<Action>;
}

/// Everything a strategy knows at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInit {
    /// Helper id; 0 is Noah.
    pub id: HelperId,
    /// Role derived from the id.
    pub kind: Kind,
    /// Ark cell, which is also the starting position.
    pub ark: CellCoord,
    /// Total helpers including Noah.
    pub num_helpers: u32,
    /// Initial population of each species.
    pub species_populations: BTreeMap<SpeciesId, u32>,
    /// World constants.
    pub rules: Rules,
    /// Seed for the strategy's private random generator.
    pub seed: u64,
}

/// Constructor for a strategy; the registry maps keys to these.
pub type PlayerFactory = fn(&PlayerInit) -> Box<dyn Player>;

/// A strategy that broadcasts 0 and never acts.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePlayer;

impl IdlePlayer {
    /// Create an idle player.
    pub const fn new() -> Self {
        Self
    }

    /// [`PlayerFactory`] for idle players.
    pub fn boxed(_init: &PlayerInit) -> Box<dyn Player> {
        Box::new(Self)
    }
}

impl Player for IdlePlayer {
    fn observe(&mut self, _snapshot: &Snapshot) -> u32 {
        0
    }

    fn act(&mut self, _messages: &[Message]) -> Option<Action> {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use noah_types::{HelperView, Position};
    use noah_world::{AnimalArena, Grid, Sight};

    use super::*;

    #[test]
    fn idle_player_never_acts() {
        let grid = Grid::new(3, 3).unwrap();
        let arena = AnimalArena::new();
        let snapshot = Snapshot {
            time_elapsed: 0,
            is_raining: false,
            position: Position::new(1.0, 1.0),
            sight: Sight::new(Position::new(1.0, 1.0), 5.0, &grid, &arena).unwrap(),
            flock: Vec::new(),
            ark_view: None,
        };
        let message = Message {
            from: HelperView::of(HelperId::new(2)),
            contents: 9,
        };

        let mut player = IdlePlayer::new();
        assert_eq!(player.observe(&snapshot), 0);
        assert_eq!(player.act(&[message]), None);
    }
}
