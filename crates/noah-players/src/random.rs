//! The baseline strategy.
//!
//! A random player carries whatever it finds straight home: with a flock it
//! heads for the ark, otherwise it grabs a random animal in its own cell,
//! walks towards the nearest visible animal, or wanders. It broadcasts
//! `(turn + id) & 0xFF` and ignores what it hears.

use noah_agents::{can_move_to, move_towards};
use noah_core::{Player, PlayerInit, Snapshot};
use noah_types::{Action, AnimalId, CellCoord, HelperId, Kind, Message, Position};
use noah_world::Rules;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::scan;

/// Attempts at drawing an in-bounds wander step before giving up the turn.
const MAX_WANDER_ATTEMPTS: u32 = 32;

/// Wanders, grabs, and returns to the ark.
#[derive(Debug)]
pub struct RandomPlayer {
    id: HelperId,
    kind: Kind,
    ark: CellCoord,
    rules: Rules,
    rng: StdRng,
    last: Option<Snapshot>,
}

impl RandomPlayer {
    /// Create a random player seeded from `init`.
    pub fn new(init: &PlayerInit) -> Self {
        Self {
            id: init.id,
            kind: init.kind,
            ark: init.ark,
            rules: init.rules.clone(),
            rng: StdRng::seed_from_u64(init.seed),
            last: None,
        }
    }

    /// Registry factory.
    pub fn boxed(init: &PlayerInit) -> Box<dyn Player> {
        Box::new(Self::new(init))
    }

    fn wander(&mut self, from: Position) -> Option<Position> {
        (0..MAX_WANDER_ATTEMPTS).find_map(|_| {
            let dx = self.rng.random::<f64>() - 0.5;
            let dy = self.rng.random::<f64>() - 0.5;
            let target = Position::new(from.x + dx, from.y + dy);
            can_move_to(from, target, &self.rules).then_some(target)
        })
    }

    fn step_towards(&self, from: Position, to: Position) -> Action {
        Action::move_to(move_towards(from, to, self.rules.max_step))
    }
}

impl Player for RandomPlayer {
    fn observe(&mut self, snapshot: &Snapshot) -> u32 {
        self.last = Some(snapshot.clone());
        snapshot.time_elapsed.wrapping_add(self.id.into_inner()) & 0xFF
    }

    fn act(&mut self, _messages: &[Message]) -> Option<Action> {
        if matches!(self.kind, Kind::Noah) {
            return None;
        }
        let snapshot = self.last.take()?;
        let here = snapshot.position;

        if !snapshot.flock.is_empty() {
            return Some(self.step_towards(here, self.ark.corner()));
        }

        let in_cell: Vec<AnimalId> = snapshot
            .sight
            .own_cell_view()
            .map(|view| view.obtainable().collect())
            .unwrap_or_default();
        if let Some(&animal) = in_cell.choose(&mut self.rng) {
            return Some(Action::Obtain(animal));
        }

        if let Some(cell) = scan::nearest_animal_cell(&snapshot.sight, here) {
            return Some(self.step_towards(here, cell.center()));
        }

        self.wander(here).map(Action::move_to)
    }
}
