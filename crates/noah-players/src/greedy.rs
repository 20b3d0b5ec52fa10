//! Nearest-animal collector.
//!
//! A greedy player fills its flock from the closest animals it can see and
//! brings them home when it is full, when nothing else is in sight, or as
//! soon as the rain starts. In its own cell it prefers animals whose
//! species and gender are neither carried nor known to be on the ark.
//!
//! What is on the ark is only learned while docked, from the ark view.

use std::collections::BTreeSet;

use noah_agents::move_towards;
use noah_core::{Player, PlayerInit, Snapshot};
use noah_types::{Action, Animal, AnimalId, CellView, Gender, Kind, Message, Position, SpeciesId};
use noah_world::Rules;
use tracing::debug;

use crate::scan;

/// Collects the nearest animals and returns before the flood.
#[derive(Debug)]
pub struct GreedyPlayer {
    init: PlayerInit,
    delivered: BTreeSet<(SpeciesId, Gender)>,
    last: Option<Snapshot>,
}

impl GreedyPlayer {
    /// Create a greedy player.
    pub fn new(init: &PlayerInit) -> Self {
        Self {
            init: init.clone(),
            delivered: BTreeSet::new(),
            last: None,
        }
    }

    /// Registry factory.
    pub fn boxed(init: &PlayerInit) -> Box<dyn Player> {
        Box::new(Self::new(init))
    }

    const fn rules(&self) -> &Rules {
        &self.init.rules
    }

    fn home(&self) -> Position {
        self.init.ark.corner()
    }

    fn is_docked(&self, here: Position) -> bool {
        here.approx_eq(self.home(), self.rules().ark_epsilon)
    }

    fn head_home(&self, here: Position) -> Option<Action> {
        if self.is_docked(here) {
            None
        } else {
            Some(self.step_towards(here, self.home()))
        }
    }

    fn step_towards(&self, from: Position, to: Position) -> Action {
        Action::move_to(move_towards(from, to, self.rules().max_step))
    }

    fn is_wanted(&self, species: SpeciesId, gender: Gender, flock: &[Animal]) -> bool {
        !self.delivered.contains(&(species, gender))
            && !flock
                .iter()
                .any(|a| a.species == species && a.gender == gender)
    }

    /// Pick an animal to obtain in the own cell, wanted ones first.
    fn pick(&self, view: &CellView, flock: &[Animal]) -> Option<AnimalId> {
        let revealed = || view.animals.iter().filter(|a| a.id.is_some());
        revealed()
            .find(|a| self.is_wanted(a.species, a.gender, flock))
            .or_else(|| revealed().next())
            .and_then(|a| a.id)
    }
}

impl Player for GreedyPlayer {
    fn observe(&mut self, snapshot: &Snapshot) -> u32 {
        if let Some(ark) = &snapshot.ark_view {
            self.delivered = ark.animals.iter().map(|a| (a.species, a.gender)).collect();
        }
        self.last = Some(snapshot.clone());
        u32::try_from(snapshot.flock.len()).unwrap_or(u32::MAX)
    }

    fn act(&mut self, _messages: &[Message]) -> Option<Action> {
        if matches!(self.init.kind, Kind::Noah) {
            return None;
        }
        let snapshot = self.last.take()?;
        let here = snapshot.position;
        let flock = &snapshot.flock;

        if snapshot.is_raining || flock.len() >= self.rules().flock_capacity {
            return self.head_home(here);
        }

        if let Some(animal) = snapshot
            .sight
            .own_cell_view()
            .and_then(|view| self.pick(view, flock))
        {
            debug!(helper = %self.init.id, %animal, "Obtaining");
            return Some(Action::Obtain(animal));
        }

        if let Some(cell) = scan::nearest_animal_cell(&snapshot.sight, here) {
            return Some(self.step_towards(here, cell.center()));
        }

        self.head_home(here)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use noah_types::{ArkView, CellCoord, HelperId};
    use noah_world::{AnimalArena, Grid, Sight};

    use super::*;

    fn init(id: u32) -> PlayerInit {
        let id = HelperId::new(id);
        PlayerInit {
            id,
            kind: if id.is_noah() { Kind::Noah } else { Kind::Helper },
            ark: CellCoord::new(0, 0),
            num_helpers: 2,
            species_populations: BTreeMap::new(),
            rules: Rules {
                width: 30,
                height: 30,
                ..Rules::default()
            },
            seed: 0,
        }
    }

    fn snapshot(position: Position, grid: &Grid, arena: &AnimalArena) -> Snapshot {
        Snapshot {
            time_elapsed: 0,
            is_raining: false,
            position,
            sight: Sight::new(position, 5.0, grid, arena).unwrap(),
            flock: Vec::new(),
            ark_view: None,
        }
    }

    fn animal(id: u32, species: u32, gender: Gender) -> Animal {
        Animal {
            id: AnimalId::new(id),
            species: SpeciesId::new(species),
            gender,
        }
    }

    #[test]
    fn rain_sends_everyone_home() {
        let grid = Grid::new(30, 30).unwrap();
        let arena = AnimalArena::new();
        let mut snap = snapshot(Position::new(6.0, 8.0), &grid, &arena);
        snap.is_raining = true;

        let mut player = GreedyPlayer::new(&init(1));
        player.observe(&snap);
        let action = player.act(&[]).unwrap();
        assert!(matches!(action, Action::Move { .. }));
        if let Action::Move { x, y } = action {
            // One step along the line from (6, 8) to the origin.
            assert!((x - 6.0 * (1.0 - 0.0999)).abs() < 1e-9);
            assert!((y - 8.0 * (1.0 - 0.0999)).abs() < 1e-9);
        }
    }

    #[test]
    fn docked_with_nothing_in_sight_idles() {
        let grid = Grid::new(30, 30).unwrap();
        let arena = AnimalArena::new();
        let mut player = GreedyPlayer::new(&init(1));
        player.observe(&snapshot(Position::new(0.0, 0.0), &grid, &arena));
        assert_eq!(player.act(&[]), None);
    }

    #[test]
    fn prefers_missing_gender_in_own_cell() {
        let mut grid = Grid::new(30, 30).unwrap();
        let mut arena = AnimalArena::new();
        let male = arena.spawn(SpeciesId::new(0), Gender::Male).unwrap();
        let female = arena.spawn(SpeciesId::new(0), Gender::Female).unwrap();
        grid.place_animal(CellCoord::new(3, 3), male).unwrap();
        grid.place_animal(CellCoord::new(3, 3), female).unwrap();

        let mut snap = snapshot(Position::new(3.5, 3.5), &grid, &arena);
        snap.flock.push(animal(9, 0, Gender::Male));

        let mut player = GreedyPlayer::new(&init(1));
        player.observe(&snap);
        assert_eq!(player.act(&[]), Some(Action::Obtain(female)));
    }

    #[test]
    fn ark_view_updates_what_is_delivered() {
        let mut grid = Grid::new(30, 30).unwrap();
        let mut arena = AnimalArena::new();
        let female = arena.spawn(SpeciesId::new(2), Gender::Female).unwrap();
        let male = arena.spawn(SpeciesId::new(2), Gender::Male).unwrap();
        grid.place_animal(CellCoord::new(0, 0), female).unwrap();
        grid.place_animal(CellCoord::new(0, 0), male).unwrap();

        let mut snap = snapshot(Position::new(0.0, 0.0), &grid, &arena);
        snap.ark_view = Some(ArkView {
            position: CellCoord::new(0, 0),
            animals: vec![animal(40, 2, Gender::Male)],
        });

        let mut player = GreedyPlayer::new(&init(1));
        player.observe(&snap);
        assert_eq!(player.act(&[]), Some(Action::Obtain(female)));
    }

    #[test]
    fn full_flock_goes_home() {
        let mut grid = Grid::new(30, 30).unwrap();
        let mut arena = AnimalArena::new();
        let loose = arena.spawn(SpeciesId::new(1), Gender::Male).unwrap();
        grid.place_animal(CellCoord::new(2, 0), loose).unwrap();

        let mut snap = snapshot(Position::new(2.5, 0.5), &grid, &arena);
        let capacity = u32::try_from(init(1).rules.flock_capacity).unwrap();
        snap.flock = (0..capacity).map(|i| animal(i, 0, Gender::Male)).collect();

        let mut player = GreedyPlayer::new(&init(1));
        player.observe(&snap);
        assert!(matches!(player.act(&[]), Some(Action::Move { .. })));
    }

    #[test]
    fn noah_stays_put() {
        let grid = Grid::new(30, 30).unwrap();
        let arena = AnimalArena::new();
        let mut snap = snapshot(Position::new(0.0, 0.0), &grid, &arena);
        snap.is_raining = true;
        let mut noah = GreedyPlayer::new(&init(0));
        noah.observe(&snap);
        assert_eq!(noah.act(&[]), None);
    }
}
