//! Integration tests for the per-turn protocol.
//!
//! Each test drives [`run_turn`] with scripted players that replay fixed
//! actions and record every snapshot and inbox they receive. Worlds are
//! built by hand so positions and flocks are exact.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use noah_agents::ProtocolViolation;
use noah_core::Player;
use noah_core::clock::TurnClock;
use noah_core::config::MessagePolicy;
use noah_core::snapshot::Snapshot;
use noah_core::tick::{SimulationState, TurnError, run_turn};
use noah_types::{Action, AnimalId, CellCoord, Gender, HelperId, Message, Position, SpeciesId};
use noah_world::{Ark, Rules, SpeciesCount};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Default)]
struct Log {
    snapshots: Vec<Snapshot>,
    inboxes: Vec<Vec<Message>>,
}

struct Scripted {
    message: u32,
    actions: VecDeque<Option<Action>>,
    log: Rc<RefCell<Log>>,
}

impl Player for Scripted {
    fn observe(&mut self, snapshot: &Snapshot) -> u32 {
        self.log.borrow_mut().snapshots.push(snapshot.clone());
        self.message
    }

    fn act(&mut self, messages: &[Message]) -> Option<Action> {
        self.log.borrow_mut().inboxes.push(messages.to_vec());
        self.actions.pop_front().flatten()
    }
}

type Script = (u32, Vec<Option<Action>>);

fn cast(
    num_helpers: u32,
    mut scripts: BTreeMap<u32, Script>,
) -> (Vec<Box<dyn Player>>, Vec<Rc<RefCell<Log>>>) {
    let mut players: Vec<Box<dyn Player>> = Vec::new();
    let mut logs = Vec::new();
    for id in 0..num_helpers {
        let (message, actions) = scripts.remove(&id).unwrap_or_default();
        let log = Rc::new(RefCell::new(Log::default()));
        logs.push(Rc::clone(&log));
        players.push(Box::new(Scripted {
            message,
            actions: actions.into(),
            log,
        }));
    }
    (players, logs)
}

fn world(num_helpers: u32, turns: u32, seed: u64) -> SimulationState {
    let rules = Rules {
        width: 20,
        height: 20,
        animal_move_probability: 0.0,
        ..Rules::default()
    };
    let census = BTreeMap::from([
        (SpeciesId::new(0), SpeciesCount { male: 1, female: 1 }),
        (SpeciesId::new(1), SpeciesCount { male: 1, female: 1 }),
    ]);
    SimulationState::new(
        rules,
        Ark::new(CellCoord::new(0, 0), census),
        num_helpers,
        TurnClock::new(turns, 2),
        StdRng::seed_from_u64(seed),
        MessagePolicy::Mask,
    )
    .unwrap()
}

fn teleport(state: &mut SimulationState, id: u32, position: Position) {
    let helper = state.helpers.get_mut(HelperId::new(id).index()).unwrap();
    let from = helper.cell();
    helper.position = position;
    state.grid.move_helper(helper.id, from, position.cell()).unwrap();
}

/// Give a helper animals that exist in the arena but not on the grid.
fn load_flock(state: &mut SimulationState, id: u32, count: usize) -> Vec<AnimalId> {
    let animals: Vec<AnimalId> = (0..count)
        .map(|_| state.animals.spawn(SpeciesId::new(1), Gender::Female).unwrap())
        .collect();
    let helper = state.helpers.get_mut(HelperId::new(id).index()).unwrap();
    helper.flock.extend(animals.iter().copied());
    animals
}

fn flock_of(state: &SimulationState, id: u32) -> Vec<AnimalId> {
    state
        .helper(HelperId::new(id))
        .unwrap()
        .flock
        .iter()
        .copied()
        .collect()
}

fn obtain(animal: AnimalId) -> Option<Action> {
    Some(Action::Obtain(animal))
}

fn move_to(x: f64, y: f64) -> Option<Action> {
    Some(Action::move_to(Position::new(x, y)))
}

#[test]
fn contested_obtain_goes_to_least_loaded_helper() {
    let mut state = world(6, 10, 1);
    teleport(&mut state, 3, Position::new(4.5, 4.5));
    teleport(&mut state, 5, Position::new(4.2, 4.8));
    load_flock(&mut state, 3, 2);
    load_flock(&mut state, 5, 1);
    let target = state
        .spawn_animal(SpeciesId::new(0), Gender::Male, CellCoord::new(4, 4))
        .unwrap();

    let (mut players, _) = cast(
        6,
        BTreeMap::from([(3, (0, vec![obtain(target)])), (5, (0, vec![obtain(target)]))]),
    );
    let summary = run_turn(&mut state, &mut players).unwrap();

    assert_eq!(summary.counts.obtain_requests, 2);
    assert_eq!(summary.counts.contested, 1);
    assert_eq!(summary.counts.obtains_granted, 1);
    assert!(flock_of(&state, 5).contains(&target));
    assert!(!flock_of(&state, 3).contains(&target));
    assert!(!state.free_animals.contains_key(&target));
    assert!(!state.grid.cell(CellCoord::new(4, 4)).unwrap().has_animal(target));
}

#[test]
fn equal_loads_go_to_lowest_id() {
    let mut state = world(5, 10, 1);
    teleport(&mut state, 4, Position::new(2.5, 2.5));
    teleport(&mut state, 2, Position::new(2.5, 2.5));
    let target = state
        .spawn_animal(SpeciesId::new(0), Gender::Female, CellCoord::new(2, 2))
        .unwrap();

    // Script order is irrelevant: helper 4 is listed first.
    let (mut players, _) = cast(
        5,
        BTreeMap::from([(4, (0, vec![obtain(target)])), (2, (0, vec![obtain(target)]))]),
    );
    run_turn(&mut state, &mut players).unwrap();

    assert_eq!(flock_of(&state, 2), vec![target]);
    assert!(flock_of(&state, 4).is_empty());
}

#[test]
fn noah_acting_is_fatal() {
    let mut state = world(2, 10, 1);
    let (mut players, _) = cast(2, BTreeMap::from([(0, (0, vec![move_to(0.5, 0.0)]))]));

    let result = run_turn(&mut state, &mut players);
    assert!(matches!(
        result,
        Err(TurnError::Protocol {
            source: ProtocolViolation::NoahActed {
                action: "move",
                ..
            }
        })
    ));
}

#[test]
fn obtaining_a_distant_animal_is_fatal() {
    let mut state = world(2, 10, 1);
    let far = state
        .spawn_animal(SpeciesId::new(0), Gender::Male, CellCoord::new(1, 1))
        .unwrap();
    let (mut players, _) = cast(2, BTreeMap::from([(1, (0, vec![obtain(far)]))]));

    let result = run_turn(&mut state, &mut players);
    assert!(matches!(
        result,
        Err(TurnError::Protocol {
            source: ProtocolViolation::ObtainNotInCell { .. }
        })
    ));
}

#[test]
fn obtaining_with_a_full_flock_is_fatal() {
    let mut state = world(2, 10, 1);
    teleport(&mut state, 1, Position::new(6.5, 6.5));
    let capacity = state.rules.flock_capacity;
    load_flock(&mut state, 1, capacity);
    let target = state
        .spawn_animal(SpeciesId::new(0), Gender::Male, CellCoord::new(6, 6))
        .unwrap();
    let (mut players, _) = cast(2, BTreeMap::from([(1, (0, vec![obtain(target)]))]));

    let result = run_turn(&mut state, &mut players);
    assert!(matches!(
        result,
        Err(TurnError::Protocol {
            source: ProtocolViolation::FlockFull { .. }
        })
    ));
    assert_eq!(flock_of(&state, 1).len(), capacity);
}

#[test]
fn overlong_move_is_fatal() {
    let mut state = world(2, 10, 1);
    let (mut players, _) = cast(2, BTreeMap::from([(1, (0, vec![move_to(1.0, 1.0)]))]));

    let result = run_turn(&mut state, &mut players);
    assert!(matches!(
        result,
        Err(TurnError::Protocol {
            source: ProtocolViolation::IllegalMove { .. }
        })
    ));
}

#[test]
fn releasing_a_stranger_is_fatal() {
    let mut state = world(2, 10, 1);
    let loose = state
        .spawn_animal(SpeciesId::new(0), Gender::Male, CellCoord::new(0, 0))
        .unwrap();
    let (mut players, _) = cast(
        2,
        BTreeMap::from([(1, (0, vec![Some(Action::Release(loose))]))]),
    );

    assert!(matches!(
        run_turn(&mut state, &mut players),
        Err(TurnError::Protocol {
            source: ProtocolViolation::ReleaseNotInFlock { .. }
        })
    ));
}

#[test]
fn released_animal_is_free_and_revealed_in_own_cell() {
    let mut state = world(2, 10, 1);
    teleport(&mut state, 1, Position::new(5.5, 5.5));
    let carried = load_flock(&mut state, 1, 1);
    let animal = *carried.first().unwrap();
    let (mut players, logs) = cast(
        2,
        BTreeMap::from([(1, (0, vec![Some(Action::Release(animal))]))]),
    );

    let summary = run_turn(&mut state, &mut players).unwrap();
    assert_eq!(summary.counts.releases, 1);
    assert_eq!(state.free_animals.get(&animal), Some(&CellCoord::new(5, 5)));
    assert!(flock_of(&state, 1).is_empty());

    run_turn(&mut state, &mut players).unwrap();
    let log = logs.get(1).unwrap().borrow();
    let second = log.snapshots.get(1).unwrap();
    let own = second.sight.own_cell_view().unwrap();
    let seen = own.animals.first().unwrap();
    assert_eq!(seen.id, Some(animal));
    assert_eq!(seen.gender, Gender::Female);
    assert!(second.flock.is_empty());
}

#[test]
fn flocks_are_visible_to_cellmates_without_handles() {
    let mut state = world(3, 10, 1);
    teleport(&mut state, 1, Position::new(5.2, 5.2));
    teleport(&mut state, 2, Position::new(5.7, 5.7));
    load_flock(&mut state, 1, 2);
    let (mut players, logs) = cast(3, BTreeMap::new());

    run_turn(&mut state, &mut players).unwrap();

    let log = logs.get(2).unwrap().borrow();
    let own = log.snapshots.first().unwrap().sight.own_cell_view().unwrap();
    assert_eq!(own.helpers.len(), 2);
    assert_eq!(own.animals.len(), 2);
    assert!(own.animals.iter().all(|a| a.carried && a.id.is_none()));
    assert!(own.animals.iter().all(|a| a.gender == Gender::Female));
    assert_eq!(own.obtainable().count(), 0);

    let noah = logs.first().unwrap().borrow();
    let far = noah.snapshots.first().unwrap().sight.get(5, 5);
    assert!(far.is_none(), "the cell is out of Noah's sight");
}

#[test]
fn docked_helpers_see_the_ark_as_it_was_at_turn_start() {
    let mut state = world(2, 10, 1);
    let carried = load_flock(&mut state, 1, 1);
    let (mut players, logs) = cast(2, BTreeMap::new());

    run_turn(&mut state, &mut players).unwrap();
    run_turn(&mut state, &mut players).unwrap();

    let noah = logs.first().unwrap().borrow();
    let first = noah.snapshots.first().unwrap().ark_view.as_ref().unwrap();
    let second = noah.snapshots.get(1).unwrap().ark_view.as_ref().unwrap();
    assert!(first.animals.is_empty());
    let delivered: Vec<AnimalId> = second.animals.iter().map(|a| a.id).collect();
    assert_eq!(delivered, carried);
    assert!(flock_of(&state, 1).is_empty());
}

#[test]
fn moving_onto_the_ark_unloads_the_flock() {
    let mut state = world(2, 10, 1);
    teleport(&mut state, 1, Position::new(0.75, 0.0));
    let carried = load_flock(&mut state, 1, 2);
    let (mut players, logs) = cast(2, BTreeMap::from([(1, (0, vec![move_to(0.0, 0.0)]))]));

    let summary = run_turn(&mut state, &mut players).unwrap();
    assert_eq!(summary.counts.moves, 1);
    assert_eq!(summary.counts.delivered, 2);
    assert!(flock_of(&state, 1).is_empty());
    for animal in carried {
        assert!(state.ark.contains(animal));
    }
    // Not docked at observation time, so no ark view was shown.
    let log = logs.get(1).unwrap().borrow();
    assert!(log.snapshots.first().unwrap().ark_view.is_none());
}

#[test]
fn obtaining_inside_the_ark_delivers_the_same_turn() {
    let mut state = world(2, 10, 1);
    let target = state
        .spawn_animal(SpeciesId::new(0), Gender::Male, CellCoord::new(0, 0))
        .unwrap();
    let (mut players, _) = cast(2, BTreeMap::from([(1, (0, vec![obtain(target)]))]));

    let summary = run_turn(&mut state, &mut players).unwrap();
    assert_eq!(summary.counts.obtains_granted, 1);
    assert!(state.ark.contains(target));
    assert!(flock_of(&state, 1).is_empty());
}

#[test]
fn messages_reach_only_helpers_in_range() {
    let mut state = world(4, 10, 1);
    teleport(&mut state, 2, Position::new(3.0, 0.0));
    teleport(&mut state, 3, Position::new(12.0, 12.0));
    let (mut players, logs) = cast(
        4,
        BTreeMap::from([(0, (7, vec![])), (1, (300, vec![])), (2, (9, vec![]))]),
    );

    let summary = run_turn(&mut state, &mut players).unwrap();
    assert_eq!(summary.counts.messages, 2);

    let inbox_of = |id: usize| logs.get(id).unwrap().borrow().inboxes.first().unwrap().clone();
    let to_two = inbox_of(2);
    assert_eq!(to_two.len(), 1);
    let message = to_two.first().unwrap();
    assert_eq!(message.from.id, HelperId::new(1));
    assert_eq!(message.contents, 44);
    assert_eq!(
        inbox_of(1).first().map(|m| (m.from.id, m.contents)),
        Some((HelperId::new(2), 9))
    );
    assert!(inbox_of(3).is_empty());
    assert!(inbox_of(0).is_empty());
}

#[test]
fn reject_policy_aborts_on_overflow() {
    let mut state = world(2, 10, 1);
    state.message_policy = MessagePolicy::Reject;
    let (mut players, _) = cast(2, BTreeMap::from([(1, (256, vec![]))]));

    assert!(matches!(
        run_turn(&mut state, &mut players),
        Err(TurnError::Protocol {
            source: ProtocolViolation::MessageOutOfRange { value: 256, .. }
        })
    ));
}

#[test]
fn rain_flag_reaches_snapshots() {
    let mut state = world(2, 4, 1);
    let (mut players, logs) = cast(2, BTreeMap::new());
    while !state.clock.is_finished() {
        run_turn(&mut state, &mut players).unwrap();
    }

    let log = logs.get(1).unwrap().borrow();
    let flags: Vec<(u32, bool)> = log
        .snapshots
        .iter()
        .map(|s| (s.time_elapsed, s.is_raining))
        .collect();
    assert_eq!(flags, vec![(0, false), (1, false), (2, true), (3, true)]);
}

#[test]
fn dispersal_is_seeded_and_moves_to_a_neighbor() {
    let run = |seed: u64| {
        let mut state = world(2, 10, seed);
        state.rules.animal_move_probability = 1.0;
        let animal = state
            .spawn_animal(SpeciesId::new(0), Gender::Male, CellCoord::new(5, 5))
            .unwrap();
        let (mut players, _) = cast(2, BTreeMap::new());
        let summary = run_turn(&mut state, &mut players).unwrap();
        assert_eq!(summary.counts.dispersed, 1);
        *state.free_animals.get(&animal).unwrap()
    };

    let first = run(42);
    assert_eq!(first, run(42));
    let dx = first.x.abs_diff(5);
    let dy = first.y.abs_diff(5);
    assert_eq!(dx.saturating_add(dy), 1);
}

#[test]
fn dispersal_prefers_the_emptiest_neighbor() {
    let mut state = world(2, 10, 3);
    state.rules.animal_move_probability = 1.0;
    // Corner cell (0, 19) has two neighbors; crowd one of them.
    let mover = state
        .spawn_animal(SpeciesId::new(0), Gender::Male, CellCoord::new(0, 19))
        .unwrap();
    let crowd = state
        .spawn_animal(SpeciesId::new(1), Gender::Male, CellCoord::new(1, 19))
        .unwrap();
    let (mut players, _) = cast(2, BTreeMap::new());

    run_turn(&mut state, &mut players).unwrap();
    // The mover draws first and must avoid the occupied neighbor.
    assert_eq!(state.free_animals.get(&mover), Some(&CellCoord::new(0, 18)));
    assert!(state.free_animals.contains_key(&crowd));
}

#[test]
fn score_is_zero_unless_everyone_is_home() {
    let mut state = world(3, 10, 1);
    let male = state.animals.spawn(SpeciesId::new(0), Gender::Male).unwrap();
    let female = state.animals.spawn(SpeciesId::new(0), Gender::Female).unwrap();
    state.ark.unload([male, female]);
    teleport(&mut state, 2, Position::new(0.5, 0.5));

    let away = state.final_score().unwrap();
    assert_eq!(away.score, 0);
    assert_eq!(away.ark_score, 2);

    let (mut players, _) = cast(3, BTreeMap::from([(2, (0, vec![move_to(0.0, 0.0)]))]));
    run_turn(&mut state, &mut players).unwrap();
    let home = state.final_score().unwrap();
    assert!(home.all_docked);
    assert_eq!(home.score, 2);
}
