//! Turn cycle: the engine loop that drives the Noah's Ark simulation.
//!
//! Each turn runs through these phases, in order:
//!
//! 1. **Rain check** -- derive the rain flag from the clock.
//!
//! 2. **Ark pre-image** -- render the ark contents before any unloading, so
//!    docked helpers see the ark as it was at turn start.
//!
//! 3. **Communication graph** -- pair up mobile helpers within the
//!    communication radius.
//!
//! 4. **Observation** -- assemble a [`Snapshot`] per helper and collect the
//!    message values, encoded under the configured policy.
//!
//! 5. **Routing** -- build each helper's inbox.
//!
//! 6. **Action** -- collect one optional [`Action`] per helper.
//!
//! 7. **Application** -- validate each action in ascending helper id and
//!    apply releases and moves. Obtains are only recorded.
//!
//! 8. **Grants** -- resolve obtain requests per animal, then unload every
//!    docked flock into the ark.
//!
//! 9. **Dispersal** -- free animals wander towards less crowded neighbors.
//!
//! 10. **Advance** -- complete the turn on the clock.
//!
//! Any protocol violation aborts the turn with a [`TurnError`]. The turn is
//! deterministic given the same state, seed, and strategy outputs.
//!
//! [`Snapshot`]: crate::snapshot::Snapshot

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use noah_agents::{
    HelperState, ObtainBook, ObtainClaim, ProtocolViolation, ValidatedAction, flock_index,
    resolve_obtain_conflict, validate_action,
};
use noah_types::{Action, AnimalId, ArkView, CellCoord, Gender, HelperId, Message, SpeciesId};
use noah_world::{AnimalArena, Ark, GenderPresence, Grid, Rules, WorldError};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::clock::{ClockError, TurnClock};
use crate::config::MessagePolicy;
use crate::messaging::{self, CommunicationGraph};
use crate::player::Player;
use crate::snapshot::{self, SnapshotContext};

/// Errors that abort a turn.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A strategy broke the turn protocol.
    #[error("protocol violation by helper {}: {source}", .source.helper())]
    Protocol {
        /// The violated rule.
        #[from]
        source: ProtocolViolation,
    },

    /// The number of strategies does not match the number of helpers.
    #[error("{players} players supplied for {helpers} helpers")]
    PlayerCountMismatch {
        /// Strategies supplied.
        players: usize,
        /// Helpers in the simulation.
        helpers: usize,
    },

    /// A helper id refers to no helper.
    #[error("unknown helper {0}")]
    UnknownHelper(HelperId),
}

/// Counters describing what happened in one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnCounts {
    /// Messages delivered.
    pub messages: usize,
    /// Moves applied.
    pub moves: usize,
    /// Animals released.
    pub releases: usize,
    /// Obtain requests that passed validation.
    pub obtain_requests: usize,
    /// Animals handed to a helper.
    pub obtains_granted: usize,
    /// Animals requested by more than one helper.
    pub contested: usize,
    /// Animals newly delivered into the ark.
    pub delivered: usize,
    /// Free animals that wandered to a neighbor cell.
    pub dispersed: usize,
}

/// Summary of a single turn's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSummary {
    /// The turn that was executed, counting from 0.
    pub turn: u32,
    /// Whether it rained during the turn.
    pub is_raining: bool,
    /// What happened.
    pub counts: TurnCounts,
    /// Wall-clock time spent inside strategy callbacks.
    pub callback_time: Duration,
}

/// Outcome of a finished (or interrupted) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalScore {
    /// Reported score: the ark score, or 0 if a helper is away from the ark.
    pub score: u32,
    /// Diversity score of the ark contents alone.
    pub ark_score: u32,
    /// Whether every mobile helper stands on the ark.
    pub all_docked: bool,
    /// Delivered genders per species.
    pub presence: BTreeMap<SpeciesId, GenderPresence>,
}

/// The mutable simulation state passed through the turn cycle.
#[derive(Debug)]
pub struct SimulationState {
    /// The turn clock.
    pub clock: TurnClock,
    /// World constants.
    pub rules: Rules,
    /// Cell occupancy.
    pub grid: Grid,
    /// Every animal ever spawned.
    pub animals: AnimalArena,
    /// The ark and its delivered animals.
    pub ark: Ark,
    /// Helpers indexed by id; index 0 is Noah.
    pub helpers: Vec<HelperState>,
    /// Free animals and the cell each stands in.
    pub free_animals: BTreeMap<AnimalId, CellCoord>,
    /// The single generator driving dispersal.
    pub rng: StdRng,
    /// Treatment of out-of-range message values.
    pub message_policy: MessagePolicy,
}

impl SimulationState {
    /// Build an empty world with every helper standing on the ark.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if the grid dimensions are unusable or the ark
    /// lies outside the grid.
    pub fn new(
        rules: Rules,
        ark: Ark,
        num_helpers: u32,
        clock: TurnClock,
        rng: StdRng,
        message_policy: MessagePolicy,
    ) -> Result<Self, WorldError> {
        let mut grid = Grid::new(rules.width, rules.height)?;
        let dock = ark.position();
        grid.require_cell(dock)?;

        let mut helpers = Vec::new();
        for raw in 0..num_helpers {
            let id = HelperId::new(raw);
            grid.place_helper(dock, id)?;
            helpers.push(HelperState::new(id, dock.corner()));
        }

        Ok(Self {
            clock,
            rules,
            grid,
            animals: AnimalArena::new(),
            ark,
            helpers,
            free_animals: BTreeMap::new(),
            rng,
            message_policy,
        })
    }

    /// Create an animal and set it free in `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for cells outside the grid, or
    /// [`WorldError::ArenaFull`] when no handle is left.
    pub fn spawn_animal(
        &mut self,
        species: SpeciesId,
        gender: Gender,
        coord: CellCoord,
    ) -> Result<AnimalId, WorldError> {
        self.grid.require_cell(coord)?;
        let id = self.animals.spawn(species, gender)?;
        self.grid.place_animal(coord, id)?;
        self.free_animals.insert(id, coord);
        Ok(id)
    }

    /// Look up a helper by id.
    pub fn helper(&self, id: HelperId) -> Option<&HelperState> {
        self.helpers.get(id.index())
    }

    /// Score the current state as if the run ended now.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAnimal`] if the ark holds a handle
    /// missing from the arena.
    pub fn final_score(&self) -> Result<FinalScore, WorldError> {
        let ark_score = self.ark.score(&self.animals, &self.rules)?;
        let all_docked = self
            .helpers
            .iter()
            .filter(|h| !h.is_noah())
            .all(|h| h.is_in_ark(self.ark.position(), &self.rules));
        let presence = self.ark.presence(&self.animals)?;

        Ok(FinalScore {
            score: if all_docked { ark_score } else { 0 },
            ark_score,
            all_docked,
            presence,
        })
    }
}

/// Execute one complete turn of the simulation.
///
/// `players` must hold one strategy per helper, indexed by helper id.
pub fn run_turn(
    state: &mut SimulationState,
    players: &mut [Box<dyn Player>],
) -> Result<TurnSummary, TurnError> {
    state.clock.ensure_running()?;
    if players.len() != state.helpers.len() {
        return Err(TurnError::PlayerCountMismatch {
            players: players.len(),
            helpers: state.helpers.len(),
        });
    }

    // --- Phase 1: Rain check ---
    let turn = state.clock.elapsed();
    let is_raining = state.clock.is_raining();
    if turn == state.clock.rain_starts_at() {
        info!(turn, "Rain started");
    }
    debug!(turn, is_raining, "Turn started");

    // --- Phase 2: Ark pre-image ---
    let ark_view = state.ark.view(&state.animals)?;

    // --- Phase 3: Communication graph ---
    let graph = CommunicationGraph::build(&state.helpers, state.rules.communication_radius);

    // --- Phase 4: Observation ---
    let mut callback_time = Duration::ZERO;
    let payloads = phase_observe(
        state,
        players,
        &ark_view,
        turn,
        is_raining,
        &mut callback_time,
    )?;

    // --- Phase 5: Routing ---
    let inboxes = messaging::route_messages(&graph, &state.helpers, &payloads);
    let mut counts = TurnCounts {
        messages: inboxes.values().map(Vec::len).sum(),
        ..TurnCounts::default()
    };

    // --- Phase 6: Action ---
    let actions = phase_act(state, players, &inboxes, &mut callback_time);

    // --- Phase 7: Application ---
    let book = phase_apply(state, &actions, &mut counts)?;

    // --- Phase 8: Grants ---
    phase_grant(state, &book, &mut counts)?;
    counts.delivered = counts.delivered.saturating_add(unload_docked(state));

    // --- Phase 9: Dispersal ---
    counts.dispersed = phase_disperse(state)?;

    // --- Phase 10: Advance ---
    state.clock.advance()?;

    debug!(
        turn,
        moves = counts.moves,
        obtains = counts.obtains_granted,
        releases = counts.releases,
        delivered = counts.delivered,
        dispersed = counts.dispersed,
        "Turn completed"
    );

    Ok(TurnSummary {
        turn,
        is_raining,
        counts,
        callback_time,
    })
}

/// Phase 4: build snapshots, call `observe`, and encode the results.
fn phase_observe(
    state: &SimulationState,
    players: &mut [Box<dyn Player>],
    ark_view: &ArkView,
    turn: u32,
    is_raining: bool,
    callback_time: &mut Duration,
) -> Result<BTreeMap<HelperId, u8>, TurnError> {
    let flocks = flock_index(&state.helpers);
    let ctx = SnapshotContext {
        time_elapsed: turn,
        is_raining,
        grid: &state.grid,
        animals: &state.animals,
        flocks: &flocks,
        rules: &state.rules,
        ark: state.ark.position(),
        ark_view,
    };

    let mut payloads = BTreeMap::new();
    for (helper, player) in state.helpers.iter().zip(players.iter_mut()) {
        let snapshot = snapshot::assemble_snapshot(helper, &ctx)?;

        let started = Instant::now();
        let raw = player.observe(&snapshot);
        *callback_time = callback_time.saturating_add(started.elapsed());

        let byte = messaging::encode_payload(helper.id, raw, state.message_policy)?;
        payloads.insert(helper.id, byte);
    }
    Ok(payloads)
}

/// Phase 6: collect each helper's proposed action, in id order.
fn phase_act(
    state: &SimulationState,
    players: &mut [Box<dyn Player>],
    inboxes: &BTreeMap<HelperId, Vec<Message>>,
    callback_time: &mut Duration,
) -> Vec<Option<Action>> {
    state
        .helpers
        .iter()
        .zip(players.iter_mut())
        .map(|(helper, player)| {
            let inbox = inboxes.get(&helper.id).map_or(&[][..], Vec::as_slice);
            let started = Instant::now();
            let action = player.act(inbox);
            *callback_time = callback_time.saturating_add(started.elapsed());
            action
        })
        .collect()
}

/// Phase 7: validate every action and apply releases and moves.
///
/// Returns the batched obtain requests.
fn phase_apply(
    state: &mut SimulationState,
    actions: &[Option<Action>],
    counts: &mut TurnCounts,
) -> Result<ObtainBook, TurnError> {
    let dock = state.ark.position();
    let mut book = ObtainBook::new();

    for (helper, &action) in state.helpers.iter_mut().zip(actions) {
        let cell = state.grid.require_cell(helper.cell())?;
        let Some(validated) = validate_action(helper, action, cell, &state.rules)? else {
            continue;
        };

        match validated {
            ValidatedAction::Release(animal) => {
                helper.flock.remove(&animal);
                let coord = helper.cell();
                state.grid.place_animal(coord, animal)?;
                state.free_animals.insert(animal, coord);
                counts.releases = counts.releases.saturating_add(1);
                debug!(helper = %helper.id, %animal, cell = %coord, "Animal released");
            }
            ValidatedAction::Obtain(animal) => {
                book.request(animal, helper.id);
                counts.obtain_requests = counts.obtain_requests.saturating_add(1);
            }
            ValidatedAction::Move(target) => {
                state.grid.move_helper(helper.id, helper.cell(), target.cell())?;
                helper.position = target;
                counts.moves = counts.moves.saturating_add(1);

                if !helper.flock.is_empty() && helper.is_in_ark(dock, &state.rules) {
                    let added = state.ark.unload(std::mem::take(&mut helper.flock));
                    counts.delivered = counts.delivered.saturating_add(added);
                }
            }
        }
    }

    Ok(book)
}

/// Phase 8: hand each requested animal to its winning requester.
fn phase_grant(
    state: &mut SimulationState,
    book: &ObtainBook,
    counts: &mut TurnCounts,
) -> Result<(), TurnError> {
    for (animal, requesters) in book.iter() {
        let claims = requesters
            .iter()
            .map(|&id| {
                state
                    .helper(id)
                    .map(|h| ObtainClaim {
                        helper: id,
                        flock_size: h.flock_size(),
                    })
                    .ok_or(TurnError::UnknownHelper(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let Some(winner) = resolve_obtain_conflict(&claims) else {
            continue;
        };
        if claims.len() > 1 {
            counts.contested = counts.contested.saturating_add(1);
        }

        let helper = state
            .helpers
            .get_mut(winner.index())
            .ok_or(TurnError::UnknownHelper(winner))?;
        let coord = helper.cell();
        state.grid.remove_animal(coord, animal)?;
        state.free_animals.remove(&animal);
        helper.flock.insert(animal);
        counts.obtains_granted = counts.obtains_granted.saturating_add(1);
        debug!(helper = %winner, %animal, cell = %coord, "Animal obtained");
    }
    Ok(())
}

/// Unload every docked flock into the ark. Returns how many were new.
fn unload_docked(state: &mut SimulationState) -> usize {
    let dock = state.ark.position();
    let mut delivered = 0_usize;
    for helper in &mut state.helpers {
        if !helper.flock.is_empty() && helper.is_in_ark(dock, &state.rules) {
            let added = state.ark.unload(std::mem::take(&mut helper.flock));
            delivered = delivered.saturating_add(added);
        }
    }
    delivered
}

/// Phase 9: move free animals towards the emptiest neighbor cells.
///
/// Every free animal draws once from the generator, in ascending handle
/// order, whether or not it moves.
fn phase_disperse(state: &mut SimulationState) -> Result<usize, TurnError> {
    let probability = state.rules.animal_move_probability;
    let free: Vec<(AnimalId, CellCoord)> = state
        .free_animals
        .iter()
        .map(|(&animal, &coord)| (animal, coord))
        .collect();

    let mut moved = 0_usize;
    for (animal, from) in free {
        if state.rng.random::<f64>() >= probability {
            continue;
        }
        let choices = state.grid.emptiest_neighbors(from);
        let Some(&to) = choices.choose(&mut state.rng) else {
            continue;
        };
        state.grid.move_animal(animal, from, to)?;
        state.free_animals.insert(animal, to);
        moved = moved.saturating_add(1);
    }
    Ok(moved)
}
