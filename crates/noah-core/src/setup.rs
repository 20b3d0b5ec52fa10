//! Initial world generation.
//!
//! [`build_simulation`] turns a validated configuration and a seed into a
//! ready-to-run [`SimulationState`] plus one strategy per helper. Every
//! random choice flows from a single generator seeded once, so the same
//! configuration and seed always produce the same world.
//!
//! Each species gets one male and one female; the rest of its population
//! is male or female with equal odds. Every animal starts free in a
//! uniformly random cell. All helpers start on the ark.

use std::collections::BTreeMap;

use noah_types::{CellCoord, Gender, HelperId, Kind, SpeciesId};
use noah_world::{Ark, SpeciesCount, WorldError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::clock::TurnClock;
use crate::config::{ConfigError, SimulationConfig};
use crate::player::{Player, PlayerFactory, PlayerInit};
use crate::tick::SimulationState;

/// Errors that can occur while building the initial world.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The configuration is incomplete or invalid.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The world could not be populated.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// One animal to place at setup.
#[derive(Debug, Clone, Copy)]
struct Placement {
    species: SpeciesId,
    gender: Gender,
    coord: CellCoord,
}

/// Build the initial state and strategies for a run.
///
/// # Errors
///
/// Returns [`SetupError::Config`] if the configuration does not resolve to a
/// valid scenario, or [`SetupError::World`] if the world cannot hold it.
pub fn build_simulation(
    config: &SimulationConfig,
    seed: u64,
    factory: PlayerFactory,
) -> Result<(SimulationState, Vec<Box<dyn Player>>), SetupError> {
    let scenario = config.resolve()?;
    let rules = config.rules.clone();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut placements = Vec::new();
    let mut species_populations = BTreeMap::new();
    for (raw, &population) in (0_u32..).zip(&scenario.animals) {
        let species = SpeciesId::new(raw);
        species_populations.insert(species, population);

        let mut genders = vec![Gender::Male, Gender::Female];
        for _ in 2..population {
            genders.push(if rng.random_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            });
        }
        for gender in genders {
            let coord = CellCoord::new(
                rng.random_range(0..rules.width),
                rng.random_range(0..rules.height),
            );
            placements.push(Placement {
                species,
                gender,
                coord,
            });
        }
    }

    let census = census_of(&placements);
    let ark = Ark::new(scenario.ark, census);
    let clock = TurnClock::new(scenario.turns, config.time.rain_lead_turns);

    let player_seeds: Vec<u64> = (0..scenario.num_helpers)
        .map(|_| rng.random::<u64>())
        .collect();

    let mut state = SimulationState::new(
        rules,
        ark,
        scenario.num_helpers,
        clock,
        rng,
        config.messages.overflow,
    )?;
    for placement in &placements {
        state.spawn_animal(placement.species, placement.gender, placement.coord)?;
    }

    let players = (0_u32..)
        .zip(player_seeds)
        .map(|(raw, player_seed)| {
            let id = HelperId::new(raw);
            factory(&PlayerInit {
                id,
                kind: if id.is_noah() { Kind::Noah } else { Kind::Helper },
                ark: scenario.ark,
                num_helpers: scenario.num_helpers,
                species_populations: species_populations.clone(),
                rules: state.rules.clone(),
                seed: player_seed,
            })
        })
        .collect();

    info!(
        seed,
        species = scenario.animals.len(),
        animals = state.animals.len(),
        helpers = scenario.num_helpers,
        ark = %scenario.ark,
        turns = scenario.turns,
        "World generated"
    );

    Ok((state, players))
}

fn census_of(placements: &[Placement]) -> BTreeMap<SpeciesId, SpeciesCount> {
    let mut census: BTreeMap<SpeciesId, SpeciesCount> = BTreeMap::new();
    for placement in placements {
        let count = census.entry(placement.species).or_default();
        match placement.gender {
            Gender::Male => count.male = count.male.saturating_add(1),
            Gender::Female => count.female = count.female.saturating_add(1),
            Gender::Unknown => {}
        }
    }
    census
}
