//! Command-line arguments and how they override the config file.

use std::path::{Path, PathBuf};

use clap::Parser;
use noah_core::config::SimulationConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::EngineError;
use crate::map::MapFile;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "noah-config.yaml";

/// Run the Noah's Ark helpers simulation.
#[derive(Parser, Debug, Default)]
#[command(name = "noah-engine", about = "Run the Noah's Ark helpers simulation")]
pub struct Cli {
    /// YAML config file (defaults to `noah-config.yaml` when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Strategy every helper runs (`r`, `i`, `g`).
    #[arg(long)]
    pub player: Option<String>,

    /// Random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of helpers, Noah included.
    #[arg(long)]
    pub num_helpers: Option<u32>,

    /// Initial population of each species.
    #[arg(long, num_args = 1.., value_name = "S")]
    pub animals: Option<Vec<u32>>,

    /// Turns to play.
    #[arg(short = 'T', long)]
    pub turns: Option<u32>,

    /// Ark cell.
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    pub ark: Option<Vec<u32>>,

    /// JSON map file with `num_helpers`, `animals` and `ark`.
    #[arg(long)]
    pub map_path: Option<PathBuf>,
}

/// Load the config file and apply every command-line override.
///
/// The returned config always carries a seed and a turn count.
pub fn build_config(cli: Cli) -> Result<SimulationConfig, EngineError> {
    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(cli, &mut config)?;

    let seed = *config.world.seed.get_or_insert_with(|| {
        let seed = rand::random::<u64>();
        info!(seed, "Generated seed");
        seed
    });

    if config.time.turns.is_none() {
        let turns = random_turns(seed, config.time.min_turns, config.time.max_turns);
        info!(turns, "Generated turn count");
        config.time.turns = Some(turns);
    }

    Ok(config)
}

/// Read `path`, or [`DEFAULT_CONFIG_PATH`] if it exists, or fall back to
/// defaults.
fn load_config(path: Option<&Path>) -> Result<SimulationConfig, EngineError> {
    if let Some(path) = path {
        return Ok(SimulationConfig::from_file(path)?);
    }
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        Ok(SimulationConfig::from_file(default_path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}

fn apply_overrides(cli: Cli, config: &mut SimulationConfig) -> Result<(), EngineError> {
    if let Some(player) = cli.player {
        config.scenario.player = player;
    }
    if let Some(seed) = cli.seed {
        config.world.seed = Some(seed);
    }
    if let Some(turns) = cli.turns {
        config.time.turns = Some(turns);
    }

    if let Some(path) = cli.map_path {
        let conflicting = [
            ("num-helpers", cli.num_helpers.is_some()),
            ("animals", cli.animals.is_some()),
            ("ark", cli.ark.is_some()),
        ];
        if let Some(&(flag, _)) = conflicting.iter().find(|(_, given)| *given) {
            return Err(EngineError::ConflictingArgs { flag });
        }
        MapFile::read(&path)?.apply(config);
        return Ok(());
    }

    if let Some(num_helpers) = cli.num_helpers {
        config.scenario.num_helpers = Some(num_helpers);
    }
    if let Some(animals) = cli.animals {
        config.scenario.animals = Some(animals);
    }
    if let Some(&[x, y]) = cli.ark.as_deref() {
        config.scenario.ark = Some([x, y]);
    }
    Ok(())
}

/// Turn count in `[min, max]` drawn from the run seed.
fn random_turns(seed: u64, min: u32, max: u32) -> u32 {
    if min >= max {
        return min;
    }
    StdRng::seed_from_u64(seed).random_range(min..=max)
}
