//! Noah's Ark simulation runner.
//!
//! Startup sequence:
//! 1. Initialize tracing/logging
//! 2. Parse the command line
//! 3. Load `noah-config.yaml` and apply flag or map file overrides
//! 4. Look up the strategy in the player registry
//! 5. Generate the world and instantiate one player per helper
//! 6. Run every turn, then print the results block

mod cli;
mod error;
mod map;
mod report;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use noah_core::runner::{log_simulation_end, run_simulation};
use noah_core::setup::build_simulation;

use crate::cli::Cli;
use crate::error::EngineError;
use crate::report::ProgressLog;

fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("noah-engine starting");

    // 2-3. Command line and configuration.
    let config = cli::build_config(Cli::parse()).context("failed to load configuration")?;
    let seed = config.world.seed.unwrap_or_default();
    info!(
        seed,
        player = config.scenario.player,
        turns = config.time.turns,
        overflow = ?config.messages.overflow,
        "Configuration loaded"
    );

    // 4. Strategy.
    let key = config.scenario.player.clone();
    let factory = noah_players::lookup(&key).ok_or_else(|| EngineError::UnknownPlayer {
        known: noah_players::registry::keys().collect::<Vec<_>>().join(" "),
        key,
    })?;

    // 5. World and players.
    let (mut state, mut players) =
        build_simulation(&config, seed, factory).map_err(EngineError::from)?;

    // 6. Run.
    let result = run_simulation(&mut state, &mut players, &mut ProgressLog::default())
        .map_err(EngineError::from)?;
    log_simulation_end(&result);

    print!("{}", report::render(&result));
    Ok(())
}
