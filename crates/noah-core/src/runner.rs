//! Simulation loop runner.
//!
//! [`run_simulation`] drives [`run_turn`] until the clock reaches its total,
//! notifies a [`TurnCallback`] after every turn, and scores the final state.
//! A protocol violation stops the run immediately with the error.
//!
//! [`run_turn`]: crate::tick::run_turn

use std::time::Duration;

use tracing::info;

use crate::player::Player;
use crate::tick::{self, FinalScore, SimulationState, TurnError, TurnSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A turn execution failed.
    #[error("turn error: {source}")]
    Turn {
        /// The underlying turn error.
        #[from]
        source: TurnError,
    },
}

/// Result of a complete simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// Final scoring.
    pub score: FinalScore,
    /// Number of turns executed.
    pub turns_played: u32,
    /// Time spent in strategy callbacks, per turn.
    pub turn_times: Vec<Duration>,
}

impl SimulationResult {
    /// Total time spent in strategy callbacks.
    pub fn total_turn_time(&self) -> Duration {
        self.turn_times.iter().sum()
    }

    /// Average turn throughput, or `None` if no measurable turn ran.
    pub fn turns_per_second(&self) -> Option<f64> {
        let total = self.total_turn_time().as_secs_f64();
        if self.turn_times.is_empty() || total <= 0.0 {
            return None;
        }
        let turns = f64::from(u32::try_from(self.turn_times.len()).unwrap_or(u32::MAX));
        Some(turns / total)
    }
}

/// Callback invoked after each turn completes.
pub trait TurnCallback {
    /// Called after a turn completes successfully.
    fn on_turn(&mut self, summary: &TurnSummary, state: &SimulationState);
}

/// A no-op turn callback.
pub struct NoOpCallback;

impl TurnCallback for NoOpCallback {
    fn on_turn(&mut self, _summary: &TurnSummary, _state: &SimulationState) {}
}

/// Run the simulation until every configured turn has been played.
///
/// # Errors
///
/// Returns [`RunnerError`] on the first turn that fails.
pub fn run_simulation(
    state: &mut SimulationState,
    players: &mut [Box<dyn Player>],
    callback: &mut dyn TurnCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut turn_times = Vec::new();

    info!(
        turns = state.clock.total(),
        rain_starts_at = state.clock.rain_starts_at(),
        helpers = state.helpers.len(),
        free_animals = state.free_animals.len(),
        "Simulation starting"
    );

    while !state.clock.is_finished() {
        let summary = tick::run_turn(state, players)?;
        turn_times.push(summary.callback_time);
        callback.on_turn(&summary, state);
    }

    let score = state.final_score().map_err(TurnError::from)?;
    Ok(SimulationResult {
        score,
        turns_played: state.clock.elapsed(),
        turn_times,
    })
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        turns_played = result.turns_played,
        score = result.score.score,
        ark_score = result.score.ark_score,
        all_docked = result.score.all_docked,
        total_turn_time = ?result.total_turn_time(),
        "Simulation ended"
    );
}
