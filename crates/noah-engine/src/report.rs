//! Progress logging during a run and the final results block.

use noah_core::runner::{SimulationResult, TurnCallback};
use noah_core::tick::{SimulationState, TurnSummary};
use tracing::info;

/// Turns between two progress lines.
pub const PROGRESS_INTERVAL: u32 = 500;

const RULE: &str = "####################";

/// Logs a progress line every [`PROGRESS_INTERVAL`] turns and when the rain
/// starts.
#[derive(Debug, Default)]
pub struct ProgressLog {
    saw_rain: bool,
}

impl TurnCallback for ProgressLog {
    fn on_turn(&mut self, summary: &TurnSummary, state: &SimulationState) {
        let rain_started = summary.is_raining && !self.saw_rain;
        self.saw_rain = summary.is_raining;
        if rain_started || summary.turn.checked_rem(PROGRESS_INTERVAL) == Some(0) {
            let carried: usize = state.helpers.iter().map(|h| h.flock.len()).sum();
            info!(
                turn = summary.turn,
                raining = summary.is_raining,
                on_ark = state.ark.len(),
                carried,
                free = state.free_animals.len(),
                "Progress"
            );
        }
    }
}

/// Render the block printed to stdout at the end of a run.
///
/// Timings are `-1` when no turn was played.
pub fn render(result: &SimulationResult) -> String {
    let (total, rate) = result.turns_per_second().map_or_else(
        || ("-1".to_owned(), "-1".to_owned()),
        |rate| {
            let total = result.total_turn_time().as_secs_f64();
            (format!("{total:.4}s"), format!("{rate:.0}"))
        },
    );
    format!(
        "RESULTS\n{RULE}\nSCORE={}\nTOTAL_TURN_TIME={total}\nTURNS_PER_SECOND={rate}\n{RULE}\n",
        result.score.score
    )
}
