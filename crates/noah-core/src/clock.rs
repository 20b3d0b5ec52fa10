//! Turn clock and the rain deadline.
//!
//! The clock is the single source of truth for temporal state. It counts
//! elapsed turns towards a fixed total and derives the rain flag from that
//! count; nothing about time is stored anywhere else.
//!
//! - All counter updates use checked arithmetic.
//! - Rain is a pure function of the elapsed count, so once it starts it
//!   never stops.

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// The clock already reached its total.
    #[error("simulation already finished after {total} turns")]
    Finished {
        /// Configured total turns.
        total: u32,
    },

    /// The turn counter would overflow.
    #[error("turn counter overflow")]
    TurnOverflow,
}

/// Counts turns and decides when it is raining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnClock {
    elapsed: u32,
    total: u32,
    rain_lead: u32,
}

impl TurnClock {
    /// Create a clock for `total` turns, raining for the last `rain_lead`.
    pub const fn new(total: u32, rain_lead: u32) -> Self {
        Self {
            elapsed: 0,
            total,
            rain_lead,
        }
    }

    /// Turns completed so far; also the number of the turn in progress.
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Configured number of turns.
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Turns left to play.
    pub const fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.elapsed)
    }

    /// First turn on which it rains.
    pub const fn rain_starts_at(&self) -> u32 {
        self.total.saturating_sub(self.rain_lead)
    }

    /// Whether it is raining during the current turn.
    pub const fn is_raining(&self) -> bool {
        self.elapsed >= self.rain_starts_at()
    }

    /// Whether every configured turn has been played.
    pub const fn is_finished(&self) -> bool {
        self.elapsed >= self.total
    }

    /// Fail if no turn is left to play.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Finished`] once the total is reached.
    pub const fn ensure_running(&self) -> Result<(), ClockError> {
        if self.is_finished() {
            Err(ClockError::Finished { total: self.total })
        } else {
            Ok(())
        }
    }

    /// Complete the current turn. Returns the new elapsed count.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Finished`] if the clock already reached its
    /// total, or [`ClockError::TurnOverflow`] on counter overflow.
    pub fn advance(&mut self) -> Result<u32, ClockError> {
        self.ensure_running()?;
        self.elapsed = self
            .elapsed
            .checked_add(1)
            .ok_or(ClockError::TurnOverflow)?;
        Ok(self.elapsed)
    }
}
