//! Conflict resolution for contested obtains.
//!
//! Obtain requests are batched for the whole turn. When several helpers ask
//! for the same animal, the winner is the helper with the smallest
//! `(flock size, helper id)`: the least loaded helper wins and ties go to the
//! lowest id. Losers get nothing; a lost contest is not an error.

use std::collections::BTreeMap;

use noah_types::{AnimalId, HelperId};
use tracing::debug;

/// One helper's claim on an animal, with its load at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObtainClaim {
    /// The requesting helper.
    pub helper: HelperId,
    /// Number of animals it carries when the claim is resolved.
    pub flock_size: usize,
}

/// Pick the winning claim, independent of claim order.
///
/// Returns `None` only when `claims` is empty.
pub fn resolve_obtain_conflict(claims: &[ObtainClaim]) -> Option<HelperId> {
    let winner = claims
        .iter()
        .min_by_key(|c| (c.flock_size, c.helper))
        .map(|c| c.helper);

    if let Some(helper) = winner.filter(|_| claims.len() > 1) {
        debug!(
            winner = %helper,
            contenders = claims.len(),
            "Contested obtain resolved"
        );
    }
    winner
}

/// Obtain requests collected during one turn, keyed by animal.
#[derive(Debug, Clone, Default)]
pub struct ObtainBook {
    requests: BTreeMap<AnimalId, Vec<HelperId>>,
}

impl ObtainBook {
    /// Create an empty book.
    pub const fn new() -> Self {
        Self {
            requests: BTreeMap::new(),
        }
    }

    /// Record that `helper` asked for `animal`.
    pub fn request(&mut self, animal: AnimalId, helper: HelperId) {
        self.requests.entry(animal).or_default().push(helper);
    }

    /// Whether no obtain was requested this turn.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Requested animals in ascending handle order, with their requesters.
    pub fn iter(&self) -> impl Iterator<Item = (AnimalId, &[HelperId])> {
        self.requests
            .iter()
            .map(|(&animal, helpers)| (animal, helpers.as_slice()))
    }
}
