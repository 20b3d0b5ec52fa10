//! Engine-owned state of one helper.

use std::collections::BTreeSet;

use noah_types::{AnimalId, CellCoord, HelperId, HelperView, Kind, Position};
use noah_world::{FlockIndex, Rules};

use crate::movement;

/// Ground-truth state of a helper. Only the engine mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct HelperState {
    /// Helper identifier; 0 is Noah.
    pub id: HelperId,
    /// Role derived from the id.
    pub kind: Kind,
    /// Continuous position.
    pub position: Position,
    /// Carried animals.
    pub flock: BTreeSet<AnimalId>,
}

impl HelperState {
    /// Create a helper with an empty flock.
    pub fn new(id: HelperId, position: Position) -> Self {
        Self {
            id,
            kind: HelperView::of(id).kind,
            position,
            flock: BTreeSet::new(),
        }
    }

    /// Public identity of this helper.
    pub const fn view(&self) -> HelperView {
        HelperView {
            id: self.id,
            kind: self.kind,
        }
    }

    /// Whether this helper is Noah.
    pub const fn is_noah(&self) -> bool {
        matches!(self.kind, Kind::Noah)
    }

    /// The occupied cell.
    pub fn cell(&self) -> CellCoord {
        self.position.cell()
    }

    /// Number of carried animals.
    pub fn flock_size(&self) -> usize {
        self.flock.len()
    }

    /// Whether the flock has reached capacity.
    pub fn is_flock_full(&self, rules: &Rules) -> bool {
        self.flock.len() >= rules.flock_capacity
    }

    /// Whether the helper stands on the ark.
    pub fn is_in_ark(&self, ark: CellCoord, rules: &Rules) -> bool {
        self.position.approx_eq(ark.corner(), rules.ark_epsilon)
    }

    /// Whether the helper may legally move to `target` this turn.
    pub fn can_move_to(&self, target: Position, rules: &Rules) -> bool {
        movement::can_move_to(self.position, target, rules)
    }
}

/// Index every non-empty flock by its carrier, for rendering sights.
pub fn flock_index(helpers: &[HelperState]) -> FlockIndex {
    helpers
        .iter()
        .filter(|h| !h.flock.is_empty())
        .map(|h| (h.id, h.flock.iter().copied().collect()))
        .collect()
}
