//! Validation of proposed actions against ground truth.
//!
//! Checks run in a fixed order:
//! 1. Role -- Noah may only return no-op.
//! 2. Flock -- release needs the animal in the flock; obtain needs room.
//! 3. Cell -- obtain needs the animal free in the helper's own cell.
//! 4. Geometry -- move needs an in-bounds target within one step.
//!
//! The first failing check produces the [`ProtocolViolation`].

use noah_types::{Action, AnimalId, Position};
use noah_world::{Cell, Rules};

use crate::error::ProtocolViolation;
use crate::helper::HelperState;

/// An action that passed validation and can be applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidatedAction {
    /// Move to the position.
    Move(Position),
    /// Request the animal; subject to conflict resolution.
    Obtain(AnimalId),
    /// Drop the animal into the current cell.
    Release(AnimalId),
}

/// Validate a helper's proposed action.
///
/// `cell` must be the helper's current cell. Returns `Ok(None)` for a no-op.
///
/// # Errors
///
/// Returns the [`ProtocolViolation`] describing the first broken rule.
pub fn validate_action(
    helper: &HelperState,
    action: Option<Action>,
    cell: &Cell,
    rules: &Rules,
) -> Result<Option<ValidatedAction>, ProtocolViolation> {
    let Some(action) = action else {
        return Ok(None);
    };

    if helper.is_noah() {
        return Err(ProtocolViolation::NoahActed {
            helper: helper.id,
            action: action.name(),
        });
    }

    let validated = match action {
        Action::Release(animal) => {
            if !helper.flock.contains(&animal) {
                return Err(ProtocolViolation::ReleaseNotInFlock {
                    helper: helper.id,
                    animal,
                });
            }
            ValidatedAction::Release(animal)
        }
        Action::Obtain(animal) => {
            if helper.is_flock_full(rules) {
                return Err(ProtocolViolation::FlockFull {
                    helper: helper.id,
                    capacity: rules.flock_capacity,
                });
            }
            if !cell.has_animal(animal) {
                return Err(ProtocolViolation::ObtainNotInCell {
                    helper: helper.id,
                    animal,
                    cell: helper.cell(),
                });
            }
            ValidatedAction::Obtain(animal)
        }
        Action::Move { x, y } => {
            let target = Position::new(x, y);
            if !helper.can_move_to(target, rules) {
                return Err(ProtocolViolation::IllegalMove {
                    helper: helper.id,
                    from: helper.position,
                    to: target,
                });
            }
            ValidatedAction::Move(target)
        }
    };

    Ok(Some(validated))
}
