//! Movement geometry shared by the engine and strategies.
//!
//! A move is legal when the target lies inside the grid and no farther than
//! `max_step` from the current position.

use noah_types::Position;
use noah_world::Rules;

/// Fraction of the maximum step taken when a target is out of reach.
///
/// Stepping slightly short keeps the result strictly within `max_step`
/// despite rounding in the scaled offsets.
pub const STEP_FACTOR: f64 = 0.999;

/// Whether moving from `from` to `to` is legal under `rules`.
pub fn can_move_to(from: Position, to: Position, rules: &Rules) -> bool {
    rules.contains(to) && from.distance(to) <= rules.max_step
}

/// The furthest legal point from `from` on the segment towards `to`.
///
/// Returns `to` itself when it is within one step. Both endpoints inside the
/// grid keep the result inside the grid.
pub fn move_towards(from: Position, to: Position, max_step: f64) -> Position {
    let distance = from.distance(to);
    if distance <= max_step {
        return to;
    }
    let scale = max_step * STEP_FACTOR / distance;
    Position::new(
        (to.x - from.x).mul_add(scale, from.x),
        (to.y - from.y).mul_add(scale, from.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Rules {
        Rules {
            width: 10,
            height: 10,
            ..Rules::default()
        }
    }

    #[test]
    fn unit_step_is_legal() {
        let rules = rules();
        assert!(can_move_to(Position::new(2.0, 2.0), Position::new(3.0, 2.0), &rules));
        assert!(can_move_to(Position::new(2.0, 2.0), Position::new(2.6, 2.8), &rules));
    }

    #[test]
    fn diagonal_unit_move_is_too_far() {
        let rules = rules();
        assert!(!can_move_to(Position::new(2.0, 2.0), Position::new(3.0, 3.0), &rules));
    }

    #[test]
    fn moves_off_the_grid_are_illegal() {
        let rules = rules();
        assert!(!can_move_to(Position::new(0.2, 0.0), Position::new(-0.1, 0.0), &rules));
        assert!(!can_move_to(Position::new(9.5, 5.0), Position::new(10.0, 5.0), &rules));
        assert!(!can_move_to(Position::new(1.0, 1.0), Position::new(f64::NAN, 1.0), &rules));
    }

    #[test]
    fn move_towards_reaches_near_target() {
        let target = Position::new(1.5, 1.0);
        assert_eq!(move_towards(Position::new(1.0, 1.0), target, 1.0), target);
    }

    #[test]
    fn move_towards_far_target_is_always_legal() {
        let rules = rules();
        let from = Position::new(1.0, 1.0);
        let next = move_towards(from, Position::new(9.0, 7.0), rules.max_step);
        assert!(can_move_to(from, next, &rules));
        assert!(from.distance(next) > 0.99);
    }
}
