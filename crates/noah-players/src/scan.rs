//! Queries over a snapshot's sight shared by the strategies.

use noah_types::{CellCoord, Position};
use noah_world::Sight;

/// The visible cell with free animals whose center is closest to `from`.
///
/// Ties go to the first cell in row-major order.
pub(crate) fn nearest_animal_cell(sight: &Sight, from: Position) -> Option<CellCoord> {
    sight
        .iter()
        .filter(|view| view.has_free_animals())
        .map(|view| (view.coord, from.distance(view.coord.center())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(coord, _)| coord)
}
