//! The visibility disk around a helper.
//!
//! A [`Sight`] is built once per helper per turn from the helper's continuous
//! position. It holds a [`CellView`] for every cell within the sight radius,
//! rendered from ground truth at construction time so later world mutations
//! never leak into it.
//!
//! Distance from an observer at coordinate `p` to a cell starting at `c` is
//! measured per axis:
//!
//! - `p < c`: the cell lies ahead, distance `c - p`;
//! - `p - c <= 1`: the observer is inside (or on the far edge of) the cell,
//!   distance 0;
//! - otherwise the cell lies behind, distance `p - c - 1`.
//!
//! The axes combine with the Euclidean norm and the cell is in sight when the
//! result is at most the sight radius. Animal genders and handles are only
//! revealed for the observer's own cell.
//!
//! A cell view also lists what the helpers standing in it carry. Carried
//! animals follow the same gender rule but never show a handle.

use std::collections::BTreeMap;

use noah_types::{AnimalId, CellCoord, CellView, HelperId, HelperView, Position, VisibleAnimal};

use crate::arena::AnimalArena;
use crate::error::{SightError, WorldError};
use crate::grid::{Cell, Grid};

/// Distance along one axis from observer coordinate `p` to a cell at `c`.
fn axis_distance(p: f64, c: f64) -> f64 {
    if p < c {
        c - p
    } else if p - c <= 1.0 {
        0.0
    } else {
        p - c - 1.0
    }
}

/// Distance from a continuous position to a cell under the sight metric.
pub fn sight_distance(observer: Position, coord: CellCoord) -> f64 {
    let dx = axis_distance(observer.x, f64::from(coord.x));
    let dy = axis_distance(observer.y, f64::from(coord.y));
    dx.hypot(dy)
}

/// Whether a cell is within `radius` of the observer under the sight metric.
pub fn in_sight(observer: Position, coord: CellCoord, radius: f64) -> bool {
    sight_distance(observer, coord) <= radius
}

/// Carried animals per helper, as seen by the sight renderer.
pub type FlockIndex = BTreeMap<HelperId, Vec<AnimalId>>;

/// Render one cell for an observer, revealing animals only if `revealed`.
fn render_cell(
    cell: &Cell,
    arena: &AnimalArena,
    flocks: &FlockIndex,
    revealed: bool,
) -> Result<CellView, WorldError> {
    let mut animals = cell
        .animals()
        .iter()
        .map(|&id| {
            arena
                .require(id)
                .map(|animal| VisibleAnimal::render(animal, revealed))
        })
        .collect::<Result<Vec<_>, _>>()?;
    animals.sort_unstable();

    let mut carried = cell
        .helpers()
        .iter()
        .filter_map(|helper| flocks.get(helper))
        .flatten()
        .map(|&id| {
            arena
                .require(id)
                .map(|animal| VisibleAnimal::render_carried(animal, revealed))
        })
        .collect::<Result<Vec<_>, _>>()?;
    carried.sort_unstable();
    animals.append(&mut carried);

    let helpers = cell.helpers().iter().map(|&id| HelperView::of(id)).collect();

    Ok(CellView {
        coord: cell.coord(),
        animals,
        helpers,
    })
}

/// The set of cells visible from one position during one turn.
#[derive(Debug, Clone)]
pub struct Sight {
    position: Position,
    radius: f64,
    origin: CellCoord,
    columns: u32,
    rows: u32,
    /// Row-major over the bounding box; `None` for box cells outside the disk.
    views: Vec<Option<CellView>>,
}

impl Sight {
    /// Compute the sight of an observer at `position` in a world where no
    /// helper carries anything.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAnimal`] if a cell refers to an animal
    /// missing from the arena.
    pub fn new(
        position: Position,
        radius: f64,
        grid: &Grid,
        arena: &AnimalArena,
    ) -> Result<Self, WorldError> {
        Self::with_flocks(position, radius, grid, arena, &FlockIndex::new())
    }

    /// Compute the sight of an observer at `position`.
    ///
    /// Only cells inside the grid are considered. The candidate box is the
    /// observer's cell extended by `ceil(radius)` in every direction.
    /// `flocks` supplies what each helper carries.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAnimal`] if a cell or a flock refers to
    /// an animal missing from the arena.
    pub fn with_flocks(
        position: Position,
        radius: f64,
        grid: &Grid,
        arena: &AnimalArena,
        flocks: &FlockIndex,
    ) -> Result<Self, WorldError> {
        let own = position.cell();
        let extent = extent_of(radius);

        let x_lo = own.x.saturating_sub(extent);
        let y_lo = own.y.saturating_sub(extent);
        let x_hi = own
            .x
            .saturating_add(extent)
            .min(grid.width().saturating_sub(1));
        let y_hi = own
            .y
            .saturating_add(extent)
            .min(grid.height().saturating_sub(1));

        let mut views = Vec::new();
        let (columns, rows) = if x_lo <= x_hi && y_lo <= y_hi {
            for y in y_lo..=y_hi {
                for x in x_lo..=x_hi {
                    let coord = CellCoord::new(x, y);
                    let view = match grid.cell(coord) {
                        Some(cell) if in_sight(position, coord, radius) => {
                            Some(render_cell(cell, arena, flocks, coord == own)?)
                        }
                        _ => None,
                    };
                    views.push(view);
                }
            }
            (
                x_hi.saturating_sub(x_lo).saturating_add(1),
                y_hi.saturating_sub(y_lo).saturating_add(1),
            )
        } else {
            (0, 0)
        };

        Ok(Self {
            position,
            radius,
            origin: CellCoord::new(x_lo, y_lo),
            columns,
            rows,
            views,
        })
    }

    /// Observer position the sight was computed from.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Sight radius used.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// The observer's own cell.
    pub fn own_cell(&self) -> CellCoord {
        self.position.cell()
    }

    fn slot(&self, x: u32, y: u32) -> Option<usize> {
        let dx = x.checked_sub(self.origin.x)?;
        let dy = y.checked_sub(self.origin.y)?;
        if dx >= self.columns || dy >= self.rows {
            return None;
        }
        let columns = usize::try_from(self.columns).ok()?;
        usize::try_from(dy)
            .ok()?
            .checked_mul(columns)?
            .checked_add(usize::try_from(dx).ok()?)
    }

    /// Whether the cell `(x, y)` is in sight.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.get(x, y).is_some()
    }

    /// The view of `(x, y)` if it is in sight.
    pub fn get(&self, x: u32, y: u32) -> Option<&CellView> {
        self.slot(x, y)
            .and_then(|i| self.views.get(i))
            .and_then(Option::as_ref)
    }

    /// The view of `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`SightError::OutOfSight`] if the cell is not in sight; check
    /// [`contains`](Self::contains) first.
    pub fn cell_view_at(&self, x: u32, y: u32) -> Result<&CellView, SightError> {
        self.get(x, y).ok_or(SightError::OutOfSight { x, y })
    }

    /// The view of the observer's own cell, if it lies inside the grid.
    pub fn own_cell_view(&self) -> Option<&CellView> {
        let own = self.own_cell();
        self.get(own.x, own.y)
    }

    /// Iterate over every in-sight cell in row-major order.
    ///
    /// The iterator borrows the sight and can be restarted by calling this
    /// again.
    pub fn iter(&self) -> impl Iterator<Item = &CellView> {
        self.views.iter().flatten()
    }

    /// Number of cells in sight.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no cell is in sight.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for &'a Sight {
    type Item = &'a CellView;
    type IntoIter = std::iter::Flatten<std::slice::Iter<'a, Option<CellView>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.iter().flatten()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn extent_of(radius: f64) -> u32 {
    // Saturating cast; NaN and negative radii collapse to 0.
    radius.max(0.0).ceil() as u32
}
