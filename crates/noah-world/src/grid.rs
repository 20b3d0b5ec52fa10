//! The rectangular lattice of cells.
//!
//! The [`Grid`] stores one [`Cell`] per integer coordinate in row-major
//! order. Each cell tracks the free (unshepherded) animals standing in it and
//! the helpers currently occupying it. Neighbors are the four orthogonal
//! cells; cells on the border simply have fewer of them.

use std::collections::BTreeSet;

use noah_types::{AnimalId, CellCoord, HelperId};

use crate::error::WorldError;

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    coord: CellCoord,
    animals: BTreeSet<AnimalId>,
    helpers: BTreeSet<HelperId>,
}

impl Cell {
    const fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            animals: BTreeSet::new(),
            helpers: BTreeSet::new(),
        }
    }

    /// Coordinate of this cell.
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Free animals standing in this cell.
    pub const fn animals(&self) -> &BTreeSet<AnimalId> {
        &self.animals
    }

    /// Helpers currently in this cell.
    pub const fn helpers(&self) -> &BTreeSet<HelperId> {
        &self.helpers
    }

    /// Number of free animals in this cell.
    pub fn animal_count(&self) -> usize {
        self.animals.len()
    }

    /// Whether the given animal is free in this cell.
    pub fn has_animal(&self, animal: AnimalId) -> bool {
        self.animals.contains(&animal)
    }
}

/// The world lattice.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid of `width x height` cells.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either dimension is zero
    /// or the cell count does not fit in memory indices.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        let invalid = || WorldError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        let count = usize::try_from(u64::from(width).checked_mul(u64::from(height)).ok_or_else(invalid)?)
            .map_err(|_err| invalid())?;

        let mut cells = Vec::with_capacity(count);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(CellCoord::new(x, y)));
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the coordinate lies inside the grid.
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let row = usize::try_from(coord.y).ok()?;
        let col = usize::try_from(coord.x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(col)
    }

    fn out_of_bounds(&self, coord: CellCoord) -> WorldError {
        WorldError::OutOfBounds {
            coord,
            width: self.width,
            height: self.height,
        }
    }

    /// Get a cell by coordinate.
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).and_then(|i| self.cells.get(i))
    }

    /// Get a cell by coordinate, failing outside the grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for coordinates outside the grid.
    pub fn require_cell(&self, coord: CellCoord) -> Result<&Cell, WorldError> {
        self.cell(coord).ok_or_else(|| self.out_of_bounds(coord))
    }

    fn require_cell_mut(&mut self, coord: CellCoord) -> Result<&mut Cell, WorldError> {
        let err = self.out_of_bounds(coord);
        match self.index(coord) {
            Some(i) => self.cells.get_mut(i).ok_or(err),
            None => Err(err),
        }
    }

    /// Iterate over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Orthogonal neighbors of a cell, in up, down, left, right order.
    ///
    /// Border cells have fewer neighbors; coordinates outside the grid have
    /// none.
    pub fn neighbors(&self, coord: CellCoord) -> Vec<CellCoord> {
        if !self.contains(coord) {
            return Vec::new();
        }
        let candidates = [
            coord.y.checked_sub(1).map(|y| CellCoord::new(coord.x, y)),
            coord.y.checked_add(1).map(|y| CellCoord::new(coord.x, y)),
            coord.x.checked_sub(1).map(|x| CellCoord::new(x, coord.y)),
            coord.x.checked_add(1).map(|x| CellCoord::new(x, coord.y)),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(|c| self.contains(*c))
            .collect()
    }

    /// Neighbors currently holding the fewest free animals.
    ///
    /// Returned in the same up, down, left, right order as [`neighbors`].
    ///
    /// [`neighbors`]: Grid::neighbors
    pub fn emptiest_neighbors(&self, coord: CellCoord) -> Vec<CellCoord> {
        let counted: Vec<(CellCoord, usize)> = self
            .neighbors(coord)
            .into_iter()
            .filter_map(|c| self.cell(c).map(|cell| (c, cell.animal_count())))
            .collect();

        let Some(min) = counted.iter().map(|&(_, n)| n).min() else {
            return Vec::new();
        };

        counted
            .into_iter()
            .filter(|&(_, n)| n == min)
            .map(|(c, _)| c)
            .collect()
    }

    // -------------------------------------------------------------------
    // Animal occupancy
    // -------------------------------------------------------------------

    /// Put a free animal into a cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for coordinates outside the grid.
    pub fn place_animal(&mut self, coord: CellCoord, animal: AnimalId) -> Result<(), WorldError> {
        self.require_cell_mut(coord)?.animals.insert(animal);
        Ok(())
    }

    /// Remove a free animal from a cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AnimalNotInCell`] if the animal is not there.
    pub fn remove_animal(&mut self, coord: CellCoord, animal: AnimalId) -> Result<(), WorldError> {
        if self.require_cell_mut(coord)?.animals.remove(&animal) {
            Ok(())
        } else {
            Err(WorldError::AnimalNotInCell { animal, coord })
        }
    }

    /// Move a free animal between cells.
    ///
    /// # Errors
    ///
    /// Fails if the animal is not in `from` or `to` is outside the grid. The
    /// grid is left unchanged on failure.
    pub fn move_animal(
        &mut self,
        animal: AnimalId,
        from: CellCoord,
        to: CellCoord,
    ) -> Result<(), WorldError> {
        self.require_cell(to)?;
        self.remove_animal(from, animal)?;
        self.place_animal(to, animal)
    }

    // -------------------------------------------------------------------
    // Helper occupancy
    // -------------------------------------------------------------------

    /// Register a helper in a cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for coordinates outside the grid.
    pub fn place_helper(&mut self, coord: CellCoord, helper: HelperId) -> Result<(), WorldError> {
        self.require_cell_mut(coord)?.helpers.insert(helper);
        Ok(())
    }

    /// Move a helper's registration between cells.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::HelperNotInCell`] if the helper is not
    /// registered in `from`, or [`WorldError::OutOfBounds`] for `to`.
    pub fn move_helper(
        &mut self,
        helper: HelperId,
        from: CellCoord,
        to: CellCoord,
    ) -> Result<(), WorldError> {
        if from == to {
            return Ok(());
        }
        self.require_cell(to)?;
        if !self.require_cell_mut(from)?.helpers.remove(&helper) {
            return Err(WorldError::HelperNotInCell {
                helper,
                coord: from,
            });
        }
        self.place_helper(to, helper)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(Grid::new(0, 5).is_err());
        assert!(Grid::new(5, 0).is_err());
    }

    #[test]
    fn cells_are_row_major() {
        let grid = Grid::new(3, 2).unwrap();
        let coords: Vec<CellCoord> = grid.cells().map(Cell::coord).collect();
        assert_eq!(coords.first(), Some(&CellCoord::new(0, 0)));
        assert_eq!(coords.get(3), Some(&CellCoord::new(0, 1)));
        assert_eq!(coords.len(), 6);
    }

    #[test]
    fn corner_has_two_neighbors() {
        let grid = Grid::new(4, 4).unwrap();
        assert_eq!(
            grid.neighbors(CellCoord::new(0, 0)),
            vec![CellCoord::new(0, 1), CellCoord::new(1, 0)]
        );
        assert_eq!(grid.neighbors(CellCoord::new(2, 2)).len(), 4);
        assert!(grid.neighbors(CellCoord::new(9, 9)).is_empty());
    }

    #[test]
    fn emptiest_neighbors_prefer_uncrowded_cells() {
        let mut grid = Grid::new(3, 3).unwrap();
        let center = CellCoord::new(1, 1);
        grid.place_animal(CellCoord::new(1, 0), AnimalId::new(0)).unwrap();
        grid.place_animal(CellCoord::new(0, 1), AnimalId::new(1)).unwrap();

        assert_eq!(
            grid.emptiest_neighbors(center),
            vec![CellCoord::new(1, 2), CellCoord::new(2, 1)]
        );
    }

    #[test]
    fn move_animal_is_atomic_on_bad_target() {
        let mut grid = Grid::new(2, 2).unwrap();
        let a = AnimalId::new(0);
        grid.place_animal(CellCoord::new(0, 0), a).unwrap();

        assert!(grid.move_animal(a, CellCoord::new(0, 0), CellCoord::new(5, 5)).is_err());
        assert!(grid.cell(CellCoord::new(0, 0)).unwrap().has_animal(a));

        grid.move_animal(a, CellCoord::new(0, 0), CellCoord::new(1, 0)).unwrap();
        assert!(grid.cell(CellCoord::new(1, 0)).unwrap().has_animal(a));
        assert_eq!(grid.cell(CellCoord::new(0, 0)).unwrap().animal_count(), 0);
    }

    #[test]
    fn removing_absent_animal_fails() {
        let mut grid = Grid::new(2, 2).unwrap();
        let err = grid.remove_animal(CellCoord::new(1, 1), AnimalId::new(9));
        assert_eq!(
            err,
            Err(WorldError::AnimalNotInCell {
                animal: AnimalId::new(9),
                coord: CellCoord::new(1, 1),
            })
        );
    }

    #[test]
    fn helpers_follow_moves() {
        let mut grid = Grid::new(3, 3).unwrap();
        let h = HelperId::new(1);
        grid.place_helper(CellCoord::new(0, 0), h).unwrap();
        grid.move_helper(h, CellCoord::new(0, 0), CellCoord::new(0, 1)).unwrap();

        assert!(grid.cell(CellCoord::new(0, 0)).unwrap().helpers().is_empty());
        assert!(grid.cell(CellCoord::new(0, 1)).unwrap().helpers().contains(&h));
        assert!(grid.move_helper(h, CellCoord::new(2, 2), CellCoord::new(0, 0)).is_err());
    }
}
