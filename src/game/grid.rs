//! Fixed-size row-major storage addressed by [`Coord`].

use std::ops::{Index, IndexMut};

use crate::game::{Coord, Torus};

/// A `width × height` table with one value per cell.
///
/// The size is fixed at construction. Indexing with a coordinate that
/// did not come from the same [`Torus`] is a programming error and
/// panics like any out-of-range slice index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    torus: Torus,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`.
    #[must_use]
    pub fn filled(torus: Torus, value: T) -> Self {
        Self {
            torus,
            cells: vec![value; torus.area()],
        }
    }
}

impl<T: Default> Grid<T> {
    /// Create a grid with every cell set to `T::default()`.
    #[must_use]
    pub fn with_default(torus: Torus) -> Self {
        let cells = std::iter::repeat_with(T::default)
            .take(torus.area())
            .collect();
        Self { torus, cells }
    }
}

impl<T> Grid<T> {
    /// The torus this grid is laid out on.
    #[must_use]
    pub const fn torus(&self) -> Torus {
        self.torus
    }

    #[inline]
    fn index_of(&self, coord: Coord) -> usize {
        usize::from(coord.y) * usize::from(self.torus.width()) + usize::from(coord.x)
    }

    /// Get the value at `(x, y)`.
    #[must_use]
    pub fn at(&self, x: u16, y: u16) -> &T {
        &self[Coord::new(x, y)]
    }

    /// Replace the value at `coord`, returning the old one.
    pub fn replace(&mut self, coord: Coord, value: T) -> T {
        std::mem::replace(&mut self[coord], value)
    }

    /// Iterate over all coordinates and values in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> {
        self.torus.coords().zip(self.cells.iter())
    }

    /// Iterate over all values mutably in row-major order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.cells.iter_mut()
    }
}

impl<T> Index<Coord> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, coord: Coord) -> &T {
        &self.cells[self.index_of(coord)]
    }
}

impl<T> IndexMut<Coord> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, coord: Coord) -> &mut T {
        let idx = self.index_of(coord);
        &mut self.cells[idx]
    }
}
