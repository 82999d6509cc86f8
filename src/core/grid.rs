//! # Grid Snapshot
//!
//! A throwaway `size × size` view of the board, rebuilt from the model on
//! every render. Nothing ever edits a snapshot in place.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Background,
    Marker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    cells: Vec<Vec<Cell>>,
    marker: (usize, usize),
}

impl GridSnapshot {
    /// Coordinates past the last row or column land on it. `size` must be
    /// at least 1.
    pub(crate) fn new(size: usize, x: usize, y: usize) -> Self {
        let x = x.min(size - 1);
        let y = y.min(size - 1);
        let mut cells = vec![vec![Cell::Background; size]; size];
        cells[y][x] = Cell::Marker;
        Self {
            cells,
            marker: (x, y),
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Marker coordinates as `(x, y)`.
    pub fn marker(&self) -> (usize, usize) {
        self.marker
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }
}
