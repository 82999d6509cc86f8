//! # Position Model
//!
//! The marker's coordinates on a square grid. Pure state: no I/O and no
//! knowledge of who is calling it.
//!
//! Directional moves are applied unclamped, so a coordinate may briefly sit
//! outside the grid. `clamp()` pulls both axes back in; the renderer always
//! clamps before it reads.

use std::fmt;

use crate::core::grid::GridSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// A grid needs at least one cell.
    EmptyGrid,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::EmptyGrid => write!(f, "grid size must be at least 1"),
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionModel {
    x: i64,
    y: i64,
    size: i64,
}

impl PositionModel {
    pub fn new(size: usize) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::EmptyGrid);
        }
        Ok(Self {
            x: 0,
            y: 0,
            size: size as i64,
        })
    }

    pub fn x(&self) -> i64 {
        self.x
    }

    pub fn y(&self) -> i64 {
        self.y
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn up(&mut self) {
        self.y -= 1;
    }

    pub fn down(&mut self) {
        self.y += 1;
    }

    pub fn left(&mut self) {
        self.x -= 1;
    }

    pub fn right(&mut self) {
        self.x += 1;
    }

    pub fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
    }

    /// Forces both axes back into `0..size`. Each axis is bounded on its own,
    /// so a position off the grid on both axes is fully corrected.
    pub fn clamp(&mut self) {
        let max = self.size - 1;
        self.x = self.x.clamp(0, max);
        self.y = self.y.clamp(0, max);
    }

    /// Builds the cell matrix for the current position.
    ///
    /// Clamps a copy rather than `self`, so the snapshot is always well-formed
    /// even if the caller forgot to clamp.
    pub fn snapshot(&self) -> GridSnapshot {
        let mut bounded = self.clone();
        bounded.clamp();
        GridSnapshot::new(self.size(), bounded.x as usize, bounded.y as usize)
    }

    #[cfg(test)]
    pub(crate) fn at(size: usize, x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            size: size as i64,
        }
    }
}
