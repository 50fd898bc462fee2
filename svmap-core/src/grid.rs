//! Fixed-size 2D grids with a default value outside their bounds
//!
//! Both the score grid and the path grid of an alignment run are `Grid`s of
//! shape (reference length × read length). Reads at negative or too-large
//! indices return the grid's default, so recurrence terms like `(i-2, j-1)`
//! need no explicit bounds checks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    height: usize,
    width: usize,
    default: T,
    cells: Vec<T>,
}

impl<T: Copy + PartialEq> Grid<T> {
    /// `height` rows by `width` columns, every cell set to `default`.
    pub fn new(height: usize, width: usize, default: T) -> Self {
        Self {
            height,
            width,
            default,
            cells: vec![default; height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn default_value(&self) -> T {
        self.default
    }

    fn index(&self, row: isize, col: isize) -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(row * self.width + col)
    }

    pub fn contains(&self, row: isize, col: isize) -> bool {
        self.index(row, col).is_some()
    }

    pub fn get(&self, row: isize, col: isize) -> T {
        match self.index(row, col) {
            Some(idx) => self.cells[idx],
            None => self.default,
        }
    }

    /// Write one cell. Writing outside the grid is a caller bug.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.height && col < self.width,
            "grid write out of bounds: ({}, {}) in {}x{}",
            row,
            col,
            self.height,
            self.width
        );
        self.cells[row * self.width + col] = value;
    }

    /// Take the value at a cell and reset it to the default.
    pub fn clear(&mut self, row: isize, col: isize) -> T {
        match self.index(row, col) {
            Some(idx) => std::mem::replace(&mut self.cells[idx], self.default),
            None => self.default,
        }
    }

    pub fn is_default(&self, row: isize, col: isize) -> bool {
        self.get(row, col) == self.default
    }

    /// Row-major iterator over `(row, col, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &value)| (idx / width, idx % width, value))
    }
}
