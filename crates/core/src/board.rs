//! Board module - manages the game grid
//!
//! The board is a `width x height` grid sized by the LED matrix; each cell is
//! empty or holds the color of the piece that settled there.
//! Uses a flat row-major vector allocated once at construction.
//! Coordinates: (col, row) where col grows left to right and row grows top to
//! bottom, which is also the gravity direction.
//!
//! Rows above the top edge (negative rows) form the spawn band: they are
//! always free so a piece may hang partially above the visible grid.

use crate::geometry::Shape;
use crate::types::{Cell, Rgb};

/// The game board, `width` columns by `height` rows
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    ///
    /// Dimensions are checked by the engine constructor; a zero-sized board is
    /// representable here but useless.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    #[inline(always)]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || col >= self.width as i32 || row < 0 || row >= self.height as i32 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get cell at (col, row); `None` if out of bounds
    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|idx| self.cells[idx])
    }

    /// Set cell at (col, row); returns false if out of bounds
    pub fn set(&mut self, col: i32, row: i32, cell: Cell) -> bool {
        match self.index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a single cell may hold a block: inside the side walls, above
    /// the floor, and either in the spawn band or empty.
    pub fn is_free(&self, col: i32, row: i32) -> bool {
        if col < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return false;
        }
        row < 0 || matches!(self.get(col, row), Some(None))
    }

    /// Check whether `shape` fits with its top-left corner at (col, row)
    pub fn is_valid(&self, shape: &Shape, col: i32, row: i32) -> bool {
        shape.cells().all(|(dx, dy)| self.is_free(col + dx, row + dy))
    }

    /// Write `color` into every cell covered by `shape` at (col, row)
    ///
    /// The caller must have checked the placement with [`Board::is_valid`].
    /// Blocks in the spawn band have nowhere to go and are dropped; the return
    /// value is how many were dropped that way.
    pub fn merge(&mut self, shape: &Shape, color: Rgb, col: i32, row: i32) -> usize {
        let mut above = 0;
        for (dx, dy) in shape.cells() {
            let (c, r) = (col + dx, row + dy);
            debug_assert!(c >= 0 && c < self.width as i32, "merge outside side walls");
            if r < 0 {
                above += 1;
                continue;
            }
            self.set(c, r, Some(color));
        }
        above
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= self.height as usize {
            return false;
        }
        let start = row * self.width as usize;
        let end = start + self.width as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Indices of all full rows, ascending (top to bottom)
    pub fn find_full_rows(&self) -> Vec<usize> {
        (0..self.height as usize)
            .filter(|&row| self.is_row_full(row))
            .collect()
    }

    /// Delete `rows`, shift everything above them down and refill the top
    /// with as many empty rows as were removed
    ///
    /// Uses a bottom-up two-pointer compaction; untouched rows keep their
    /// relative order. Duplicate or out-of-range indices are ignored.
    pub fn remove_rows(&mut self, rows: &[usize]) {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut write_row = height;

        for read_row in (0..height).rev() {
            if rows.contains(&read_row) {
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                let src = read_row * width;
                self.cells.copy_within(src..src + width, write_row * width);
            }
        }

        self.cells[..write_row * width].fill(None);
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Fill a whole row with one color
    pub fn fill_row(&mut self, row: usize, color: Rgb) {
        if row >= self.height as usize {
            return;
        }
        let start = row * self.width as usize;
        self.cells[start..start + self.width as usize].fill(Some(color));
    }

    /// Build a board from text rows, `#` (or any non-`.` non-space) = filled
    ///
    /// Handy for tests and benches.
    pub fn from_ascii(rows: &[&str], color: Rgb) -> Self {
        let height = rows.len() as u16;
        let width = rows.first().map_or(0, |r| r.chars().count()) as u16;
        let mut board = Self::new(width, height);
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch != '.' && ch != ' ' {
                    board.set(c as i32, r as i32, Some(color));
                }
            }
        }
        board
    }
}
