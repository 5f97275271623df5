//! Geometry module - square occupancy matrices and their rotation
//!
//! A [`Shape`] is an `n x n` flag matrix (n is 2, 3 or 4) stored in a fixed
//! 4x4 array so it stays `Copy` and never allocates. Cells outside the `n x n`
//! box are always clear, which keeps derived equality meaningful.
//!
//! Coordinates inside a shape are `(x, y)`: x is the column offset from the
//! piece origin, y the row offset (downwards).

/// Largest supported matrix side (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Square occupancy matrix of a tetromino in one orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from rows of 0/1 flags, top row first.
    ///
    /// The number of rows is the matrix side. Panics (at compile time when
    /// used in a const) if the rows are not square or larger than 4.
    pub const fn from_rows<const N: usize>(rows: [[u8; N]; N]) -> Self {
        assert!(N >= 1 && N <= MAX_SHAPE_SIZE, "shape side must be 1..=4");
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < N {
            let mut x = 0;
            while x < N {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            size: N as u8,
            cells,
        }
    }

    /// Matrix side length `n`.
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Whether cell `(x, y)` is occupied. Out-of-box coordinates are clear.
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.size() && y < self.size() && self.cells[y][x]
    }

    /// Iterate the `(x, y)` offsets of occupied cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let n = self.size();
        (0..n).flat_map(move |y| {
            (0..n).filter_map(move |x| self.cells[y][x].then_some((x as i32, y as i32)))
        })
    }

    /// Number of occupied cells.
    pub fn count(&self) -> usize {
        self.cells().count()
    }

    /// Rotate 90° in the given direction, returning a new shape.
    ///
    /// Clockwise sends `(x, y)` to `(n-1-y, x)`; counter-clockwise sends
    /// `(x, y)` to `(y, n-1-x)`.
    pub fn rotated(&self, clockwise: bool) -> Self {
        let n = self.size();
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for y in 0..n {
            for x in 0..n {
                if !self.cells[y][x] {
                    continue;
                }
                let (nx, ny) = if clockwise {
                    (n - 1 - y, x)
                } else {
                    (y, n - 1 - x)
                };
                cells[ny][nx] = true;
            }
        }
        Self {
            size: self.size,
            cells,
        }
    }
}

/// Free-function form of [`Shape::rotated`].
pub fn rotate(shape: &Shape, clockwise: bool) -> Shape {
    shape.rotated(clockwise)
}
