//! LED pixel buffer the engine paints into.

use crate::core::DisplaySurface;
use crate::types::Rgb;

/// 2D buffer of LED colors, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u16,
    height: u16,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; len],
        }
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Rgb> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    /// Number of lit (non-black) pixels.
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|p| !p.is_black()).count()
    }
}

impl DisplaySurface for PixelBuffer {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn set_cell(&mut self, col: u16, row: u16, color: Rgb) {
        if let Some(i) = self.idx(col, row) {
            self.pixels[i] = color;
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }
}
