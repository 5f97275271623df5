//! Render module - paints a game onto an LED-style pixel surface
//!
//! The engine never reads pixels back; it only clears the surface and sets
//! individual cells. What gets painted depends on the phase:
//!
//! - **Falling**: settled cells plus the active piece
//! - **Line clear**: settled cells, with the pending rows breathing white
//! - **Game over**: only the final score, in breathing 3x5 digits

use std::f32::consts::PI;

use crate::game_state::{GameState, Phase};
use crate::types::Rgb;

/// A rectangular grid of colored cells the engine can paint on.
pub trait DisplaySurface {
    fn width(&self) -> u16;
    fn height(&self) -> u16;
    fn set_cell(&mut self, col: u16, row: u16, color: Rgb);
    fn clear(&mut self);

    /// Paint `#` characters of `rows` in `color` with the sprite's top-left at
    /// (col, row); spaces paint black. Anything off-surface is clipped.
    fn draw_sprite(&mut self, col: i32, row: i32, rows: &[&str], color: Rgb) {
        for (dy, line) in rows.iter().enumerate() {
            for (dx, ch) in line.chars().enumerate() {
                let (c, r) = (col + dx as i32, row + dy as i32);
                if c < 0 || r < 0 || c >= self.width() as i32 || r >= self.height() as i32 {
                    continue;
                }
                let px = if ch == '#' { color } else { Rgb::BLACK };
                self.set_cell(c as u16, r as u16, px);
            }
        }
    }
}

/// 3x5 digit glyphs
pub const DIGIT_FONT: [[&str; 5]; 10] = [
    ["###", "# #", "# #", "# #", "###"],
    [" # ", "## ", " # ", " # ", "###"],
    ["###", "  #", "###", "#  ", "###"],
    ["###", "  #", "###", "  #", "###"],
    ["# #", "# #", "###", "  #", "  #"],
    ["###", "#  ", "###", "  #", "###"],
    ["###", "#  ", "###", "# #", "###"],
    ["###", "  #", "  #", "  #", "  #"],
    ["###", "# #", "###", "# #", "###"],
    ["###", "# #", "###", "  #", "###"],
];

/// Glyph height in rows
pub const GLYPH_HEIGHT: i32 = 5;

/// Horizontal advance per digit (3 wide plus a 1 column gap)
pub const GLYPH_ADVANCE: i32 = 4;

const BREATH_STEPS: u32 = 256;

/// Brightness in `[0, 1]` of a breathing animation
///
/// `t` is the remaining animation time, `duration` its full length and `freq`
/// the number of breaths over that length. The phase is quantized to 256
/// steps: `0.5 * (1 + cos(2π·i/256))` with `i = ⌊t·freq/duration·256⌋ mod 256`.
pub fn breath_curve(t: f32, duration: f32, freq: f32) -> f32 {
    let steps = BREATH_STEPS as f32;
    let i = ((t * freq / duration) * steps).floor() as i64;
    let i = i.rem_euclid(BREATH_STEPS as i64) as f32;
    0.5 * (1.0 + (2.0 * PI * i / steps).cos())
}

/// Draw `value` in decimal, centered on the surface.
pub fn draw_number(surface: &mut impl DisplaySurface, value: u32, color: Rgb) {
    let text = value.to_string();
    let width = text.len() as i32 * GLYPH_ADVANCE;
    let col = (surface.width() as i32 - width).div_euclid(2);
    let row = (surface.height() as i32 - GLYPH_HEIGHT).div_euclid(2);

    for (i, ch) in text.bytes().enumerate() {
        let glyph = &DIGIT_FONT[(ch - b'0') as usize];
        surface.draw_sprite(col + i as i32 * GLYPH_ADVANCE, row, glyph, color);
    }
}

impl GameState {
    /// Paint the current frame onto `surface`.
    pub fn render_into(&self, surface: &mut impl DisplaySurface) {
        surface.clear();

        if let Phase::GameOver { countdown } = self.phase() {
            let level = breath_curve(
                *countdown,
                self.config().game_over_secs,
                self.config().score_blink_freq,
            );
            draw_number(surface, self.score(), Rgb::grey(level));
            return;
        }

        let (w, h) = (surface.width(), surface.height());
        for (row, cells) in self.board().rows().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some(color) = cell {
                    if (col as u16) < w && (row as u16) < h {
                        surface.set_cell(col as u16, row as u16, *color);
                    }
                }
            }
        }

        match self.phase() {
            Phase::LineClear { timer, rows } => {
                let level = breath_curve(
                    *timer,
                    self.config().line_clear_secs,
                    self.config().clear_flash_freq,
                );
                let flash = Rgb::grey(level);
                for &row in rows {
                    if row < h as usize {
                        for col in 0..w.min(self.board().width()) {
                            surface.set_cell(col, row as u16, flash);
                        }
                    }
                }
            }
            Phase::Falling => {
                if let Some(piece) = self.active() {
                    for (col, row) in piece.cells() {
                        if col >= 0 && row >= 0 && col < w as i32 && row < h as i32 {
                            surface.set_cell(col as u16, row as u16, piece.color);
                        }
                    }
                }
            }
            Phase::GameOver { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-memory surface
    struct Grid {
        w: u16,
        h: u16,
        px: Vec<Rgb>,
    }

    impl Grid {
        fn new(w: u16, h: u16) -> Self {
            Self {
                w,
                h,
                px: vec![Rgb::BLACK; w as usize * h as usize],
            }
        }

        fn at(&self, col: u16, row: u16) -> Rgb {
            self.px[row as usize * self.w as usize + col as usize]
        }
    }

    impl DisplaySurface for Grid {
        fn width(&self) -> u16 {
            self.w
        }
        fn height(&self) -> u16 {
            self.h
        }
        fn set_cell(&mut self, col: u16, row: u16, color: Rgb) {
            let w = self.w as usize;
            self.px[row as usize * w + col as usize] = color;
        }
        fn clear(&mut self) {
            self.px.fill(Rgb::BLACK);
        }
    }

    #[test]
    fn test_breath_curve_endpoints() {
        assert!((breath_curve(0.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
        // Half a breath in: index 128, cos(pi) = -1.
        assert!(breath_curve(0.5, 1.0, 1.0).abs() < 1e-6);
        // A full breath wraps back to the start.
        assert!((breath_curve(1.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_breath_curve_stays_in_unit_range() {
        for i in 0..1000 {
            let v = breath_curve(i as f32 * 0.013, 0.5, 1.5);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_draw_sprite_clips() {
        let mut grid = Grid::new(2, 2);
        grid.draw_sprite(-1, -1, &["###", "# #", "###"], Rgb::WHITE);
        assert_eq!(grid.at(0, 0), Rgb::BLACK);
        assert_eq!(grid.at(1, 0), Rgb::WHITE);
        assert_eq!(grid.at(0, 1), Rgb::WHITE);
        assert_eq!(grid.at(1, 1), Rgb::WHITE);
    }

    #[test]
    fn test_draw_number_centers_digits() {
        let mut grid = Grid::new(10, 10);
        draw_number(&mut grid, 10, Rgb::WHITE);
        // Two digits = 8 columns, so start at column 1; rows start at 2.
        // "1" glyph top row is " # ".
        assert_eq!(grid.at(1, 2), Rgb::BLACK);
        assert_eq!(grid.at(2, 2), Rgb::WHITE);
        // "0" glyph top row is "###" starting at column 5.
        assert_eq!(grid.at(5, 2), Rgb::WHITE);
        assert_eq!(grid.at(7, 2), Rgb::WHITE);
        assert_eq!(grid.at(6, 3), Rgb::BLACK);
    }
}
