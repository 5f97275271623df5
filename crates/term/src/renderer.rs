//! TerminalRenderer: shows a pixel buffer as an LED matrix in a real terminal.
//!
//! Every LED is a solid block of background color, `2 * pixel_width` columns
//! by `pixel_height` rows, so a square LED looks square in a typical font.
//! After the first frame only changed runs of pixels are redrawn.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor},
    terminal, QueueableCommand,
};

use crate::core::DisplaySurface;
use crate::fb::PixelBuffer;
use crate::types::Rgb;

/// Terminal cells per LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelScale {
    pub pixel_width: u16,
    pub pixel_height: u16,
}

impl PixelScale {
    pub fn new(pixel_width: u16, pixel_height: u16) -> Self {
        Self {
            pixel_width: pixel_width.max(1),
            pixel_height: pixel_height.max(1),
        }
    }

    /// Terminal columns covered by one LED.
    pub fn columns(&self) -> u16 {
        self.pixel_width * 2
    }
}

impl Default for PixelScale {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    scale: PixelScale,
    last: Option<PixelBuffer>,
    buf: Vec<u8>,
    /// Key release reporting was requested from the terminal
    enhanced_keys: bool,
}

impl TerminalRenderer {
    pub fn new(scale: PixelScale) -> Self {
        Self {
            stdout: io::stdout(),
            scale,
            last: None,
            buf: Vec::with_capacity(16 * 1024),
            enhanced_keys: false,
        }
    }

    /// Enter raw mode on the alternate screen.
    ///
    /// Terminals speaking the kitty keyboard protocol are asked to report key
    /// releases, so held directions end exactly when the key comes up.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);
        self.buf.clear();
        if self.enhanced_keys {
            self.buf.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        if self.enhanced_keys {
            self.buf.queue(PopKeyboardEnhancementFlags)?;
            self.enhanced_keys = false;
        }
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Show `fb`, redrawing only what changed since the previous call.
    pub fn draw(&mut self, fb: &PixelBuffer) -> Result<()> {
        self.buf.clear();
        match self.last.as_mut() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(prev, fb, self.scale, &mut self.buf)?;
                prev.clone_from(fb);
            }
            Some(prev) => {
                encode_full_into(fb, self.scale, &mut self.buf)?;
                prev.clone_from(fb);
            }
            None => {
                encode_full_into(fb, self.scale, &mut self.buf)?;
                self.last = Some(fb.clone());
            }
        }
        self.flush_buf()
    }

    /// Turn every LED off.
    pub fn blank(&mut self) -> Result<()> {
        let Some(prev) = self.last.as_ref() else {
            return Ok(());
        };
        let black = PixelBuffer::new(prev.width(), prev.height());
        self.draw(&black)
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_full_into(fb: &PixelBuffer, scale: PixelScale, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    for y in 0..fb.height() {
        encode_run(fb, scale, 0, y, fb.width(), out)?;
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode a diff redraw (changed runs) into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_diff_into(
    prev: &PixelBuffer,
    next: &PixelBuffer,
    scale: PixelScale,
    out: &mut Vec<u8>,
) -> Result<()> {
    for_each_changed_run(prev, next, |x, y, len| encode_run(next, scale, x, y, len, out))?;
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Paint LEDs `x..x + len` of row `y`, one terminal line per sub-row.
fn encode_run(
    fb: &PixelBuffer,
    scale: PixelScale,
    x: u16,
    y: u16,
    len: u16,
    out: &mut Vec<u8>,
) -> Result<()> {
    let block = " ".repeat(scale.columns() as usize);
    for sub in 0..scale.pixel_height {
        out.queue(cursor::MoveTo(x * scale.columns(), y * scale.pixel_height + sub))?;
        let mut current: Option<Rgb> = None;
        for dx in 0..len {
            let px = fb.get(x + dx, y).unwrap_or(Rgb::BLACK);
            if current != Some(px) {
                out.queue(SetBackgroundColor(rgb_to_color(px)))?;
                current = Some(px);
            }
            out.queue(Print(&block))?;
        }
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn for_each_changed_run(
    prev: &PixelBuffer,
    next: &PixelBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        // Size changed: treat everything as dirty in a single pass (row runs).
        for y in 0..next.height() {
            f(0, y, next.width())?;
        }
        return Ok(());
    }

    let w = next.width();
    let h = next.height();

    for y in 0..h {
        let mut x = 0;
        while x < w {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }

            let start = x;
            x += 1;
            while x < w && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}
