//! Terminal LED-matrix simulator.
//!
//! The engine paints into a [`PixelBuffer`]; [`TerminalRenderer`] shows that
//! buffer in a terminal with each LED drawn as a solid block of color. This
//! stands in for the physical panel when developing on a desktop.

pub mod fb;
pub mod renderer;

pub use led_tetris_core as core;
pub use led_tetris_types as types;

pub use fb::PixelBuffer;
pub use renderer::{encode_diff_into, encode_full_into, PixelScale, TerminalRenderer};
