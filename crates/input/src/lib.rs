//! Terminal input module (engine-facing).
//!
//! This crate is independent of any UI framework. It maps `crossterm` key
//! events onto the virtual gamepad the engine reads (four buttons plus a
//! two-axis stick) and exposes it as an [`InputSource`](crate::core::InputSource).

pub mod handler;
pub mod map;

pub use led_tetris_core as core;
pub use led_tetris_types as types;

pub use handler::KeyboardInput;
pub use map::{map_key, Direction, KeyInput};
