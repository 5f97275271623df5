//! LED Tetris (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `led_tetris::{core,input,term,types}` and hosts the
//! binary's file logger.

pub mod logger;

pub use led_tetris_core as core;
pub use led_tetris_input as input;
pub use led_tetris_term as term;
pub use led_tetris_types as types;
