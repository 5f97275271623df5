//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the whole falling-block engine for a small LED matrix.
//! It has **no dependencies** on a terminal, GPIO or any other I/O: input
//! arrives through the [`InputSource`] trait and frames leave through the
//! [`DisplaySurface`] trait, both implemented by the host.
//!
//! # Module Structure
//!
//! - [`board`]: variable-size matrix with collision checks and row removal
//! - [`geometry`]: square shape matrices and their rotation
//! - [`pieces`]: the seven tetromino shapes and their LED colors
//! - [`kicks`]: SRS wall kick tables and rotation resolution
//! - [`rng`]: uniform random (or scripted) piece selection
//! - [`scoring`]: line clear points and the gravity curve
//! - [`input`]: input source trait and per-tick snapshots
//! - [`game_state`]: the falling / line clear / game over state machine
//! - [`render`]: painting a frame, digit font and breathing animation
//! - [`app`]: glue between an injected input source and a game
//!
//! # Game Rules
//!
//! - **Uniform spawner**: every kind is equally likely on every draw
//! - **SRS rotation**: with wall kicks, O included (its kicks never matter)
//! - **Instant lock**: a piece locks on the first gravity step it cannot take
//! - **Scoring**: 10 / 30 / 60 / 100 for 1-4 rows; speed follows score
//! - **No hold, no ghost, no lock delay**
//!
//! # Example
//!
//! ```
//! use led_tetris_core::{GameState, InputSnapshot};
//! use led_tetris_core::types::Button;
//!
//! let mut game = GameState::with_seed(10, 20, 12345).unwrap();
//!
//! // Rotate, then slam the piece down.
//! game.tick(0.016, &InputSnapshot::idle().with_press(Button::RotateCw));
//! game.tick(0.016, &InputSnapshot::idle().with_axis(0.0, -1.0));
//!
//! assert_eq!(game.score(), 0);
//! assert!(game.board().cells().iter().filter(|c| c.is_some()).count() == 4);
//! ```
//!
//! # Timing
//!
//! Time is variable-step: call [`GameState::tick`] once per frame with the
//! elapsed seconds. Gravity fires every [`GameState::drop_interval`] seconds
//! (1.0 s at score 0, down to 0.1 s).

pub mod app;
pub mod board;
pub mod error;
pub mod game_state;
pub mod geometry;
pub mod input;
pub mod kicks;
pub mod pieces;
pub mod render;
pub mod rng;
pub mod scoring;

pub use led_tetris_types as types;

// Re-export commonly used types for convenience
pub use app::TetrisApp;
pub use board::Board;
pub use error::EngineError;
pub use game_state::{ActivePiece, GameState, Phase};
pub use geometry::{rotate, Shape};
pub use input::{InputSnapshot, InputSource};
pub use kicks::{get_kicks, KickFamily};
pub use pieces::{get_color, get_shape};
pub use render::{breath_curve, draw_number, DisplaySurface};
pub use rng::{PieceSpawner, SimpleRng};
pub use scoring::{calculate_line_score, drop_interval};
