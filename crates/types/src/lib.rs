//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! They are plain data with no behavior beyond small conversions, so the engine,
//! the keyboard input layer and the terminal simulator can all share them.
//!
//! # Matrix Dimensions
//!
//! The playfield is exactly as large as the LED matrix that displays it. The
//! default launcher values are:
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom, gravity points down)
//!
//! # Tunable Defaults
//!
//! All timing values are in seconds, all axis thresholds are magnitudes on a
//! `[-1.0, 1.0]` stick axis:
//!
//! | Field | Default | Description |
//! |-------|---------|-------------|
//! | `move_threshold` | 0.5 | Lateral axis deflection that selects a move direction |
//! | `hard_drop_threshold` | 0.8 | Perpendicular deflection for hard/soft drop |
//! | `rearm_threshold` | 0.1 | Neutral band that re-arms the hard drop |
//! | `lateral_step` | 0.5 | Sub-cell lateral distance accumulated per tick |
//! | `line_clear_secs` | 0.5 | Duration of the line clear flash |
//! | `game_over_secs` | 3.0 | How long the final score is shown |
//! | `base_drop_interval` | 1.0 | Gravity interval at score 0 |
//! | `min_drop_interval` | 0.1 | Gravity interval floor |
//! | `speedup_score` | 1000 | Score at which the interval would reach 0 |
//!
//! # Examples
//!
//! ```
//! use led_tetris_types::{EngineConfig, PieceKind, Rotation};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::North.rotate_ccw().index(), 3);
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.line_clear_secs, 0.5);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

/// Default playfield width used by the launcher (10 columns)
pub const DEFAULT_WIDTH: u16 = 10;

/// Default playfield height used by the launcher (20 rows)
pub const DEFAULT_HEIGHT: u16 = 20;

/// Default frame rate of the host loop
pub const DEFAULT_FPS: u32 = 30;

/// Smallest matrix side that still fits every tetromino (the 4x4 I box)
pub const MIN_MATRIX_SIDE: u16 = 4;

/// 24-bit RGB color of a single LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uniform grey at `level` (0.0 = off, 1.0 = full white).
    pub fn grey(level: f32) -> Self {
        let v = (level.clamp(0.0, 1.0) * 255.0) as u8;
        Self::new(v, v, v)
    }

    pub fn is_black(&self) -> bool {
        *self == Self::BLACK
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Rgb)`: Cell filled by a settled block of that color
pub type Cell = Option<Rgb>;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in canonical order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use led_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (state 0)
/// - **East**: Rotated 90° clockwise (state 1)
/// - **South**: Rotated 180° (state 2)
/// - **West**: Rotated 90° counter-clockwise (state 3)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotate one step in the given direction.
    pub fn rotate(&self, clockwise: bool) -> Self {
        if clockwise {
            self.rotate_cw()
        } else {
            self.rotate_ccw()
        }
    }

    /// Numeric rotation state, 0..=3.
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Inverse of [`Rotation::index`]; wraps modulo 4.
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// Logical gamepad buttons the engine reacts to.
///
/// Named after what they do in the game; the host maps physical keys or pad
/// buttons onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Rotate the falling piece 90° clockwise (pad A)
    RotateCw,
    /// Rotate the falling piece 90° counter-clockwise (pad B)
    RotateCcw,
    /// Throw the session away and start over (pad START)
    Restart,
    /// Leave the game (pad BACK)
    Quit,
}

impl Button {
    pub const ALL: [Button; 4] = [
        Button::RotateCw,
        Button::RotateCcw,
        Button::Restart,
        Button::Quit,
    ];

    /// Dense index, used for per-button state arrays.
    pub fn index(&self) -> usize {
        match self {
            Button::RotateCw => 0,
            Button::RotateCcw => 1,
            Button::Restart => 2,
            Button::Quit => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Button::RotateCw => "rotateCw",
            Button::RotateCcw => "rotateCcw",
            Button::Restart => "restart",
            Button::Quit => "quit",
        }
    }
}

/// Tunable engine constants.
///
/// Every field has a default (see the module docs), and a partial JSON
/// document only overrides the fields it names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub move_threshold: f32,
    pub hard_drop_threshold: f32,
    pub rearm_threshold: f32,
    pub lateral_step: f32,
    pub line_clear_secs: f32,
    pub game_over_secs: f32,
    pub base_drop_interval: f32,
    pub min_drop_interval: f32,
    pub speedup_score: f32,
    /// Breathing frequency of the line clear flash
    pub clear_flash_freq: f32,
    /// Breathing frequency of the game over score
    pub score_blink_freq: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            move_threshold: 0.5,
            hard_drop_threshold: 0.8,
            rearm_threshold: 0.1,
            lateral_step: 0.5,
            line_clear_secs: 0.5,
            game_over_secs: 3.0,
            base_drop_interval: 1.0,
            min_drop_interval: 0.1,
            speedup_score: 1000.0,
            clear_flash_freq: 1.5,
            score_blink_freq: 2.0,
        }
    }
}

impl EngineConfig {
    /// Check that the values describe a playable game.
    ///
    /// Returns the first violated rule as a static message.
    pub fn validate(&self) -> Result<(), &'static str> {
        let all = [
            self.move_threshold,
            self.hard_drop_threshold,
            self.rearm_threshold,
            self.lateral_step,
            self.line_clear_secs,
            self.game_over_secs,
            self.base_drop_interval,
            self.min_drop_interval,
            self.speedup_score,
            self.clear_flash_freq,
            self.score_blink_freq,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err("all values must be finite");
        }
        if !(0.0..=1.0).contains(&self.rearm_threshold)
            || !(0.0..=1.0).contains(&self.move_threshold)
            || !(0.0..=1.0).contains(&self.hard_drop_threshold)
        {
            return Err("axis thresholds must lie in [0, 1]");
        }
        if self.rearm_threshold >= self.hard_drop_threshold {
            return Err("rearm_threshold must be below hard_drop_threshold");
        }
        if self.lateral_step <= 0.0 || self.lateral_step > 1.0 {
            return Err("lateral_step must lie in (0, 1]");
        }
        if self.line_clear_secs <= 0.0 || self.game_over_secs <= 0.0 {
            return Err("animation durations must be positive");
        }
        if self.min_drop_interval <= 0.0 || self.base_drop_interval < self.min_drop_interval {
            return Err("drop intervals must satisfy 0 < min <= base");
        }
        if self.speedup_score <= 0.0 {
            return Err("speedup_score must be positive");
        }
        Ok(())
    }
}
