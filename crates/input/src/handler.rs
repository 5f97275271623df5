//! Keyboard-backed gamepad for terminal environments.
//!
//! Buttons are edge-triggered: a button reads as pressed on the first frame it
//! is down and not again until it has been up for a frame.
//!
//! Directions emulate an analog stick. Most terminals never report key
//! releases, so a direction key goes through three stages:
//!
//! - **Tap**: a fresh press deflects the stick fully for `tap_frames` frames,
//!   which is exactly one cell of sideways travel.
//! - **Latent**: until the OS auto-repeat delay has passed the key may still
//!   be down. The stick reads a light deflection that is below every action
//!   threshold but outside the neutral zone, so the hard-drop latch stays
//!   disarmed.
//! - **Repeating**: auto-repeat events prove the key is down; the stick is
//!   fully deflected until no event arrives for `key_release_timeout_ms`.
//!
//! Terminals that do report releases (kitty keyboard protocol) skip the
//! guesswork: the stick stays deflected from press to release.

use arrayvec::ArrayVec;
use crossterm::event::{KeyEvent, KeyEventKind};

use crate::core::InputSource;
use crate::map::{map_key, Direction, KeyInput};
use crate::types::Button;

// Time without events after which a repeating key counts as released.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

// Typical desktop auto-repeat delay.
const DEFAULT_REPEAT_DELAY_MS: u32 = 500;

const DEFAULT_TAP_FRAMES: u32 = 2;

// Between the default re-arm (0.1) and move (0.5) thresholds.
const DEFAULT_LATENT_DEFLECTION: f32 = 0.3;

/// Tracking state of one direction key that may be down.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeldKey {
    /// Full-deflection frames still owed to the last press
    tap_left: u32,
    /// Read neutral for one frame first, so a quick re-press is a new stroke
    gap: bool,
    /// Auto-repeat has started
    repeating: bool,
    /// A release event arrived; drop the key once the tap is served
    released: bool,
    since_press_ms: u32,
    since_event_ms: u32,
}

impl HeldKey {
    fn pressed(tap_frames: u32, gap: bool) -> Self {
        Self {
            tap_left: tap_frames,
            gap,
            repeating: false,
            released: false,
            since_press_ms: 0,
            since_event_ms: 0,
        }
    }
}

/// Virtual gamepad fed by terminal key events.
#[derive(Debug, Clone)]
pub struct KeyboardInput {
    /// Buttons seen since the last `update`
    pending: [bool; 4],
    /// Button state for the current frame
    current: [bool; 4],
    previous: [bool; 4],
    keys: [Option<HeldKey>; 4],
    /// Stick deflection per direction for the current frame
    level: [f32; 4],
    /// Set once the terminal has shown it reports key releases
    release_events: bool,
    key_release_timeout_ms: u32,
    repeat_delay_ms: u32,
    tap_frames: u32,
    latent_deflection: f32,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self {
            pending: [false; 4],
            current: [false; 4],
            previous: [false; 4],
            keys: [None; 4],
            level: [0.0; 4],
            release_events: false,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
            tap_frames: DEFAULT_TAP_FRAMES,
            latent_deflection: DEFAULT_LATENT_DEFLECTION,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    /// How long the OS waits before auto-repeating a held key.
    pub fn with_repeat_delay_ms(mut self, delay_ms: u32) -> Self {
        self.repeat_delay_ms = delay_ms;
        self
    }

    /// Frames of full deflection per tap; at least 1.
    pub fn with_tap_frames(mut self, frames: u32) -> Self {
        self.tap_frames = frames.max(1);
        self
    }

    /// Stick magnitude reported while a key may or may not still be down.
    pub fn with_latent_deflection(mut self, level: f32) -> Self {
        self.latent_deflection = level.clamp(0.0, 1.0);
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn repeat_delay_ms(&self) -> u32 {
        self.repeat_delay_ms
    }

    /// Record one terminal key event. Returns false for unmapped keys.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        let Some(input) = map_key(key) else {
            return false;
        };

        match (input, key.kind) {
            (KeyInput::Button(button), KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.pending[button.index()] = true;
            }
            (KeyInput::Button(_), KeyEventKind::Release) => {
                self.release_events = true;
            }
            (KeyInput::Hold(dir), KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.press_direction(dir);
            }
            (KeyInput::Hold(dir), KeyEventKind::Release) => {
                self.release_events = true;
                if let Some(key) = self.keys[dir.index()].as_mut() {
                    key.released = true;
                }
            }
        }
        true
    }

    fn press_direction(&mut self, dir: Direction) {
        // Anything earlier than this after the press cannot be an auto-repeat.
        let earliest_repeat = self
            .repeat_delay_ms
            .saturating_sub(self.key_release_timeout_ms);

        let tap_frames = self.tap_frames;
        let known_down = self.release_events;

        let slot = &mut self.keys[dir.index()];
        if let Some(key) = slot.as_mut().filter(|key| !key.released) {
            if known_down || key.repeating || key.since_press_ms >= earliest_repeat {
                key.repeating = true;
                key.since_event_ms = 0;
            } else {
                *key = HeldKey::pressed(tap_frames, true);
            }
            return;
        }
        *slot = Some(HeldKey::pressed(tap_frames, false));
    }

    /// Close the frame: latch pending buttons and advance held directions
    ///
    /// Returns the buttons whose press edge starts this frame.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<Button, 4> {
        self.previous = self.current;
        self.current = std::mem::take(&mut self.pending);

        for i in 0..self.keys.len() {
            self.level[i] = self.advance_key(i, elapsed_ms);
        }

        Button::ALL
            .into_iter()
            .filter(|&b| self.is_pressed(b))
            .collect()
    }

    fn advance_key(&mut self, i: usize, elapsed_ms: u32) -> f32 {
        let Some(key) = self.keys[i].as_mut() else {
            return 0.0;
        };

        let level = if key.gap {
            key.gap = false;
            0.0
        } else if key.tap_left > 0 {
            key.tap_left -= 1;
            1.0
        } else if key.released {
            0.0
        } else if key.repeating || self.release_events {
            1.0
        } else {
            self.latent_deflection
        };

        key.since_press_ms = key.since_press_ms.saturating_add(elapsed_ms);
        key.since_event_ms = key.since_event_ms.saturating_add(elapsed_ms);

        let done = if key.released {
            key.tap_left == 0 && !key.gap
        } else if self.release_events {
            false
        } else if key.repeating {
            key.since_event_ms > self.key_release_timeout_ms
        } else {
            key.since_press_ms > self.repeat_delay_ms + self.key_release_timeout_ms
        };
        if done {
            self.keys[i] = None;
        }
        level
    }

    /// Whether the direction key is considered down
    pub fn is_held(&self, dir: Direction) -> bool {
        self.keys[dir.index()].is_some()
    }

    pub fn reset(&mut self) {
        self.pending = [false; 4];
        self.current = [false; 4];
        self.previous = [false; 4];
        self.keys = [None; 4];
        self.level = [0.0; 4];
    }

    fn held_axis(&self, negative: Direction, positive: Direction) -> f32 {
        self.level[positive.index()] - self.level[negative.index()]
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for KeyboardInput {
    fn is_pressed(&self, button: Button) -> bool {
        let i = button.index();
        self.current[i] && !self.previous[i]
    }

    fn axis_vector(&self) -> (f32, f32) {
        (
            self.held_axis(Direction::Left, Direction::Right),
            self.held_axis(Direction::Up, Direction::Down),
        )
    }
}
