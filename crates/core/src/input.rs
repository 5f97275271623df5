//! Input contract between the host and the engine.
//!
//! The host owns an [`InputSource`] (keyboard, gamepad, scripted test input).
//! Once per tick it is sampled into an [`InputSnapshot`], which is what the
//! engine actually reads, so nothing can change under the engine mid-tick.

use arrayvec::ArrayVec;

use crate::types::Button;

/// Anything that can report button edges and a two-axis stick.
pub trait InputSource {
    /// True exactly once per press edge of `button`.
    fn is_pressed(&self, button: Button) -> bool;

    /// `(lateral, perpendicular)`, each roughly in `[-1.0, 1.0]`.
    ///
    /// Lateral is negative to the left; perpendicular is negative upward.
    fn axis_vector(&self) -> (f32, f32);
}

/// Immutable per-tick view of the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pressed: ArrayVec<Button, 4>,
    lateral: f32,
    perpendicular: f32,
}

impl InputSnapshot {
    /// Sample every button edge and the axis pair from `source`.
    pub fn capture(source: &impl InputSource) -> Self {
        let (lateral, perpendicular) = source.axis_vector();
        Self {
            pressed: Button::ALL
                .into_iter()
                .filter(|&b| source.is_pressed(b))
                .collect(),
            lateral,
            perpendicular,
        }
    }

    /// A snapshot with no buttons and a centered stick.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Builder: mark `button` as pressed this tick.
    pub fn with_press(mut self, button: Button) -> Self {
        if !self.pressed.contains(&button) {
            self.pressed.push(button);
        }
        self
    }

    /// Builder: set the stick deflection.
    pub fn with_axis(mut self, lateral: f32, perpendicular: f32) -> Self {
        self.lateral = lateral;
        self.perpendicular = perpendicular;
        self
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    pub fn lateral(&self) -> f32 {
        self.lateral
    }

    pub fn perpendicular(&self) -> f32 {
        self.perpendicular
    }
}

impl InputSource for InputSnapshot {
    fn is_pressed(&self, button: Button) -> bool {
        self.pressed(button)
    }

    fn axis_vector(&self) -> (f32, f32) {
        (self.lateral, self.perpendicular)
    }
}
