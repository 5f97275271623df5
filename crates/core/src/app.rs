//! Host-facing wrapper: one injected input source plus one game.

use crate::game_state::GameState;
use crate::input::{InputSnapshot, InputSource};
use crate::render::DisplaySurface;

/// Couples a game with the input device that drives it.
///
/// The input source is injected by the host, so a terminal keyboard, a real
/// joystick and a scripted test source are all interchangeable.
#[derive(Debug)]
pub struct TetrisApp<I> {
    input: I,
    game: GameState,
}

impl<I: InputSource> TetrisApp<I> {
    pub fn new(input: I, game: GameState) -> Self {
        Self { input, game }
    }

    /// Sample the input once and advance the game by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let snapshot = InputSnapshot::capture(&self.input);
        self.game.tick(dt, &snapshot);
    }

    pub fn render_into(&self, surface: &mut impl DisplaySurface) {
        self.game.render_into(surface);
    }

    pub fn is_running(&self) -> bool {
        self.game.is_running()
    }

    /// The host feeds raw events through this between frames.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }
}
