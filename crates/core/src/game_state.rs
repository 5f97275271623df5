//! Game state module - the session state machine
//!
//! This module ties together the board, pieces, spawner and scoring. A session
//! is always in one of three phases:
//!
//! - [`Phase::Falling`]: a piece is under player control and gravity
//! - [`Phase::LineClear`]: full rows are flashing, nothing moves
//! - [`Phase::GameOver`]: the score is shown until the countdown runs out
//!
//! [`GameState::tick`] is the only mutator besides [`GameState::reset`]; it
//! consumes one elapsed-time step plus one [`InputSnapshot`].

use crate::board::Board;
use crate::error::EngineError;
use crate::geometry::Shape;
use crate::input::InputSnapshot;
use crate::kicks;
use crate::pieces::{get_color, get_shape};
use crate::rng::PieceSpawner;
use crate::scoring::{calculate_line_score, drop_interval};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Matrix in the current orientation
    pub shape: Shape,
    pub color: Rgb,
    /// Board column of the matrix's left edge (may be negative after a kick)
    pub col: i32,
    /// Board row of the matrix's top edge (negative = in the spawn band)
    pub row: i32,
    pub rotation: Rotation,
    /// Sub-cell sideways travel not yet applied, in (-1, 1)
    pub lateral_offset: f32,
}

impl ActivePiece {
    /// A new piece in spawn orientation, centered on a board `board_width` wide
    pub fn spawn(kind: PieceKind, board_width: u16) -> Self {
        let shape = get_shape(kind);
        Self {
            kind,
            shape,
            color: get_color(kind),
            col: board_width as i32 / 2 - shape.size() as i32 / 2,
            row: 0,
            rotation: Rotation::North,
            lateral_offset: 0.0,
        }
    }

    /// Absolute board coordinates of the piece's blocks
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .cells()
            .map(move |(dx, dy)| (self.col + dx, self.row + dy))
    }

    /// Check if all blocks are at valid positions on the board
    pub fn is_valid(&self, board: &Board) -> bool {
        board.is_valid(&self.shape, self.col, self.row)
    }

    fn fits_at(&self, board: &Board, dcol: i32, drow: i32) -> bool {
        board.is_valid(&self.shape, self.col + dcol, self.row + drow)
    }
}

/// Session phase
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Falling,
    /// `rows` are full and will be removed when `timer` runs out
    LineClear { timer: f32, rows: Vec<usize> },
    /// The final score is on display until `countdown` runs out
    GameOver { countdown: f32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    active: Option<ActivePiece>,
    /// Kind that becomes active on the next spawn. Nothing renders it yet;
    /// it is kept for a preview panel.
    next: PieceKind,
    spawner: PieceSpawner,
    phase: Phase,
    score: u32,
    /// Seconds since the last gravity step
    drop_timer: f32,
    /// Seconds between gravity steps at the current score
    drop_interval: f32,
    /// Sideways direction requested this tick: -1, 0 or 1
    move_direction: i32,
    /// Cleared by a hard drop, set again once the stick is back near center
    hard_drop_armed: bool,
    running: bool,
    /// Monotonic session id (increments on every reset).
    session_id: u32,
}

impl GameState {
    /// Create a game for a `width x height` matrix and start the first session
    pub fn new(
        width: u16,
        height: u16,
        config: EngineConfig,
        spawner: PieceSpawner,
    ) -> Result<Self, EngineError> {
        if width < MIN_MATRIX_SIDE || height < MIN_MATRIX_SIDE {
            return Err(EngineError::MatrixTooSmall { width, height });
        }
        config.validate().map_err(EngineError::InvalidConfig)?;

        let mut state = Self {
            config,
            board: Board::new(width, height),
            active: None,
            next: PieceKind::I,
            spawner,
            phase: Phase::Falling,
            score: 0,
            drop_timer: 0.0,
            drop_interval: drop_interval(0, &config),
            move_direction: 0,
            hard_drop_armed: true,
            running: true,
            session_id: 0,
        };
        state.reset();
        Ok(state)
    }

    /// Default tuning with a seeded random spawner
    pub fn with_seed(width: u16, height: u16, seed: u32) -> Result<Self, EngineError> {
        Self::new(width, height, EngineConfig::default(), PieceSpawner::new(seed))
    }

    /// Throw the current session away and start a fresh one
    ///
    /// The spawner keeps its state, so consecutive sessions see different
    /// piece sequences. The running flag is left alone.
    pub fn reset(&mut self) {
        self.board.clear();
        self.active = None;
        self.phase = Phase::Falling;
        self.score = 0;
        self.drop_timer = 0.0;
        self.drop_interval = drop_interval(0, &self.config);
        self.move_direction = 0;
        self.hard_drop_armed = true;
        self.session_id = self.session_id.wrapping_add(1);
        self.next = self.spawner.next_piece();

        log::info!(
            "session {} started on a {}x{} matrix",
            self.session_id,
            self.board.width(),
            self.board.height()
        );
        self.spawn_piece();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn drop_timer(&self) -> f32 {
        self.drop_timer
    }

    pub fn drop_interval(&self) -> f32 {
        self.drop_interval
    }

    pub fn hard_drop_armed(&self) -> bool {
        self.hard_drop_armed
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    /// False once Quit has been pressed; the host should stop ticking.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Promote the next piece to active and draw a new next piece
    ///
    /// Enters game over when the spawn position is already blocked.
    /// Returns whether the piece was placed.
    pub(crate) fn spawn_piece(&mut self) -> bool {
        let kind = std::mem::replace(&mut self.next, self.spawner.next_piece());
        let piece = ActivePiece::spawn(kind, self.board.width());

        if !piece.is_valid(&self.board) {
            log::debug!("spawn of {} blocked at ({}, {})", kind.as_str(), piece.col, piece.row);
            self.active = None;
            self.enter_game_over();
            return false;
        }

        self.active = Some(piece);
        self.phase = Phase::Falling;
        true
    }

    fn enter_game_over(&mut self) {
        log::info!("session {} over with score {}", self.session_id, self.score);
        self.phase = Phase::GameOver {
            countdown: self.config.game_over_secs,
        };
    }

    /// Try to move the active piece by (dcol, drow)
    pub(crate) fn try_move(&mut self, dcol: i32, drow: i32) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        if !piece.fits_at(&self.board, dcol, drow) {
            return false;
        }
        piece.col += dcol;
        piece.row += drow;
        true
    }

    /// Try to rotate the active piece with SRS wall kicks
    ///
    /// Only a falling piece can rotate. On failure nothing changes.
    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let board = &self.board;
        let result = kicks::try_rotate(
            piece.kind,
            &piece.shape,
            piece.rotation,
            piece.col,
            piece.row,
            clockwise,
            |shape, col, row| board.is_valid(shape, col, row),
        );

        match result {
            Some((shape, rotation, (dcol, drow))) => {
                self.active = Some(ActivePiece {
                    shape,
                    rotation,
                    col: piece.col + dcol,
                    row: piece.row + drow,
                    ..piece
                });
                true
            }
            None => {
                log::trace!(
                    "rotation of {} from state {} blocked",
                    piece.kind.as_str(),
                    piece.rotation.index()
                );
                false
            }
        }
    }

    /// Drop the active piece as far as it goes and make the next gravity
    /// check lock it
    fn hard_drop(&mut self) {
        if self.active.is_none() {
            return;
        }
        while self.try_move(0, 1) {}
        self.drop_timer = self.drop_interval;
    }

    /// Main game tick - read input, then advance timers and gravity
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) {
        if input.pressed(Button::Quit) && self.running {
            log::info!("quit requested");
            self.running = false;
        }
        if input.pressed(Button::Restart) {
            log::info!("restart requested in session {}", self.session_id);
            self.reset();
            return;
        }
        if input.pressed(Button::RotateCw) {
            self.try_rotate(true);
        } else if input.pressed(Button::RotateCcw) {
            self.try_rotate(false);
        }

        let slammed = self.handle_axis(input.lateral(), input.perpendicular());

        match &mut self.phase {
            Phase::GameOver { countdown } => {
                *countdown -= dt;
                if *countdown <= 0.0 {
                    self.reset();
                }
                return;
            }
            Phase::LineClear { timer, .. } => {
                *timer -= dt;
                if *timer <= 0.0 {
                    self.finish_line_clear();
                }
                return;
            }
            Phase::Falling => {}
        }

        self.drop_timer += dt;
        // A hard-dropped piece locks where it landed.
        if !slammed {
            self.step_lateral();
        }

        if self.drop_timer >= self.drop_interval {
            self.drop_timer = 0.0;
            if !self.try_move(0, 1) {
                self.lock_piece();
            }
        }
    }

    /// Translate the stick into a move direction, hard drop or soft drop
    ///
    /// Returns true when a hard drop happened.
    fn handle_axis(&mut self, lateral: f32, perpendicular: f32) -> bool {
        let cfg = self.config;

        self.move_direction = if lateral < -cfg.move_threshold {
            -1
        } else if lateral > cfg.move_threshold {
            1
        } else {
            0
        };

        let playable = self.phase == Phase::Falling;
        if perpendicular < -cfg.hard_drop_threshold && self.hard_drop_armed {
            self.hard_drop_armed = false;
            if playable {
                self.hard_drop();
                return true;
            }
        } else if perpendicular.abs() > cfg.hard_drop_threshold {
            if playable {
                self.try_move(0, 1);
            }
        } else if perpendicular.abs() <= cfg.rearm_threshold {
            self.hard_drop_armed = true;
        }
        false
    }

    /// Accumulate sub-cell sideways travel and apply whole cells
    fn step_lateral(&mut self) {
        let dir = self.move_direction;
        let step = self.config.lateral_step;
        let Some(piece) = self.active.as_mut() else {
            return;
        };

        if dir != 0 && piece.fits_at(&self.board, dir, 0) {
            piece.lateral_offset += dir as f32 * step;
        }
        if piece.lateral_offset.abs() >= 1.0 {
            let whole = piece.lateral_offset.trunc();
            piece.col += whole as i32;
            piece.lateral_offset -= whole;
        }
    }

    /// Lock the active piece onto the board and start a clear or a respawn
    pub(crate) fn lock_piece(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let dropped = self
            .board
            .merge(&piece.shape, piece.color, piece.col, piece.row);
        if dropped > 0 {
            log::debug!("{} blocks locked above the top edge were lost", dropped);
        }

        let rows = self.board.find_full_rows();
        log::debug!(
            "locked {} at ({}, {}), {} full rows",
            piece.kind.as_str(),
            piece.col,
            piece.row,
            rows.len()
        );

        if rows.is_empty() {
            self.spawn_piece();
        } else {
            self.phase = Phase::LineClear {
                timer: self.config.line_clear_secs,
                rows,
            };
        }
    }

    /// End of the clear flash: remove rows, score, speed up, respawn
    fn finish_line_clear(&mut self) {
        let Phase::LineClear { rows, .. } = std::mem::replace(&mut self.phase, Phase::Falling)
        else {
            return;
        };

        self.board.remove_rows(&rows);
        let points = calculate_line_score(rows.len());
        self.score = self.score.saturating_add(points);
        self.drop_interval = drop_interval(self.score, &self.config);
        log::debug!(
            "cleared {} rows for {} points, score {}, interval {:.3}s",
            rows.len(),
            points,
            self.score,
            self.drop_interval
        );

        self.spawn_piece();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Rgb = Rgb::new(90, 90, 90);

    fn scripted(pieces: &[PieceKind]) -> GameState {
        GameState::new(10, 20, EngineConfig::default(), PieceSpawner::scripted(pieces.to_vec()))
            .unwrap()
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::idle()
    }

    #[test]
    fn test_new_rejects_tiny_matrix() {
        assert_eq!(
            GameState::with_seed(0, 0, 1).unwrap_err(),
            EngineError::MatrixTooSmall { width: 0, height: 0 }
        );
        assert!(GameState::with_seed(3, 20, 1).is_err());
        assert!(GameState::with_seed(10, 3, 1).is_err());
        assert!(GameState::with_seed(4, 4, 1).is_ok());
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = EngineConfig {
            game_over_secs: -1.0,
            ..EngineConfig::default()
        };
        let err = GameState::new(10, 20, config, PieceSpawner::new(1)).unwrap_err();
        assert_eq!(err.code(), "invalid_config");
    }

    #[test]
    fn test_new_game_starts_falling() {
        let state = GameState::with_seed(10, 20, 12345).unwrap();
        assert_eq!(state.phase(), &Phase::Falling);
        assert!(state.active().is_some());
        assert_eq!(state.score(), 0);
        assert_eq!(state.drop_interval(), 1.0);
        assert_eq!(state.session_id(), 1);
        assert!(state.is_running());
        assert!(state.hard_drop_armed());
    }

    #[test]
    fn test_spawn_is_centered_at_top() {
        let state = scripted(&[PieceKind::O, PieceKind::I, PieceKind::T]);
        let o = state.active().unwrap();
        assert_eq!((o.kind, o.col, o.row), (PieceKind::O, 4, 0));
        assert_eq!(o.rotation, Rotation::North);
        assert_eq!(state.next_piece(), PieceKind::I);

        assert_eq!(ActivePiece::spawn(PieceKind::I, 10).col, 3);
        assert_eq!(ActivePiece::spawn(PieceKind::T, 10).col, 4);
    }

    #[test]
    fn test_blocked_o_spawn_is_game_over_with_zero_score() {
        let mut state = scripted(&[PieceKind::O]);
        state.board_mut().fill_row(0, GREY);

        assert!(!state.spawn_piece());
        assert!(state.is_game_over());
        assert_eq!(state.score(), 0);
        assert!(state.active().is_none());
    }

    #[test]
    fn test_t_left_wall_kick_shifts_one_left() {
        let mut state = scripted(&[PieceKind::T]);
        state.active = Some(ActivePiece {
            col: 0,
            row: 5,
            ..ActivePiece::spawn(PieceKind::T, 10)
        });
        // Blocks the stem of the rotated T at the unmodified origin.
        state.board_mut().set(1, 7, Some(GREY));

        assert!(state.try_rotate(true));
        let t = state.active().unwrap();
        assert_eq!((t.col, t.row), (-1, 5));
        assert_eq!(t.rotation, Rotation::East);
        assert!(t.is_valid(state.board()));
    }

    #[test]
    fn test_rotate_and_back_restores_placement() {
        let mut state = scripted(&[PieceKind::L]);
        let before = *state.active().unwrap();

        assert!(state.try_rotate(true));
        assert!(state.try_rotate(false));
        let after = state.active().unwrap();
        assert_eq!((after.col, after.row, after.rotation), (before.col, before.row, before.rotation));
        assert_eq!(after.shape, before.shape);
    }

    #[test]
    fn test_fully_blocked_rotation_changes_nothing() {
        let mut state = scripted(&[PieceKind::T]);
        // Away from the spawn band so upward kicks cannot escape.
        state.active = Some(ActivePiece {
            row: 5,
            ..ActivePiece::spawn(PieceKind::T, 10)
        });
        let before = *state.active().unwrap();
        // Fill everything except the piece's own cells.
        let own: Vec<_> = before.cells().collect();
        for row in 0..20 {
            for col in 0..10 {
                if !own.contains(&(col, row)) {
                    state.board_mut().set(col, row, Some(GREY));
                }
            }
        }
        assert!(!state.try_rotate(true));
        assert_eq!(*state.active().unwrap(), before);
    }

    #[test]
    fn test_gravity_steps_once_per_interval() {
        let mut state = scripted(&[PieceKind::O]);
        state.tick(0.5, &idle());
        assert_eq!(state.active().unwrap().row, 0);
        state.tick(0.5, &idle());
        assert_eq!(state.active().unwrap().row, 1);
        assert_eq!(state.drop_timer(), 0.0);
    }

    #[test]
    fn test_lateral_move_every_second_tick() {
        let mut state = scripted(&[PieceKind::O]);
        let right = idle().with_axis(1.0, 0.0);

        state.tick(0.01, &right);
        assert_eq!(state.active().unwrap().col, 4);
        assert_eq!(state.active().unwrap().lateral_offset, 0.5);

        state.tick(0.01, &right);
        assert_eq!(state.active().unwrap().col, 5);
        assert_eq!(state.active().unwrap().lateral_offset, 0.0);
    }

    #[test]
    fn test_lateral_move_stops_at_wall() {
        let mut state = scripted(&[PieceKind::O]);
        let left = idle().with_axis(-1.0, 0.0);
        for _ in 0..40 {
            state.tick(0.001, &left);
        }
        let o = state.active().unwrap();
        assert_eq!(o.col, 0);
        assert!(o.is_valid(state.board()));
    }

    #[test]
    fn test_small_deflection_does_not_move() {
        let mut state = scripted(&[PieceKind::O]);
        for _ in 0..10 {
            state.tick(0.001, &idle().with_axis(0.4, 0.0));
        }
        assert_eq!(state.active().unwrap().col, 4);
    }

    #[test]
    fn test_hard_drop_locks_on_same_tick() {
        let mut state = scripted(&[PieceKind::O, PieceKind::T]);
        state.tick(0.016, &idle().with_axis(0.0, -1.0));

        // O locked on the floor, T already spawned.
        assert_eq!(state.board().get(4, 18), Some(Some(get_color(PieceKind::O))));
        assert_eq!(state.board().get(5, 19), Some(Some(get_color(PieceKind::O))));
        assert_eq!(state.active().unwrap().kind, PieceKind::T);
        assert_eq!(state.phase(), &Phase::Falling);
        assert!(!state.hard_drop_armed());
    }

    #[test]
    fn test_diagonal_hard_drop_locks_on_the_ledge() {
        let mut state = scripted(&[PieceKind::O]);
        // One block under the O's left column; a step right would clear it.
        state.board_mut().set(4, 10, Some(GREY));

        state.tick(0.0, &idle().with_axis(1.0, 0.0));
        assert_eq!(state.active().unwrap().lateral_offset, 0.5);

        state.tick(0.0, &idle().with_axis(1.0, -1.0));
        let o = Some(get_color(PieceKind::O));
        assert_eq!(state.board().get(4, 8), Some(o));
        assert_eq!(state.board().get(5, 9), Some(o));
        assert_eq!(state.board().get(6, 9), Some(None));
        assert_eq!(state.active().unwrap().row, 0);
    }

    #[test]
    fn test_hard_drop_rearms_only_near_center() {
        let mut state = scripted(&[PieceKind::O]);
        let up = idle().with_axis(0.0, -1.0);
        state.tick(0.0, &up);
        assert!(!state.hard_drop_armed());

        // Held up while disarmed: a single soft drop step, no lock.
        let row = state.active().unwrap().row;
        state.tick(0.0, &up);
        assert_eq!(state.active().unwrap().row, row + 1);

        // Half-way back is not enough.
        state.tick(0.0, &idle().with_axis(0.0, -0.5));
        assert!(!state.hard_drop_armed());

        state.tick(0.0, &idle());
        assert!(state.hard_drop_armed());
    }

    #[test]
    fn test_soft_drop_moves_one_row_without_locking() {
        let mut state = scripted(&[PieceKind::O]);
        let down = idle().with_axis(0.0, 1.0);
        state.tick(0.0, &down);
        assert_eq!(state.active().unwrap().row, 1);
        assert!(state.hard_drop_armed());
        for _ in 0..30 {
            state.tick(0.0, &down);
        }
        // Resting on the floor but not locked yet.
        assert_eq!(state.active().unwrap().row, 18);
        assert!(state.board().cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_two_row_clear_awards_30_and_speeds_up() {
        let mut state = scripted(&[PieceKind::O]);
        for row in [18, 19] {
            for col in 0..10 {
                if col != 4 && col != 5 {
                    state.board_mut().set(col, row, Some(GREY));
                }
            }
        }
        let before = state.drop_interval();

        state.tick(0.0, &idle().with_axis(0.0, -1.0));
        assert_eq!(
            state.phase(),
            &Phase::LineClear {
                timer: 0.5,
                rows: vec![18, 19]
            }
        );
        assert!(state.active().is_none());
        assert!(!state.try_rotate(true));

        state.tick(0.3, &idle());
        assert!(matches!(state.phase(), Phase::LineClear { .. }));
        assert_eq!(state.score(), 0);

        state.tick(0.3, &idle());
        assert_eq!(state.phase(), &Phase::Falling);
        assert_eq!(state.score(), 30);
        assert!(state.drop_interval() < before);
        assert!((state.drop_interval() - 0.97).abs() < 1e-6);
        assert!(state.board().cells().iter().all(|c| c.is_none()));
        assert!(state.active().is_some());
    }

    #[test]
    fn test_game_over_countdown_resets() {
        let mut state = scripted(&[PieceKind::O]);
        state.board_mut().fill_row(1, GREY);
        state.board_mut().set(0, 1, None);
        state.spawn_piece();
        assert!(state.is_game_over());
        let session = state.session_id();

        state.tick(2.9, &idle());
        assert!(state.is_game_over());

        state.tick(0.2, &idle());
        assert_eq!(state.phase(), &Phase::Falling);
        assert_eq!(state.session_id(), session + 1);
        assert!(state.board().cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_restart_and_quit_buttons() {
        let mut state = scripted(&[PieceKind::O]);
        state.board_mut().set(0, 19, Some(GREY));
        state.tick(0.0, &idle().with_press(Button::Restart));
        assert!(state.board().cells().iter().all(|c| c.is_none()));
        assert_eq!(state.session_id(), 2);

        state.tick(0.0, &idle().with_press(Button::Quit));
        assert!(!state.is_running());
    }

    #[test]
    fn test_rotate_buttons() {
        let mut state = scripted(&[PieceKind::T]);
        state.tick(0.0, &idle().with_press(Button::RotateCw));
        assert_eq!(state.active().unwrap().rotation, Rotation::East);
        state.tick(0.0, &idle().with_press(Button::RotateCcw));
        state.tick(0.0, &idle().with_press(Button::RotateCcw));
        assert_eq!(state.active().unwrap().rotation, Rotation::West);
        // Clockwise wins when both are pressed.
        state.tick(
            0.0,
            &idle()
                .with_press(Button::RotateCw)
                .with_press(Button::RotateCcw),
        );
        assert_eq!(state.active().unwrap().rotation, Rotation::North);
    }
}
