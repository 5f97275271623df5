//! Key mapping from terminal events to the virtual gamepad.

use crate::types::Button;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One of the four stick directions a key can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn index(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }
}

/// What a key means to the gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Edge-triggered button
    Button(Button),
    /// Held stick direction
    Hold(Direction),
}

/// Map keyboard input to a gamepad button or stick direction.
pub fn map_key(key: KeyEvent) -> Option<KeyInput> {
    if is_ctrl_c(key) {
        return Some(KeyInput::Button(Button::Quit));
    }

    match key.code {
        // Stick
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(KeyInput::Hold(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(KeyInput::Hold(Direction::Right))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(KeyInput::Hold(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(KeyInput::Hold(Direction::Down))
        }

        // Rotation
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Char(' ') => {
            Some(KeyInput::Button(Button::RotateCw))
        }
        KeyCode::Char('z') | KeyCode::Char('Z') | KeyCode::Char('y') | KeyCode::Char('Y') => {
            Some(KeyInput::Button(Button::RotateCcw))
        }

        // START / BACK
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => {
            Some(KeyInput::Button(Button::Restart))
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            Some(KeyInput::Button(Button::Quit))
        }

        _ => None,
    }
}

fn is_ctrl_c(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Option<KeyInput> {
        map_key(KeyEvent::from(code))
    }

    #[test]
    fn test_direction_keys() {
        assert_eq!(key(KeyCode::Left), Some(KeyInput::Hold(Direction::Left)));
        assert_eq!(key(KeyCode::Char('D')), Some(KeyInput::Hold(Direction::Right)));
        assert_eq!(key(KeyCode::Char('k')), Some(KeyInput::Hold(Direction::Up)));
        assert_eq!(key(KeyCode::Down), Some(KeyInput::Hold(Direction::Down)));
    }

    #[test]
    fn test_rotation_keys() {
        assert_eq!(key(KeyCode::Char('x')), Some(KeyInput::Button(Button::RotateCw)));
        assert_eq!(key(KeyCode::Char(' ')), Some(KeyInput::Button(Button::RotateCw)));
        assert_eq!(key(KeyCode::Char('Z')), Some(KeyInput::Button(Button::RotateCcw)));
        assert_eq!(key(KeyCode::Char('y')), Some(KeyInput::Button(Button::RotateCcw)));
    }

    #[test]
    fn test_start_and_back_keys() {
        assert_eq!(key(KeyCode::Enter), Some(KeyInput::Button(Button::Restart)));
        assert_eq!(key(KeyCode::Char('r')), Some(KeyInput::Button(Button::Restart)));
        assert_eq!(key(KeyCode::Esc), Some(KeyInput::Button(Button::Quit)));
        assert_eq!(key(KeyCode::Char('Q')), Some(KeyInput::Button(Button::Quit)));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyInput::Button(Button::Quit))
        );
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(key(KeyCode::Char('c')), None);
        assert_eq!(key(KeyCode::Tab), None);
    }
}
