use std::fmt;

use crate::types::MIN_MATRIX_SIDE;

/// Reasons the engine refuses to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The matrix cannot hold the largest tetromino (this includes 0x0).
    MatrixTooSmall { width: u16, height: u16 },
    /// A configuration value is out of range; the payload names the rule.
    InvalidConfig(&'static str),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::MatrixTooSmall { .. } => "matrix_too_small",
            EngineError::InvalidConfig(_) => "invalid_config",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::MatrixTooSmall { width, height } => write!(
                f,
                "matrix {}x{} is too small, both sides must be at least {}",
                width, height, MIN_MATRIX_SIDE
            ),
            EngineError::InvalidConfig(rule) => write!(f, "invalid engine config: {}", rule),
        }
    }
}

impl std::error::Error for EngineError {}
