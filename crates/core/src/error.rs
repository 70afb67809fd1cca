//! Error types for configuration loading and validation
//!
//! Gameplay itself has no failure paths; only building a session from outside
//! input can go wrong.

use thiserror::Error;

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Width or height is zero
    #[error("Invalid board size: {width}x{height}")]
    InvalidBoardSize { width: usize, height: usize },

    /// More cells than a board may hold
    #[error("Board {width}x{height} exceeds {max} cells")]
    BoardTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    /// Gravity would never advance
    #[error("Fall interval must be at least 1ms")]
    ZeroFallInterval,

    /// Soft drop would stop gravity
    #[error("Soft drop multiplier must be at least 1")]
    ZeroSoftDropMultiplier,

    /// Some catalogue shape would spawn outside the side walls
    #[error("Spawn position ({x}, {y}) puts a {kind} piece outside a board {width} wide")]
    SpawnOutOfBounds {
        x: i32,
        y: i32,
        kind: &'static str,
        width: usize,
    },

    /// Malformed JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
