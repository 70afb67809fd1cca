//! Configuration for a game session

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::pieces::template;
use crate::types::{
    PieceKind, Point, BOARD_HEIGHT, BOARD_WIDTH, FALL_INTERVAL_MS, MOVE_INTERVAL_MS,
    SOFT_DROP_MULTIPLIER, SPAWN_DELAY_MS, SPAWN_POSITION,
};

/// Largest board [`GameConfig::validate`] accepts, in cells.
pub const MAX_BOARD_CELLS: usize = 1 << 20;

/// Board geometry, timing and seed for a session.
///
/// Missing JSON fields fall back to [`GameConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in cells
    pub width: usize,

    /// Board height in cells
    pub height: usize,

    /// Spawn anchor column
    pub spawn_x: i32,

    /// Spawn anchor row
    pub spawn_y: i32,

    /// Gravity step interval (in milliseconds)
    pub fall_interval_ms: u32,

    /// Auto-repeat interval for a held direction (in milliseconds)
    pub move_interval_ms: u32,

    /// Delay between a lock and the next spawn (in milliseconds)
    pub spawn_delay_ms: u32,

    /// Gravity speed-up while soft drop is held
    pub soft_drop_multiplier: u32,

    /// Seed for the uniform piece picker
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            spawn_x: SPAWN_POSITION.x,
            spawn_y: SPAWN_POSITION.y,
            fall_interval_ms: FALL_INTERVAL_MS,
            move_interval_ms: MOVE_INTERVAL_MS,
            spawn_delay_ms: SPAWN_DELAY_MS,
            soft_drop_multiplier: SOFT_DROP_MULTIPLIER,
            seed: 1,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from environment variables, keeping defaults for anything unset
    /// or unparsable.
    pub fn from_env() -> Self {
        use std::env;

        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            env::var(name).ok().and_then(|s| s.trim().parse().ok())
        }

        let d = Self::default();
        Self {
            width: var("TETRIS_SIM_WIDTH").unwrap_or(d.width),
            height: var("TETRIS_SIM_HEIGHT").unwrap_or(d.height),
            spawn_x: var("TETRIS_SIM_SPAWN_X").unwrap_or(d.spawn_x),
            spawn_y: var("TETRIS_SIM_SPAWN_Y").unwrap_or(d.spawn_y),
            fall_interval_ms: var("TETRIS_SIM_FALL_MS").unwrap_or(d.fall_interval_ms),
            move_interval_ms: var("TETRIS_SIM_MOVE_MS").unwrap_or(d.move_interval_ms),
            spawn_delay_ms: var("TETRIS_SIM_SPAWN_DELAY_MS").unwrap_or(d.spawn_delay_ms),
            soft_drop_multiplier: var("TETRIS_SIM_SOFT_DROP_MULTIPLIER")
                .unwrap_or(d.soft_drop_multiplier),
            seed: var("TETRIS_SIM_SEED").unwrap_or(d.seed),
        }
    }

    /// Parse a JSON document
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Set the board size
    pub fn with_board_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the spawn anchor
    pub fn with_spawn_position(mut self, x: i32, y: i32) -> Self {
        self.spawn_x = x;
        self.spawn_y = y;
        self
    }

    /// Set the gravity interval in milliseconds
    pub fn with_fall_interval_ms(mut self, ms: u32) -> Self {
        self.fall_interval_ms = ms;
        self
    }

    /// Set the horizontal repeat interval in milliseconds
    pub fn with_move_interval_ms(mut self, ms: u32) -> Self {
        self.move_interval_ms = ms;
        self
    }

    /// Set the spawn delay in milliseconds
    pub fn with_spawn_delay_ms(mut self, ms: u32) -> Self {
        self.spawn_delay_ms = ms;
        self
    }

    /// Set the soft drop multiplier
    pub fn with_soft_drop_multiplier(mut self, multiplier: u32) -> Self {
        self.soft_drop_multiplier = multiplier;
        self
    }

    /// Set the piece picker seed
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn spawn_position(&self) -> Point {
        Point::new(self.spawn_x, self.spawn_y)
    }

    /// Reject settings the simulation cannot run with.
    ///
    /// The spawn anchor may sit above the board, but every catalogue shape
    /// must spawn between the side walls and above the floor.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidBoardSize {
                width: self.width,
                height: self.height,
            });
        }
        let fits = self
            .width
            .checked_mul(self.height)
            .is_some_and(|cells| cells <= MAX_BOARD_CELLS);
        if !fits {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_CELLS,
            });
        }
        if self.fall_interval_ms == 0 {
            return Err(ConfigError::ZeroFallInterval);
        }
        if self.soft_drop_multiplier == 0 {
            return Err(ConfigError::ZeroSoftDropMultiplier);
        }

        let anchor = self.spawn_position();
        for kind in PieceKind::ALL {
            let fits = template(kind).offsets.iter().all(|o| {
                let c = anchor + *o;
                c.x >= 0 && (c.x as usize) < self.width && c.y >= 0
            });
            if !fits {
                return Err(ConfigError::SpawnOutOfBounds {
                    x: self.spawn_x,
                    y: self.spawn_y,
                    kind: kind.as_str(),
                    width: self.width,
                });
            }
        }

        Ok(())
    }
}
