//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the game rules and the tick-driven simulation. It has
//! no dependencies on rendering, input devices or a clock: callers pass the
//! elapsed time and the held input, and read back events and snapshots.
//!
//! # Module Structure
//!
//! - [`board`]: width x height grid, collision checks and line clearing
//! - [`pieces`]: the seven shape templates and pivot rotation
//! - [`rng`]: seeded LCG and the [`PieceSource`] seam
//! - [`controller`]: the falling piece, its timers and locking
//! - [`scoring`]: fixed line clear table
//! - [`session`]: the game loop tying everything together
//! - [`snapshot`]: serialisable read-only view of a session
//! - [`config`]: board size, timing and seed, from env or JSON
//!
//! # Rules
//!
//! - Pieces are drawn uniformly at random (no bag, no preview, no hold)
//! - Rotation is clockwise only, about the shape's pivot, without wall kicks
//! - A piece locks as soon as gravity fails to move it down
//! - The game ends when a locked block reaches the top row, or a spawn is blocked
//!
//! # Example
//!
//! ```
//! use tetris_sim_core::{GameConfig, GameSession, Phase};
//! use tetris_sim_core::types::{GameAction, TickInput, TICK_MS};
//!
//! let mut game = GameSession::new(GameConfig::default().with_seed(12345));
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! let _events = game.tick(TICK_MS, &TickInput::idle());
//! assert_eq!(game.phase(), Phase::Playing);
//! assert_eq!(game.board().filled_count(), 4);
//! ```

pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use tetris_sim_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{GameConfig, MAX_BOARD_CELLS};
pub use controller::{ActivePiece, ControllerState, LockedPiece, PieceController, SpawnOutcome};
pub use error::ConfigError;
pub use pieces::{pick_random_shape, rotate_cw, template, ShapeTemplate, Tetromino};
pub use rng::{PieceSource, ScriptedPieces, SimpleRng, UniformPicker};
pub use scoring::line_clear_score;
pub use session::{GameSession, Phase};
pub use snapshot::{ActiveSnapshot, BlockSnapshot, GameSnapshot};
