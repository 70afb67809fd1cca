//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the simulation.
//! Everything here is plain data, usable by the core, a renderer, or a driver.
//!
//! # Coordinates
//!
//! Boards use `(x, y)` with `x` growing to the right and `y` growing **up**:
//! row 0 is the floor and row `height - 1` is the top row. Pieces spawn near the
//! top and fall towards row 0.
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn anchor**: (4, 18)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Default driver timestep (~60 FPS) |
//! | `FALL_INTERVAL_MS` | 1000 | Gravity step interval |
//! | `MOVE_INTERVAL_MS` | 100 | Horizontal auto-repeat interval while held |
//! | `SPAWN_DELAY_MS` | 500 | Pause between a lock and the next spawn |
//! | `SOFT_DROP_MULTIPLIER` | 10 | Gravity speed-up while soft drop is held |
//!
//! # Examples
//!
//! ```
//! use tetris_sim_types::{Direction, GameAction, PieceKind, Point, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! let p = Point::new(4, 18) + Direction::Down.offset();
//! assert_eq!(p, Point::new(4, 17));
//!
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: usize = 20;

/// Anchor where new pieces appear (offset origin, board coordinates)
pub const SPAWN_POSITION: Point = Point { x: 4, y: 18 };

/// Default driver timestep in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval: one row per second
pub const FALL_INTERVAL_MS: u32 = 1000;

/// Horizontal auto-repeat interval while a direction is held
pub const MOVE_INTERVAL_MS: u32 = 100;

/// Delay between a piece going inactive and the next spawn
pub const SPAWN_DELAY_MS: u32 = 500;

/// Soft drop speed multiplier (10x normal gravity)
pub const SOFT_DROP_MULTIPLIER: u32 = 10;

/// Line clear scoring table, indexed by rows cleared at once.
///
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Integer board coordinate (or a relative offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Translation requested for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// Unit offset for this direction (`Down` decreases `y`).
    pub fn offset(self) -> Point {
        match self {
            Direction::Left => Point::new(-1, 0),
            Direction::Right => Point::new(1, 0),
            Direction::Down => Point::new(0, -1),
        }
    }
}

/// A held horizontal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizontal {
    Left,
    Right,
}

impl From<Horizontal> for Direction {
    fn from(value: Horizontal) -> Self {
        match value {
            Horizontal::Left => Direction::Left,
            Horizontal::Right => Direction::Right,
        }
    }
}

/// 8-bit RGB colour of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const ORANGE: Color = Color::rgb(255, 128, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Color)`: Cell occupied by a locked block of that colour
pub type Cell = Option<Color>;

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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
    /// Catalogue order.
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
    /// use tetris_sim_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
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

/// Discrete one-shot actions.
///
/// Used by drivers that are not frame based (bots, replays, scripted tests).
/// Frame-based drivers describe held input with [`TickInput`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    SoftDrop,
    /// Drop to the lowest valid position and lock
    HardDrop,
    /// Rotate piece 90° clockwise about its pivot
    RotateCw,
    /// Reset the session and start a new game
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_sim_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::Restart => "restart",
        }
    }
}

/// Input intents for a single tick.
///
/// `horizontal` and `soft_drop` describe keys that are *held* during the tick;
/// `rotate`, `hard_drop` and `restart` are edge-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    pub horizontal: Option<Horizontal>,
    pub rotate: bool,
    pub soft_drop: bool,
    pub hard_drop: bool,
    pub restart: bool,
}

impl TickInput {
    /// No input this tick.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Fold discrete actions into one frame.
    ///
    /// A later horizontal action overrides an earlier one.
    ///
    /// ```
    /// use tetris_sim_types::{GameAction, Horizontal, TickInput};
    ///
    /// let input = TickInput::from_actions(&[GameAction::MoveLeft, GameAction::RotateCw]);
    /// assert_eq!(input.horizontal, Some(Horizontal::Left));
    /// assert!(input.rotate);
    /// assert!(!input.hard_drop);
    /// ```
    pub fn from_actions(actions: &[GameAction]) -> Self {
        let mut input = Self::default();
        for action in actions {
            match action {
                GameAction::MoveLeft => input.horizontal = Some(Horizontal::Left),
                GameAction::MoveRight => input.horizontal = Some(Horizontal::Right),
                GameAction::SoftDrop => input.soft_drop = true,
                GameAction::HardDrop => input.hard_drop = true,
                GameAction::RotateCw => input.rotate = true,
                GameAction::Restart => input.restart = true,
            }
        }
        input
    }

    pub fn with_horizontal(mut self, horizontal: Horizontal) -> Self {
        self.horizontal = Some(horizontal);
        self
    }

    pub fn with_soft_drop(mut self, held: bool) -> Self {
        self.soft_drop = held;
        self
    }
}

/// Events emitted by the session while it advances.
///
/// Presentation layers react to these; they never feed back into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new piece became active.
    PieceSpawned { kind: PieceKind },
    /// The spawn position was occupied; the game ends.
    SpawnBlocked { kind: PieceKind },
    /// The active piece was committed to the board.
    PieceLocked { kind: PieceKind, cells: [Point; 4] },
    /// Rows were removed after a lock.
    LinesCleared { count: u32, points: u32 },
    /// Terminal state reached with the final totals.
    GameOver { score: u32, lines: u32 },
    /// The session was reset.
    Restarted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(FALL_INTERVAL_MS, 1000);
        assert_eq!(MOVE_INTERVAL_MS, 100);
        assert_eq!(SPAWN_DELAY_MS, 500);
        assert_eq!(SOFT_DROP_MULTIPLIER, 10);
        assert_eq!(SPAWN_POSITION, Point::new(4, 18));
    }

    #[test]
    fn piece_kind_round_trips_through_str() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn direction_offsets() {
        assert_eq!(Direction::Left.offset(), Point::new(-1, 0));
        assert_eq!(Direction::Right.offset(), Point::new(1, 0));
        assert_eq!(Direction::Down.offset(), Point::new(0, -1));
        assert_eq!(Direction::from(Horizontal::Right), Direction::Right);
    }

    #[test]
    fn later_horizontal_action_wins() {
        let input = TickInput::from_actions(&[GameAction::MoveLeft, GameAction::MoveRight]);
        assert_eq!(input.horizontal, Some(Horizontal::Right));
        assert_eq!(TickInput::from_actions(&[]), TickInput::idle());
    }
}
