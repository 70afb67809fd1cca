use serde::{Deserialize, Serialize};

use crate::controller::ActivePiece;
use crate::session::Phase;
use crate::types::{Color, PieceKind, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub color: Color,
    pub anchor: Point,
    pub cells: [Point; 4],
}

impl From<&ActivePiece> for ActiveSnapshot {
    fn from(value: &ActivePiece) -> Self {
        Self {
            kind: value.tetromino.kind,
            color: value.tetromino.color,
            anchor: value.anchor,
            cells: value.cells(),
        }
    }
}

/// One locked cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

/// Read-only view of a session for renderers and logs.
///
/// Only occupied cells are listed, bottom row first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    pub blocks: Vec<BlockSnapshot>,
    pub active: Option<ActiveSnapshot>,
    pub score: u32,
    pub lines: u32,
    pub phase: Phase,
    pub piece_count: u32,
    pub episode: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.blocks.clear();
        self.active = None;
        self.score = 0;
        self.lines = 0;
        self.phase = Phase::Ready;
        self.piece_count = 0;
        self.episode = 0;
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Colour of the locked cell at `(x, y)`, if any
    pub fn block_at(&self, x: i32, y: i32) -> Option<Color> {
        self.blocks
            .iter()
            .find(|b| b.x == x && b.y == y)
            .map(|b| b.color)
    }
}
