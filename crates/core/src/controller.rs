//! Active piece controller - the falling piece and its timers
//!
//! The controller owns the in-flight piece. It only reads the board to check
//! candidate positions, and writes to it once, when the piece locks.

use crate::board::Board;
use crate::config::GameConfig;
use crate::pieces::Tetromino;
use crate::types::{Color, Direction, PieceKind, Point, TickInput};

/// Whether a piece is currently under control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerState {
    Inactive,
    Active,
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub tetromino: Tetromino,
    /// Board position of the offset origin
    pub anchor: Point,
}

impl ActivePiece {
    /// Board cells currently covered
    pub fn cells(&self) -> [Point; 4] {
        self.tetromino.world_cells(self.anchor)
    }

    /// Check if all minos are at valid positions on the board
    pub fn is_valid(&self, board: &Board) -> bool {
        board.is_valid_position(&self.cells())
    }
}

/// Result of handing a new shape to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned,
    /// The spawn cells were not free; the controller stays inactive.
    Blocked,
}

/// What a lock committed to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockedPiece {
    pub kind: PieceKind,
    pub color: Color,
    pub cells: [Point; 4],
}

#[derive(Debug, Clone)]
pub struct PieceController {
    active: Option<ActivePiece>,
    spawn_position: Point,
    fall_interval_ms: u32,
    move_interval_ms: u32,
    soft_drop_multiplier: u32,
    fall_timer_ms: u32,
    /// Time left before a held direction repeats; zero means "move now".
    move_timer_ms: u32,
}

impl PieceController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            active: None,
            spawn_position: config.spawn_position(),
            fall_interval_ms: config.fall_interval_ms,
            move_interval_ms: config.move_interval_ms,
            soft_drop_multiplier: config.soft_drop_multiplier,
            fall_timer_ms: 0,
            move_timer_ms: 0,
        }
    }

    pub fn state(&self) -> ControllerState {
        if self.active.is_some() {
            ControllerState::Active
        } else {
            ControllerState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn spawn_position(&self) -> Point {
        self.spawn_position
    }

    pub fn fall_timer_ms(&self) -> u32 {
        self.fall_timer_ms
    }

    /// Board cells of the active piece, if any
    pub fn world_cells(&self) -> Option<[Point; 4]> {
        self.active.map(|a| a.cells())
    }

    /// Colour of the active piece (white when inactive)
    pub fn current_color(&self) -> Color {
        self.active.map_or(Color::WHITE, |a| a.tetromino.color)
    }

    /// Place `shape` at the spawn anchor and take control of it.
    pub fn start_new_piece(&mut self, board: &Board, shape: Tetromino) -> SpawnOutcome {
        self.fall_timer_ms = 0;
        self.move_timer_ms = 0;

        let piece = ActivePiece {
            tetromino: shape,
            anchor: self.spawn_position,
        };

        if !piece.is_valid(board) {
            self.active = None;
            tracing::debug!(kind = shape.kind.as_str(), "spawn blocked");
            return SpawnOutcome::Blocked;
        }

        self.active = Some(piece);
        tracing::trace!(kind = shape.kind.as_str(), "piece spawned");
        SpawnOutcome::Spawned
    }

    /// Drop the active piece without committing it.
    pub fn deactivate(&mut self) {
        self.active = None;
        self.fall_timer_ms = 0;
        self.move_timer_ms = 0;
    }

    /// Try to move the active piece one cell
    pub fn try_move(&mut self, board: &Board, direction: Direction) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let moved = ActivePiece {
            anchor: active.anchor + direction.offset(),
            ..active
        };

        if moved.is_valid(board) {
            self.active = Some(moved);
            return true;
        }

        false
    }

    /// Rotate clockwise about the pivot; no kicks are attempted.
    pub fn try_rotate(&mut self, board: &Board) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let rotated = ActivePiece {
            tetromino: Tetromino {
                offsets: active.tetromino.rotated_offsets(),
                ..active.tetromino
            },
            ..active
        };

        if rotated.is_valid(board) {
            self.active = Some(rotated);
            return true;
        }

        false
    }

    /// Drop as far as possible, then lock
    pub fn hard_drop(&mut self, board: &mut Board) -> Option<LockedPiece> {
        while self.try_move(board, Direction::Down) {}
        self.lock(board)
    }

    /// Commit the active piece to the board and go inactive.
    pub fn lock(&mut self, board: &mut Board) -> Option<LockedPiece> {
        let active = self.active.take()?;
        let cells = active.cells();
        board.place_blocks(&cells, active.tetromino.color);

        tracing::debug!(
            kind = active.tetromino.kind.as_str(),
            x = active.anchor.x,
            y = active.anchor.y,
            "piece locked"
        );

        Some(LockedPiece {
            kind: active.tetromino.kind,
            color: active.tetromino.color,
            cells,
        })
    }

    /// One tick of input handling and gravity.
    ///
    /// Order: held horizontal movement, rotation, hard drop, gravity. Returns
    /// the locked piece when the tick ends with a lock.
    pub fn update(
        &mut self,
        board: &mut Board,
        elapsed_ms: u32,
        input: &TickInput,
    ) -> Option<LockedPiece> {
        if self.active.is_none() {
            return None;
        }

        match input.horizontal {
            Some(h) => {
                if self.move_timer_ms == 0 {
                    self.try_move(board, h.into());
                    self.move_timer_ms = self.move_interval_ms;
                }
            }
            None => self.move_timer_ms = 0,
        }
        self.move_timer_ms = self.move_timer_ms.saturating_sub(elapsed_ms);

        if input.rotate {
            self.try_rotate(board);
        }

        if input.hard_drop {
            return self.hard_drop(board);
        }

        let rate = if input.soft_drop {
            self.soft_drop_multiplier
        } else {
            1
        };
        self.fall_timer_ms = self
            .fall_timer_ms
            .saturating_add(elapsed_ms.saturating_mul(rate));

        if self.fall_timer_ms >= self.fall_interval_ms {
            self.fall_timer_ms = 0;
            if !self.try_move(board, Direction::Down) {
                return self.lock(board);
            }
        }

        None
    }
}

impl Default for PieceController {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Horizontal;

    fn spawn(kind: PieceKind) -> (Board, PieceController) {
        let board = Board::default();
        let mut ctl = PieceController::default();
        assert_eq!(ctl.start_new_piece(&board, Tetromino::new(kind)), SpawnOutcome::Spawned);
        (board, ctl)
    }

    #[test]
    fn test_spawn_at_anchor() {
        let (_, ctl) = spawn(PieceKind::T);
        assert_eq!(ctl.state(), ControllerState::Active);
        assert_eq!(ctl.active().unwrap().anchor, Point::new(4, 18));
    }

    #[test]
    fn test_try_move_respects_walls() {
        let (board, mut ctl) = spawn(PieceKind::I);
        let mut moved = 0;
        for _ in 0..10 {
            if ctl.try_move(&board, Direction::Left) {
                moved += 1;
            }
        }
        assert_eq!(moved, 4);
        assert_eq!(ctl.active().unwrap().anchor.x, 0);

        let mut moved = 0;
        for _ in 0..10 {
            if ctl.try_move(&board, Direction::Right) {
                moved += 1;
            }
        }
        // I spans x..x+3, so the anchor stops at 6.
        assert_eq!(moved, 6);
    }

    #[test]
    fn test_try_move_without_piece() {
        let board = Board::default();
        let mut ctl = PieceController::default();
        assert!(!ctl.try_move(&board, Direction::Down));
        assert!(!ctl.try_rotate(&board));
        assert!(ctl.world_cells().is_none());
        assert_eq!(ctl.current_color(), Color::WHITE);
    }

    #[test]
    fn test_blocked_rotation_leaves_piece_unchanged() {
        let (mut board, mut ctl) = spawn(PieceKind::I);
        // I rotates about (1, 0): the rotated cells sit at x = 5, y = 16..=19.
        board.set(5, 17, Some(Color::RED));
        let before = *ctl.active().unwrap();
        assert!(!ctl.try_rotate(&board));
        assert_eq!(*ctl.active().unwrap(), before);
    }

    #[test]
    fn test_gravity_steps_after_interval() {
        let (mut board, mut ctl) = spawn(PieceKind::O);
        for _ in 0..62 {
            assert!(ctl.update(&mut board, 16, &TickInput::idle()).is_none());
        }
        assert_eq!(ctl.active().unwrap().anchor.y, 18);
        // 63 * 16 = 1008 >= 1000
        ctl.update(&mut board, 16, &TickInput::idle());
        assert_eq!(ctl.active().unwrap().anchor.y, 17);
        assert_eq!(ctl.fall_timer_ms(), 0);
    }

    #[test]
    fn test_soft_drop_accelerates_gravity() {
        let (mut board, mut ctl) = spawn(PieceKind::O);
        let input = TickInput::idle().with_soft_drop(true);
        ctl.update(&mut board, 50, &input);
        ctl.update(&mut board, 50, &input);
        assert_eq!(ctl.active().unwrap().anchor.y, 17);
    }

    #[test]
    fn test_soft_drop_is_exactly_multiplier() {
        let (mut board, mut ctl) = spawn(PieceKind::O);
        let input = TickInput::idle().with_soft_drop(true);

        // 99 ms at 10x is 990 ms of gravity: not yet a step.
        ctl.update(&mut board, 99, &input);
        assert_eq!(ctl.active().unwrap().anchor.y, 18);
        assert_eq!(ctl.fall_timer_ms(), 990);

        ctl.update(&mut board, 1, &input);
        assert_eq!(ctl.active().unwrap().anchor.y, 17);
        assert_eq!(ctl.fall_timer_ms(), 0);
    }

    #[test]
    fn test_held_direction_repeats_on_interval() {
        let (mut board, mut ctl) = spawn(PieceKind::O);
        let input = TickInput::idle().with_horizontal(Horizontal::Left);

        ctl.update(&mut board, 50, &input);
        assert_eq!(ctl.active().unwrap().anchor.x, 3);
        ctl.update(&mut board, 50, &input);
        assert_eq!(ctl.active().unwrap().anchor.x, 3);
        ctl.update(&mut board, 50, &input);
        assert_eq!(ctl.active().unwrap().anchor.x, 2);
    }

    #[test]
    fn test_release_allows_immediate_move() {
        let (mut board, mut ctl) = spawn(PieceKind::O);
        let left = TickInput::idle().with_horizontal(Horizontal::Left);

        ctl.update(&mut board, 10, &left);
        ctl.update(&mut board, 10, &TickInput::idle());
        ctl.update(&mut board, 10, &left);
        assert_eq!(ctl.active().unwrap().anchor.x, 2);
    }

    #[test]
    fn test_gravity_locks_grounded_piece() {
        let (mut board, mut ctl) = spawn(PieceKind::O);
        while ctl.try_move(&board, Direction::Down) {}
        let locked = ctl.update(&mut board, 1000, &TickInput::idle());
        let locked = locked.expect("piece should lock");
        assert_eq!(locked.kind, PieceKind::O);
        assert!(!ctl.is_active());
        assert_eq!(board.filled_count(), 4);
    }

    #[test]
    fn test_hard_drop_input_skips_gravity() {
        let (mut board, mut ctl) = spawn(PieceKind::I);
        let input = TickInput {
            hard_drop: true,
            ..TickInput::idle()
        };
        let locked = ctl.update(&mut board, 5000, &input).unwrap();
        assert!(locked.cells.iter().all(|c| c.y == 0));
        assert!(ctl.update(&mut board, 5000, &TickInput::idle()).is_none());
    }

    #[test]
    fn test_spawn_blocked_stays_inactive() {
        let mut board = Board::default();
        board.set(5, 19, Some(Color::RED));
        let mut ctl = PieceController::default();
        let outcome = ctl.start_new_piece(&board, Tetromino::new(PieceKind::T));
        assert_eq!(outcome, SpawnOutcome::Blocked);
        assert_eq!(ctl.state(), ControllerState::Inactive);
    }
}
