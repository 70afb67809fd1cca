//! Placement bot driving a session through discrete actions.
//!
//! For each new piece the bot tries every rotation (0-3 clockwise turns at the
//! spawn anchor) combined with every column reachable by stepping sideways,
//! hard-drops each candidate on a copy of the board and keeps the best scoring
//! result. The chosen plan is then fed one action per tick.

use std::collections::VecDeque;

use crate::core::{Board, GameSession, Phase, PieceController, PieceSource};
use crate::types::{Direction, GameAction, GameEvent, TickInput};

/// Linear evaluation weights.
///
/// Defaults are the well-known genetic-algorithm weights for aggregate height,
/// completed lines, holes and bumpiness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub aggregate_height: f64,
    pub lines: f64,
    pub holes: f64,
    pub bumpiness: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            aggregate_height: -0.510066,
            lines: 0.760666,
            holes: -0.35663,
            bumpiness: -0.184483,
        }
    }
}

/// Surface statistics of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridFeatures {
    /// Sum of column heights
    pub aggregate_height: u32,
    /// Empty cells with a block somewhere above them
    pub holes: u32,
    /// Sum of height differences between neighbouring columns
    pub bumpiness: u32,
}

pub fn grid_features(board: &Board) -> GridFeatures {
    let mut f = GridFeatures::default();
    let mut prev: Option<usize> = None;

    for x in 0..board.width() {
        let h = board.column_height(x);
        f.aggregate_height += h as u32;
        f.holes += (0..h)
            .filter(|&y| !board.is_occupied(x as i32, y as i32))
            .count() as u32;
        if let Some(p) = prev {
            f.bumpiness += p.abs_diff(h) as u32;
        }
        prev = Some(h);
    }

    f
}

/// One candidate placement and its evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Clockwise turns applied at spawn
    pub rotations: u8,
    /// Horizontal steps after rotating; negative is left
    pub shift: i32,
    /// Rows the drop would clear
    pub cleared: usize,
    /// Whether the drop ends the game
    pub tops_out: bool,
    pub value: f64,
}

impl Placement {
    /// Discrete actions that realise this placement, ending with the hard drop.
    pub fn actions(&self) -> impl Iterator<Item = GameAction> {
        let step = if self.shift < 0 {
            GameAction::MoveLeft
        } else {
            GameAction::MoveRight
        };
        std::iter::repeat(GameAction::RotateCw)
            .take(self.rotations as usize)
            .chain(std::iter::repeat(step).take(self.shift.unsigned_abs() as usize))
            .chain(std::iter::once(GameAction::HardDrop))
    }
}

fn evaluate(
    board: &Board,
    controller: &PieceController,
    rotations: u8,
    shift: i32,
    weights: &Weights,
) -> Option<Placement> {
    let mut board = board.clone();
    let mut controller = controller.clone();
    controller.hard_drop(&mut board)?;

    let cleared = board.clear_lines();
    let tops_out = board.is_game_over();
    let f = grid_features(&board);
    let value = weights.aggregate_height * f.aggregate_height as f64
        + weights.lines * cleared as f64
        + weights.holes * f.holes as f64
        + weights.bumpiness * f.bumpiness as f64;

    Some(Placement {
        rotations,
        shift,
        cleared,
        tops_out,
        value,
    })
}

/// Best placement for the controller's active piece, if it has one.
///
/// Placements that top out lose to any that don't; ties keep the first found.
pub fn best_placement(
    board: &Board,
    controller: &PieceController,
    weights: &Weights,
) -> Option<Placement> {
    let mut best: Option<Placement> = None;
    let mut consider = |p: Placement| {
        let better = match best {
            None => true,
            Some(b) => match (p.tops_out, b.tops_out) {
                (false, true) => true,
                (true, false) => false,
                _ => p.value > b.value,
            },
        };
        if better {
            best = Some(p);
        }
    };

    let mut rotated = controller.clone();
    for rotations in 0..4u8 {
        if rotations > 0 && !rotated.try_rotate(board) {
            break;
        }

        if let Some(p) = evaluate(board, &rotated, rotations, 0, weights) {
            consider(p);
        }

        for (direction, sign) in [(Direction::Left, -1), (Direction::Right, 1)] {
            let mut stepped = rotated.clone();
            let mut steps = 0;
            while stepped.try_move(board, direction) {
                steps += 1;
                if let Some(p) = evaluate(board, &stepped, rotations, sign * steps, weights) {
                    consider(p);
                }
            }
        }
    }

    best
}

/// Stateful driver: plans once per piece and replays the plan.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    weights: Weights,
    plan: VecDeque<GameAction>,
    /// (episode, piece count) the current plan was made for
    planned_for: Option<(u32, u32)>,
}

impl Autopilot {
    pub fn new(weights: Weights) -> Self {
        Self {
            weights,
            plan: VecDeque::new(),
            planned_for: None,
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Next action for the session's current piece, planning on first sight of it.
    pub fn next_action<S: PieceSource>(&mut self, session: &GameSession<S>) -> Option<GameAction> {
        if session.phase() != Phase::Playing || !session.controller().is_active() {
            self.plan.clear();
            return None;
        }

        let key = (session.episode(), session.piece_count());
        if self.planned_for != Some(key) {
            self.planned_for = Some(key);
            self.plan.clear();
            if let Some(p) = best_placement(session.board(), session.controller(), &self.weights) {
                tracing::trace!(
                    rotations = p.rotations,
                    shift = p.shift,
                    value = p.value,
                    "placement chosen"
                );
                self.plan.extend(p.actions());
            }
        }

        self.plan.pop_front()
    }

    /// Apply at most one planned action, then advance the session one tick.
    pub fn step<S: PieceSource>(
        &mut self,
        session: &mut GameSession<S>,
        elapsed_ms: u32,
    ) -> Vec<GameEvent> {
        if let Some(action) = self.next_action(session) {
            session.apply_action(action);
        }
        session.tick(elapsed_ms, &TickInput::idle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, ScriptedPieces, Tetromino};
    use crate::types::{Color, PieceKind};

    #[test]
    fn test_features_of_empty_board() {
        assert_eq!(grid_features(&Board::default()), GridFeatures::default());
    }

    #[test]
    fn test_features_count_holes_and_bumps() {
        let mut board = Board::default();
        // Column 0: block at y=2 over two empty cells.
        board.set(0, 2, Some(Color::RED));
        board.set(1, 0, Some(Color::RED));

        let f = grid_features(&board);
        assert_eq!(f.aggregate_height, 3 + 1);
        assert_eq!(f.holes, 2);
        // |3-1| + |1-0|
        assert_eq!(f.bumpiness, 3);
    }

    #[test]
    fn test_placement_actions() {
        let p = Placement {
            rotations: 1,
            shift: -2,
            cleared: 0,
            tops_out: false,
            value: 0.0,
        };
        let actions: Vec<_> = p.actions().collect();
        assert_eq!(
            actions,
            vec![
                GameAction::RotateCw,
                GameAction::MoveLeft,
                GameAction::MoveLeft,
                GameAction::HardDrop
            ]
        );
    }

    #[test]
    fn test_best_placement_fills_the_gap() {
        let mut board = Board::default();
        for x in 0..10 {
            if x != 9 {
                board.set(x, 0, Some(Color::RED));
            }
        }
        let mut ctl = PieceController::default();
        ctl.start_new_piece(&board, Tetromino::new(PieceKind::I));

        let p = best_placement(&board, &ctl, &Weights::default()).unwrap();
        assert_eq!(p.cleared, 1);
        // Vertical I sits at anchor.x + 1, so the anchor moves from 4 to 8.
        assert_eq!(p.rotations % 2, 1);
    }

    #[test]
    fn test_no_placement_without_piece() {
        let board = Board::default();
        let ctl = PieceController::default();
        assert!(best_placement(&board, &ctl, &Weights::default()).is_none());
    }

    #[test]
    fn test_step_locks_pieces() {
        let config = GameConfig::default().with_spawn_delay_ms(0);
        let mut session =
            GameSession::with_source(config, ScriptedPieces::new(vec![PieceKind::O]));
        session.start();
        let mut bot = Autopilot::default();

        let mut locked = 0;
        for _ in 0..200 {
            for e in bot.step(&mut session, 16) {
                if matches!(e, GameEvent::PieceLocked { .. }) {
                    locked += 1;
                }
            }
        }
        assert!(locked >= 10);
        assert!(!session.is_game_over());
    }
}
