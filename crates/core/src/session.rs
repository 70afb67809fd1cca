//! Game session - ties the board, the active piece and scoring together
//!
//! A session is advanced by calling [`GameSession::tick`] with the elapsed time
//! and the input held during that tick. Each tick runs, in order:
//!
//! 1. restart intent
//! 2. controller input and gravity (may lock the piece)
//! 3. line clear, scoring and the top-row game over check after a lock
//! 4. spawn cadence while no piece is active
//!
//! Everything a presentation layer needs comes back as [`GameEvent`]s or can be
//! read through the accessors / [`GameSnapshot`].

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::GameConfig;
use crate::controller::{ActivePiece, LockedPiece, PieceController, SpawnOutcome};
use crate::pieces::pick_random_shape;
use crate::rng::{PieceSource, UniformPicker};
use crate::scoring::line_clear_score;
use crate::snapshot::{ActiveSnapshot, BlockSnapshot, GameSnapshot};
use crate::types::{Direction, GameAction, GameEvent, TickInput};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Constructed, `start` not called yet
    #[default]
    Ready,
    Playing,
    /// Terminal until `restart`
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameSession<S = UniformPicker> {
    config: GameConfig,
    board: Board,
    controller: PieceController,
    source: S,
    score: u32,
    lines: u32,
    phase: Phase,
    spawn_timer_ms: u32,
    /// Pieces spawned successfully in this episode.
    piece_count: u32,
    /// Monotonic episode id (increments on restart).
    episode: u32,
    /// Events not yet handed to the caller.
    events: Vec<GameEvent>,
}

impl GameSession<UniformPicker> {
    /// Session drawing pieces uniformly, seeded from `config.seed`.
    pub fn new(config: GameConfig) -> Self {
        let source = UniformPicker::new(config.seed);
        Self::with_source(config, source)
    }
}

impl Default for GameSession<UniformPicker> {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl<S: PieceSource> GameSession<S> {
    /// Session drawing pieces from `source`.
    ///
    /// `config` is expected to have passed [`GameConfig::validate`].
    pub fn with_source(config: GameConfig, source: S) -> Self {
        Self {
            board: Board::new(config.width, config.height),
            controller: PieceController::new(&config),
            config,
            source,
            score: 0,
            lines: 0,
            phase: Phase::Ready,
            spawn_timer_ms: 0,
            piece_count: 0,
            episode: 0,
            events: Vec::new(),
        }
    }

    /// Reset score, lines and board, then spawn the first piece.
    ///
    /// Events still queued from before are discarded.
    pub fn start(&mut self) -> Vec<GameEvent> {
        self.reset();
        self.spawn_next();
        self.take_events()
    }

    /// Same as [`start`](Self::start), as a new episode.
    ///
    /// The piece source carries on from where it was; only the seed given at
    /// construction makes a run reproducible.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        self.begin_new_episode();
        self.take_events()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for setting up positions (puzzles, tests).
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn controller(&self) -> &PieceController {
        &self.controller
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.controller.active()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn piece_count(&self) -> u32 {
        self.piece_count
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn spawn_timer_ms(&self) -> u32 {
        self.spawn_timer_ms
    }

    /// Take the events queued by [`apply_action`](Self::apply_action).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Main game tick.
    pub fn tick(&mut self, elapsed_ms: u32, input: &TickInput) -> Vec<GameEvent> {
        if input.restart {
            self.begin_new_episode();
            return self.take_events();
        }

        if self.phase != Phase::Playing {
            return self.take_events();
        }

        let was_active = self.controller.is_active();

        if let Some(locked) = self.controller.update(&mut self.board, elapsed_ms, input) {
            self.on_piece_locked(locked);
        }

        // The spawn delay only counts ticks that began without a piece, so a
        // lock never shortens the pause before the next spawn.
        if self.phase == Phase::Playing && !was_active && !self.controller.is_active() {
            self.spawn_timer_ms = self.spawn_timer_ms.saturating_add(elapsed_ms);
            if self.spawn_timer_ms >= self.config.spawn_delay_ms {
                self.spawn_timer_ms = 0;
                self.spawn_next();
            }
        }

        self.take_events()
    }

    /// Apply a one-shot action.
    ///
    /// Returns whether it had an effect. Movement only applies while playing;
    /// `Restart` always does.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if action != GameAction::Restart && self.phase != Phase::Playing {
            return false;
        }

        match action {
            GameAction::Restart => {
                self.begin_new_episode();
                true
            }
            GameAction::MoveLeft => self.controller.try_move(&self.board, Direction::Left),
            GameAction::MoveRight => self.controller.try_move(&self.board, Direction::Right),
            GameAction::SoftDrop => self.controller.try_move(&self.board, Direction::Down),
            GameAction::RotateCw => self.controller.try_rotate(&self.board),
            GameAction::HardDrop => match self.controller.hard_drop(&mut self.board) {
                Some(locked) => {
                    self.on_piece_locked(locked);
                    true
                }
                None => false,
            },
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.blocks.clear();
        out.blocks.extend(
            self.board
                .occupied_cells()
                .map(|(p, color)| BlockSnapshot { x: p.x, y: p.y, color }),
        );
        out.active = self.controller.active().map(ActiveSnapshot::from);
        out.score = self.score;
        out.lines = self.lines;
        out.phase = self.phase;
        out.piece_count = self.piece_count;
        out.episode = self.episode;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn reset(&mut self) {
        self.score = 0;
        self.lines = 0;
        self.phase = Phase::Playing;
        self.spawn_timer_ms = 0;
        self.piece_count = 0;
        self.events.clear();
        self.board.clear_board();
        self.controller.deactivate();
    }

    fn begin_new_episode(&mut self) {
        self.episode = self.episode.wrapping_add(1);
        tracing::debug!(episode = self.episode, "session restarted");
        self.reset();
        self.events.push(GameEvent::Restarted);
        self.spawn_next();
    }

    /// Draw a shape and hand it to the controller; a blocked spawn ends the game.
    fn spawn_next(&mut self) {
        let shape = pick_random_shape(&mut self.source);
        match self.controller.start_new_piece(&self.board, shape) {
            SpawnOutcome::Spawned => {
                self.piece_count = self.piece_count.wrapping_add(1);
                self.events.push(GameEvent::PieceSpawned { kind: shape.kind });
            }
            SpawnOutcome::Blocked => {
                self.events.push(GameEvent::SpawnBlocked { kind: shape.kind });
                self.enter_game_over();
            }
        }
    }

    fn on_piece_locked(&mut self, locked: LockedPiece) {
        self.events.push(GameEvent::PieceLocked {
            kind: locked.kind,
            cells: locked.cells,
        });

        let cleared = self.board.clear_lines();
        if cleared > 0 {
            let points = line_clear_score(cleared);
            self.lines = self.lines.saturating_add(cleared as u32);
            self.score = self.score.saturating_add(points);
            tracing::debug!(cleared, points, score = self.score, "lines cleared");
            self.events.push(GameEvent::LinesCleared {
                count: cleared as u32,
                points,
            });
        }

        if self.board.is_game_over() {
            self.enter_game_over();
        }
    }

    fn enter_game_over(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.phase = Phase::GameOver;
        tracing::debug!(score = self.score, lines = self.lines, "game over");
        self.events.push(GameEvent::GameOver {
            score: self.score,
            lines: self.lines,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedPieces;
    use crate::types::{Color, PieceKind, Point};

    fn scripted(kinds: &[PieceKind]) -> GameSession<ScriptedPieces> {
        let config = GameConfig::default().with_spawn_delay_ms(0);
        GameSession::with_source(config, ScriptedPieces::new(kinds.to_vec()))
    }

    #[test]
    fn test_new_session_is_ready() {
        let session = GameSession::default();
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.score(), 0);
        assert!(session.active().is_none());
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut session = GameSession::default();
        assert!(session.tick(1000, &TickInput::idle()).is_empty());
        assert!(!session.apply_action(GameAction::HardDrop));
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn test_start_spawns_first_piece() {
        let mut session = scripted(&[PieceKind::T]);
        let events = session.start();
        assert_eq!(events, vec![GameEvent::PieceSpawned { kind: PieceKind::T }]);
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.piece_count(), 1);
        assert_eq!(session.active().unwrap().anchor, Point::new(4, 18));
    }

    #[test]
    fn test_spawn_waits_for_delay() {
        let config = GameConfig::default().with_spawn_delay_ms(500);
        let mut session =
            GameSession::with_source(config, ScriptedPieces::new(vec![PieceKind::O]));
        session.start();
        assert!(session.apply_action(GameAction::HardDrop));
        assert!(session.active().is_none());

        for _ in 0..4 {
            session.tick(100, &TickInput::idle());
            assert!(session.active().is_none());
        }
        let events = session.tick(100, &TickInput::idle());
        assert_eq!(events, vec![GameEvent::PieceSpawned { kind: PieceKind::O }]);
        assert_eq!(session.spawn_timer_ms(), 0);
    }

    #[test]
    fn test_lock_tick_does_not_count_toward_spawn() {
        let mut session = scripted(&[PieceKind::O]);
        session.start();
        let input = TickInput {
            hard_drop: true,
            ..TickInput::idle()
        };
        let events = session.tick(16, &input);
        assert!(matches!(events[0], GameEvent::PieceLocked { .. }));
        assert!(session.active().is_none());

        // Next tick spawns (delay is zero).
        session.tick(16, &TickInput::idle());
        assert!(session.active().is_some());
    }

    #[test]
    fn test_single_line_clear_scores_100() {
        let mut session = scripted(&[PieceKind::I]);
        session.start();
        for x in [0, 1, 2, 3, 8, 9] {
            session.board_mut().set(x, 0, Some(Color::RED));
        }
        assert!(session.apply_action(GameAction::HardDrop));
        let events = session.take_events();
        assert!(events.contains(&GameEvent::LinesCleared { count: 1, points: 100 }));
        assert_eq!(session.score(), 100);
        assert_eq!(session.lines(), 1);
        assert_eq!(session.board().filled_count(), 0);
    }

    #[test]
    fn test_restart_resets_and_bumps_episode() {
        let mut session = scripted(&[PieceKind::I]);
        session.start();
        session.apply_action(GameAction::HardDrop);
        assert_eq!(session.board().filled_count(), 4);

        let events = session.tick(16, &TickInput::from_actions(&[GameAction::Restart]));
        assert_eq!(events[0], GameEvent::Restarted);
        assert_eq!(session.episode(), 1);
        assert_eq!(session.board().filled_count(), 0);
        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.active().is_some());
    }

    #[test]
    fn test_restart_continues_piece_sequence() {
        let mut session = scripted(&[PieceKind::T, PieceKind::I, PieceKind::S]);
        assert_eq!(session.start(), vec![GameEvent::PieceSpawned { kind: PieceKind::T }]);

        let events = session.restart();
        assert_eq!(
            events,
            vec![GameEvent::Restarted, GameEvent::PieceSpawned { kind: PieceKind::I }]
        );

        assert!(session.apply_action(GameAction::Restart));
        assert_eq!(
            session.take_events(),
            vec![GameEvent::Restarted, GameEvent::PieceSpawned { kind: PieceKind::S }]
        );
        assert_eq!(session.episode(), 2);
    }

    #[test]
    fn test_restart_action_works_before_start() {
        let mut session = scripted(&[PieceKind::O]);
        assert!(!session.apply_action(GameAction::MoveLeft));
        assert!(session.apply_action(GameAction::Restart));
        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.active().is_some());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = scripted(&[PieceKind::O]);
        session.start();
        session.apply_action(GameAction::HardDrop);
        session.tick(0, &TickInput::idle());

        let snap = session.snapshot();
        assert_eq!(snap.width, 10);
        assert_eq!(snap.height, 20);
        assert_eq!(snap.blocks.len(), 4);
        assert_eq!(snap.active.unwrap().kind, PieceKind::O);
        assert_eq!(snap.phase, Phase::Playing);
        assert_eq!(snap.piece_count, 2);
    }
}
