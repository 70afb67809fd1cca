//! Headless simulation runner (default binary).
//!
//! Plays games with the autopilot at a fixed simulated tick and reports the
//! outcome of each one.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::Serialize;

use tetris_sim::autopilot::Autopilot;
use tetris_sim::core::{GameConfig, GameSession};
use tetris_sim::types::{GameEvent, TICK_MS};

/// tetris-sim - run autopilot games without a display
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Piece picker seed (overrides config and environment)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = TICK_MS)]
    tick_ms: u32,

    /// Stop a game after this many ticks
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,

    /// Number of games; game N uses seed + N
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Path to a JSON config file (otherwise TETRIS_SIM_* environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print one JSON object per game
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct GameResult {
    game: u32,
    seed: u32,
    score: u32,
    lines: u32,
    pieces: u32,
    ticks: u64,
    game_over: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries results
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = load_config(&args)?;
    ensure!(args.tick_ms > 0, "--tick-ms must be at least 1");

    tracing::info!(
        width = config.width,
        height = config.height,
        seed = config.seed,
        games = args.games,
        "starting simulation"
    );

    for game in 0..args.games {
        let result = run_game(game, &config, &args);

        tracing::info!(
            game,
            score = result.score,
            lines = result.lines,
            pieces = result.pieces,
            ticks = result.ticks,
            "game finished"
        );

        if args.json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            println!(
                "game {}: seed {} score {} lines {} pieces {} ticks {}{}",
                result.game,
                result.seed,
                result.score,
                result.lines,
                result.pieces,
                result.ticks,
                if result.game_over { "" } else { " (tick cap)" }
            );
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => GameConfig::from_env(),
    };

    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    config.validate().context("Invalid game config")?;
    Ok(config)
}

fn run_game(game: u32, config: &GameConfig, args: &Args) -> GameResult {
    let seed = config.seed.wrapping_add(game);
    let mut session = GameSession::new(config.clone().with_seed(seed));
    let mut bot = Autopilot::default();
    session.start();

    let mut ticks = 0u64;
    while !session.is_game_over() && ticks < args.max_ticks {
        for event in bot.step(&mut session, args.tick_ms) {
            if let GameEvent::LinesCleared { count, points } = event {
                tracing::debug!(game, count, points, "lines cleared");
            }
        }
        ticks += 1;
    }

    GameResult {
        game,
        seed,
        score: session.score(),
        lines: session.lines(),
        pieces: session.piece_count(),
        ticks,
        game_over: session.is_game_over(),
    }
}
