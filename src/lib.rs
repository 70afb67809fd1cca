//! Tetris simulation (workspace facade crate).
//!
//! Re-exports `tetris_sim::{core,types}` from the crates under `crates/` and
//! adds the [`autopilot`] used by the headless driver.

pub mod autopilot;

pub use tetris_sim_core as core;
pub use tetris_sim_types as types;
