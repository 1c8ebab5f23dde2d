//! Runtime harness for the snake engine.
//!
//! Runs `GameEngine` on a dedicated game-loop thread and exposes a
//! small command/snapshot surface for an embedding frontend, plus a
//! sink for finished-game results.

pub mod game_loop;
pub mod sink;
pub mod state;

pub use snake_core as core;
