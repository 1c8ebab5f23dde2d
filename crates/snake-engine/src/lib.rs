//! Headless snake game engine.
//!
//! `GameEngine` owns all game state, processes queued player commands,
//! and produces a `GameSnapshot` per tick. It has no UI or runtime
//! dependency; the caller drives it with a clock instant, which makes
//! every timer and the whole simulation deterministic under test.

pub mod bonus;
pub mod engine;
pub mod persistence;
pub mod placement;

pub use engine::{EngineConfig, GameEngine};

#[cfg(test)]
mod tests;
