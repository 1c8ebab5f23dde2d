//! Core types and definitions for the snake game.
//!
//! This crate defines the vocabulary shared across the engine and any
//! embedding frontend: commands, state snapshots, feedback events, and
//! constants. It has no dependency on any runtime framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
