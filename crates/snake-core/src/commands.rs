//! Player commands sent from the frontend to the engine.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start a new game from the menu or a finished-game screen.
    StartGame,
    /// Pause a running game, or resume a paused one.
    TogglePause,
    /// Abandon the current game and return to the menu.
    GoToMenu,
    /// Request a direction change. Reversals are silently ignored.
    ChangeDirection { direction: Direction },
    /// Set the display name used in result records (persisted locally).
    SetPlayerName { name: String },
}
