//! Enumeration types used throughout the game.

use serde::{Deserialize, Serialize};

/// Game lifecycle status (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Main menu; no game in progress.
    #[default]
    Idle,
    Playing,
    Paused,
    /// Terminal until an explicit restart.
    GameOver,
    /// Terminal win state (secret-phrase mode only).
    Victory,
}

/// Bonus food phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusPhase {
    /// Full value.
    #[default]
    Solid,
    /// Reduced value, about to expire.
    Blinking,
}
