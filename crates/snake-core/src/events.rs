//! Feedback events emitted by the engine for frontend audio and UI cues.

use serde::{Deserialize, Serialize};

use crate::enums::BonusPhase;
use crate::types::Cell;

/// One-shot events drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Regular food was eaten.
    FoodEaten { at: Cell },
    /// A bonus appeared on the board.
    BonusSpawned { at: Cell },
    /// The bonus changed phase (solid -> blinking).
    BonusPhaseChanged { phase: BonusPhase },
    /// The bonus expired without being eaten.
    BonusExpired,
    /// A bonus was eaten for the given points.
    BonusEaten { points: u32 },
    /// The game ended in a loss.
    GameOver { score: u32 },
    /// The game ended in a win (secret-phrase mode).
    Victory { score: u32 },
}
