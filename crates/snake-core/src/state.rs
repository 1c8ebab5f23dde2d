//! Engine outputs: the per-tick snapshot and the terminal result record.

use serde::{Deserialize, Serialize};

use crate::enums::{BonusPhase, GameStatus};
use crate::events::GameEvent;
use crate::types::Cell;

/// Complete visible game state, produced by every engine tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    /// Snake cells, head first.
    pub snake: Vec<Cell>,
    pub food: Option<Cell>,
    pub bonus: Option<BonusView>,
    pub score: u32,
    pub high_score: u32,
    pub grid_size: i32,
    /// Current tick interval in milliseconds.
    pub speed_ms: u64,
    pub stats: StatsView,
    /// Victory target length, when the secret-phrase mode is active.
    pub target_length: Option<u32>,
    /// One-shot feedback events since the previous snapshot.
    pub events: Vec<GameEvent>,
}

/// Bonus state for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusView {
    pub cell: Cell,
    pub phase: BonusPhase,
    /// Points awarded if eaten right now.
    pub points: u32,
}

/// Per-game counters for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsView {
    pub food_eaten: u32,
    pub bonuses_eaten: u32,
    pub max_length: u32,
    /// Seconds since the game started; frozen at the terminal transition.
    pub elapsed_secs: f64,
}

/// Finalized record of one game, built exactly once per terminal
/// transition. Field names follow the leaderboard wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub player_name: String,
    pub score: u32,
    /// Game duration in seconds.
    pub duration: f64,
    pub max_length: u32,
    pub food_eaten: u32,
    pub bonuses_eaten: u32,
}
