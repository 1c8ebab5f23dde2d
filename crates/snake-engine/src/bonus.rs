//! Bonus food state and its scheduled phase transitions.

use std::time::Instant;

use snake_core::constants::{BONUS_BLINKING_POINTS, BONUS_SOLID_POINTS};
use snake_core::enums::BonusPhase;
use snake_core::types::Cell;

/// An active bonus on the board.
#[derive(Debug, Clone, Copy)]
pub struct Bonus {
    /// Monotonic identity, used to match timers to the bonus they were
    /// scheduled for.
    pub id: u64,
    pub cell: Cell,
    pub phase: BonusPhase,
}

impl Bonus {
    /// Points awarded if eaten in the current phase.
    pub fn points(&self) -> u32 {
        match self.phase {
            BonusPhase::Solid => BONUS_SOLID_POINTS,
            BonusPhase::Blinking => BONUS_BLINKING_POINTS,
        }
    }
}

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Switch the bonus from solid to blinking.
    Blink,
    /// Remove the bonus from the board.
    Expire,
}

/// A scheduled transition for one specific bonus. A timer whose
/// `bonus_id` no longer matches the active bonus is stale and must be
/// dropped, never applied to a later bonus.
#[derive(Debug, Clone, Copy)]
pub struct BonusTimer {
    pub bonus_id: u64,
    pub fire_at: Instant,
    pub action: TimerAction,
}
