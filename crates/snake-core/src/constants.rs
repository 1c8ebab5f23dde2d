//! Game constants and tuning parameters.

/// Board side length in cells.
pub const GRID_SIZE: i32 = 20;

/// Snake length at game start.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

// --- Speed model ---

/// Tick interval at score 0 (milliseconds).
pub const INITIAL_SPEED_MS: u64 = 150;

/// Fastest allowed tick interval (milliseconds).
pub const MIN_SPEED_MS: u64 = 50;

/// Interval reduction per speed bracket (milliseconds).
pub const SPEED_INCREMENT_MS: u64 = 5;

/// Points per speed bracket.
pub const SPEED_BRACKET: u32 = 5;

// --- Scoring & growth ---

/// Points for regular food.
pub const FOOD_POINTS: u32 = 1;

/// Segments gained from regular food.
pub const FOOD_GROWTH: u32 = 1;

/// Points (and segments gained) for a solid bonus.
pub const BONUS_SOLID_POINTS: u32 = 5;

/// Points (and segments gained) for a blinking bonus.
pub const BONUS_BLINKING_POINTS: u32 = 3;

// --- Bonus lifecycle ---

/// Chance of a bonus spawning when food is eaten and no bonus is active.
pub const BONUS_CHANCE: f64 = 0.15;

/// Time a bonus stays solid before it starts blinking (milliseconds).
pub const BONUS_SOLID_DURATION_MS: u64 = 5000;

/// Time a blinking bonus stays on the board before expiring (milliseconds).
pub const BONUS_BLINKING_DURATION_MS: u64 = 5000;

// --- Placement ---

/// Retry cap for random placement; the last sample is accepted as a
/// fallback so placement terminates on a nearly full grid.
pub const PLACEMENT_MAX_ATTEMPTS: u32 = 1000;

// --- Player identity ---

/// Display name used when none has been set.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Maximum display name length accepted by the leaderboard service.
pub const MAX_PLAYER_NAME_LEN: usize = 50;

/// Phrase spelled out along the snake body in secret-phrase mode; its
/// character count determines the victory target length.
pub const SECRET_PHRASE: &str = "Тихомиров-гений, самый классный и любимый!";
