//! The game engine and its tick loop entry point.
//!
//! `GameEngine` owns the board state, processes player commands, moves
//! the snake one cell per tick, and produces `GameSnapshot`s. Completely
//! headless: the caller supplies the clock instant for each tick, so
//! bonus timers and game duration are testable without sleeping.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use snake_core::commands::PlayerCommand;
use snake_core::constants::{
    BONUS_BLINKING_DURATION_MS, BONUS_CHANCE, BONUS_SOLID_DURATION_MS, DEFAULT_PLAYER_NAME,
    FOOD_GROWTH, FOOD_POINTS, GRID_SIZE, INITIAL_SNAKE_LENGTH, INITIAL_SPEED_MS,
    MAX_PLAYER_NAME_LEN, MIN_SPEED_MS, SPEED_BRACKET, SPEED_INCREMENT_MS,
};
use snake_core::enums::{BonusPhase, GameStatus};
use snake_core::events::GameEvent;
use snake_core::state::{BonusView, GameResult, GameSnapshot, StatsView};
use snake_core::types::{Cell, Direction};

use crate::bonus::{Bonus, BonusTimer, TimerAction};
use crate::persistence::{LocalStore, StoredData};
use crate::placement;

/// Configuration for a new engine.
pub struct EngineConfig {
    /// RNG seed for determinism. Same seed = same placement sequence.
    pub seed: u64,
    /// Snake length that ends the game in victory, if set.
    pub victory_target: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            victory_target: None,
        }
    }
}

/// Per-game counters. Frozen at the terminal transition so the final
/// duration does not keep growing on the game-over screen.
#[derive(Debug, Clone, Copy, Default)]
struct GameStats {
    food_eaten: u32,
    bonuses_eaten: u32,
    max_length: u32,
    started_at: Option<Instant>,
    frozen_secs: Option<f64>,
}

impl GameStats {
    fn start(now: Instant, initial_length: u32) -> Self {
        Self {
            max_length: initial_length,
            started_at: Some(now),
            ..Default::default()
        }
    }

    fn elapsed_secs(&self, now: Instant) -> f64 {
        if let Some(frozen) = self.frozen_secs {
            return frozen;
        }
        match self.started_at {
            Some(start) => now.duration_since(start).as_secs_f64(),
            None => 0.0,
        }
    }

    fn freeze(&mut self, now: Instant) {
        if self.frozen_secs.is_none() {
            self.frozen_secs = Some(self.elapsed_secs(now));
        }
    }
}

/// The game engine. Owns all mutable game state.
pub struct GameEngine {
    config: EngineConfig,
    status: GameStatus,
    /// Head first.
    snake: VecDeque<Cell>,
    direction: Direction,
    /// Segments still owed to the tail from recent eating.
    pending_growth: u32,
    food: Option<Cell>,
    bonus: Option<Bonus>,
    bonus_seq: u64,
    timers: Vec<BonusTimer>,
    score: u32,
    high_score: u32,
    stats: GameStats,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
    result: Option<GameResult>,
    player_name: String,
    store: Box<dyn LocalStore>,
}

impl GameEngine {
    /// Create a new engine with the given config and persistence
    /// backend. A failed load starts from defaults rather than failing.
    pub fn new(config: EngineConfig, store: Box<dyn LocalStore>) -> Self {
        let stored = store.load().unwrap_or_else(|err| {
            log::warn!("failed to load local store, starting fresh: {err}");
            StoredData::default()
        });
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            status: GameStatus::default(),
            snake: VecDeque::new(),
            direction: Direction::default(),
            pending_growth: 0,
            food: None,
            bonus: None,
            bonus_seq: 0,
            timers: Vec::new(),
            score: 0,
            high_score: stored.high_score,
            stats: GameStats::default(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            result: None,
            player_name: stored
                .player_name
                .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string()),
            store,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the game by one tick and return the resulting snapshot.
    ///
    /// Commands and due bonus timers are applied first. The snake only
    /// moves when the game was already running when the tick began, so
    /// the tick that starts or resumes a game shows the board without
    /// stepping it.
    pub fn tick(&mut self, now: Instant) -> GameSnapshot {
        let was_playing = self.status == GameStatus::Playing;
        self.process_commands(now);
        self.fire_due_timers(now);

        if self.status == GameStatus::Playing && was_playing {
            self.step(now);
        }

        self.build_snapshot(now)
    }

    /// Current tick interval, derived from the score.
    pub fn tick_interval(&self) -> Duration {
        let brackets = (self.score / SPEED_BRACKET) as u64;
        let reduced = INITIAL_SPEED_MS.saturating_sub(brackets * SPEED_INCREMENT_MS);
        Duration::from_millis(reduced.max(MIN_SPEED_MS))
    }

    /// Take the result of a finished game. Returns `Some` exactly once
    /// per terminal transition; abandoned games never produce one.
    pub fn take_result(&mut self) -> Option<GameResult> {
        self.result.take()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Process all queued commands.
    fn process_commands(&mut self, now: Instant) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command, now);
        }
    }

    /// Handle a single player command, respecting the current status.
    fn handle_command(&mut self, command: PlayerCommand, now: Instant) {
        match command {
            PlayerCommand::StartGame => {
                if matches!(
                    self.status,
                    GameStatus::Idle | GameStatus::GameOver | GameStatus::Victory
                ) {
                    self.reset_game(now);
                    self.status = GameStatus::Playing;
                }
            }
            PlayerCommand::TogglePause => match self.status {
                GameStatus::Playing => self.status = GameStatus::Paused,
                GameStatus::Paused => self.status = GameStatus::Playing,
                _ => {}
            },
            PlayerCommand::GoToMenu => {
                if self.status != GameStatus::Idle {
                    // Abandoned games produce no result record.
                    self.status = GameStatus::Idle;
                    self.bonus = None;
                    self.timers.clear();
                }
            }
            PlayerCommand::ChangeDirection { direction } => {
                if matches!(self.status, GameStatus::Playing | GameStatus::Paused)
                    && !self.direction.is_opposite(direction)
                {
                    self.direction = direction;
                }
            }
            PlayerCommand::SetPlayerName { name } => {
                self.player_name = sanitize_name(&name);
                self.persist_local();
            }
        }
    }

    /// Reset the board for a fresh game.
    fn reset_game(&mut self, now: Instant) {
        let center = GRID_SIZE / 2;
        self.snake = (0..INITIAL_SNAKE_LENGTH as i32)
            .map(|i| Cell::new(center - i, center))
            .collect();
        self.direction = Direction::Right;
        self.pending_growth = 0;
        self.bonus = None;
        self.timers.clear();
        self.score = 0;
        self.events.clear();
        self.result = None;
        self.stats = GameStats::start(now, self.snake.len() as u32);
        self.food = Some(placement::random_free_cell(&mut self.rng, &self.snake, &[]));
    }

    /// Advance the snake one cell.
    fn step(&mut self, now: Instant) {
        let head = self.snake[0].step(self.direction);

        if !head.in_bounds() || self.hits_body(head) {
            self.finish_game(GameStatus::GameOver, now);
            return;
        }

        self.snake.push_front(head);
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.snake.pop_back();
        }
        self.note_length();

        if self.food == Some(head) {
            self.eat_food(head, now);
        } else if self.bonus.as_ref().is_some_and(|b| b.cell == head) {
            self.eat_bonus(now);
        }
    }

    /// Self-collision check for the prospective head cell. On an
    /// ordinary move the tail cell vacates this tick; with growth
    /// pending it does not, so the full body blocks.
    fn hits_body(&self, head: Cell) -> bool {
        let occupied = if self.pending_growth > 0 {
            self.snake.len()
        } else {
            self.snake.len().saturating_sub(1)
        };
        self.snake.iter().take(occupied).any(|&cell| cell == head)
    }

    fn eat_food(&mut self, at: Cell, now: Instant) {
        self.pending_growth += FOOD_GROWTH;
        self.stats.food_eaten += 1;
        self.add_score(FOOD_POINTS);
        self.note_length();
        self.events.push(GameEvent::FoodEaten { at });

        if self.victory_reached() {
            self.food = None;
            self.finish_game(GameStatus::Victory, now);
            return;
        }

        let mut exclude = Vec::new();
        if let Some(bonus) = &self.bonus {
            exclude.push(bonus.cell);
        }
        self.food = Some(placement::random_free_cell(
            &mut self.rng,
            &self.snake,
            &exclude,
        ));

        if self.bonus.is_none() && self.rng.gen::<f64>() < BONUS_CHANCE {
            self.spawn_bonus(now);
        }
    }

    fn eat_bonus(&mut self, now: Instant) {
        let Some(bonus) = self.bonus.take() else {
            return;
        };
        let points = bonus.points();
        self.timers.retain(|timer| timer.bonus_id != bonus.id);
        self.pending_growth += points;
        self.stats.bonuses_eaten += 1;
        self.add_score(points);
        self.note_length();
        self.events.push(GameEvent::BonusEaten { points });

        if self.victory_reached() {
            self.finish_game(GameStatus::Victory, now);
        }
    }

    fn spawn_bonus(&mut self, now: Instant) {
        let mut exclude = Vec::new();
        if let Some(food) = self.food {
            exclude.push(food);
        }
        let cell = placement::random_free_cell(&mut self.rng, &self.snake, &exclude);
        self.bonus_seq += 1;
        let id = self.bonus_seq;
        self.bonus = Some(Bonus {
            id,
            cell,
            phase: BonusPhase::Solid,
        });
        self.timers.push(BonusTimer {
            bonus_id: id,
            fire_at: now + Duration::from_millis(BONUS_SOLID_DURATION_MS),
            action: TimerAction::Blink,
        });
        self.events.push(GameEvent::BonusSpawned { at: cell });
    }

    /// Fire every timer whose deadline has passed. Timers run on wall
    /// time and keep counting through a pause.
    fn fire_due_timers(&mut self, now: Instant) {
        while let Some(idx) = self.timers.iter().position(|timer| timer.fire_at <= now) {
            let timer = self.timers.swap_remove(idx);
            // Stale timers for an already-removed bonus are dropped.
            if self.bonus.as_ref().map(|b| b.id) != Some(timer.bonus_id) {
                continue;
            }
            match timer.action {
                TimerAction::Blink => {
                    if let Some(bonus) = &mut self.bonus {
                        bonus.phase = BonusPhase::Blinking;
                    }
                    self.events.push(GameEvent::BonusPhaseChanged {
                        phase: BonusPhase::Blinking,
                    });
                    // Chain from the original deadline, not `now`, so a
                    // late tick does not stretch the bonus lifetime.
                    self.timers.push(BonusTimer {
                        bonus_id: timer.bonus_id,
                        fire_at: timer.fire_at + Duration::from_millis(BONUS_BLINKING_DURATION_MS),
                        action: TimerAction::Expire,
                    });
                }
                TimerAction::Expire => {
                    self.bonus = None;
                    self.events.push(GameEvent::BonusExpired);
                }
            }
        }
    }

    /// Length the snake will reach once pending growth is applied.
    fn note_length(&mut self) {
        let length = self.snake.len() as u32 + self.pending_growth;
        if length > self.stats.max_length {
            self.stats.max_length = length;
        }
    }

    fn victory_reached(&self) -> bool {
        match self.config.victory_target {
            Some(target) => self.snake.len() as u32 + self.pending_growth >= target,
            None => false,
        }
    }

    /// End the game and build its result record.
    fn finish_game(&mut self, status: GameStatus, now: Instant) {
        self.stats.freeze(now);
        self.timers.clear();
        self.bonus = None;
        self.status = status;
        self.events.push(match status {
            GameStatus::Victory => GameEvent::Victory { score: self.score },
            _ => GameEvent::GameOver { score: self.score },
        });
        self.result = Some(GameResult {
            player_name: self.player_name.clone(),
            score: self.score,
            duration: self.stats.elapsed_secs(now),
            max_length: self.stats.max_length,
            food_eaten: self.stats.food_eaten,
            bonuses_eaten: self.stats.bonuses_eaten,
        });
    }

    fn add_score(&mut self, points: u32) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.persist_local();
        }
    }

    /// Write the high score and player name through the store. Failure
    /// is logged and play continues.
    fn persist_local(&mut self) {
        let data = StoredData {
            high_score: self.high_score,
            player_name: Some(self.player_name.clone()),
        };
        if let Err(err) = self.store.save(&data) {
            log::warn!("failed to persist local data: {err}");
        }
    }

    fn build_snapshot(&mut self, now: Instant) -> GameSnapshot {
        let events = std::mem::take(&mut self.events);
        GameSnapshot {
            status: self.status,
            snake: self.snake.iter().copied().collect(),
            food: self.food,
            bonus: self.bonus.as_ref().map(|b| BonusView {
                cell: b.cell,
                phase: b.phase,
                points: b.points(),
            }),
            score: self.score,
            high_score: self.high_score,
            grid_size: GRID_SIZE,
            speed_ms: self.tick_interval().as_millis() as u64,
            stats: StatsView {
                food_eaten: self.stats.food_eaten,
                bonuses_eaten: self.stats.bonuses_eaten,
                max_length: self.stats.max_length,
                elapsed_secs: self.stats.elapsed_secs(now),
            },
            target_length: self.config.victory_target,
            events,
        }
    }
}

/// Trim, bound, and default the display name.
fn sanitize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_PLAYER_NAME.to_string();
    }
    trimmed.chars().take(MAX_PLAYER_NAME_LEN).collect()
}

#[cfg(test)]
impl GameEngine {
    /// Overwrite the board with a known snake (for tests).
    pub(crate) fn force_state(&mut self, cells: &[Cell], direction: Direction) {
        self.status = GameStatus::Playing;
        self.snake = cells.iter().copied().collect();
        self.direction = direction;
        self.pending_growth = 0;
        self.food = None;
        self.bonus = None;
        self.timers.clear();
    }

    pub(crate) fn set_food(&mut self, food: Option<Cell>) {
        self.food = food;
    }

    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    pub(crate) fn set_pending_growth(&mut self, growth: u32) {
        self.pending_growth = growth;
    }

    pub(crate) fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    /// Place a solid bonus at a known cell with its blink timer.
    pub(crate) fn spawn_bonus_at(&mut self, cell: Cell, now: Instant) {
        self.bonus_seq += 1;
        let id = self.bonus_seq;
        self.bonus = Some(Bonus {
            id,
            cell,
            phase: BonusPhase::Solid,
        });
        self.timers.push(BonusTimer {
            bonus_id: id,
            fire_at: now + Duration::from_millis(BONUS_SOLID_DURATION_MS),
            action: TimerAction::Blink,
        });
    }

    pub(crate) fn push_timer(&mut self, timer: BonusTimer) {
        self.timers.push(timer);
    }

    pub(crate) fn clear_bonus(&mut self) {
        self.bonus = None;
        self.timers.clear();
    }
}
