//! Engine tests. Deterministic: fixed seeds, caller-supplied instants.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use snake_core::commands::PlayerCommand;
use snake_core::constants::{
    DEFAULT_PLAYER_NAME, GRID_SIZE, INITIAL_SPEED_MS, MAX_PLAYER_NAME_LEN, MIN_SPEED_MS,
};
use snake_core::enums::{BonusPhase, GameStatus};
use snake_core::events::GameEvent;
use snake_core::types::{Cell, Direction};

use crate::bonus::{BonusTimer, TimerAction};
use crate::engine::{EngineConfig, GameEngine};
use crate::persistence::MemoryStore;
use crate::placement;

fn new_engine(seed: u64) -> GameEngine {
    GameEngine::new(
        EngineConfig {
            seed,
            ..Default::default()
        },
        Box::new(MemoryStore::new()),
    )
}

/// Queue StartGame and run the transition tick.
fn start(engine: &mut GameEngine, now: Instant) {
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick(now);
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn starting_resets_the_board() {
    let mut engine = new_engine(1);
    let t0 = Instant::now();
    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick(t0);

    assert_eq!(snap.status, GameStatus::Playing);
    // Centered, heading right, and the start tick itself does not step.
    assert_eq!(
        snap.snake,
        vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]
    );
    let food = snap.food.unwrap();
    assert!(food.in_bounds());
    assert!(!snap.snake.contains(&food));
    assert_eq!(snap.score, 0);
    assert_eq!(snap.speed_ms, INITIAL_SPEED_MS);
    assert_eq!(snap.grid_size, GRID_SIZE);
    assert!(snap.bonus.is_none());
}

#[test]
fn identical_seeds_produce_identical_runs() {
    let t0 = Instant::now();
    let run = |seed: u64| -> Vec<String> {
        let mut engine = new_engine(seed);
        engine.queue_command(PlayerCommand::StartGame);
        let mut snapshots = Vec::new();
        for i in 0..40u64 {
            if i == 5 {
                engine.queue_command(PlayerCommand::ChangeDirection {
                    direction: Direction::Down,
                });
            }
            if i == 12 {
                engine.queue_command(PlayerCommand::ChangeDirection {
                    direction: Direction::Left,
                });
            }
            let snap = engine.tick(t0 + ms(i * 150));
            snapshots.push(serde_json::to_string(&snap).unwrap());
        }
        snapshots
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn commands_are_gated_by_status() {
    let mut engine = new_engine(2);
    let t0 = Instant::now();

    // Nothing to steer or pause on the menu.
    engine.queue_command(PlayerCommand::ChangeDirection {
        direction: Direction::Up,
    });
    engine.queue_command(PlayerCommand::TogglePause);
    let snap = engine.tick(t0);
    assert_eq!(snap.status, GameStatus::Idle);
    assert!(snap.snake.is_empty());

    // StartGame mid-game does not reset.
    start(&mut engine, t0 + ms(150));
    engine.set_food(None);
    engine.set_score(7);
    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick(t0 + ms(300));
    assert_eq!(snap.score, 7);
}

#[test]
fn pause_freezes_the_snake() {
    let mut engine = new_engine(3);
    let t0 = Instant::now();
    start(&mut engine, t0);

    let before = engine.tick(t0 + ms(150)).snake;

    engine.queue_command(PlayerCommand::TogglePause);
    let snap = engine.tick(t0 + ms(300));
    assert_eq!(snap.status, GameStatus::Paused);
    assert_eq!(snap.snake, before);
    let snap = engine.tick(t0 + ms(450));
    assert_eq!(snap.snake, before);

    // The resume tick itself does not step either.
    engine.queue_command(PlayerCommand::TogglePause);
    let snap = engine.tick(t0 + ms(600));
    assert_eq!(snap.status, GameStatus::Playing);
    assert_eq!(snap.snake, before);
    let snap = engine.tick(t0 + ms(750));
    assert_ne!(snap.snake, before);
}

#[test]
fn hitting_the_wall_ends_the_game() {
    let mut engine = new_engine(4);
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.force_state(
        &[Cell::new(GRID_SIZE - 1, 10), Cell::new(GRID_SIZE - 2, 10)],
        Direction::Right,
    );

    let snap = engine.tick(t0 + ms(150));
    assert_eq!(snap.status, GameStatus::GameOver);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::GameOver { .. })));

    let result = engine.take_result().unwrap();
    assert_eq!(result.player_name, DEFAULT_PLAYER_NAME);
    // Consumed exactly once.
    assert!(engine.take_result().is_none());

    // Terminal until restarted.
    let snap = engine.tick(t0 + ms(300));
    assert_eq!(snap.status, GameStatus::GameOver);
}

#[test]
fn u_turn_into_the_body_ends_the_game() {
    let mut engine = new_engine(5);
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.force_state(
        &[
            Cell::new(5, 5),
            Cell::new(4, 5),
            Cell::new(3, 5),
            Cell::new(2, 5),
            Cell::new(1, 5),
        ],
        Direction::Right,
    );

    engine.queue_command(PlayerCommand::ChangeDirection {
        direction: Direction::Down,
    });
    engine.tick(t0 + ms(150));
    engine.queue_command(PlayerCommand::ChangeDirection {
        direction: Direction::Left,
    });
    engine.tick(t0 + ms(300));
    engine.queue_command(PlayerCommand::ChangeDirection {
        direction: Direction::Up,
    });
    let snap = engine.tick(t0 + ms(450));
    assert_eq!(snap.status, GameStatus::GameOver);
}

#[test]
fn moving_into_the_vacated_tail_cell_is_safe() {
    let mut engine = new_engine(6);
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.force_state(
        &[
            Cell::new(4, 6),
            Cell::new(5, 6),
            Cell::new(5, 5),
            Cell::new(4, 5),
        ],
        Direction::Up,
    );

    let snap = engine.tick(t0 + ms(150));
    assert_eq!(snap.status, GameStatus::Playing);
    assert_eq!(snap.snake[0], Cell::new(4, 5));
}

#[test]
fn pending_growth_keeps_the_tail_solid() {
    let mut engine = new_engine(6);
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.force_state(
        &[
            Cell::new(4, 6),
            Cell::new(5, 6),
            Cell::new(5, 5),
            Cell::new(4, 5),
        ],
        Direction::Up,
    );
    engine.set_pending_growth(1);

    let snap = engine.tick(t0 + ms(150));
    assert_eq!(snap.status, GameStatus::GameOver);
}

#[test]
fn eating_food_scores_and_grows_over_the_next_tick() {
    let mut engine = new_engine(7);
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.set_food(Some(Cell::new(11, 10)));

    let snap = engine.tick(t0 + ms(150));
    assert_eq!(snap.score, 1);
    assert_eq!(snap.snake.len(), 3);
    assert_eq!(engine.pending_growth(), 1);
    assert_eq!(snap.stats.food_eaten, 1);
    assert_eq!(snap.stats.max_length, 4);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::FoodEaten { .. })));
    // Food respawned somewhere off the snake.
    let food = snap.food.unwrap();
    assert!(!snap.snake.contains(&food));

    engine.set_food(None);
    engine.clear_bonus();
    let snap = engine.tick(t0 + ms(300));
    assert_eq!(snap.snake.len(), 4);
    assert_eq!(engine.pending_growth(), 0);
}

#[test]
fn reversal_is_ignored_even_mid_queue() {
    let mut engine = new_engine(8);
    let t0 = Instant::now();
    start(&mut engine, t0);

    // Up applies, the immediately queued Down would reverse it.
    engine.queue_command(PlayerCommand::ChangeDirection {
        direction: Direction::Up,
    });
    engine.queue_command(PlayerCommand::ChangeDirection {
        direction: Direction::Down,
    });
    let snap = engine.tick(t0 + ms(150));
    assert_eq!(snap.snake[0], Cell::new(10, 9));

    engine.queue_command(PlayerCommand::ChangeDirection {
        direction: Direction::Down,
    });
    let snap = engine.tick(t0 + ms(300));
    assert_eq!(snap.snake[0], Cell::new(10, 8));
}

#[test]
fn speed_scales_with_score_down_to_the_floor() {
    let mut engine = new_engine(9);
    let t0 = Instant::now();
    start(&mut engine, t0);

    assert_eq!(engine.tick_interval(), ms(150));
    engine.set_score(4);
    assert_eq!(engine.tick_interval(), ms(150));
    engine.set_score(5);
    assert_eq!(engine.tick_interval(), ms(145));
    engine.set_score(25);
    assert_eq!(engine.tick_interval(), ms(125));
    engine.set_score(500);
    assert_eq!(engine.tick_interval(), ms(MIN_SPEED_MS));
}

#[test]
fn bonus_blinks_then_expires() {
    let mut engine = new_engine(10);
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.set_food(None);
    engine.spawn_bonus_at(Cell::new(0, 0), t0);

    let snap = engine.tick(t0 + ms(150));
    let bonus = snap.bonus.unwrap();
    assert_eq!(bonus.phase, BonusPhase::Solid);
    assert_eq!(bonus.points, 5);

    let snap = engine.tick(t0 + ms(5001));
    let bonus = snap.bonus.unwrap();
    assert_eq!(bonus.phase, BonusPhase::Blinking);
    assert_eq!(bonus.points, 3);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::BonusPhaseChanged { .. })));

    let snap = engine.tick(t0 + ms(10_002));
    assert!(snap.bonus.is_none());
    assert!(snap.events.iter().any(|e| matches!(e, GameEvent::BonusExpired)));
}

#[test]
fn eating_a_solid_bonus_awards_five_and_cancels_timers() {
    let mut engine = new_engine(11);
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.set_food(None);
    engine.spawn_bonus_at(Cell::new(11, 10), t0);

    let snap = engine.tick(t0 + ms(150));
    assert_eq!(snap.score, 5);
    assert_eq!(engine.pending_growth(), 5);
    assert!(snap.bonus.is_none());
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::BonusEaten { points: 5 })));

    // The orphaned blink timer must not fire later.
    let snap = engine.tick(t0 + ms(6000));
    assert!(snap.bonus.is_none());
    assert!(snap.events.is_empty());
}

#[test]
fn eating_a_blinking_bonus_awards_three() {
    let mut engine = new_engine(18);
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.set_food(None);
    engine.spawn_bonus_at(Cell::new(12, 10), t0);

    engine.tick(t0 + ms(150));
    // The blink timer fires before the step that reaches the bonus.
    let snap = engine.tick(t0 + ms(5001));
    assert_eq!(snap.snake[0], Cell::new(12, 10));
    assert_eq!(snap.score, 3);
    assert_eq!(engine.pending_growth(), 3);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::BonusEaten { points: 3 })));
}

#[test]
fn timers_for_a_replaced_bonus_are_ignored() {
    let mut engine = new_engine(12);
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.set_food(None);
    engine.spawn_bonus_at(Cell::new(0, 0), t0);
    engine.push_timer(BonusTimer {
        bonus_id: 999,
        fire_at: t0,
        action: TimerAction::Expire,
    });

    let snap = engine.tick(t0 + ms(150));
    assert!(snap.bonus.is_some());
}

#[test]
fn bonus_timers_keep_running_while_paused() {
    let mut engine = new_engine(13);
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.set_food(None);
    engine.spawn_bonus_at(Cell::new(0, 0), t0);

    engine.queue_command(PlayerCommand::TogglePause);
    engine.tick(t0 + ms(150));
    let snap = engine.tick(t0 + ms(5001));
    assert_eq!(snap.status, GameStatus::Paused);
    assert_eq!(snap.bonus.unwrap().phase, BonusPhase::Blinking);
}

#[test]
fn reaching_the_target_length_wins() {
    let mut engine = GameEngine::new(
        EngineConfig {
            seed: 14,
            victory_target: Some(4),
        },
        Box::new(MemoryStore::new()),
    );
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.set_food(Some(Cell::new(11, 10)));

    let snap = engine.tick(t0 + ms(150));
    assert_eq!(snap.status, GameStatus::Victory);
    assert_eq!(snap.target_length, Some(4));
    assert!(snap.food.is_none());
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::Victory { .. })));

    let result = engine.take_result().unwrap();
    assert_eq!(result.score, 1);
    assert_eq!(result.max_length, 4);
}

#[test]
fn a_bonus_can_complete_the_target_length() {
    let mut engine = GameEngine::new(
        EngineConfig {
            seed: 15,
            victory_target: Some(8),
        },
        Box::new(MemoryStore::new()),
    );
    let t0 = Instant::now();
    start(&mut engine, t0);
    engine.set_food(None);
    engine.spawn_bonus_at(Cell::new(11, 10), t0);

    // 3 cells + 5 pending segments reaches the target of 8.
    let snap = engine.tick(t0 + ms(150));
    assert_eq!(snap.status, GameStatus::Victory);
    let result = engine.take_result().unwrap();
    assert_eq!(result.max_length, 8);
    assert_eq!(result.bonuses_eaten, 1);
}

#[test]
fn abandoning_a_game_produces_no_result() {
    let mut engine = new_engine(16);
    let t0 = Instant::now();
    start(&mut engine, t0);

    engine.queue_command(PlayerCommand::GoToMenu);
    let snap = engine.tick(t0 + ms(150));
    assert_eq!(snap.status, GameStatus::Idle);
    assert!(engine.take_result().is_none());
}

#[test]
fn high_score_survives_engine_restarts() {
    let store = MemoryStore::new();
    let t0 = Instant::now();

    let mut engine = GameEngine::new(
        EngineConfig {
            seed: 17,
            ..Default::default()
        },
        Box::new(store.clone()),
    );
    start(&mut engine, t0);
    engine.set_food(Some(Cell::new(11, 10)));
    engine.tick(t0 + ms(150));
    assert_eq!(store.get().high_score, 1);

    let engine = GameEngine::new(
        EngineConfig {
            seed: 17,
            ..Default::default()
        },
        Box::new(store.clone()),
    );
    assert_eq!(engine.high_score(), 1);
}

#[test]
fn player_names_are_trimmed_and_bounded() {
    let store = MemoryStore::new();
    let mut engine = GameEngine::new(EngineConfig::default(), Box::new(store.clone()));
    let t0 = Instant::now();

    engine.queue_command(PlayerCommand::SetPlayerName { name: "   ".into() });
    engine.tick(t0);
    assert_eq!(engine.player_name(), DEFAULT_PLAYER_NAME);

    engine.queue_command(PlayerCommand::SetPlayerName {
        name: format!("  {}  ", "x".repeat(80)),
    });
    engine.tick(t0 + ms(10));
    assert_eq!(engine.player_name().chars().count(), MAX_PLAYER_NAME_LEN);
    assert_eq!(
        store.get().player_name.as_deref(),
        Some(engine.player_name())
    );
}

#[test]
fn placement_avoids_occupied_cells() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let snake: VecDeque<Cell> = (0..GRID_SIZE).map(|x| Cell::new(x, 0)).collect();
    for _ in 0..200 {
        let cell = placement::random_free_cell(&mut rng, &snake, &[Cell::new(0, 1)]);
        assert!(cell.in_bounds());
        assert!(!snake.contains(&cell));
        assert_ne!(cell, Cell::new(0, 1));
    }
}

#[test]
fn placement_terminates_on_a_full_grid() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let snake: VecDeque<Cell> = (0..GRID_SIZE)
        .flat_map(|x| (0..GRID_SIZE).map(move |y| Cell::new(x, y)))
        .collect();
    let cell = placement::random_free_cell(&mut rng, &snake, &[]);
    assert!(cell.in_bounds());
}
