//! Game loop thread: drives the engine and publishes snapshots.
//!
//! The engine is created inside the thread because it's cleaner for
//! ownership. Commands arrive via `mpsc` channel; snapshots are stored
//! in shared state for synchronous polling. The loop runs at the
//! engine's current tick interval while a game is active and drops to a
//! slow poll otherwise, still pumping commands and bonus timers.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use snake_core::enums::GameStatus;
use snake_core::state::GameSnapshot;
use snake_engine::engine::{EngineConfig, GameEngine};
use snake_engine::persistence::LocalStore;

use crate::sink::ResultSink;
use crate::state::GameLoopCommand;

/// Poll interval when no game is being played.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the frontend surface to use.
pub fn spawn_game_loop(
    config: EngineConfig,
    store: Box<dyn LocalStore>,
    sink: Box<dyn ResultSink>,
    latest_snapshot: Arc<Mutex<Option<GameSnapshot>>>,
) -> mpsc::Sender<GameLoopCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("snake-game-loop".into())
        .spawn(move || {
            run_game_loop(config, store, sink, cmd_rx, &latest_snapshot);
        })
        .expect("Failed to spawn game loop thread");

    cmd_tx
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: EngineConfig,
    store: Box<dyn LocalStore>,
    sink: Box<dyn ResultSink>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameSnapshot>>,
) {
    let mut engine = GameEngine::new(config, store);
    let mut next_tick_time = Instant::now();
    log::info!("game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => {
                    log::info!("game loop shutting down");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (the engine handles pause internally)
        let snapshot = engine.tick(Instant::now());

        // 3. Hand any finished game to the result sink
        if let Some(result) = engine.take_result() {
            sink.submit(result);
        }

        // 4. Store the latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until the next tick at the score-driven interval
        let period = if engine.status() == GameStatus::Playing {
            engine.tick_interval()
        } else {
            IDLE_POLL
        };

        next_tick_time += period;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > period * 2 {
            // Too far behind; reset instead of spiraling to catch up
            next_tick_time = now;
        }
    }
}
