//! Application state shared between an embedding frontend and the
//! game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use snake_core::commands::PlayerCommand;
use snake_core::state::GameSnapshot;
use snake_engine::engine::EngineConfig;
use snake_engine::persistence::LocalStore;

use crate::game_loop;
use crate::sink::ResultSink;

/// Commands sent from the frontend surface to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the engine.
    Player(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared application state. Send + Sync so a frontend can hold it in
/// managed state:
/// - `mpsc::Sender` wrapped in `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` for state that does not exist before `start`
/// - `Arc<Mutex<...>>` for the snapshot shared with the loop thread
pub struct AppState {
    command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    latest_snapshot: Arc<Mutex<Option<GameSnapshot>>>,
    running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the game loop thread. Fails if it is already running.
    pub fn start(
        &self,
        config: EngineConfig,
        store: Box<dyn LocalStore>,
        sink: Box<dyn ResultSink>,
    ) -> Result<(), String> {
        let mut running = self.running.lock().map_err(|e| e.to_string())?;
        if *running {
            return Err("Game loop already running".into());
        }

        let cmd_tx =
            game_loop::spawn_game_loop(config, store, sink, Arc::clone(&self.latest_snapshot));

        let mut tx_lock = self.command_tx.lock().map_err(|e| e.to_string())?;
        *tx_lock = Some(cmd_tx);
        *running = true;

        Ok(())
    }

    /// Forward a player command to the engine.
    pub fn send_command(&self, command: PlayerCommand) -> Result<(), String> {
        let tx_lock = self.command_tx.lock().map_err(|e| e.to_string())?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::Player(command))
                .map_err(|e| format!("Failed to send command: {}", e)),
            None => Err("Game loop not started".into()),
        }
    }

    /// Latest snapshot, for synchronous polling and initial state.
    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Stop the game loop thread.
    pub fn shutdown(&self) -> Result<(), String> {
        let mut tx_lock = self.command_tx.lock().map_err(|e| e.to_string())?;
        if let Some(tx) = tx_lock.take() {
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        *self.running.lock().map_err(|e| e.to_string())? = false;
        Ok(())
    }
}
