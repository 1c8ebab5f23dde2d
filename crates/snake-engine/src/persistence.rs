//! Local persistence for the high score and player name.
//!
//! The engine talks to a `LocalStore` trait object, so the embedding
//! chooses the backing: a JSON file in production, an in-memory store
//! in tests.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store data corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredData {
    pub high_score: u32,
    pub player_name: Option<String>,
}

/// Small key-value style store the engine persists through.
pub trait LocalStore: Send {
    fn load(&self) -> Result<StoredData, StoreError>;
    fn save(&self, data: &StoredData) -> Result<(), StoreError>;
}

/// JSON file-backed store. A missing file reads as defaults.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LocalStore for FileStore {
    fn load(&self) -> Result<StoredData, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoredData::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, data: &StoredData) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store, cloneable so a test can keep a handle to the data
/// it hands the engine.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<StoredData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> StoredData {
        self.data.lock().unwrap().clone()
    }
}

impl LocalStore for MemoryStore {
    fn load(&self) -> Result<StoredData, StoreError> {
        Ok(self.get())
    }

    fn save(&self, data: &StoredData) -> Result<(), StoreError> {
        *self.data.lock().unwrap() = data.clone();
        Ok(())
    }
}
