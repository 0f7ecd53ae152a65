//! Persistence of the single active game.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex
};

use tracing::debug;

use crate::{
    error::{Error, StorageError},
    game::state::GameState
};

/// Saves and loads the active game. There is at most one saved game at a time.
pub trait Storage {
    /// Replaces the saved game with `state`.
    fn save(&self, state: &GameState) -> Result<(), StorageError>;

    /// Loads the saved game, or `None` if there is none.
    fn load(&self) -> Result<Option<GameState>, StorageError>;

    /// Deletes the saved game, if any.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Loads the saved game for a phase that needs one.
///
/// # Errors
///
/// A missing or unreadable save becomes `Error::NoActiveGame`, so callers can send the user back to the lobby.
pub fn load_active<S: Storage + ?Sized>(storage: &S) -> Result<GameState, Error> {
    match storage.load() {
        Ok(Some(state)) => Ok(state),
        Ok(None) => Err(Error::NoActiveGame),
        Err(e) => {
            tracing::warn!(error = %e, "saved game could not be read");
            Err(Error::NoActiveGame)
        }
    }
}

fn encode(state: &GameState) -> Result<String, StorageError> {
    serde_json::to_string_pretty(state).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn decode(text: &str) -> Result<GameState, StorageError> {
    serde_json::from_str(text).map_err(|e| StorageError::Corrupt(e.to_string()))
}

/// Keeps the game as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf
}

impl JsonFileStorage {
    /// Uses the file at `path`. Parent directories are created on the first save.
    pub fn new(path: impl AsRef<Path>) -> JsonFileStorage {
        JsonFileStorage { path: path.as_ref().to_path_buf() }
    }

    /// The save file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn save(&self, state: &GameState) -> Result<(), StorageError> {
        let text = encode(state)?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, text)?;
        fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), day = state.day, phase = ?state.phase, "saved game");
        Ok(())
    }

    fn load(&self) -> Result<Option<GameState>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        let state = decode(&text)?;
        debug!(path = %self.path.display(), "loaded game");
        Ok(Some(state))
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            debug!(path = %self.path.display(), "cleared saved game");
        }
        Ok(())
    }
}

/// Keeps the game in memory, serialized the same way as on disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: Mutex<Option<String>>
}

impl MemoryStorage {
    /// An empty store.
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, state: &GameState) -> Result<(), StorageError> {
        let text = encode(state)?;
        *self.saved.lock().map_err(|_| StorageError::LockPoisoned)? = Some(text);
        Ok(())
    }

    fn load(&self) -> Result<Option<GameState>, StorageError> {
        let saved = self.saved.lock().map_err(|_| StorageError::LockPoisoned)?;
        saved.as_deref().map(decode).transpose()
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.saved.lock().map_err(|_| StorageError::LockPoisoned)? = None;
        Ok(())
    }
}
