//! Persisted active-session identifier
//!
//! The client keeps exactly one piece of state between runs: the identifier
//! of the game it is playing. No stored identifier means "no active game",
//! and front ends offer to create one.
//!
//! # File Location
//!
//! [`FileSessionStore`] writes `session.json` into the user's configuration
//! directory (e.g. `~/.config/shogi-client/session.json`), falling back to the
//! working directory when no config directory can be resolved.
//!
//! # Error Handling
//!
//! Both load and save report errors to the caller; the remote session treats
//! them as non-fatal:
//! - Load failures fall back to "no active game"
//! - Save failures are logged but don't interrupt play

use crate::core::error::StoreResult;
use crate::game::session::SessionId;
use directories::ProjectDirs;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Session filename
const SESSION_FILENAME: &str = "session.json";

/// Where the active game identifier lives between runs
pub trait SessionStore: Send + Sync {
    fn load(&self) -> StoreResult<Option<SessionId>>;
    fn save(&self, id: &SessionId) -> StoreResult<()>;
    fn clear(&self) -> StoreResult<()>;
}

/// On-disk shape of the session file
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    game_uid: SessionId,
}

/// Stores the identifier as JSON in a single file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSessionStore { path: path.into() }
    }

    /// Store inside `dir`, or inside the user's config directory
    pub fn in_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => FileSessionStore::new(dir.join(SESSION_FILENAME)),
            None => FileSessionStore::new(default_session_path()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Helper to resolve the session file path
///
/// Falls back to local "session.json" if the system config dir cannot be found.
fn default_session_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "shogi", "shogi-client") {
        proj_dirs.config_dir().join(SESSION_FILENAME)
    } else {
        PathBuf::from(SESSION_FILENAME)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> StoreResult<Option<SessionId>> {
        if !self.path.exists() {
            tracing::debug!("[STORE] No session file at {:?}", self.path);
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let persisted: PersistedSession = serde_json::from_str(&contents)?;
        tracing::debug!("[STORE] Loaded session {} from {:?}", persisted.game_uid, self.path);
        Ok(Some(persisted.game_uid))
    }

    fn save(&self, id: &SessionId) -> StoreResult<()> {
        // Ensure the directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&PersistedSession {
            game_uid: id.clone(),
        })?;
        fs::write(&self.path, json)?;
        tracing::debug!("[STORE] Saved session {} to {:?}", id, self.path);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store for tests and embedders without a filesystem
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<SessionId>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore::default()
    }

    pub fn with_session(id: impl Into<SessionId>) -> Self {
        MemorySessionStore {
            slot: Mutex::new(Some(id.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> StoreResult<Option<SessionId>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, id: &SessionId) -> StoreResult<()> {
        *self.slot.lock() = Some(id.clone());
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}
