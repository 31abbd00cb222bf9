//! Durable credential storage.
//!
//! Plain key-value semantics: no validation and no network. The file store
//! plays the part of per-origin browser storage: one JSON object per API origin
//! with the token pair under [`AUTH_TOKENS_KEY`]. Other keys in the file are
//! left alone.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use super::tokens::TokenPair;

/// Well-known key the token pair is stored under.
pub const AUTH_TOKENS_KEY: &str = "authTokens";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("credential storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait CredentialStore: Send + Sync {
    /// Persist `tokens`, replacing whatever was stored.
    fn save(&self, tokens: &TokenPair) -> Result<(), StoreError>;
    /// The stored pair, or `None` if never saved or cleared.
    fn load(&self) -> Result<Option<TokenPair>, StoreError>;
    /// Remove the stored pair. Idempotent.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-process store; lives as long as the value.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<TokenPair>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            slot: Mutex::new(Some(tokens)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        *self.slot.lock() = Some(tokens.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        Ok(self.slot.lock().clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// JSON file store. Survives restarts; scoped to one file per API origin.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current key-value map. A missing file is empty; an unreadable one is
    /// logged and treated as empty so a corrupt file cannot wedge the session.
    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "credential file is not a JSON object; ignoring it");
                Ok(Map::new())
            }
        }
    }

    /// Replace the file atomically: write a sibling temp file, then rename.
    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        if map.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_vec_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&encoded)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map()?;
        map.insert(AUTH_TOKENS_KEY.to_string(), serde_json::to_value(tokens)?);
        self.write_map(&map)
    }

    fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        let _guard = self.lock.lock();
        let map = self.read_map()?;
        let Some(entry) = map.get(AUTH_TOKENS_KEY) else {
            return Ok(None);
        };
        match serde_json::from_value::<TokenPair>(entry.clone()) {
            Ok(tokens) => Ok(Some(tokens)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "stored token pair is unreadable; treating as absent");
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map()?;
        if map.remove(AUTH_TOKENS_KEY).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }
}
