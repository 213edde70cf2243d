//! Token persistence between sessions.
//!
//! Only the bearer token is persisted. Implementations must be cheap and
//! synchronous: boot phase 1 reads the token before the first render.

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persistent home of the bearer token.
pub trait TokenStore: Send + Sync {
    /// The persisted token, or `None` if there is none.
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, token: &str) -> Result<(), StorageError>;
    /// Remove the persisted token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

// ── Memory ───────────────────────────────────────────────────────────────────

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, StorageError> {
        self.token
            .lock()
            .map_err(|_| StorageError::Unavailable("token mutex poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.slot()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot()? = None;
        Ok(())
    }
}

// ── File ─────────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// JSON file store: `{ "token": "..." }`. A missing file means no token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let file: TokenFile = serde_json::from_str(&raw)?;
        Ok(Some(file.token))
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string(&TokenFile {
            token: token.to_string(),
        })?;
        std::fs::write(&self.path, body)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Browser localStorage ─────────────────────────────────────────────────────

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use local::LocalStorageTokenStore;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod local {
    use super::TokenStore;
    use crate::error::StorageError;

    const KEY: &str = "token";

    /// Browser `localStorage`, key `token`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocalStorageTokenStore;

    impl LocalStorageTokenStore {
        pub fn new() -> Self {
            Self
        }

        fn storage(&self) -> Result<web_sys::Storage, StorageError> {
            web_sys::window()
                .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?
                .local_storage()
                .ok()
                .flatten()
                .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
        }
    }

    impl TokenStore for LocalStorageTokenStore {
        fn load(&self) -> Result<Option<String>, StorageError> {
            self.storage()?
                .get_item(KEY)
                .map_err(|_| StorageError::Unavailable("localStorage read failed".to_string()))
        }

        fn save(&self, token: &str) -> Result<(), StorageError> {
            self.storage()?
                .set_item(KEY, token)
                .map_err(|_| StorageError::Unavailable("localStorage write failed".to_string()))
        }

        fn clear(&self) -> Result<(), StorageError> {
            self.storage()?
                .remove_item(KEY)
                .map_err(|_| StorageError::Unavailable("localStorage remove failed".to_string()))
        }
    }
}
