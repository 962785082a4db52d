//! Session token persistence
//!
//! The gateway only needs to read and drop the token (`TokenSource`); the
//! session store also writes it (`TokenStore`). Backends:
//! - `MemoryTokenStore` for tests and headless clients
//! - `FileTokenStore` for native clients that must survive restarts
//! - `LocalStorageTokenStore` for the browser (`hydrate` feature)

use std::path::PathBuf;
use std::sync::Mutex;

/// Storage key for the token in localStorage
pub const STORAGE_KEY_TOKEN: &str = "token";

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write token: {0}")]
    WriteFailed(String),
}

/// Read-and-drop access to the persisted token
pub trait TokenSource: Send + Sync {
    /// Current token, if any
    fn load(&self) -> Option<String>;

    /// Forget the token
    fn clear(&self);
}

/// Full access to the persisted token
pub trait TokenStore: TokenSource {
    fn save(&self, token: &str) -> Result<(), StorageError>;
}

fn non_empty(token: String) -> Option<String> {
    let trimmed = token.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Process-local token storage
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenSource for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
            .and_then(non_empty)
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str) -> Result<(), StorageError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }
}

/// Token kept in a single file holding the raw token string
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenSource for FileTokenStore {
    fn load(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok().and_then(non_empty)
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => leptos::logging::warn!("Failed to remove token file: {}", e),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            }
        }
        std::fs::write(&self.path, token).map_err(|e| StorageError::WriteFailed(e.to_string()))
    }
}

/// Token kept in `window.localStorage` under [`STORAGE_KEY_TOKEN`]
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageTokenStore;

#[cfg(feature = "hydrate")]
impl LocalStorageTokenStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("No window".into()))?;
        window
            .local_storage()
            .map_err(|_| StorageError::Unavailable("Failed to get localStorage".into()))?
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".into()))
    }
}

#[cfg(feature = "hydrate")]
impl TokenSource for LocalStorageTokenStore {
    fn load(&self) -> Option<String> {
        let storage = Self::storage().ok()?;
        storage
            .get_item(STORAGE_KEY_TOKEN)
            .ok()
            .flatten()
            .and_then(non_empty)
    }

    fn clear(&self) {
        if let Ok(storage) = Self::storage() {
            let _ = storage.remove_item(STORAGE_KEY_TOKEN);
        }
    }
}

#[cfg(feature = "hydrate")]
impl TokenStore for LocalStorageTokenStore {
    fn save(&self, token: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(STORAGE_KEY_TOKEN, token)
            .map_err(|_| StorageError::WriteFailed("Failed to set token".into()))
    }
}
