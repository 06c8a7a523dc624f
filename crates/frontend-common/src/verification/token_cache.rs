//! Time-boxed cache of the last solved token
//!
//! The gate stores `{token, created_at}` under two local storage keys and
//! trusts the entry for [`TurnstileConfig::TOKEN_TTL_MS`]. Expired or
//! malformed entries are purged when read.

use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

use crate::config::TurnstileConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,

    #[error("failed to write `{key}` to storage")]
    Write { key: String },
}

/// String key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str);
}

/// `window.localStorage`, raw strings without JSON encoding
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// `None` when storage is disabled (private mode, sandboxed frames)
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()
            .ok_or(StorageError::Unavailable)?
            .set_item(key, value)
            .map_err(|_| StorageError::Write { key: key.to_string() })
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-process storage, used off the browser
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// A token read back from the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub created_at_ms: u64,
}

/// Token cache over a [`KeyValueStore`]
#[derive(Clone, Debug)]
pub struct TokenCache<S = BrowserStorage> {
    store: S,
    ttl_ms: u64,
}

impl Default for TokenCache<BrowserStorage> {
    fn default() -> Self {
        Self::new(BrowserStorage)
    }
}

impl<S: KeyValueStore> TokenCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ttl_ms: TurnstileConfig::TOKEN_TTL_MS,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The cached token if it is younger than the TTL at `now_ms`.
    /// Anything else found under the keys is deleted.
    pub fn valid_token(&self, now_ms: u64) -> Option<CachedToken> {
        let token = self.store.get(TurnstileConfig::TOKEN_KEY);
        let created = self.store.get(TurnstileConfig::TOKEN_TIME_KEY);

        let (token, created) = match (token, created) {
            (None, None) => return None,
            (Some(token), Some(created)) => (token, created),
            _ => {
                tracing::debug!("purging incomplete cached token");
                self.clear();
                return None;
            }
        };

        if token.trim().is_empty() {
            tracing::debug!("purging empty cached token");
            self.clear();
            return None;
        }

        let Ok(created_at_ms) = created.trim().parse::<u64>() else {
            tracing::debug!(created = %created, "purging cached token with bad timestamp");
            self.clear();
            return None;
        };

        // A timestamp from the future counts as brand new
        let age = now_ms.saturating_sub(created_at_ms);
        if age < self.ttl_ms {
            Some(CachedToken {
                token,
                created_at_ms,
            })
        } else {
            tracing::debug!(age_ms = age, "cached token expired");
            self.clear();
            None
        }
    }

    /// Persist `token` as created at `now_ms`, replacing any previous entry.
    pub fn save(&self, token: &str, now_ms: u64) -> Result<(), StorageError> {
        self.store.set(TurnstileConfig::TOKEN_KEY, token)?;
        self.store
            .set(TurnstileConfig::TOKEN_TIME_KEY, &now_ms.to_string())
    }

    pub fn clear(&self) {
        self.store.remove(TurnstileConfig::TOKEN_KEY);
        self.store.remove(TurnstileConfig::TOKEN_TIME_KEY);
    }
}

/// Milliseconds since the Unix epoch from the browser clock
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}
