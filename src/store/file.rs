//! File-based credential storage.
//!
//! The persistent stand-in for the browser cookie jar and localStorage:
//! the token and the user snapshot are each stored as a JSON file in a
//! directory. The token file records its expiry and reads back as absent
//! once past it, the way a browser drops an expired cookie.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CookieConfig;
use crate::{CachedUser, GuardError, SecretString};

use super::{TokenStore, UserCache};

#[derive(Serialize, Deserialize)]
struct StoredToken {
    value: SecretString,
    expires_at: DateTime<Utc>,
}

fn ensure_dir(directory: impl Into<PathBuf>) -> Result<PathBuf, GuardError> {
    let dir = directory.into();
    std::fs::create_dir_all(&dir)
        .map_err(|e| GuardError::Storage(format!("Failed to create store directory: {e}")))?;
    Ok(dir)
}

fn remove_if_exists(path: &PathBuf) -> Result<(), GuardError> {
    if path.exists() {
        std::fs::remove_file(path)
            .map_err(|e| GuardError::Storage(format!("Failed to delete store file: {e}")))?;
    }
    Ok(())
}

/// File-based token store.
///
/// The token is kept in `{cookie_name}.json` together with the expiry
/// computed from the cookie lifetime.
pub struct FileTokenStore {
    path: PathBuf,
    config: CookieConfig,
}

impl FileTokenStore {
    /// Creates a new file token store.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(directory: impl Into<PathBuf>, config: CookieConfig) -> Result<Self, GuardError> {
        let dir = ensure_dir(directory)?;
        let path = dir.join(format!("{}.json", config.name));
        Ok(Self { path, config })
    }

    fn read_stored(&self) -> Result<Option<StoredToken>, GuardError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| GuardError::Storage(format!("Failed to read token file: {e}")))?;

        let stored: StoredToken = serde_json::from_str(&content)
            .map_err(|e| GuardError::Storage(format!("Failed to parse token file: {e}")))?;

        Ok(Some(stored))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<SecretString>, GuardError> {
        match self.read_stored()? {
            Some(stored) if stored.expires_at > Utc::now() => Ok(Some(stored.value)),
            Some(_) => {
                // expired cookie: drop it and report absence
                remove_if_exists(&self.path)?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, token: SecretString) -> Result<(), GuardError> {
        let stored = StoredToken {
            value: token,
            expires_at: self.config.expiry_from(Utc::now()),
        };

        let content = serde_json::to_string_pretty(&stored)
            .map_err(|e| GuardError::Storage(format!("Failed to serialize token: {e}")))?;

        std::fs::write(&self.path, content)
            .map_err(|e| GuardError::Storage(format!("Failed to write token file: {e}")))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), GuardError> {
        remove_if_exists(&self.path)
    }
}

/// File-based user cache.
///
/// The snapshot is kept in `{key}.json` as the same JSON the browser would
/// hold in localStorage.
pub struct FileUserCache {
    path: PathBuf,
}

impl FileUserCache {
    /// Creates a new file user cache.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(directory: impl Into<PathBuf>, key: &str) -> Result<Self, GuardError> {
        let dir = ensure_dir(directory)?;
        Ok(Self {
            path: dir.join(format!("{key}.json")),
        })
    }
}

#[async_trait]
impl UserCache for FileUserCache {
    async fn get(&self) -> Result<Option<CachedUser>, GuardError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| GuardError::Storage(format!("Failed to read user cache: {e}")))?;

        let user: CachedUser = serde_json::from_str(&content)
            .map_err(|e| GuardError::Storage(format!("Failed to parse user cache: {e}")))?;

        Ok(Some(user))
    }

    async fn set(&self, user: CachedUser) -> Result<(), GuardError> {
        let content = serde_json::to_string_pretty(&user)
            .map_err(|e| GuardError::Storage(format!("Failed to serialize user: {e}")))?;

        std::fs::write(&self.path, content)
            .map_err(|e| GuardError::Storage(format!("Failed to write user cache: {e}")))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), GuardError> {
        remove_if_exists(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_token_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path(), CookieConfig::default()).unwrap();

        assert!(store.get().await.unwrap().is_none());

        store.set(SecretString::new("tok123")).await.unwrap();
        let token = store.get().await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), "tok123");
    }

    #[tokio::test]
    async fn test_token_file_named_after_cookie() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path(), CookieConfig::default()).unwrap();

        store.set(SecretString::new("tok")).await.unwrap();
        assert!(dir.path().join("authToken.json").exists());
    }

    #[tokio::test]
    async fn test_expired_token_reads_back_as_absent() {
        let dir = TempDir::new().unwrap();
        let config = CookieConfig {
            lifetime: Duration::seconds(-1),
            ..Default::default()
        };
        let store = FileTokenStore::new(dir.path(), config).unwrap();

        store.set(SecretString::new("stale")).await.unwrap();
        assert!(store.get().await.unwrap().is_none());
        // and the file is gone, like a browser dropping the cookie
        assert!(!dir.path().join("authToken.json").exists());
    }

    #[tokio::test]
    async fn test_token_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path(), CookieConfig::default()).unwrap();

        store.set(SecretString::new("tok")).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_roundtrip() {
        let dir = TempDir::new().unwrap();
        let cache = FileUserCache::new(dir.path(), "user").unwrap();

        assert!(cache.get().await.unwrap().is_none());

        let user = CachedUser::mock_from_username("octocat");
        cache.set(user.clone()).await.unwrap();
        assert_eq!(cache.get().await.unwrap(), Some(user));

        cache.clear().await.unwrap();
        assert!(cache.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_user_cache_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let cache = FileUserCache::new(dir.path(), "user").unwrap();

        std::fs::write(dir.path().join("user.json"), "not json").unwrap();

        let err = cache.get().await.unwrap_err();
        assert!(matches!(err, GuardError::Storage(_)));
    }
}
