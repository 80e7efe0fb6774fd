//! In-memory credential storage.
//!
//! Suitable for tests and short-lived processes. State is lost on restart.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::{CachedUser, GuardError, SecretString};

use super::{TokenStore, UserCache};

fn poisoned() -> GuardError {
    GuardError::Storage("Lock poisoned".to_owned())
}

/// In-memory token store.
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<RwLock<Option<SecretString>>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding a token.
    pub fn with_token(token: impl Into<SecretString>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self) -> Result<Option<SecretString>, GuardError> {
        Ok(self.token.read().map_err(|_| poisoned())?.clone())
    }

    async fn set(&self, token: SecretString) -> Result<(), GuardError> {
        *self.token.write().map_err(|_| poisoned())? = Some(token);
        Ok(())
    }

    async fn clear(&self) -> Result<(), GuardError> {
        *self.token.write().map_err(|_| poisoned())? = None;
        Ok(())
    }
}

/// In-memory user cache.
#[derive(Clone, Default)]
pub struct InMemoryUserCache {
    user: Arc<RwLock<Option<CachedUser>>>,
}

impl InMemoryUserCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache already holding a record.
    pub fn with_user(user: CachedUser) -> Self {
        Self {
            user: Arc::new(RwLock::new(Some(user))),
        }
    }
}

#[async_trait]
impl UserCache for InMemoryUserCache {
    async fn get(&self) -> Result<Option<CachedUser>, GuardError> {
        Ok(self.user.read().map_err(|_| poisoned())?.clone())
    }

    async fn set(&self, user: CachedUser) -> Result<(), GuardError> {
        *self.user.write().map_err(|_| poisoned())? = Some(user);
        Ok(())
    }

    async fn clear(&self) -> Result<(), GuardError> {
        *self.user.write().map_err(|_| poisoned())? = None;
        Ok(())
    }
}
