//! Credential store abstractions.
//!
//! The browser keeps the session token in a cookie and the user snapshot in
//! localStorage, both globally readable and writable with no coordination.
//! They are modeled here as injectable stores with explicit get/set/clear
//! operations so tests can substitute in-memory fakes.
//!
//! # Implementations
//!
//! | Store | Description |
//! |-------|-------------|
//! | [`InMemoryTokenStore`] / [`InMemoryUserCache`] | In-memory, for tests and short-lived processes |
//! | [`FileTokenStore`] / [`FileUserCache`] | JSON files on disk, honoring cookie expiry |

mod file;
mod memory;

pub use file::{FileTokenStore, FileUserCache};
pub use memory::{InMemoryTokenStore, InMemoryUserCache};

use async_trait::async_trait;

use crate::{CachedUser, GuardError, SecretString};

/// Persisted session token (the `authToken` cookie).
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Reads the current token. Returns `None` when absent or expired.
    async fn get(&self) -> Result<Option<SecretString>, GuardError>;

    /// Stores a token, replacing any existing one.
    async fn set(&self, token: SecretString) -> Result<(), GuardError>;

    /// Removes the token. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), GuardError>;
}

/// Persisted user snapshot (the `user` localStorage entry).
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Reads the cached record, if one is present.
    async fn get(&self) -> Result<Option<CachedUser>, GuardError>;

    /// Stores a record, replacing any existing one.
    async fn set(&self, user: CachedUser) -> Result<(), GuardError>;

    /// Removes the record. Clearing an empty cache is not an error.
    async fn clear(&self) -> Result<(), GuardError>;
}
