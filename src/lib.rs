//! Client-side session layer for a social code-sharing platform front-end.
//!
//! The platform backend owns validation rules, authorization and persistence.
//! What the client owns is a pair of credential stores (a cookie-shaped token
//! store and a JSON user-record cache), one remote token-validation call, and
//! the guard that decides per protected-page mount whether the visitor is
//! authenticated and where navigation should go.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gatehouse::{Destination, GuardConfig, HttpTokenValidator, SessionGuard};
//! use gatehouse::{FileTokenStore, FileUserCache};
//!
//! let config = GuardConfig::default();
//! let tokens = FileTokenStore::new("/var/lib/myapp/session", config.cookie.clone())?;
//! let users = FileUserCache::new("/var/lib/myapp/session", &config.user_cache_key)?;
//! let validator = HttpTokenValidator::new("https://api.example.com", &config)?;
//!
//! let guard = SessionGuard::new(tokens, users, validator);
//! match guard.resolve().await.destination() {
//!     Destination::Dashboard => { /* render the page */ }
//!     Destination::Login => { /* redirect */ }
//! }
//! ```

pub mod config;
pub mod events;
pub mod guard;
pub mod secret;
pub mod store;
pub mod user;
pub mod validator;

pub use config::{CookieConfig, GuardConfig, SameSite};
pub use events::register_event_listeners;
pub use guard::{AuthState, DenyCause, Destination, Resolution, SessionGuard};
pub use secret::SecretString;
pub use store::{FileTokenStore, FileUserCache};
pub use store::{InMemoryTokenStore, InMemoryUserCache};
pub use store::{TokenStore, UserCache};
pub use user::{CachedUser, UserRole};
#[cfg(feature = "http")]
pub use validator::HttpTokenValidator;
#[cfg(any(test, feature = "mocks"))]
pub use validator::MockTokenValidator;
pub use validator::TokenValidator;

use std::fmt;

/// Errors produced by the session layer.
///
/// From the visitor's point of view every failure collapses to "not
/// authenticated, go to login"; the distinct variants exist so callers and
/// tests can tell a missing cookie from a server rejection from an outage.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardError {
    MissingCredentials,
    TokenRejected,
    Transport(String),
    MalformedResponse(String),
    Storage(String),
}

impl std::error::Error for GuardError {}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::MissingCredentials => {
                write!(f, "No session token or cached user present")
            }
            GuardError::TokenRejected => write!(f, "Server rejected the session token"),
            GuardError::Transport(msg) => write!(f, "Token validation request failed: {}", msg),
            GuardError::MalformedResponse(msg) => {
                write!(f, "Malformed validator response: {}", msg)
            }
            GuardError::Storage(msg) => write!(f, "Credential store error: {}", msg),
        }
    }
}
