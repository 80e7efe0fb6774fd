//! Remote token validation.

#[cfg(feature = "http")]
mod http;
#[cfg(any(test, feature = "mocks"))]
mod mock;

#[cfg(feature = "http")]
pub use http::HttpTokenValidator;
#[cfg(any(test, feature = "mocks"))]
pub use mock::MockTokenValidator;

use async_trait::async_trait;

use crate::{GuardError, SecretString};

/// Asks the server whether a session token is still good.
///
/// The endpoint's request/response schema belongs to the backend; from the
/// guard's point of view it is a black box answering with a boolean validity
/// flag. A `false` answer and a failed call are handled identically upstream.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &SecretString) -> Result<bool, GuardError>;
}
