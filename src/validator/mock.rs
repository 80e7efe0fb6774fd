#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{GuardError, SecretString};

use super::TokenValidator;

/// Scripted validator for tests.
///
/// Answers with a fixed verdict and counts how many times it was called, so
/// tests can assert that the missing-credentials branch never reaches the
/// network.
#[derive(Clone)]
pub struct MockTokenValidator {
    verdict: Arc<Mutex<Result<bool, GuardError>>>,
    calls: Arc<AtomicUsize>,
}

impl MockTokenValidator {
    /// A validator that accepts every token.
    pub fn valid() -> Self {
        Self::with_verdict(Ok(true))
    }

    /// A validator that rejects every token.
    pub fn invalid() -> Self {
        Self::with_verdict(Ok(false))
    }

    /// A validator whose calls fail with the given error.
    pub fn failing(error: GuardError) -> Self {
        Self::with_verdict(Err(error))
    }

    fn with_verdict(verdict: Result<bool, GuardError>) -> Self {
        Self {
            verdict: Arc::new(Mutex::new(verdict)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Changes the verdict for subsequent calls.
    pub fn set_verdict(&self, verdict: Result<bool, GuardError>) {
        *self.verdict.lock().unwrap() = verdict;
    }

    /// Number of validation calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenValidator for MockTokenValidator {
    async fn validate(&self, _token: &SecretString) -> Result<bool, GuardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict.lock().unwrap().clone()
    }
}
