//! HTTP token validator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{GuardConfig, GuardError, SecretString};

use super::TokenValidator;

#[derive(Serialize)]
struct ValidateRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct ValidateResponse {
    valid: bool,
}

/// Validates tokens against the platform API.
///
/// Sends `POST {base_url}/api/auth/validate-token` with the token in the JSON
/// body and expects `{"valid": bool}` back. No retry, no backoff: a failed
/// call is reported as a [`GuardError::Transport`] and the guard treats it
/// the same as a rejection.
pub struct HttpTokenValidator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTokenValidator {
    /// Creates a validator for the given API base URL.
    pub fn new(base_url: impl Into<String>, config: &GuardConfig) -> Result<Self, GuardError> {
        let timeout = config
            .request_timeout
            .to_std()
            .map_err(|e| GuardError::Transport(format!("Invalid request timeout: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GuardError::Transport(format!("Failed to build HTTP client: {e}")))?;

        let base = base_url.into();
        let endpoint = format!("{}{}", base.trim_end_matches('/'), config.validate_path);

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TokenValidator for HttpTokenValidator {
    async fn validate(&self, token: &SecretString) -> Result<bool, GuardError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ValidateRequest {
                token: token.expose_secret(),
            })
            .send()
            .await
            .map_err(|e| GuardError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GuardError::Transport(format!(
                "validator answered {status}"
            )));
        }

        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|e| GuardError::MalformedResponse(e.to_string()))?;

        log::debug!(
            target: "gatehouse::validator",
            "msg=\"token validated\" valid={}",
            body.valid
        );

        Ok(body.valid)
    }
}
