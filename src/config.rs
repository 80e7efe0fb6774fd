//! Configuration for the session guard.
//!
//! Covers the token cookie attributes, the user-cache key and the remote
//! validation endpoint settings. `GuardConfig::default()` matches what the
//! platform front-end ships with in production; use
//! [`GuardConfig::development`] for plain-HTTP local work.

use chrono::{DateTime, Duration, Utc};

use crate::SecretString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    None,
    Lax,
    #[default]
    Strict,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::None => "None",
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
        }
    }
}

/// Attributes of the session token cookie.
///
/// The defaults mirror the production cookie: named `authToken`, valid for
/// 7 days, `Secure`, `SameSite=Strict`. The cookie is deliberately not
/// `HttpOnly` — the client has to read the token back to attach it to API
/// requests.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub lifetime: Duration,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "authToken".to_owned(),
            path: "/".to_owned(),
            domain: None,
            secure: true,
            http_only: false,
            same_site: SameSite::Strict,
            lifetime: Duration::days(7),
        }
    }
}

impl CookieConfig {
    /// Computes the expiry deadline for a cookie written at `now`.
    pub fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.lifetime
    }

    /// Renders the `Set-Cookie` attribute string for a token value.
    pub fn header_value(&self, token: &SecretString) -> String {
        let mut parts = vec![
            format!("{}={}", self.name, token.expose_secret()),
            format!("Max-Age={}", self.lifetime.num_seconds()),
            format!("Path={}", self.path),
        ];
        if let Some(domain) = &self.domain {
            parts.push(format!("Domain={domain}"));
        }
        if self.secure {
            parts.push("Secure".to_owned());
        }
        if self.http_only {
            parts.push("HttpOnly".to_owned());
        }
        parts.push(format!("SameSite={}", self.same_site.as_str()));
        parts.join("; ")
    }
}

/// Main configuration for the session guard.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Token cookie attributes.
    pub cookie: CookieConfig,

    /// Key under which the user snapshot is cached.
    ///
    /// Default: `user`
    pub user_cache_key: String,

    /// Path of the token-validation endpoint, joined onto the API base URL.
    ///
    /// Default: `/api/auth/validate-token`
    pub validate_path: String,

    /// Timeout for the validation request.
    ///
    /// Default: 10 seconds
    pub request_timeout: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cookie: CookieConfig::default(),
            user_cache_key: "user".to_owned(),
            validate_path: "/api/auth/validate-token".to_owned(),
            request_timeout: Duration::seconds(10),
        }
    }
}

impl GuardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for local development over plain HTTP.
    pub fn development() -> Self {
        Self {
            cookie: CookieConfig {
                secure: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.cookie.name.is_empty() {
            return Err("cookie name must not be empty");
        }
        if self.cookie.lifetime <= Duration::zero() {
            return Err("cookie lifetime must be positive");
        }
        if self.user_cache_key.is_empty() {
            return Err("user cache key must not be empty");
        }
        if self.request_timeout <= Duration::zero() {
            return Err("request timeout must be positive");
        }
        Ok(())
    }
}
