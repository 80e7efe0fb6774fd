//! The session guard.
//!
//! Decides, once per protected-page mount, whether the current visitor is
//! authenticated, and which of the two navigation surfaces (dashboard or
//! login) the page should land on.
//!
//! The state machine is deliberately small: `{Loading, Authenticated,
//! Unauthenticated}`, with `Loading` as the initial state, resolved by a
//! single transition over the (token, cached user, validation verdict)
//! triple. See [`settle`].

mod session_guard;

pub use session_guard::SessionGuard;

use crate::{CachedUser, GuardError, SecretString};

/// Authentication state of the current visitor.
///
/// `Loading` holds only until the first [`SessionGuard::resolve`] or
/// [`SessionGuard::establish`]; every branch of resolution ends in one of
/// the other two states.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Loading,
    Authenticated(CachedUser),
    Unauthenticated,
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&CachedUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// The two navigation surfaces the guard can choose between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The authenticated dashboard.
    Dashboard,
    /// The unauthenticated landing page (login/registration).
    Login,
}

/// Why the guard denied access.
///
/// Never surfaced to the visitor; every cause lands on [`Destination::Login`]
/// with no retry and no distinction between "expired" and "server
/// unreachable". The tag exists so callers and tests can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyCause {
    /// Token or cached user absent; no remote call was made.
    MissingCredentials,
    /// The server answered `valid=false`.
    Rejected,
    /// The validation call failed: network fault, non-2xx, malformed body.
    TransportFailure,
}

impl DenyCause {
    /// Snake-case tag for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyCause::MissingCredentials => "missing_credentials",
            DenyCause::Rejected => "rejected",
            DenyCause::TransportFailure => "transport_failure",
        }
    }
}

/// Outcome of a single guard resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Authenticated { user: CachedUser },
    Denied { cause: DenyCause },
}

impl Resolution {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Resolution::Authenticated { .. })
    }

    pub fn destination(&self) -> Destination {
        match self {
            Resolution::Authenticated { .. } => Destination::Dashboard,
            Resolution::Denied { .. } => Destination::Login,
        }
    }

    pub fn cause(&self) -> Option<DenyCause> {
        match self {
            Resolution::Authenticated { .. } => None,
            Resolution::Denied { cause } => Some(*cause),
        }
    }
}

/// The single transition function over the (token, cached user, verdict)
/// triple.
///
/// `verdict` is `None` when no remote call was made; the guard only calls
/// the validator when both credentials are present, so a `None` verdict with
/// a full credential pair does not occur in practice and is treated as
/// missing credentials.
pub fn settle(
    token: Option<SecretString>,
    cached_user: Option<CachedUser>,
    verdict: Option<Result<bool, GuardError>>,
) -> Resolution {
    match (token, cached_user, verdict) {
        (Some(_), Some(user), Some(Ok(true))) => Resolution::Authenticated { user },
        (Some(_), Some(_), Some(Ok(false))) => Resolution::Denied {
            cause: DenyCause::Rejected,
        },
        (Some(_), Some(_), Some(Err(_))) => Resolution::Denied {
            cause: DenyCause::TransportFailure,
        },
        _ => Resolution::Denied {
            cause: DenyCause::MissingCredentials,
        },
    }
}
