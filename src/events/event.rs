use chrono::{DateTime, Utc};

use crate::guard::DenyCause;

/// Session lifecycle events emitted by the guard.
///
/// Events are always fired. If no listeners are registered, they are
/// silently ignored (no-op). Register listeners via
/// [`register_event_listeners`](crate::register_event_listeners).
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A fresh session was persisted after login/registration.
    SessionEstablished {
        user_id: i64,
        at: DateTime<Utc>,
    },

    /// The guard resolved to authenticated on a page mount.
    GuardPassed {
        user_id: i64,
        at: DateTime<Utc>,
    },

    /// The guard denied access and redirected to the login surface.
    GuardRejected {
        cause: DenyCause,
        at: DateTime<Utc>,
    },

    LoggedOut {
        at: DateTime<Utc>,
    },
}

impl SessionEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SessionEstablished { .. } => "session.established",
            Self::GuardPassed { .. } => "session.guard.passed",
            Self::GuardRejected { .. } => "session.guard.rejected",
            Self::LoggedOut { .. } => "session.logout",
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::SessionEstablished { at, .. }
            | Self::GuardPassed { at, .. }
            | Self::GuardRejected { at, .. }
            | Self::LoggedOut { at, .. } => *at,
        }
    }
}
