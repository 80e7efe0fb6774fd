use std::sync::RwLock;

use chrono::Utc;

use crate::events::{dispatch, SessionEvent};
use crate::store::{TokenStore, UserCache};
use crate::validator::TokenValidator;
use crate::{CachedUser, GuardError, SecretString};

use super::{settle, AuthState, Destination, Resolution};

/// Gates protected-page access based on token validity.
///
/// Owns the two credential stores and the validator. One [`resolve`] call per
/// page mount: read both stores, ask the server whether the token is still
/// good, settle into [`AuthState::Authenticated`] or
/// [`AuthState::Unauthenticated`] and pick a navigation destination. Every
/// failure mode collapses to the same user-facing outcome (redirect to
/// login); the distinct cause survives only on the returned [`Resolution`].
///
/// [`resolve`]: SessionGuard::resolve
pub struct SessionGuard<T, U, V> {
    token_store: T,
    user_cache: U,
    validator: V,
    state: RwLock<AuthState>,
}

impl<T, U, V> SessionGuard<T, U, V>
where
    T: TokenStore,
    U: UserCache,
    V: TokenValidator,
{
    /// Creates a guard in the `Loading` state.
    pub fn new(token_store: T, user_cache: U, validator: V) -> Self {
        SessionGuard {
            token_store,
            user_cache,
            validator,
            state: RwLock::new(AuthState::Loading),
        }
    }

    /// Current state. `Loading` until the first [`resolve`] or
    /// [`establish`] settles it.
    ///
    /// [`resolve`]: SessionGuard::resolve
    /// [`establish`]: SessionGuard::establish
    pub fn state(&self) -> AuthState {
        self.state
            .read()
            .map(|state| state.clone())
            .unwrap_or(AuthState::Unauthenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// The hydrated user record, when authenticated.
    pub fn user(&self) -> Option<CachedUser> {
        match self.state() {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// The once-per-mount authentication check.
    ///
    /// Reads the token and the cached user. If either is absent, marks the
    /// visitor unauthenticated without any remote call. If both are present,
    /// makes exactly one validation call; a `valid=true` answer hydrates the
    /// in-memory user from the cached record, anything else (rejection,
    /// network fault, malformed response) lands on unauthenticated. Every
    /// deny path leaves both stores cleared so the next mount starts from a
    /// consistent empty pair.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "guard_resolve", skip_all)
    )]
    pub async fn resolve(&self) -> Resolution {
        // store read failures count as absent credentials
        let token = self.token_store.get().await.ok().flatten();
        let cached_user = self.user_cache.get().await.ok().flatten();

        let verdict = match (&token, &cached_user) {
            (Some(token), Some(_)) => Some(self.validator.validate(token).await),
            _ => None,
        };

        let resolution = settle(token, cached_user, verdict);

        match &resolution {
            Resolution::Authenticated { user } => {
                self.set_state(AuthState::Authenticated(user.clone()));
                dispatch(SessionEvent::GuardPassed {
                    user_id: user.id,
                    at: Utc::now(),
                })
                .await;
                log::debug!(
                    target: "gatehouse",
                    "msg=\"guard passed\" user_id={}",
                    user.id
                );
            }
            Resolution::Denied { cause } => {
                self.clear_stores().await;
                self.set_state(AuthState::Unauthenticated);
                dispatch(SessionEvent::GuardRejected {
                    cause: *cause,
                    at: Utc::now(),
                })
                .await;
                log::info!(
                    target: "gatehouse",
                    "msg=\"guard rejected\" cause={}",
                    cause.as_str()
                );
            }
        }

        resolution
    }

    /// Persists a fresh session.
    ///
    /// The login/registration write path: the token and the user snapshot
    /// are written together so the next mount sees a co-extensive pair.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "guard_establish", skip_all, err)
    )]
    pub async fn establish(&self, token: SecretString, user: CachedUser) -> Result<(), GuardError> {
        self.token_store.set(token).await?;
        self.user_cache.set(user.clone()).await?;
        self.set_state(AuthState::Authenticated(user.clone()));

        dispatch(SessionEvent::SessionEstablished {
            user_id: user.id,
            at: Utc::now(),
        })
        .await;
        log::info!(
            target: "gatehouse",
            "msg=\"session established\" user_id={}",
            user.id
        );

        Ok(())
    }

    /// Clears both stores and the in-memory state. Idempotent.
    ///
    /// Always navigates to the login surface.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "guard_logout", skip_all, err)
    )]
    pub async fn logout(&self) -> Result<Destination, GuardError> {
        self.token_store.clear().await?;
        self.user_cache.clear().await?;
        self.set_state(AuthState::Unauthenticated);

        dispatch(SessionEvent::LoggedOut { at: Utc::now() }).await;
        log::info!(target: "gatehouse", "msg=\"logout success\"");

        Ok(Destination::Login)
    }

    async fn clear_stores(&self) {
        // a failed clear must not block settling into Unauthenticated
        if let Err(e) = self.token_store.clear().await {
            log::warn!(
                target: "gatehouse",
                "msg=\"failed to clear token store\" error=\"{}\"",
                e
            );
        }
        if let Err(e) = self.user_cache.clear().await {
            log::warn!(
                target: "gatehouse",
                "msg=\"failed to clear user cache\" error=\"{}\"",
                e
            );
        }
    }

    fn set_state(&self, next: AuthState) {
        if let Ok(mut state) = self.state.write() {
            *state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryTokenStore, InMemoryUserCache};
    use crate::validator::MockTokenValidator;
    use crate::{DenyCause, SecretString};

    fn guard_with(
        token: Option<&str>,
        user: Option<CachedUser>,
        validator: MockTokenValidator,
    ) -> SessionGuard<InMemoryTokenStore, InMemoryUserCache, MockTokenValidator> {
        let token_store = match token {
            Some(t) => InMemoryTokenStore::with_token(t),
            None => InMemoryTokenStore::new(),
        };
        let user_cache = match user {
            Some(u) => InMemoryUserCache::with_user(u),
            None => InMemoryUserCache::new(),
        };
        SessionGuard::new(token_store, user_cache, validator)
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let guard = guard_with(None, None, MockTokenValidator::valid());
        assert!(guard.is_loading());
        assert!(!guard.is_authenticated());
        assert!(guard.user().is_none());
    }

    #[tokio::test]
    async fn test_resolve_without_credentials_skips_network() {
        let validator = MockTokenValidator::valid();
        let guard = guard_with(None, None, validator.clone());

        let resolution = guard.resolve().await;

        assert_eq!(resolution.cause(), Some(DenyCause::MissingCredentials));
        assert_eq!(validator.call_count(), 0);
        assert!(!guard.is_loading());
        assert!(!guard.is_authenticated());
    }

    #[tokio::test]
    async fn test_resolve_valid_token_hydrates_cached_user() {
        let user = CachedUser::mock_from_username("octocat");
        let guard = guard_with(Some("tok"), Some(user.clone()), MockTokenValidator::valid());

        let resolution = guard.resolve().await;

        assert!(resolution.is_authenticated());
        assert_eq!(resolution.destination(), Destination::Dashboard);
        assert_eq!(guard.user(), Some(user));
        assert!(!guard.is_loading());
    }

    #[tokio::test]
    async fn test_resolve_rejected_token_clears_stores() {
        let token_store = InMemoryTokenStore::with_token("tok");
        let user_cache = InMemoryUserCache::with_user(CachedUser::mock());
        let guard = SessionGuard::new(
            token_store.clone(),
            user_cache.clone(),
            MockTokenValidator::invalid(),
        );

        let resolution = guard.resolve().await;

        assert_eq!(resolution.cause(), Some(DenyCause::Rejected));
        assert!(token_store.get().await.unwrap().is_none());
        assert!(user_cache.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resolve_transport_failure_behaves_like_rejection() {
        let token_store = InMemoryTokenStore::with_token("tok");
        let user_cache = InMemoryUserCache::with_user(CachedUser::mock());
        let validator = MockTokenValidator::failing(GuardError::Transport("down".to_owned()));
        let guard = SessionGuard::new(token_store.clone(), user_cache.clone(), validator);

        let resolution = guard.resolve().await;

        assert_eq!(resolution.cause(), Some(DenyCause::TransportFailure));
        assert_eq!(resolution.destination(), Destination::Login);
        assert!(token_store.get().await.unwrap().is_none());
        assert!(user_cache.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resolve_half_present_pair_is_reconciled() {
        // token but no cached user
        let token_store = InMemoryTokenStore::with_token("tok");
        let user_cache = InMemoryUserCache::new();
        let validator = MockTokenValidator::valid();
        let guard = SessionGuard::new(token_store.clone(), user_cache, validator.clone());

        let resolution = guard.resolve().await;

        assert_eq!(resolution.cause(), Some(DenyCause::MissingCredentials));
        assert_eq!(validator.call_count(), 0);
        // the stale token is cleared, restoring the co-extensive invariant
        assert!(token_store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_establish_writes_both_stores() {
        let token_store = InMemoryTokenStore::new();
        let user_cache = InMemoryUserCache::new();
        let guard = SessionGuard::new(
            token_store.clone(),
            user_cache.clone(),
            MockTokenValidator::valid(),
        );

        let user = CachedUser::mock_from_username("octocat");
        guard
            .establish(SecretString::new("fresh-token"), user.clone())
            .await
            .unwrap();

        assert!(guard.is_authenticated());
        assert_eq!(guard.user(), Some(user.clone()));
        let stored = token_store.get().await.unwrap().unwrap();
        assert_eq!(stored.expose_secret(), "fresh-token");
        assert_eq!(user_cache.get().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_logout_clears_everything_idempotently() {
        let token_store = InMemoryTokenStore::with_token("tok");
        let user_cache = InMemoryUserCache::with_user(CachedUser::mock());
        let guard = SessionGuard::new(
            token_store.clone(),
            user_cache.clone(),
            MockTokenValidator::valid(),
        );
        guard.resolve().await;
        assert!(guard.is_authenticated());

        let destination = guard.logout().await.unwrap();
        assert_eq!(destination, Destination::Login);
        assert!(!guard.is_authenticated());
        assert!(guard.user().is_none());
        assert!(token_store.get().await.unwrap().is_none());
        assert!(user_cache.get().await.unwrap().is_none());

        // second logout produces the same end state
        let destination = guard.logout().await.unwrap();
        assert_eq!(destination, Destination::Login);
        assert!(!guard.is_authenticated());
    }

    #[tokio::test]
    async fn test_loading_resolves_on_every_branch() {
        for validator in [
            MockTokenValidator::valid(),
            MockTokenValidator::invalid(),
            MockTokenValidator::failing(GuardError::Transport("down".to_owned())),
        ] {
            let guard = guard_with(Some("tok"), Some(CachedUser::mock()), validator);
            assert!(guard.is_loading());
            guard.resolve().await;
            assert!(!guard.is_loading());
        }

        let guard = guard_with(None, None, MockTokenValidator::valid());
        assert!(guard.is_loading());
        guard.resolve().await;
        assert!(!guard.is_loading());
    }
}
