//! Owns the signed-in session and publishes [`SessionState`] changes.

use crate::{
    AuthProvider, ClientError, ClientResult, ErrorKind, Session, SessionState, SessionStore,
    SignUpOutcome,
};

use gsb_core::Identity;

use log::{debug, info, warn};
use tokio::sync::watch;

pub struct SessionManager<A> {
    provider: A,
    store: SessionStore,
    session: Option<Session>,
    state: watch::Sender<SessionState>,
}

impl<A: AuthProvider> SessionManager<A> {
    /// Create a manager in the `Loading` state; call [`Self::restore`] next.
    pub fn new(provider: A, store: SessionStore) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            provider,
            store,
            session: None,
            state,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.as_ref().map(|s| &s.identity)
    }

    /// Restore the persisted session, refreshing it when expired.
    ///
    /// Never fails: an unreadable, expired or rejected session is cleared and
    /// the manager ends up signed out. When the provider cannot be reached
    /// the persisted session is kept for the next attempt.
    pub async fn restore(&mut self) -> SessionState {
        match self.load_valid_session().await {
            Ok(Some(session)) => {
                info!("Restored session for user {}", session.identity.id);
                self.establish(session);
            }
            Ok(None) => {
                debug!("No persisted session");
                self.discard().await;
            }
            Err(e) if e.kind() == ErrorKind::TransientNetwork => {
                warn!("Could not refresh persisted session, keeping it: {e}");
                self.session = None;
                self.state.send_replace(SessionState::SignedOut);
            }
            Err(e) => {
                warn!("Failed to restore session: {e}");
                self.discard().await;
            }
        }
        self.state()
    }

    /// Refresh the current session when it is about to expire.
    ///
    /// Returns `true` when new tokens were issued. A rejected refresh signs
    /// the user out; a transient failure leaves the session in place.
    pub async fn ensure_fresh(&mut self) -> ClientResult<bool> {
        let Some(session) = self.session.as_ref() else {
            return Err(ClientError::unauthorized("No active session"));
        };
        if !session.is_expired() {
            return Ok(false);
        }

        let user_id = session.identity.id;
        let Some(refresh_token) = session.refresh_token.clone().filter(|t| !t.is_empty()) else {
            warn!("Session of user {user_id} expired without a refresh token");
            self.discard().await;
            return Err(ClientError::authentication("Session expired, please sign in again"));
        };

        match self.provider.refresh_session(&refresh_token).await {
            Ok(refreshed) => {
                info!("Refreshed session for user {user_id}");
                self.persist(&refreshed).await;
                self.establish(refreshed);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::TransientNetwork => Err(e),
            Err(e) => {
                warn!("Session refresh rejected for user {user_id}: {e}");
                self.discard().await;
                Err(e)
            }
        }
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> ClientResult<Identity> {
        let session = self.provider.sign_in_with_password(email, password).await?;
        let identity = session.identity.clone();
        self.persist(&session).await;
        self.establish(session);
        Ok(identity)
    }

    pub async fn sign_up(&mut self, email: &str, password: &str) -> ClientResult<SignUpOutcome> {
        let outcome = self.provider.sign_up(email, password).await?;
        if let SignUpOutcome::SignedIn(ref session) = outcome {
            self.persist(session).await;
            self.establish(session.clone());
        }
        Ok(outcome)
    }

    /// Sign out locally; the provider logout is best-effort.
    pub async fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.provider.sign_out(&session.access_token).await {
                warn!(
                    "Provider sign-out failed for user {}: {e}",
                    session.identity.id
                );
            }
            info!("Signed out user {}", session.identity.id);
        }
        self.discard().await;
    }

    async fn load_valid_session(&self) -> ClientResult<Option<Session>> {
        let Some(session) = self.store.load().await? else {
            return Ok(None);
        };

        if !session.is_expired() {
            return Ok(Some(session));
        }

        let Some(refresh_token) = session.refresh_token.as_deref().filter(|t| !t.is_empty()) else {
            debug!("Persisted session expired without a refresh token");
            return Ok(None);
        };

        let refreshed = self.provider.refresh_session(refresh_token).await?;
        self.store.save(&refreshed).await?;
        Ok(Some(refreshed))
    }

    /// Persisting is best-effort; the in-memory session stays valid.
    async fn persist(&self, session: &Session) {
        if let Err(e) = self.store.save(session).await {
            warn!("Failed to persist session: {e}");
        }
    }

    fn establish(&mut self, session: Session) {
        let identity = session.identity.clone();
        self.session = Some(session);
        self.state.send_replace(SessionState::SignedIn(identity));
    }

    async fn discard(&mut self) {
        self.session = None;
        if let Err(e) = self.store.clear().await {
            warn!("Failed to clear persisted session: {e}");
        }
        self.state.send_replace(SessionState::SignedOut);
    }
}
