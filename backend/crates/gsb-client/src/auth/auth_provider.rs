use crate::{ClientResult, Session, SignUpOutcome};

use async_trait::async_trait;

/// Identity provider operations used by the session manager
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange an e-mail and password for a session
    async fn sign_in_with_password(&self, email: &str, password: &str) -> ClientResult<Session>;

    /// Register a new account. Depending on the project's settings the
    /// account is signed in immediately or has to be confirmed by e-mail.
    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<SignUpOutcome>;

    /// Obtain a fresh session from a refresh token
    async fn refresh_session(&self, refresh_token: &str) -> ClientResult<Session>;

    /// Revoke the session server-side
    async fn sign_out(&self, access_token: &str) -> ClientResult<()>;
}
