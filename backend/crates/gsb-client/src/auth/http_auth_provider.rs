use crate::{ApiClient, AuthProvider, ClientError, ClientResult, Session, SignUpOutcome};

use gsb_config::StoreConfig;
use gsb_core::Identity;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

const PASSWORD_GRANT_PATH: &str = "/auth/v1/token?grant_type=password";
const REFRESH_GRANT_PATH: &str = "/auth/v1/token?grant_type=refresh_token";
const SIGN_UP_PATH: &str = "/auth/v1/signup";
const LOGOUT_PATH: &str = "/auth/v1/logout";

/// Identity provider speaking the project's `/auth/v1` HTTP API
pub struct HttpAuthProvider {
    api: ApiClient,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserResponse,
}

#[derive(Deserialize)]
struct UserResponse {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| Utc::now().timestamp() + secs));

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            identity: Identity::new(self.user.id, self.user.email.unwrap_or_default()),
        }
    }
}

impl HttpAuthProvider {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn from_config(config: &StoreConfig) -> ClientResult<Self> {
        Ok(Self::new(ApiClient::new(config)?))
    }

    async fn token(&self, path: &str, body: &impl Serialize) -> ClientResult<Session> {
        let req = self.api.request(Method::POST, path).json(body);
        let response: TokenResponse = self.api.execute(req).await.map_err(as_authentication)?;
        Ok(response.into_session())
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> ClientResult<Session> {
        let session = self
            .token(PASSWORD_GRANT_PATH, &Credentials { email, password })
            .await?;
        info!("Signed in user {}", session.identity.id);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<SignUpOutcome> {
        let req = self
            .api
            .request(Method::POST, SIGN_UP_PATH)
            .json(&Credentials { email, password });
        let body = self.api.execute_value(req).await.map_err(as_authentication)?;

        // Without auto-confirm the provider answers with the bare user object
        if body.get("access_token").and_then(Value::as_str).is_none() {
            debug!("Sign-up for {email} awaits e-mail confirmation");
            return Ok(SignUpOutcome::ConfirmationRequired {
                email: email.to_string(),
            });
        }

        let response: TokenResponse = serde_json::from_value(body)?;
        let session = response.into_session();
        info!("Signed up user {}", session.identity.id);
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn refresh_session(&self, refresh_token: &str) -> ClientResult<Session> {
        let session = self
            .token(REFRESH_GRANT_PATH, &RefreshRequest { refresh_token })
            .await?;
        debug!("Refreshed session for user {}", session.identity.id);
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> ClientResult<()> {
        let api = self.api.clone().with_access_token(access_token);
        let req = api.request(Method::POST, LOGOUT_PATH);
        api.execute_value(req).await?;
        Ok(())
    }
}

/// Credential rejections surface as authentication failures; transport
/// errors keep their kind so callers can tell them apart.
#[track_caller]
fn as_authentication(err: ClientError) -> ClientError {
    match err {
        ClientError::Api {
            status: 400 | 401 | 403 | 422,
            message,
            ..
        }
        | ClientError::Unauthorized { message, .. } => ClientError::authentication(message),
        other => other,
    }
}
