use crate::{ClientError, ClientResult};

use gsb_config::StoreConfig;

use std::panic::Location;

use error_location::ErrorLocation;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Postgres error code raised when a row-level policy rejects a statement
const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// HTTP client for the backend project (REST and auth endpoints)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    client: ReqwestClient,
}

impl ApiClient {
    /// Create a client from the store section of the configuration.
    pub fn new(config: &StoreConfig) -> ClientResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            anon_key: config.anon_key.clone(),
            access_token: None,
            client,
        })
    }

    /// Act on behalf of a signed-in user
    pub fn with_access_token(mut self, access_token: &str) -> Self {
        self.access_token = Some(access_token.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Build a request carrying the project key and the bearer token.
    ///
    /// Without a user token the anon key doubles as the bearer, which is what
    /// the auth endpoints expect.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);

        self.client
            .request(method, &url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Send a request and decode a JSON body into `T`.
    pub async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let body = self.execute_value(req).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Send a request; an empty success body decodes as `Value::Null`.
    pub async fn execute_value(&self, req: RequestBuilder) -> ClientResult<Value> {
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Turn an error response into a `ClientError`.
///
/// Understands both the REST dialect (`{code, message}`) and the auth
/// dialect (`{error, error_description}` or `{msg}`).
#[track_caller]
pub(crate) fn api_error(status: StatusCode, body: &str) -> ClientError {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let code = ["code", "error_code", "error"]
        .iter()
        .find_map(|key| match parsed.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "UNKNOWN".to_string());

    let message = ["message", "error_description", "msg"]
        .iter()
        .find_map(|key| parsed.get(key).and_then(Value::as_str))
        .map(String::from)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || code == INSUFFICIENT_PRIVILEGE
    {
        return ClientError::unauthorized(message);
    }

    ClientError::Api {
        status: status.as_u16(),
        code,
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}
