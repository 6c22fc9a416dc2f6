#![allow(dead_code)]

use gsb_client::ApiClient;
use gsb_config::{RetryConfig, StoreConfig};

use serde_json::{Value, json};
use uuid::Uuid;

pub const ANON_KEY: &str = "test-anon-key";
pub const ACCESS_TOKEN: &str = "user-access-token";
pub const OWNER: Uuid = Uuid::from_u128(0xA11CE);
pub const OTHER_OWNER: Uuid = Uuid::from_u128(0xB0B);

pub fn store_config(uri: &str) -> StoreConfig {
    StoreConfig {
        url: uri.to_string(),
        anon_key: ANON_KEY.to_string(),
        request_timeout_secs: 5,
    }
}

pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay_ms: 10,
        max_delay_secs: 1,
        backoff_multiplier: 2.0,
        jitter: false,
    }
}

pub fn anon_client(uri: &str) -> ApiClient {
    ApiClient::new(&store_config(uri)).unwrap()
}

pub fn user_client(uri: &str) -> ApiClient {
    anon_client(uri).with_access_token(ACCESS_TOKEN)
}

pub fn business_json(n: u128, name: &str, minutes: u32) -> Value {
    json!({
        "id": Uuid::from_u128(n),
        "name": name,
        "category": "Food",
        "city": null,
        "owner": OWNER,
        "created_at": format!("2025-01-01T00:{minutes:02}:00+00:00"),
    })
}

pub fn token_json(user_id: Uuid, email: &str) -> Value {
    json!({
        "access_token": ACCESS_TOKEN,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "fresh-refresh-token",
        "user": { "id": user_id, "email": email },
    })
}
