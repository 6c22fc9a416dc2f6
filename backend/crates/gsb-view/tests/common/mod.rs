#![allow(dead_code)]

use gsb_client::{
    AuthProvider, BroadcastChangeFeed, ClientError, ClientResult, RecordStore, Session,
    SignUpOutcome,
};
use gsb_core::{Business, BusinessFields, ChangeEvent, DirectorySnapshot, Identity};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::time::timeout;
use uuid::Uuid;

pub const OWNER: Uuid = Uuid::from_u128(0xA11CE);
pub const OTHER_OWNER: Uuid = Uuid::from_u128(0xB0B);
pub const PASSWORD: &str = "secret123";
pub const WAIT: std::time::Duration = std::time::Duration::from_secs(2);

pub fn owner() -> Identity {
    Identity::new(OWNER, "alice@example.com")
}

pub fn business(n: u128, owner: Uuid, minutes: i64) -> Business {
    Business {
        id: Uuid::from_u128(n),
        name: format!("Business {n}"),
        category: "Food".to_string(),
        city: None,
        owner,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes),
    }
}

pub fn names(snapshot: &DirectorySnapshot) -> Vec<String> {
    snapshot.records().iter().map(|r| r.name.clone()).collect()
}

/// In-memory record store enforcing the owner rule like the server's row policy.
///
/// With a feed attached every confirmed mutation is echoed as a change event,
/// the way the realtime service would.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Business>>,
    feed: Option<BroadcastChangeFeed>,
    fail_list: AtomicBool,
    calls: AtomicUsize,
    during_list: Mutex<Vec<ChangeEvent>>,
    access_token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new(rows: Vec<Business>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn echoing(mut self, feed: &BroadcastChangeFeed) -> Self {
        self.feed = Some(feed.clone());
        self
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Publish `events` while the next `list` is in flight, after its rows
    /// were read, so the fetch result does not contain them
    pub fn publish_during_list(&self, events: Vec<ChangeEvent>) {
        self.during_list.lock().unwrap().extend(events);
    }

    /// Number of store calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Add a row behind the client's back, without any feed event
    pub fn push_row(&self, row: Business) {
        self.rows.lock().unwrap().push(row);
    }

    /// Token handed over by the latest session renewal
    pub fn access_token(&self) -> Option<String> {
        self.access_token.lock().unwrap().clone()
    }

    pub fn rows(&self) -> Vec<Business> {
        self.rows.lock().unwrap().clone()
    }

    fn echo(&self, event: ChangeEvent) {
        if let Some(feed) = &self.feed {
            feed.publish(event).unwrap();
        }
    }

    fn not_found(id: Uuid) -> ClientError {
        ClientError::not_found(format!("Business {id} not found or not owned by the current user"))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> ClientResult<Vec<Business>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 503,
                code: "UNAVAILABLE".to_string(),
                message: "Service unavailable".to_string(),
                location: error_location::ErrorLocation::from(std::panic::Location::caller()),
            });
        }
        let mut rows = self.rows();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let late: Vec<_> = self.during_list.lock().unwrap().drain(..).collect();
        if !late.is_empty() {
            for event in late {
                self.echo(event);
            }
            // Let the forwarder apply the events before the response lands
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
        Ok(rows)
    }

    async fn insert(&self, owner: Uuid, fields: &BusinessFields) -> ClientResult<Business> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let record = Business {
            id: Uuid::new_v4(),
            name: fields.name.clone(),
            category: fields.category.clone(),
            city: fields.city.clone(),
            owner,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(record.clone());
        self.echo(ChangeEvent::insert(record.clone()));
        Ok(record)
    }

    async fn update(&self, id: Uuid, owner: Uuid, fields: &BusinessFields) -> ClientResult<Business> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let updated = {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|r| r.id == id && r.owner == owner)
                .ok_or_else(|| Self::not_found(id))?;
            row.name = fields.name.clone();
            row.category = fields.category.clone();
            row.city = fields.city.clone();
            row.clone()
        };
        self.echo(ChangeEvent::update(updated.clone()));
        Ok(updated)
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> ClientResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut rows = self.rows.lock().unwrap();
            let index = rows
                .iter()
                .position(|r| r.id == id && r.owner == owner)
                .ok_or_else(|| Self::not_found(id))?;
            rows.remove(index);
        }
        self.echo(ChangeEvent::delete(id));
        Ok(())
    }

    fn renew_session(&self, session: &Session) {
        *self.access_token.lock().unwrap() = Some(session.access_token.clone());
    }
}

/// Identity provider accepting one password; sign-ups for addresses
/// starting with "confirm" need e-mail confirmation.
#[derive(Default)]
pub struct FakeAuth {
    pub sign_outs: AtomicUsize,
    /// Seconds until issued sessions expire; an hour when unset
    pub lifetime_secs: Option<i64>,
    pub reject_refresh: bool,
}

impl FakeAuth {
    /// Issues sessions that are already inside the expiry margin
    pub fn expiring() -> Self {
        Self {
            lifetime_secs: Some(5),
            ..Self::default()
        }
    }

    fn session(&self, email: &str, prefix: &str) -> Session {
        let id = if email.starts_with("alice") { OWNER } else { OTHER_OWNER };
        let lifetime = self.lifetime_secs.unwrap_or(3600);
        Session::new(format!("{prefix}-{id}"), Identity::new(id, email))
            .with_refresh_token("refresh")
            .with_expires_at(Utc::now().timestamp() + lifetime)
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> ClientResult<Session> {
        if password != PASSWORD {
            return Err(ClientError::authentication("Invalid login credentials"));
        }
        Ok(self.session(email, "token"))
    }

    async fn sign_up(&self, email: &str, _password: &str) -> ClientResult<SignUpOutcome> {
        if email.starts_with("confirm") {
            return Ok(SignUpOutcome::ConfirmationRequired {
                email: email.to_string(),
            });
        }
        Ok(SignUpOutcome::SignedIn(self.session(email, "token")))
    }

    async fn refresh_session(&self, _refresh_token: &str) -> ClientResult<Session> {
        if self.reject_refresh {
            return Err(ClientError::authentication("Refresh Token Not Found"));
        }
        Ok(self.session("alice@example.com", "refreshed"))
    }

    async fn sign_out(&self, _access_token: &str) -> ClientResult<()> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Await `future`, failing the test if it takes longer than [`WAIT`]
pub async fn within<T>(future: impl Future<Output = T>) -> T {
    timeout(WAIT, future).await.expect("timed out")
}
