//! Clients for the external collaborators of the directory view: the record
//! store, the identity provider with its persisted session, and the change
//! feed.

pub mod api_client;
pub mod auth;
pub mod error;
pub mod feed;
pub mod retry;
pub mod store;


pub use api_client::ApiClient;
pub use auth::auth_provider::AuthProvider;
pub use auth::http_auth_provider::HttpAuthProvider;
pub use auth::session::Session;
pub use auth::session_manager::SessionManager;
pub use auth::session_state::SessionState;
pub use auth::session_store::SessionStore;
pub use auth::sign_up_outcome::SignUpOutcome;
pub use error::{ClientError, ErrorKind, Result as ClientResult};
pub use feed::broadcast_change_feed::BroadcastChangeFeed;
pub use feed::change_feed::ChangeFeed;
pub use feed::feed_subscription::FeedSubscription;
pub use retry::{IsRetryable, with_retry};
pub use store::record_store::RecordStore;
pub use store::rest_store::RestStore;
