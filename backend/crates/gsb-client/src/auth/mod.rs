pub mod auth_provider;
pub mod http_auth_provider;
pub mod session;
pub mod session_manager;
pub mod session_state;
pub mod session_store;
pub mod sign_up_outcome;
