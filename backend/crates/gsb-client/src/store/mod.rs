pub mod record_store;
pub mod rest_store;
