//! Domain model and realtime reconciliation for the business directory.
//!
//! Everything in this crate is pure in-memory state: no network, no clock
//! reads outside of test helpers. The [`ReconciliationEngine`] is the single
//! writer of the ordered business list that the view layer renders.

pub mod error;
pub mod feed;
pub mod models;
pub mod reconcile;

#[cfg(test)]
mod tests;

pub use error::{CoreError, Result};
pub use feed::change_event::{BUSINESSES_COLLECTION, ChangeEvent, RecordKey};
pub use feed::change_kind::ChangeKind;
pub use feed::remote_change::RemoteChange;
pub use models::business::Business;
pub use models::business_fields::BusinessFields;
pub use models::identity::Identity;
pub use reconcile::applied::Applied;
pub use reconcile::directory_snapshot::DirectorySnapshot;
pub use reconcile::engine_command::EngineCommand;
pub use reconcile::reconciliation_engine::ReconciliationEngine;
