use crate::{ClientResult, Session};

use gsb_core::{Business, BusinessFields};

use async_trait::async_trait;
use uuid::Uuid;

/// CRUD access to the `businesses` collection.
///
/// Update and delete are scoped by `owner`; the store's row-level policy is
/// the authority and rejects anything else.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All visible records, newest first
    async fn list(&self) -> ClientResult<Vec<Business>>;

    async fn insert(&self, owner: Uuid, fields: &BusinessFields) -> ClientResult<Business>;

    /// Fails with `NotFound` when no row matched both `id` and `owner`
    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        fields: &BusinessFields,
    ) -> ClientResult<Business>;

    /// Fails with `NotFound` when no row matched both `id` and `owner`
    async fn delete(&self, id: Uuid, owner: Uuid) -> ClientResult<()>;

    /// Act with the tokens of a refreshed session from now on
    fn renew_session(&self, _session: &Session) {}
}
