use crate::{ClientResult, FeedSubscription};

use async_trait::async_trait;

/// Source of realtime change notifications for a collection
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Start receiving changes. Dropping the subscription unsubscribes.
    async fn subscribe(&self, collection: &str) -> ClientResult<FeedSubscription>;
}
