use crate::{ClientError, ClientResult};

use gsb_core::RemoteChange;

use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::broadcast::{self, error::RecvError};

/// Live subscription to one collection's changes.
///
/// Holds its slot in the feed until dropped.
pub struct FeedSubscription {
    collection: String,
    receiver: broadcast::Receiver<RemoteChange>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl FeedSubscription {
    pub fn new(
        collection: impl Into<String>,
        receiver: broadcast::Receiver<RemoteChange>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            collection: collection.into(),
            receiver,
            release: Some(Box::new(release)),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once the feed is closed. `FeedLagged` means events were
    /// dropped and the consumer should refetch; the subscription stays usable.
    pub async fn next(&mut self) -> Option<ClientResult<RemoteChange>> {
        match self.receiver.recv().await {
            Ok(change) => Some(Ok(change)),
            Err(RecvError::Lagged(missed)) => Some(Err(ClientError::FeedLagged {
                missed,
                location: ErrorLocation::from(Location::caller()),
            })),
            Err(RecvError::Closed) => None,
        }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}
