//! In-process change feed hub.
//!
//! A transport adapter (the realtime socket) publishes decoded events here;
//! directory views subscribe per collection. Each collection has one bounded
//! broadcast channel, created on first subscribe and removed when the last
//! subscription is dropped or the collection is closed.

use crate::{ChangeFeed, ClientError, ClientResult, FeedSubscription};

use gsb_config::RealtimeConfig;
use gsb_core::{ChangeEvent, CoreError, RemoteChange};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct BroadcastChangeFeed {
    inner: Arc<Mutex<FeedInner>>,
    capacity: usize,
}

#[derive(Default)]
struct FeedInner {
    channels: HashMap<String, FeedChannel>,
    /// Distinguishes a channel from one recreated after `close_collection`
    next_generation: u64,
    closed: bool,
}

struct FeedChannel {
    sender: broadcast::Sender<RemoteChange>,
    subscriber_count: usize,
    generation: u64,
}

impl BroadcastChangeFeed {
    pub fn new(config: &RealtimeConfig) -> Self {
        Self::with_capacity(config.channel_capacity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FeedInner::default())),
            capacity: capacity.max(1),
        }
    }

    /// Validate an event and deliver it to the subscribers of its collection.
    ///
    /// Returns the number of receivers reached; publishing to a collection
    /// nobody watches is not an error.
    #[track_caller]
    pub fn publish(&self, event: ChangeEvent) -> ClientResult<usize> {
        let collection = event.collection.clone();
        let change = event.into_remote_change()?;

        let inner = lock(&self.inner);
        if inner.closed {
            return Err(feed_closed(&collection));
        }
        let Some(channel) = inner.channels.get(&collection) else {
            debug!("No subscribers for '{collection}', dropping {} change", change.id());
            return Ok(0);
        };

        match channel.sender.send(change) {
            Ok(receivers) => Ok(receivers),
            Err(_) => {
                debug!("Change for '{collection}' had no active receivers");
                Ok(0)
            }
        }
    }

    /// Decode a realtime JSON payload and publish it.
    #[track_caller]
    pub fn publish_payload(&self, payload: &str) -> ClientResult<usize> {
        let event = ChangeEvent::from_json(payload).inspect_err(|e| {
            warn!("Rejected realtime payload: {e}");
        })?;
        self.publish(event)
    }

    pub fn subscriber_count(&self, collection: &str) -> usize {
        lock(&self.inner)
            .channels
            .get(collection)
            .map(|c| c.subscriber_count)
            .unwrap_or(0)
    }

    /// End the subscriptions of one collection; they drain and then end.
    /// Later subscribers get a fresh channel.
    pub fn close_collection(&self, collection: &str) {
        if lock(&self.inner).channels.remove(collection).is_some() {
            info!("Closed feed channel for '{collection}'");
        }
    }

    /// Shut the feed down for good: open subscriptions drain and end, new
    /// subscribes and publishes fail with `FeedClosed`.
    pub fn close(&self) {
        let mut inner = lock(&self.inner);
        inner.closed = true;
        info!("Closing change feed ({} collections)", inner.channels.len());
        inner.channels.clear();
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner).closed
    }

    fn release(inner: &Mutex<FeedInner>, collection: &str, generation: u64) {
        let mut inner = lock(inner);

        if let Some(channel) = inner
            .channels
            .get_mut(collection)
            .filter(|c| c.generation == generation)
        {
            channel.subscriber_count = channel.subscriber_count.saturating_sub(1);
            debug!(
                "Unsubscribed from '{collection}' ({} remaining subscribers)",
                channel.subscriber_count
            );

            if channel.subscriber_count == 0 {
                inner.channels.remove(collection);
                debug!("Removed empty feed channel for '{collection}'");
            }
        }
    }
}

#[async_trait]
impl ChangeFeed for BroadcastChangeFeed {
    async fn subscribe(&self, collection: &str) -> ClientResult<FeedSubscription> {
        if collection.trim().is_empty() {
            return Err(CoreError::field("collection", "Collection name cannot be empty").into());
        }

        let (receiver, generation) = {
            let mut guard = lock(&self.inner);
            if guard.closed {
                return Err(feed_closed(collection));
            }
            let inner = &mut *guard;
            let channel = inner
                .channels
                .entry(collection.to_string())
                .or_insert_with(|| {
                    let (sender, _) = broadcast::channel(self.capacity);
                    inner.next_generation += 1;
                    debug!("Created feed channel for '{collection}'");
                    FeedChannel {
                        sender,
                        subscriber_count: 0,
                        generation: inner.next_generation,
                    }
                });
            channel.subscriber_count += 1;
            debug!(
                "Subscribed to '{collection}' ({} total subscribers)",
                channel.subscriber_count
            );
            (channel.sender.subscribe(), channel.generation)
        };

        let inner = Arc::clone(&self.inner);
        let owned = collection.to_string();
        Ok(FeedSubscription::new(collection, receiver, move || {
            Self::release(&inner, &owned, generation)
        }))
    }
}

#[track_caller]
fn feed_closed(collection: &str) -> ClientError {
    ClientError::FeedClosed {
        collection: collection.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// A panic while holding the lock cannot leave the map inconsistent
fn lock(inner: &Mutex<FeedInner>) -> MutexGuard<'_, FeedInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
