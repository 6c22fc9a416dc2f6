//! The mounted directory of one signed-in identity.
//!
//! Mounting spawns the [`Reconciler`], subscribes to the change feed before
//! the initial fetch and forwards feed events into the reconciler's inbox.
//! Every full fetch is bracketed by [`EngineCommand::BeginRefetch`], so
//! changes applied while it is in flight are replayed over its result.
//! Mutations go to the record store first; only a confirmed result is
//! applied locally.

use crate::view_state::ensure_owner;
use crate::{BusinessForm, Notice, Reconciler, ViewError, ViewResult};

use gsb_client::{ChangeFeed, ClientError, FeedSubscription, RecordStore, Session};
use gsb_core::{Business, DirectorySnapshot, EngineCommand, Identity};

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, info_span};

pub struct Directory<S, F> {
    identity: Identity,
    store: Arc<S>,
    feed: Arc<F>,
    collection: String,
    reconciler: Option<Reconciler>,
    forwarder: Option<JoinHandle<()>>,
    notice: Option<Notice>,
}

impl<S, F> Directory<S, F>
where
    S: RecordStore + 'static,
    F: ChangeFeed + 'static,
{
    /// Mount the directory for `identity` and load the list.
    ///
    /// A failed initial fetch does not fail the mount: the list stays empty,
    /// loading is cleared and the error is kept as [`Self::take_notice`].
    pub async fn mount(
        identity: Identity,
        store: Arc<S>,
        feed: Arc<F>,
        collection: &str,
    ) -> ViewResult<Self> {
        let mut directory = Self {
            identity,
            store,
            feed,
            collection: collection.to_string(),
            reconciler: Some(Reconciler::spawn()),
            forwarder: None,
            notice: None,
        };

        directory.connect_feed().await?;

        if let Err(e) = directory.refresh().await {
            warn!("Initial fetch failed: {e}");
            directory.notice = Some(e.notice());
        }

        info!(
            "Mounted directory for user {} ({} businesses)",
            directory.identity.id,
            directory.snapshot().len()
        );
        Ok(directory)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        self.reconciler
            .as_ref()
            .map(Reconciler::snapshot)
            .unwrap_or_else(DirectorySnapshot::loading)
    }

    pub fn subscribe(&self) -> ViewResult<watch::Receiver<DirectorySnapshot>> {
        self.reconciler
            .as_ref()
            .map(Reconciler::subscribe)
            .ok_or_else(ViewError::closed)
    }

    /// Wait until a snapshot satisfies `predicate`
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&DirectorySnapshot) -> bool,
    ) -> ViewResult<DirectorySnapshot> {
        let mut snapshots = self.subscribe()?;
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| ViewError::closed())?;
        Ok(snapshot.clone())
    }

    /// Message left by a failed initial fetch
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// True while feed events are being forwarded
    pub fn is_live(&self) -> bool {
        self.forwarder
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Hand refreshed tokens to the record store
    pub fn renew_session(&self, session: &Session) {
        debug!("Renewing store session for user {}", self.identity.id);
        self.store.renew_session(session);
    }

    /// Re-subscribe after the feed ended and reload the list
    pub async fn reconnect(&mut self) -> ViewResult<()> {
        if self.is_live() {
            return Ok(());
        }
        self.connect_feed().await?;
        self.refresh().await
    }

    /// Replace the list with a full fetch from the store.
    pub async fn refresh(&self) -> ViewResult<()> {
        self.send(EngineCommand::BeginRefetch).await?;
        match self.store.list().await {
            Ok(records) => self.send(EngineCommand::Initialize(records)).await,
            Err(e) => {
                self.send(EngineCommand::FinishLoading).await?;
                Err(e.into())
            }
        }
    }

    pub async fn create(&self, form: &BusinessForm) -> ViewResult<Business> {
        let fields = form.validate()?;
        let span = info_span!("create_business", user_id = %self.identity.id);

        async {
            let record = self.store.insert(self.identity.id, &fields).await?;
            info!("Created business {}", record.id);
            self.send(EngineCommand::LocalInsert(record.clone())).await?;
            Ok::<_, ViewError>(record)
        }
        .instrument(span)
        .await
    }

    /// Edit a record; refused before any network call unless owned.
    pub async fn update(&self, record: &Business, form: &BusinessForm) -> ViewResult<Business> {
        ensure_owner(record, &self.identity, "edit")?;
        let fields = form.validate()?;
        let span = info_span!(
            "update_business",
            business_id = %record.id,
            user_id = %self.identity.id
        );

        async {
            let updated = self
                .store
                .update(record.id, self.identity.id, &fields)
                .await?;
            info!("Updated business {}", updated.id);
            self.send(EngineCommand::LocalUpdate(updated.clone())).await?;
            Ok::<_, ViewError>(updated)
        }
        .instrument(span)
        .await
    }

    /// Delete a record; refused before any network call unless owned.
    pub async fn delete(&self, record: &Business) -> ViewResult<()> {
        ensure_owner(record, &self.identity, "delete")?;
        let span = info_span!(
            "delete_business",
            business_id = %record.id,
            user_id = %self.identity.id
        );

        async {
            self.store.delete(record.id, self.identity.id).await?;
            info!("Deleted business {}", record.id);
            self.send(EngineCommand::LocalDelete(record.id)).await
        }
        .instrument(span)
        .await
    }

    /// Stop forwarding feed events and drop the list.
    ///
    /// Resolves once the feed subscription has been released.
    pub async fn unmount(mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
            let _ = forwarder.await;
        }
        if let Some(reconciler) = self.reconciler.take() {
            reconciler.shutdown().await;
        }
        info!("Unmounted directory for user {}", self.identity.id);
    }

    async fn connect_feed(&mut self) -> ViewResult<()> {
        let subscription = self.feed.subscribe(&self.collection).await?;
        let inbox = self.inbox()?;

        if let Some(previous) = self.forwarder.take() {
            previous.abort();
        }
        self.forwarder = Some(tokio::spawn(forward(
            subscription,
            inbox,
            Arc::clone(&self.store),
        )));
        Ok(())
    }

    fn inbox(&self) -> ViewResult<mpsc::Sender<EngineCommand>> {
        self.reconciler
            .as_ref()
            .map(Reconciler::sender)
            .ok_or_else(ViewError::closed)
    }

    async fn send(&self, command: EngineCommand) -> ViewResult<()> {
        self.inbox()?
            .send(command)
            .await
            .map_err(|_| ViewError::closed())
    }
}

impl<S, F> Drop for Directory<S, F> {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

/// Move feed events into the inbox until the feed ends or the inbox closes.
async fn forward<S: RecordStore>(
    mut subscription: FeedSubscription,
    inbox: mpsc::Sender<EngineCommand>,
    store: Arc<S>,
) {
    while let Some(event) = subscription.next().await {
        let command = match event {
            Ok(change) => EngineCommand::Remote(change),
            Err(ClientError::FeedLagged { missed, .. }) => {
                warn!("Change feed lagged by {missed} events, refetching");
                if inbox.send(EngineCommand::BeginRefetch).await.is_err() {
                    break;
                }
                match store.list().await {
                    Ok(records) => EngineCommand::Initialize(records),
                    Err(e) => {
                        warn!("Refetch after lag failed: {e}");
                        EngineCommand::FinishLoading
                    }
                }
            }
            Err(e) => {
                warn!("Change feed error: {e}");
                continue;
            }
        };

        if inbox.send(command).await.is_err() {
            break;
        }
    }

    if inbox.is_closed() {
        debug!("Inbox closed, stopping feed forwarder");
    } else {
        info!("Change feed for '{}' ended", subscription.collection());
    }
}
