//! Single-writer owner of the ordered business list.
//!
//! Two independent sources feed the engine: confirmations of local mutations
//! and events from the realtime feed. Both can deliver the same logical
//! change, in either order and more than once, so every operation is
//! idempotent:
//!
//! - an insert for an id that is present is ignored
//! - an update for an id that is absent is ignored
//! - a delete is terminal: later inserts or updates for that id are ignored
//!
//! Store ids are never reused, which is what makes the deleted-id set safe
//! to keep until [`ReconciliationEngine::reset`]. It holds one id per delete
//! seen by this mount, bounded by the deletes of one signed-in session.
//!
//! A full fetch races with both sources: a change applied while the fetch is
//! in flight may be missing from its result. Between the start of a fetch
//! (construction, [`ReconciliationEngine::reset`] or
//! [`ReconciliationEngine::begin_refetch`]) and its outcome, inserts and
//! updates are journaled and replayed on top of the fetched list.

use crate::{Applied, Business, DirectorySnapshot, EngineCommand, RemoteChange};

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use log::debug;
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
enum Origin {
    Local,
    Remote,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Change applied while a full fetch was outstanding
#[derive(Debug)]
enum Pending {
    Insert(Business, Origin),
    Update(Business, Origin),
}

pub struct ReconciliationEngine {
    records: Vec<Business>,
    /// One id per delete since the last reset
    deleted: HashSet<Uuid>,
    journal: Option<Vec<Pending>>,
    loading: bool,
    revision: u64,
    notifier: watch::Sender<DirectorySnapshot>,
}

impl ReconciliationEngine {
    /// Create an engine in the loading state with an empty list
    pub fn new() -> Self {
        let (notifier, _) = watch::channel(DirectorySnapshot::loading());
        Self {
            records: Vec::new(),
            deleted: HashSet::new(),
            journal: Some(Vec::new()),
            loading: true,
            revision: 0,
            notifier,
        }
    }

    /// Receive a fresh snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<DirectorySnapshot> {
        self.notifier.subscribe()
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        self.notifier.borrow().clone()
    }

    pub fn records(&self) -> &[Business] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&Business> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.index_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Check if a delete for this id has been applied since the last reset
    pub fn is_deleted(&self, id: Uuid) -> bool {
        self.deleted.contains(&id)
    }

    /// True between the start of a full fetch and its outcome
    pub fn is_refetching(&self) -> bool {
        self.journal.is_some()
    }

    /// Dispatch one inbox command
    pub fn apply(&mut self, command: EngineCommand) -> Applied {
        match command {
            EngineCommand::Initialize(records) => self.initialize(records),
            EngineCommand::BeginRefetch => self.begin_refetch(),
            EngineCommand::FinishLoading => self.finish_loading(),
            EngineCommand::LocalInsert(record) => self.apply_local_insert(record),
            EngineCommand::LocalUpdate(record) => self.apply_local_update(record),
            EngineCommand::LocalDelete(id) => self.apply_local_delete(id),
            EngineCommand::Remote(change) => self.on_remote(change),
            EngineCommand::Reset => self.reset(),
        }
    }

    /// Start journaling incremental changes until the next full fetch lands.
    ///
    /// The presented list is left as it is.
    pub fn begin_refetch(&mut self) -> Applied {
        if self.journal.is_none() {
            self.journal = Some(Vec::new());
        }
        Applied::Unchanged
    }

    /// Replace the list with the result of a full fetch.
    ///
    /// Ids already known to be deleted are dropped and duplicates collapse to
    /// their first occurrence. Changes journaled since the fetch started are
    /// then replayed in arrival order.
    pub fn initialize(&mut self, records: Vec<Business>) -> Applied {
        let mut seen = HashSet::with_capacity(records.len());
        let mut fresh: Vec<Business> = records
            .into_iter()
            .filter(|r| !self.deleted.contains(&r.id))
            .filter(|r| seen.insert(r.id))
            .collect();
        fresh.sort_by(Business::list_order);

        let previous = std::mem::replace(&mut self.records, fresh);
        let journal = self.journal.take().unwrap_or_default();
        let replayed = journal.len();
        for pending in journal {
            match pending {
                Pending::Insert(record, origin) => self.place(record, origin),
                Pending::Update(record, origin) => self.replace(record, origin),
            };
        }

        if !self.loading && previous == self.records {
            return Applied::Unchanged;
        }

        debug!(
            "Initializing directory with {} businesses ({replayed} replayed)",
            self.records.len()
        );
        self.loading = false;
        self.publish();
        Applied::Changed
    }

    /// End the fetch window without a list (the full fetch failed).
    ///
    /// Changes applied meanwhile stay in place.
    pub fn finish_loading(&mut self) -> Applied {
        self.journal = None;
        if !self.loading {
            return Applied::Unchanged;
        }
        self.loading = false;
        self.publish();
        Applied::Changed
    }

    pub fn apply_local_insert(&mut self, record: Business) -> Applied {
        self.insert(record, Origin::Local)
    }

    pub fn apply_local_update(&mut self, record: Business) -> Applied {
        self.update(record, Origin::Local)
    }

    pub fn apply_local_delete(&mut self, id: Uuid) -> Applied {
        self.delete(id, Origin::Local)
    }

    pub fn on_remote_insert(&mut self, record: Business) -> Applied {
        self.insert(record, Origin::Remote)
    }

    /// The incoming record replaces the stored one wholesale.
    pub fn on_remote_update(&mut self, record: Business) -> Applied {
        self.update(record, Origin::Remote)
    }

    pub fn on_remote_delete(&mut self, id: Uuid) -> Applied {
        self.delete(id, Origin::Remote)
    }

    pub fn on_remote(&mut self, change: RemoteChange) -> Applied {
        match change {
            RemoteChange::Insert(record) => self.on_remote_insert(record),
            RemoteChange::Update(record) => self.on_remote_update(record),
            RemoteChange::Delete(id) => self.on_remote_delete(id),
        }
    }

    /// Discard all state and return to loading (identity changed)
    pub fn reset(&mut self) -> Applied {
        let pristine = self.journal.as_ref().is_some_and(Vec::is_empty);
        self.journal = Some(Vec::new());
        if self.loading && pristine && self.records.is_empty() && self.deleted.is_empty() {
            return Applied::Unchanged;
        }
        self.records.clear();
        self.deleted.clear();
        self.loading = true;
        self.publish();
        Applied::Changed
    }

    fn insert(&mut self, record: Business, origin: Origin) -> Applied {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(Pending::Insert(record.clone(), origin));
        }
        if self.place(record, origin) {
            self.publish();
            Applied::Changed
        } else {
            Applied::Unchanged
        }
    }

    fn update(&mut self, record: Business, origin: Origin) -> Applied {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(Pending::Update(record.clone(), origin));
        }
        if self.replace(record, origin) {
            self.publish();
            Applied::Changed
        } else {
            Applied::Unchanged
        }
    }

    /// Insert at the sorted position; false when ignored
    fn place(&mut self, record: Business, origin: Origin) -> bool {
        if self.deleted.contains(&record.id) {
            debug!("Ignoring {origin} insert of deleted business {}", record.id);
            return false;
        }
        if self.contains(record.id) {
            debug!("Ignoring duplicate {origin} insert of business {}", record.id);
            return false;
        }

        let position = self.position_for(&record);
        self.records.insert(position, record);
        true
    }

    /// Replace a present record wholesale; false when ignored
    fn replace(&mut self, record: Business, origin: Origin) -> bool {
        if self.deleted.contains(&record.id) {
            debug!("Ignoring {origin} update of deleted business {}", record.id);
            return false;
        }
        let Some(index) = self.index_of(record.id) else {
            debug!("Ignoring {origin} update of unknown business {}", record.id);
            return false;
        };
        if self.records[index] == record {
            return false;
        }

        if self.records[index].list_order(&record) == Ordering::Equal {
            self.records[index] = record;
        } else {
            // Sort key moved; keep the list ordered
            self.records.remove(index);
            let position = self.position_for(&record);
            self.records.insert(position, record);
        }
        true
    }

    fn delete(&mut self, id: Uuid, origin: Origin) -> Applied {
        // Recorded even when absent: a delete can overtake its own insert
        self.deleted.insert(id);

        match self.index_of(id) {
            Some(index) => {
                self.records.remove(index);
                self.publish();
                Applied::Changed
            }
            None => {
                debug!("Ignoring {origin} delete of absent business {id}");
                Applied::Unchanged
            }
        }
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    fn position_for(&self, record: &Business) -> usize {
        self.records
            .partition_point(|existing| existing.list_order(record) == Ordering::Less)
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.notifier.send_replace(DirectorySnapshot::new(
            Arc::from(self.records.as_slice()),
            self.loading,
            self.revision,
        ));
    }
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}
