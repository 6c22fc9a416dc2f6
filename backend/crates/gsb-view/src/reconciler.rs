//! Task that owns the reconciliation engine.
//!
//! Mutation confirmations and feed events arrive on one inbox and are applied
//! in arrival order, so the engine never needs a lock.

use gsb_core::{DirectorySnapshot, EngineCommand, ReconciliationEngine};

use log::{debug, trace};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Commands buffered before senders wait
const INBOX_CAPACITY: usize = 64;

pub struct Reconciler {
    inbox: mpsc::Sender<EngineCommand>,
    snapshots: watch::Receiver<DirectorySnapshot>,
    task: Option<JoinHandle<()>>,
}

impl Reconciler {
    /// Spawn the engine task on the current runtime
    pub fn spawn() -> Self {
        let engine = ReconciliationEngine::new();
        let snapshots = engine.subscribe();
        let (inbox, commands) = mpsc::channel(INBOX_CAPACITY);
        let task = tokio::spawn(run(engine, commands));

        Self {
            inbox,
            snapshots,
            task: Some(task),
        }
    }

    pub fn sender(&self) -> mpsc::Sender<EngineCommand> {
        self.inbox.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DirectorySnapshot> {
        self.snapshots.clone()
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop applying commands; pending ones are discarded.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(mut engine: ReconciliationEngine, mut commands: mpsc::Receiver<EngineCommand>) {
    while let Some(command) = commands.recv().await {
        let name = command.name();
        let applied = engine.apply(command);
        trace!("Applied {name}: {applied:?} (revision {})", engine.revision());
    }
    debug!("Reconciler inbox closed");
}
