use crate::{Business, RemoteChange};

use uuid::Uuid;

/// Message consumed by the reconciliation loop.
///
/// Local confirmations and remote feed events share one inbox so the engine
/// keeps a single writer.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// A full fetch is about to start; journal changes until its outcome
    BeginRefetch,
    /// Result of a full fetch
    Initialize(Vec<Business>),
    /// Full fetch failed; stop showing the loading state
    FinishLoading,
    LocalInsert(Business),
    LocalUpdate(Business),
    LocalDelete(Uuid),
    Remote(RemoteChange),
    /// Identity changed; discard everything
    Reset,
}

impl EngineCommand {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::BeginRefetch => "begin_refetch",
            Self::Initialize(_) => "initialize",
            Self::FinishLoading => "finish_loading",
            Self::LocalInsert(_) => "local_insert",
            Self::LocalUpdate(_) => "local_update",
            Self::LocalDelete(_) => "local_delete",
            Self::Remote(RemoteChange::Insert(_)) => "remote_insert",
            Self::Remote(RemoteChange::Update(_)) => "remote_update",
            Self::Remote(RemoteChange::Delete(_)) => "remote_delete",
            Self::Reset => "reset",
        }
    }
}
