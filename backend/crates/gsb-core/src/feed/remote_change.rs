use crate::Business;

use uuid::Uuid;

/// A validated change event, ready to be applied to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteChange {
    Insert(Business),
    Update(Business),
    Delete(Uuid),
}

impl RemoteChange {
    /// Id of the record this change concerns
    pub fn id(&self) -> Uuid {
        match self {
            Self::Insert(record) | Self::Update(record) => record.id,
            Self::Delete(id) => *id,
        }
    }
}
