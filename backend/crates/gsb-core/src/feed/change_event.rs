//! Wire shape of realtime change notifications.
//!
//! The canonical shape is `{kind, collection, new, old}`. Payloads in the
//! provider's native spelling (`eventType: "INSERT"`, `table`) decode to the
//! same type, and an empty `{}` for `new` or `old` counts as absent.

use crate::{Business, ChangeKind, CoreError, RemoteChange, Result as CoreResult};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Collection watched by the directory view
pub const BUSINESSES_COLLECTION: &str = "businesses";

/// Primary key of the previous row image carried by deletes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordKey {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub collection: String,
    pub new: Option<Business>,
    pub old: Option<RecordKey>,
}

#[derive(Deserialize)]
struct RawChangeEvent {
    #[serde(alias = "eventType")]
    kind: ChangeKind,
    #[serde(alias = "table")]
    collection: String,
    #[serde(default)]
    new: Option<Value>,
    #[serde(default)]
    old: Option<Value>,
}

impl ChangeEvent {
    pub fn insert(record: Business) -> Self {
        Self {
            kind: ChangeKind::Insert,
            collection: BUSINESSES_COLLECTION.to_string(),
            new: Some(record),
            old: None,
        }
    }

    pub fn update(record: Business) -> Self {
        let old = Some(RecordKey { id: record.id });
        Self {
            kind: ChangeKind::Update,
            collection: BUSINESSES_COLLECTION.to_string(),
            new: Some(record),
            old,
        }
    }

    pub fn delete(id: Uuid) -> Self {
        Self {
            kind: ChangeKind::Delete,
            collection: BUSINESSES_COLLECTION.to_string(),
            new: None,
            old: Some(RecordKey { id }),
        }
    }

    /// Decode a realtime payload.
    #[track_caller]
    pub fn from_json(payload: &str) -> CoreResult<Self> {
        let raw: RawChangeEvent = serde_json::from_str(payload)?;

        Ok(Self {
            kind: raw.kind,
            collection: raw.collection,
            new: present(raw.new)
                .map(serde_json::from_value::<Business>)
                .transpose()?,
            old: present(raw.old)
                .map(serde_json::from_value::<RecordKey>)
                .transpose()?,
        })
    }

    /// Check if this event belongs to the given collection
    pub fn concerns(&self, collection: &str) -> bool {
        self.collection == collection
    }

    /// Validate that the row images required by `kind` are present.
    #[track_caller]
    pub fn into_remote_change(self) -> CoreResult<RemoteChange> {
        match (self.kind, self.new, self.old) {
            (ChangeKind::Insert, Some(record), _) => Ok(RemoteChange::Insert(record)),
            (ChangeKind::Update, Some(record), _) => Ok(RemoteChange::Update(record)),
            (ChangeKind::Delete, _, Some(key)) => Ok(RemoteChange::Delete(key.id)),
            (ChangeKind::Delete, _, None) => Err(CoreError::invalid_event(
                "delete event is missing the old record id",
            )),
            (kind, None, _) => Err(CoreError::invalid_event(format!(
                "{kind} event is missing the new record"
            ))),
        }
    }
}

fn present(value: Option<Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) if map.is_empty() => None,
        Some(v) => Some(v),
    }
}
