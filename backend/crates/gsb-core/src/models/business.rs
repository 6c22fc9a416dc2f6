//! Business entity - a directory listing owned by the identity that created it.

use crate::BusinessFields;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row of the `businesses` collection.
///
/// `id`, `owner` and `created_at` are assigned by the store and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub city: Option<String>,
    /// Identity that created the record; only it may mutate the record
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Business {
    /// Check if the given identity owns this record
    pub fn is_owned_by(&self, identity_id: Uuid) -> bool {
        self.owner == identity_id
    }

    /// The mutable subset of this record
    pub fn fields(&self) -> BusinessFields {
        BusinessFields {
            name: self.name.clone(),
            category: self.category.clone(),
            city: self.city.clone(),
        }
    }

    /// Presentation order: newest first, ascending id on identical timestamps.
    pub fn list_order(&self, other: &Self) -> Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}
