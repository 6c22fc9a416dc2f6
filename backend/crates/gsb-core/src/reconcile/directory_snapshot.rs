use crate::Business;

use std::sync::Arc;

use uuid::Uuid;

/// Immutable view of the reconciled list, published on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySnapshot {
    records: Arc<[Business]>,
    loading: bool,
    /// Incremented on every published change
    revision: u64,
}

impl DirectorySnapshot {
    pub(crate) fn new(records: Arc<[Business]>, loading: bool, revision: u64) -> Self {
        Self {
            records,
            loading,
            revision,
        }
    }

    /// Empty snapshot shown while the initial fetch is outstanding
    pub fn loading() -> Self {
        Self::new(Arc::from(Vec::new()), true, 0)
    }

    pub fn records(&self) -> &[Business] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: Uuid) -> Option<&Business> {
        self.records.iter().find(|r| r.id == id)
    }

    /// True when loading finished and there is nothing to list
    pub fn shows_empty_notice(&self) -> bool {
        !self.loading && self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.records.iter().map(|r| r.id).collect()
    }
}
