use gsb_core::{Business, DirectorySnapshot, Identity};

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const EMPTY_NOTICE: &str = "No businesses found. Be the first to add one!";
pub const MISSING_CITY: &str = "N/A";

/// One listed business with the actions offered to the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl DirectoryRow {
    fn new(record: &Business, viewer: Option<&Identity>) -> Self {
        let owned = viewer.is_some_and(|identity| record.is_owned_by(identity.id));
        Self {
            id: record.id,
            name: record.name.clone(),
            category: record.category.clone(),
            city: record
                .city
                .clone()
                .unwrap_or_else(|| MISSING_CITY.to_string()),
            created_at: record.created_at,
            can_edit: owned,
            can_delete: owned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryView {
    pub loading: bool,
    pub rows: Vec<DirectoryRow>,
    /// Shown instead of rows once loading finished with nothing to list
    pub empty_notice: Option<&'static str>,
}

impl DirectoryView {
    pub fn render(snapshot: &DirectorySnapshot, viewer: Option<&Identity>) -> Self {
        Self {
            loading: snapshot.is_loading(),
            rows: snapshot
                .records()
                .iter()
                .map(|record| DirectoryRow::new(record, viewer))
                .collect(),
            empty_notice: snapshot.shows_empty_notice().then_some(EMPTY_NOTICE),
        }
    }

    pub fn row(&self, id: Uuid) -> Option<&DirectoryRow> {
        self.rows.iter().find(|row| row.id == id)
    }
}
