use crate::{ViewError, ViewResult};

use gsb_core::{Business, DirectorySnapshot, Identity};

use uuid::Uuid;

/// Which record is open in the edit form, the delete confirmation and the
/// detail view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    editing: Option<Uuid>,
    deleting: Option<Uuid>,
    viewing: Option<Uuid>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn deleting(&self) -> Option<Uuid> {
        self.deleting
    }

    pub fn viewing(&self) -> Option<Uuid> {
        self.viewing
    }

    /// Open the edit form; only the owner may edit.
    #[track_caller]
    pub fn begin_edit(&mut self, record: &Business, viewer: &Identity) -> ViewResult<()> {
        ensure_owner(record, viewer, "edit")?;
        self.editing = Some(record.id);
        Ok(())
    }

    /// Ask for delete confirmation; only the owner may delete.
    #[track_caller]
    pub fn begin_delete(&mut self, record: &Business, viewer: &Identity) -> ViewResult<()> {
        ensure_owner(record, viewer, "delete")?;
        self.deleting = Some(record.id);
        Ok(())
    }

    pub fn show_detail(&mut self, record: &Business) {
        self.viewing = Some(record.id);
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn cancel_delete(&mut self) {
        self.deleting = None;
    }

    pub fn close_detail(&mut self) {
        self.viewing = None;
    }

    /// Drop targets whose record is no longer listed
    pub fn prune(&mut self, snapshot: &DirectorySnapshot) {
        for target in [&mut self.editing, &mut self.deleting, &mut self.viewing] {
            if target.is_some_and(|id| snapshot.find(id).is_none()) {
                *target = None;
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[track_caller]
pub(crate) fn ensure_owner(record: &Business, viewer: &Identity, action: &str) -> ViewResult<()> {
    if record.is_owned_by(viewer.id) {
        return Ok(());
    }
    Err(ViewError::unauthorized(format!(
        "You can only {action} businesses you created"
    )))
}
