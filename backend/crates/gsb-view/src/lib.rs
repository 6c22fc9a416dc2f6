//! Presentation layer of the business directory.
//!
//! [`Shell`] follows the session and decides which screen is shown;
//! [`Directory`] keeps one identity's reconciled list in sync with the record
//! store and the change feed; [`DirectoryView`] turns a snapshot into rows
//! with the affordances the signed-in user is allowed to see.

pub mod auth_form;
pub mod business_form;
pub mod directory;
pub mod directory_view;
pub mod error;
pub mod logger;
pub mod notice;
pub mod reconciler;
pub mod shell;
pub mod view_state;

#[cfg(test)]
mod tests;

pub use auth_form::{AuthForm, AuthMode};
pub use business_form::BusinessForm;
pub use directory::Directory;
pub use directory_view::{DirectoryRow, DirectoryView, EMPTY_NOTICE, MISSING_CITY};
pub use error::{Result as ViewResult, ViewError};
pub use notice::{Notice, NoticeKind};
pub use reconciler::Reconciler;
pub use shell::{Screen, Shell};
pub use view_state::ViewState;
