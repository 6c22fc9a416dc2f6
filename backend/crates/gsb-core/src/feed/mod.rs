pub mod change_event;
pub mod change_kind;
pub mod remote_change;
