use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of committed mutation carried by a change event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    #[serde(alias = "INSERT", alias = "insert")]
    Insert,
    #[serde(alias = "UPDATE", alias = "update")]
    Update,
    #[serde(alias = "DELETE", alias = "delete")]
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        write!(f, "{s}")
    }
}
