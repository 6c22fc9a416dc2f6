use crate::{CoreError, Result as CoreResult};

use serde::{Deserialize, Serialize};

/// Fields a user may set when creating or editing a business.
///
/// `city` serializes as `null` when absent so that an edit can clear it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessFields {
    pub name: String,
    pub category: String,
    pub city: Option<String>,
}

impl BusinessFields {
    /// Build fields from raw form input.
    ///
    /// Input is trimmed. `name` and `category` are required; a blank `city`
    /// means unspecified.
    #[track_caller]
    pub fn new(name: &str, category: &str, city: Option<&str>) -> CoreResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::field("name", "Business name is required"));
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(CoreError::field("category", "Category is required"));
        }

        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        Ok(Self {
            name: name.to_string(),
            category: category.to_string(),
            city,
        })
    }
}
