use crate::ViewResult;

use gsb_core::{Business, BusinessFields};

/// Raw input of the create and edit forms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessForm {
    pub name: String,
    pub category: String,
    pub city: String,
}

impl BusinessForm {
    pub fn new(name: impl Into<String>, category: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            city: city.into(),
        }
    }

    /// Prefill the edit form from an existing record
    pub fn from_record(record: &Business) -> Self {
        Self {
            name: record.name.clone(),
            category: record.category.clone(),
            city: record.city.clone().unwrap_or_default(),
        }
    }

    /// Validate the input; blank city means unspecified.
    #[track_caller]
    pub fn validate(&self) -> ViewResult<BusinessFields> {
        Ok(BusinessFields::new(
            &self.name,
            &self.category,
            Some(self.city.as_str()),
        )?)
    }

    /// Reset after a successful create
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
