use crate::Notice;

use gsb_client::ClientError;
use gsb_core::CoreError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Unauthorized: {message} {location}")]
    Unauthorized {
        message: String,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Client {
        #[source]
        source: ClientError,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Core {
        #[source]
        source: CoreError,
        location: ErrorLocation,
    },

    #[error("Directory is no longer mounted {location}")]
    Closed { location: ErrorLocation },

    #[error("Logger error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },
}

impl ViewError {
    #[track_caller]
    pub fn validation<S: Into<String>>(field: &str, message: S) -> Self {
        ViewError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        ViewError::Unauthorized {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn closed() -> Self {
        ViewError::Closed {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn logger<S: Into<String>>(message: S) -> Self {
        ViewError::Logger {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Input field the error is attributed to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Inline error message for the user
    pub fn notice(&self) -> Notice {
        let message = match self {
            Self::Validation { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::Logger { message, .. } => message.clone(),
            Self::Client { source, .. } => source.user_message(),
            Self::Core { .. } => "An unexpected error occurred".to_string(),
            Self::Closed { .. } => "The directory is no longer available".to_string(),
        };
        Notice::error(message)
    }
}

impl From<ClientError> for ViewError {
    #[track_caller]
    fn from(source: ClientError) -> Self {
        ViewError::Client {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for ViewError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        match source {
            CoreError::Validation { message, field, .. } => ViewError::Validation {
                message,
                field,
                location: ErrorLocation::from(Location::caller()),
            },
            other => ViewError::Core {
                source: other,
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewError>;
