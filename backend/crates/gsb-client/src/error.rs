use gsb_core::CoreError;

use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Broad classes the view layer turns into inline messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad credentials or rejected sign-up
    Authentication,
    /// Mutation of a record the caller does not own
    Authorization,
    /// Store, auth service or feed unreachable; safe to try again
    TransientNetwork,
    Validation,
    NotFound,
    Internal,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error: {message} (status: {status}, code: {code}) {location}")]
    Api {
        status: u16,
        code: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON parse error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("Authentication failed: {message} {location}")]
    Authentication {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unauthorized: {message} {location}")]
    Unauthorized {
        message: String,
        location: ErrorLocation,
    },

    #[error("Not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("Empty result: {message} {location}")]
    EmptyResult {
        message: String,
        location: ErrorLocation,
    },

    #[error("Session storage error at {path}: {source} {location}")]
    SessionStorage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Change feed for '{collection}' closed {location}")]
    FeedClosed {
        collection: String,
        location: ErrorLocation,
    },

    #[error("Change feed lagged, missed {missed} events {location}")]
    FeedLagged { missed: u64, location: ErrorLocation },

    #[error("{source} {location}")]
    Core {
        #[source]
        source: CoreError,
        location: ErrorLocation,
    },
}

impl ClientError {
    /// Convert reqwest error with context
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ClientError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Convert JSON error with context
    #[track_caller]
    pub fn from_json(err: serde_json::Error) -> Self {
        ClientError::Json {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    #[track_caller]
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        ClientError::Authentication {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        ClientError::Unauthorized {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        ClientError::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// A successful response that should have returned a row did not
    #[track_caller]
    pub fn empty_result<S: Into<String>>(message: S) -> Self {
        ClientError::EmptyResult {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn session_storage(path: PathBuf, source: std::io::Error) -> Self {
        ClientError::SessionStorage {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http { source, .. } if source.is_decode() => ErrorKind::Internal,
            Self::Http { .. } => ErrorKind::TransientNetwork,
            Self::Api { status, .. } => match *status {
                401 | 403 => ErrorKind::Authorization,
                404 => ErrorKind::NotFound,
                408 | 429 | 500..=599 => ErrorKind::TransientNetwork,
                400 | 409 | 422 => ErrorKind::Validation,
                _ => ErrorKind::Internal,
            },
            Self::Json { .. } | Self::EmptyResult { .. } | Self::SessionStorage { .. } => {
                ErrorKind::Internal
            }
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::FeedClosed { .. } | Self::FeedLagged { .. } => ErrorKind::TransientNetwork,
            Self::Core {
                source: CoreError::Validation { .. },
                ..
            } => ErrorKind::Validation,
            Self::Core { .. } => ErrorKind::Internal,
        }
    }

    /// Transient failures of idempotent requests may be retried
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { source, .. } => !source.is_decode(),
            Self::Api { status, .. } => matches!(*status, 408 | 429 | 500..=599),
            _ => false,
        }
    }

    /// Human-readable message without the source location, for inline display
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. }
            | Self::Authentication { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::NotFound { message, .. } => message.clone(),
            Self::Http { .. } | Self::FeedClosed { .. } | Self::FeedLagged { .. } => {
                "Unable to reach the server. Please try again.".to_string()
            }
            Self::Core {
                source: CoreError::Validation { message, .. },
                ..
            } => message.clone(),
            _ => "An unexpected error occurred".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ClientError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        ClientError::from_json(err)
    }
}

impl From<CoreError> for ClientError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        ClientError::Core {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
