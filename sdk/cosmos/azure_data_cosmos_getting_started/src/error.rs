// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

//! Error types returned by the document store and the getting-started scenario.

pub use azure_core::http::StatusCode;

use crate::scenario::Stage;

/// A specialized [`Result`](std::result::Result) whose error type is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while talking to the document store or driving the scenario.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The store rejected the operation with an HTTP status.
    ///
    /// A [`StatusCode::NotFound`] status is the not-found signal; check for it with [`Error::is_not_found`].
    #[error("{status:?}: {message}")]
    Service { status: StatusCode, message: String },

    /// The Cosmos DB client failed without a response from the service, for example on a transport or credential failure.
    #[error(transparent)]
    Cosmos(azure_core::Error),

    /// A document could not be converted to or from JSON.
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The endpoint or credential supplied to the client is unusable.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The store was used after [`DocumentStore::dispose`](crate::store::DocumentStore::dispose) released it.
    #[error("the client has been disposed")]
    Disposed,

    /// A scenario step was invoked before the steps it depends on.
    #[error("scenario step requires stage {expected:?}, but the scenario is at {actual:?}")]
    InvalidStage { expected: Stage, actual: Stage },

    /// The scenario report could not be written.
    #[error("failed to write the scenario report: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a [`Error::Service`] with the given status and diagnostic message.
    pub fn service(status: StatusCode, message: impl Into<String>) -> Self {
        Error::Service {
            status,
            message: message.into(),
        }
    }

    /// Returns the status code reported by the store, if this error came from the store.
    pub fn http_status(&self) -> Option<StatusCode> {
        match self {
            Error::Service { status, .. } => Some(*status),
            Error::Cosmos(error) => error.http_status(),
            _ => None,
        }
    }

    /// Returns `true` if this is the store's not-found signal.
    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(StatusCode::NotFound)
    }
}

impl From<azure_core::Error> for Error {
    fn from(error: azure_core::Error) -> Self {
        match error.http_status() {
            Some(status) => Error::Service {
                status,
                message: error.to_string(),
            },
            None => Error::Cosmos(error),
        }
    }
}
