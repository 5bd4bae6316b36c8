//! Error types and result types for client operations.
//!
//! Every fallible operation returns [`ClientResult<T>`]. Errors carry a status
//! code in the style of the hosted service (see [`ClientError::code`]) so test
//! code can assert on the same codes it would see against a live backend.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors raised by the emulated client.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// A path lookup failed because an intermediate or final segment is absent.
    /// The argument is the path that could not be resolved.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A document with the given path already exists.
    ///
    /// This is the only kind of conflict the emulation raises.
    #[error("Document already exists: {0}")]
    AlreadyExists(String),
    /// A query referenced a field that a document in the result set lacks.
    #[error("Field {field} not found in document {document}")]
    FieldNotFound {
        /// The field name used by the query.
        field: String,
        /// The path of the offending document.
        document: String,
    },
    /// An argument was rejected: unsupported operator, malformed path segment,
    /// or a path that descends through a non-map value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Returns the status code associated with this error.
    pub fn code(&self) -> u16 {
        match self {
            ClientError::NotFound(_) | ClientError::FieldNotFound { .. } => 404,
            ClientError::AlreadyExists(_) => 409,
            ClientError::InvalidArgument(_) => 400,
            ClientError::Serialization(_) => 500,
        }
    }

    /// Returns `true` for errors in the conflict family (code 409).
    pub fn is_conflict(&self) -> bool {
        self.code() == 409
    }

    /// Returns `true` for structural lookup failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_) | ClientError::FieldNotFound { .. })
    }
}

/// A specialized `Result` type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl From<BsonError> for ClientError {
    fn from(err: BsonError) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for ClientError {
    fn from(err: SerdeJsonError) -> Self {
        ClientError::Serialization(err.to_string())
    }
}
