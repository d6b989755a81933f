// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types shared by every service.

/// Typed outcome of a failed remote call.
///
/// Every network operation surfaces exactly one of these to its caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Duplicate request: an identical operation is already in flight")]
    DuplicateRequest,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Empty response body")]
    EmptyBody,

    #[error("Decoding failure: {0}")]
    Decoding(String),

    /// The call was superseded by a newer call of the same class.
    #[error("Request superseded by a newer request")]
    Cancelled,
}

impl NetworkError {
    /// Whether the UI shell should offer the user a retry for this failure.
    pub fn should_offer_retry(&self) -> bool {
        matches!(
            self,
            NetworkError::Transport(_)
                | NetworkError::HttpStatus(_)
                | NetworkError::EmptyBody
                | NetworkError::Decoding(_)
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }
}

/// Token store failures.
///
/// A failed `remove` means the credential state is unknown.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Token store I/O error: {0}")]
    Io(String),

    #[error("Token encryption error: {0}")]
    Crypto(String),

    #[error("Token store is corrupt: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Errors from flows that touch both the network and the token store.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// The network error, when this failure came from a remote call.
    pub fn as_network(&self) -> Option<&NetworkError> {
        match self {
            AuthError::Network(e) => Some(e),
            AuthError::Storage(_) => None,
        }
    }
}

/// Result type alias for service operations
pub type Result<T, E = NetworkError> = std::result::Result<T, E>;
