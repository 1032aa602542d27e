//! Error types for spamc
//!
//! Provides a unified error type for composing requests and parsing
//! responses.

use thiserror::Error;

use crate::protocol::Status;

/// Result type alias using SpamdError
pub type Result<T> = std::result::Result<T, SpamdError>;

/// Unified error type for spamc operations
#[derive(Debug, Error)]
pub enum SpamdError {
    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Bad response: {0}")]
    BadResponse(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    // -------------------------------------------------------------------------
    // Server Status Errors
    // -------------------------------------------------------------------------
    /// The server answered with a non-OK status code
    #[error("{} ({}): {message}", status.name(), status.description())]
    Status { status: Status, message: String },

    // -------------------------------------------------------------------------
    // Body Errors
    // -------------------------------------------------------------------------
    #[error("Decompression failed: {0}")]
    Decompress(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Flat tag for every error kind, one per non-OK status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadResponse,
    BadRequest,
    Usage,
    DataErr,
    NoInput,
    NoUser,
    NoHost,
    Unavailable,
    Software,
    OsErr,
    OsFile,
    CantCreate,
    IoErr,
    TempFail,
    Protocol,
    NoPerm,
    Config,
    Timeout,
    Decompress,
    Io,
}

impl SpamdError {
    /// Get the kind tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpamdError::BadResponse(_) => ErrorKind::BadResponse,
            SpamdError::BadRequest(_) => ErrorKind::BadRequest,
            // Status errors are only ever built from non-OK codes
            SpamdError::Status { status, .. } => {
                status.error_kind().unwrap_or(ErrorKind::BadResponse)
            }
            SpamdError::Decompress(_) => ErrorKind::Decompress,
            SpamdError::Io(_) => ErrorKind::Io,
        }
    }

    /// Get the message text supplied by the server, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            SpamdError::Status { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Get the status code behind this error, if it came from the server
    pub fn status(&self) -> Option<Status> {
        match self {
            SpamdError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
