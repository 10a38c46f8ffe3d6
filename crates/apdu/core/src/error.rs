//! Core error type for APDU operations
//!
//! The exchange engine itself never returns this type: it folds every
//! failure into its result value. The helper queries around it (UID, ATS)
//! and AID parsing do.

use crate::aid::AidError;
use crate::response::error::ResponseError;
use crate::response::status::StatusWord;
use crate::transport::TransportError;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The transport could not complete the exchange
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The reader answered with something that is not an APDU response
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// The card answered with a non-success status word
    #[error("Status error {status}: {}", .status.description())]
    Status {
        /// Status word that caused the error
        status: StatusWord,
    },

    /// An AID could not be parsed
    #[error("Invalid AID: {0}")]
    Aid(#[from] AidError),

    /// Context error with message and source error
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },
}

impl Error {
    /// Create a new error with context information
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a new status error
    pub const fn status(sw1: u8, sw2: u8) -> Self {
        Self::Status {
            status: StatusWord::new(sw1, sw2),
        }
    }

    /// The status word behind this error, if the card answered at all
    pub fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Context { source, .. } => source.status_word(),
            _ => None,
        }
    }
}

/// Result type for APDU operations
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for Result with APDU Errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context<S: Into<String>>(self, context: S) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_status() {
        let err: Result<()> = Err(Error::status(0x6A, 0x82));
        let err = err.context("Reading UID").unwrap_err();

        assert_eq!(err.status_word(), Some(StatusWord::new(0x6A, 0x82)));
        assert_eq!(err.to_string(), "Reading UID: Status error 6A 82: File not found");
    }

    #[test]
    fn test_transport_conversion() {
        let result: std::result::Result<(), TransportError> = Err(TransportError::NoCard);
        let err = result.context("Reading ATS").unwrap_err();

        assert_eq!(err.status_word(), None);
        assert_eq!(err.to_string(), "Reading ATS: Transport error: No card present");
    }
}
