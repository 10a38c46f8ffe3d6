//! Error types specific to APDU responses

use thiserror::Error;

/// Error for APDU response processing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// Incomplete response (less than 2 bytes)
    #[error("Incomplete response: {0} bytes")]
    Incomplete(usize),
}

impl ResponseError {
    /// Number of bytes that were actually received
    pub const fn received_len(&self) -> usize {
        match self {
            Self::Incomplete(len) => *len,
        }
    }
}
