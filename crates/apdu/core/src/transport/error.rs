//! Error types specific to card transport

use thiserror::Error;

/// Transport error type
///
/// A transport error means the command never produced a usable card answer:
/// the card is gone, the reader is unplugged, or the channel broke. It never
/// describes what the card thought of the command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection error
    #[error("Failed to connect to device")]
    Connection,

    /// No card or phone is present in the reader field
    #[error("No card present")]
    NoCard,

    /// The card left the field during the exchange
    #[error("Card was removed")]
    CardRemoved,

    /// Transmission error
    #[error("Failed to transmit data")]
    Transmission,

    /// Device error
    #[error("Device error")]
    Device,

    /// Buffer too small
    #[error("Buffer too small")]
    BufferTooSmall,

    /// The reader answered with fewer than the two status bytes
    #[error("Malformed response: {0} bytes, expected at least 2")]
    MalformedResponse(usize),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Cancelled operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Other error with message
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Check whether the error means there is simply nothing in the field
    pub const fn is_card_absent(&self) -> bool {
        matches!(self, Self::NoCard | Self::CardRemoved)
    }
}
