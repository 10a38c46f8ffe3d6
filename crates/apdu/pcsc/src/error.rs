//! Error types for PC/SC transport

use aidscan_apdu_core::TransportError;

/// PC/SC-specific errors
#[derive(Debug, thiserror::Error)]
pub enum PcscError {
    /// PC/SC error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers available
    #[error("No readers available")]
    NoReadersAvailable,

    /// Reader not found
    #[error("Reader not found: {0}")]
    ReaderNotFound(String),

    /// No card present in reader
    #[error("No card present in reader: {0}")]
    NoCard(String),
}

impl PcscError {
    /// Check whether the error just means nothing is on the reader
    pub const fn is_no_card(&self) -> bool {
        matches!(
            self,
            Self::NoCard(_) | Self::Pcsc(pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard)
        )
    }

    /// Check whether the error means the PC/SC service or the reader itself
    /// is missing, as opposed to a card problem
    pub const fn is_no_reader(&self) -> bool {
        matches!(
            self,
            Self::NoReadersAvailable
                | Self::ReaderNotFound(_)
                | Self::Pcsc(
                    pcsc::Error::NoReadersAvailable
                        | pcsc::Error::NoService
                        | pcsc::Error::ServiceStopped
                        | pcsc::Error::UnknownReader
                        | pcsc::Error::ReaderUnavailable
                )
        )
    }
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::NoCard(_) | PcscError::Pcsc(pcsc::Error::NoSmartcard) => Self::NoCard,
            PcscError::Pcsc(pcsc::Error::RemovedCard) => Self::CardRemoved,
            PcscError::Pcsc(pcsc::Error::Timeout) => Self::Timeout,
            PcscError::Pcsc(pcsc::Error::Cancelled) => Self::Cancelled,
            PcscError::Pcsc(pcsc::Error::InsufficientBuffer) => Self::BufferTooSmall,
            PcscError::Pcsc(pcsc::Error::ResetCard) => Self::Connection,
            e if e.is_no_reader() => Self::Device,
            e => Self::Other(e.to_string()),
        }
    }
}
