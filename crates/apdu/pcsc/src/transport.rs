//! PC/SC transport implementation

use std::ffi::CString;
use std::fmt;

use aidscan_apdu_core::{CardTransport, TransportError};
use bytes::Bytes;
use pcsc::{Card, Context, Disposition};
use tracing::debug;

use crate::{config::PcscConfig, error::PcscError};

/// Transport implementation using PC/SC
pub struct PcscTransport {
    /// PC/SC context
    context: Context,
    /// Card connection, if established
    card: Option<Card>,
    /// Reader name
    reader_name: String,
    /// Configuration
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Create a transport for the specified reader
    ///
    /// A connection attempt is made right away; an empty reader is not an
    /// error here, [`connect`](Self::connect) can be retried later.
    pub(crate) fn new(context: Context, reader_name: &str, config: PcscConfig) -> Self {
        let mut transport = Self {
            context,
            card: None,
            reader_name: reader_name.to_string(),
            config,
        };

        if let Err(e) = transport.connect() {
            debug!(reader = %transport.reader_name, error = %e, "No card on open");
        }

        transport
    }

    /// Connect to the card in the reader, if not connected already
    pub fn connect(&mut self) -> Result<(), PcscError> {
        if self.card.is_some() {
            return Ok(());
        }

        let reader = CString::new(self.reader_name.as_str())
            .map_err(|_| PcscError::ReaderNotFound(self.reader_name.clone()))?;

        match self
            .context
            .connect(&reader, self.config.share_mode.into(), self.config.protocols)
        {
            Ok(card) => {
                debug!(reader = %self.reader_name, "Connected to card");
                self.card = Some(card);
                Ok(())
            }
            Err(pcsc::Error::NoSmartcard) => Err(PcscError::NoCard(self.reader_name.clone())),
            Err(pcsc::Error::UnknownReader) => {
                Err(PcscError::ReaderNotFound(self.reader_name.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Leave the card alone and drop the connection
    pub fn disconnect(&mut self) {
        if let Some(card) = self.card.take() {
            if let Err((_, e)) = card.disconnect(Disposition::LeaveCard) {
                debug!(reader = %self.reader_name, error = %e, "Disconnect failed");
            }
        }
    }

    /// Get the ATR of the current card
    pub fn atr(&self) -> Result<Vec<u8>, PcscError> {
        self.card.as_ref().map_or_else(
            || Err(PcscError::NoCard(self.reader_name.clone())),
            |card| {
                card.get_attribute_owned(pcsc::Attribute::AtrString)
                    .map_err(Into::into)
            },
        )
    }

    /// Get the reader name
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// Check if the transport is connected to a card
    pub const fn has_card(&self) -> bool {
        self.card.is_some()
    }

    /// Transmit a command to the card
    fn transmit_command(&mut self, command: &[u8]) -> Result<Bytes, PcscError> {
        self.connect()?;

        let card = self
            .card
            .as_ref()
            .ok_or_else(|| PcscError::NoCard(self.reader_name.clone()))?;

        let mut response_buffer = [0u8; pcsc::MAX_BUFFER_SIZE];
        let result = card
            .transmit(command, &mut response_buffer)
            .map(Bytes::copy_from_slice);

        match result {
            Ok(response) => Ok(response),
            // A reset or removed card invalidates the handle
            Err(e @ (pcsc::Error::ResetCard | pcsc::Error::RemovedCard)) => {
                self.card = None;

                if self.config.auto_reconnect && e == pcsc::Error::ResetCard {
                    debug!(reader = %self.reader_name, "Card reset, reconnecting");
                    self.connect()?;
                    let card = self
                        .card
                        .as_ref()
                        .ok_or_else(|| PcscError::NoCard(self.reader_name.clone()))?;
                    return card
                        .transmit(command, &mut response_buffer)
                        .map(Bytes::copy_from_slice)
                        .map_err(Into::into);
                }

                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl CardTransport for PcscTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        self.transmit_command(command).map_err(TransportError::from)
    }

    fn is_connected(&self) -> bool {
        self.card.is_some()
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        if let Some(card) = self.card.take() {
            if let Err((_, e)) = card.disconnect(Disposition::ResetCard) {
                debug!(reader = %self.reader_name, error = %e, "Reset disconnect failed");
            }
        }

        self.connect().map_err(Into::into)
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        self.disconnect();
    }
}
