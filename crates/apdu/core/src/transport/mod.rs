//! Transport traits for APDU communication with cards
//!
//! This module provides the abstraction the exchange engine talks through.
//! Concrete bindings (PC/SC, native CCID, test doubles) live elsewhere.

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

/// Trait for basic card transports
///
/// A transport is responsible for sending and receiving raw APDU bytes.
/// It has no knowledge of command structure or protocol details such as
/// GET RESPONSE. The returned bytes are the card's payload followed by
/// SW1 and SW2.
///
/// Methods take `&mut self`: a card channel carries one exchange at a time,
/// so a handle cannot be shared between concurrent exchanges.
pub trait CardTransport: Send + fmt::Debug {
    /// Send raw APDU bytes to card and return response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = %hex::encode_upper(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode_upper(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = %e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    /// This is the method that concrete implementations should override
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Check if the transport is connected to a physical card
    fn is_connected(&self) -> bool;

    /// Reset the transport connection
    fn reset(&mut self) -> Result<(), TransportError>;
}

impl<T: CardTransport + ?Sized> CardTransport for &mut T {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).transmit_raw(command)
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).do_transmit_raw(command)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        (**self).reset()
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
#[allow(missing_docs, unreachable_pub)]
pub struct MockTransport {
    /// Scripted replies, consumed in order; the last one repeats
    pub responses: std::collections::VecDeque<Result<Bytes, TransportError>>,
    /// Commands that were sent
    pub commands: Vec<Bytes>,
    /// Whether the transport is connected
    pub connected: bool,
    /// Drop the connection once this many commands have been sent
    pub disconnect_after: Option<usize>,
}

#[cfg(test)]
#[allow(unreachable_pub)]
impl MockTransport {
    /// Create a new mock transport replaying the given replies
    pub fn new(responses: Vec<Result<Bytes, TransportError>>) -> Self {
        Self {
            responses: responses.into(),
            commands: Vec::new(),
            connected: true,
            disconnect_after: None,
        }
    }

    /// Create a new mock transport that always returns the given raw response
    pub fn with_response(response: &[u8]) -> Self {
        Self::new(vec![Ok(Bytes::copy_from_slice(response))])
    }

    /// Create a new mock transport that always returns success (90 00)
    pub fn with_success() -> Self {
        Self::with_response(&[0x90, 0x00])
    }

    /// Create a new mock transport that always fails
    pub fn with_error(error: TransportError) -> Self {
        Self::new(vec![Err(error)])
    }
}

#[cfg(test)]
impl CardTransport for MockTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.connected {
            return Err(TransportError::Connection);
        }

        self.commands.push(Bytes::copy_from_slice(command));
        if self.disconnect_after == Some(self.commands.len()) {
            self.connected = false;
        }

        match self.responses.len() {
            0 => Err(TransportError::Transmission),
            1 => self.responses[0].clone(),
            _ => self
                .responses
                .pop_front()
                .unwrap_or(Err(TransportError::Transmission)),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        self.commands.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_replays_in_order() {
        let mut transport = MockTransport::new(vec![
            Ok(Bytes::from_static(&[0x61, 0x02])),
            Ok(Bytes::from_static(&[0x01, 0x02, 0x90, 0x00])),
        ]);

        assert_eq!(transport.transmit_raw(&[0x00]).unwrap().as_ref(), &[0x61, 0x02]);
        assert_eq!(
            transport.transmit_raw(&[0x01]).unwrap().as_ref(),
            &[0x01, 0x02, 0x90, 0x00]
        );
        // The last reply sticks.
        assert_eq!(
            transport.transmit_raw(&[0x02]).unwrap().as_ref(),
            &[0x01, 0x02, 0x90, 0x00]
        );
        assert_eq!(transport.commands.len(), 3);
    }

    #[test]
    fn test_disconnected_mock() {
        let mut transport = MockTransport::with_success();
        transport.connected = false;

        assert_eq!(transport.transmit_raw(&[0x00]), Err(TransportError::Connection));
        assert!(transport.commands.is_empty());

        transport.reset().unwrap();
        assert!(transport.is_connected());
    }

    #[test]
    fn test_forwarding_through_mut_ref() {
        fn send<T: CardTransport>(mut transport: T) -> Bytes {
            transport.transmit_raw(&[0x00, 0xA4]).unwrap()
        }

        let mut transport = MockTransport::with_success();
        assert_eq!(send(&mut transport).as_ref(), &[0x90, 0x00]);
        assert_eq!(transport.commands.len(), 1);
    }
}
