//! Basic identification of the card or phone in the field
//!
//! UID and ATS come from the ACR122U-style `GET DATA` pseudo-APDU, which
//! PC/SC readers answer themselves without bothering the card. The ATR is
//! whatever the reader reported on connect.

use bytes::Bytes;
use tracing::debug;

use crate::aid::spaced_hex;
use crate::command::Command;
use crate::error::{Error, Result, ResultExt};
use crate::response::Response;
use crate::transport::{CardTransport, TransportError};

/// Reader pseudo-APDU class
const CLA_READER: u8 = 0xFF;
/// Reader GET DATA instruction
const INS_GET_DATA: u8 = 0xCA;

/// ATR prefixes seen on phones doing host card emulation
pub const PHONE_ATR_PREFIXES: &[&str] = &["3B8880", "3B8980", "3B8A80", "3B8F80", "3B80800101"];

/// Shown when the UID could not be read
pub const UNKNOWN_UID: &str = "UNKNOWN";

/// Read the UID of the card or phone in the field
pub fn read_uid<T>(transport: &mut T) -> Result<Bytes>
where
    T: CardTransport + ?Sized,
{
    get_data(transport, 0x00).context("Reading UID")
}

/// Read the ATS of an ISO 14443-4 card or phone
///
/// Readers that cannot report it may answer `90 00` with no data.
pub fn read_ats<T>(transport: &mut T) -> Result<Bytes>
where
    T: CardTransport + ?Sized,
{
    get_data(transport, 0x01).context("Reading ATS")
}

/// Any SW1 other than 90 is a failure; SW2 is not looked at
fn get_data<T>(transport: &mut T, p1: u8) -> Result<Bytes>
where
    T: CardTransport + ?Sized,
{
    let command = Command::new_with_le(CLA_READER, INS_GET_DATA, p1, 0x00, 0x00);
    let raw = transport.transmit_raw(&command.to_bytes())?;
    let response = Response::from_bytes(&raw)
        .map_err(|e| TransportError::MalformedResponse(e.received_len()))?;

    let status = response.status();
    if status.sw1 != 0x90 {
        return Err(Error::status(status.sw1, status.sw2));
    }
    Ok(response.into_payload())
}

/// Check whether an ATR looks like a phone in card emulation mode
pub fn is_phone_atr(atr: &[u8]) -> bool {
    let atr = hex::encode_upper(atr);
    PHONE_ATR_PREFIXES.iter().any(|prefix| atr.starts_with(prefix))
}

/// What could be learned about the device before scanning
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardInfo {
    /// UID, when the reader could read it
    pub uid: Option<Bytes>,
    /// ATR as reported by the reader
    pub atr: Bytes,
    /// ATS, when available
    pub ats: Option<Bytes>,
    /// Whether the ATR matches a known phone pattern
    pub is_phone: bool,
}

impl CardInfo {
    /// Query UID and ATS through the transport; failures become `None`
    pub fn collect<T>(transport: &mut T, atr: Bytes) -> Self
    where
        T: CardTransport + ?Sized,
    {
        let uid = read_uid(transport)
            .inspect_err(|e| debug!(error = %e, "UID unavailable"))
            .ok();
        let ats = read_ats(transport)
            .inspect_err(|e| debug!(error = %e, "ATS unavailable"))
            .ok()
            .filter(|ats| !ats.is_empty());

        Self {
            uid,
            is_phone: is_phone_atr(&atr),
            atr,
            ats,
        }
    }

    /// UID as compact uppercase hex, or `UNKNOWN`
    pub fn uid_hex(&self) -> String {
        uid_label(self.uid.as_deref())
    }

    /// ATR as spaced uppercase hex
    pub fn atr_hex(&self) -> String {
        spaced_hex(&self.atr)
    }

    /// ATS as spaced uppercase hex
    pub fn ats_hex(&self) -> Option<String> {
        self.ats.as_deref().map(spaced_hex)
    }
}

/// Label a UID for display and change detection
pub fn uid_label(uid: Option<&[u8]>) -> String {
    uid.map_or_else(|| UNKNOWN_UID.to_string(), hex::encode_upper)
}
