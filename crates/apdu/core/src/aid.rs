//! Application identifiers
//!
//! An AID names an application on an ISO 7816-4 card or an HCE service on a
//! phone. Registered AIDs are a 5-byte RID followed by up to 11 bytes of
//! PIX; the SELECT command itself accepts anything from 1 to 16 bytes and
//! cards may match on a partial AID.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use derive_more::Deref;
use thiserror::Error;

/// Error returned when an AID cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AidError {
    /// No bytes at all
    #[error("AID is empty")]
    Empty,

    /// More bytes than ISO 7816-4 allows
    #[error("AID is {0} bytes long, at most {max} allowed", max = Aid::MAX_LEN)]
    TooLong(usize),

    /// Hex text that does not decode
    #[error("AID is not valid hex: {0}")]
    InvalidHex(String),
}

/// An application identifier, 1 to 16 bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref)]
pub struct Aid(Bytes);

impl Aid {
    /// Longest AID ISO 7816-4 allows
    pub const MAX_LEN: usize = 16;
    /// Shortest registered AID (a bare RID)
    pub const MIN_REGISTERED_LEN: usize = 5;

    /// Wrap a static byte string without checking it
    ///
    /// Meant for compile-time tables; use [`Aid::new`] for anything else.
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self(Bytes::from_static(bytes))
    }

    /// Build an AID from raw bytes, checking the 1 to 16 byte range
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self, AidError> {
        let bytes = bytes.into();
        match bytes.len() {
            0 => Err(AidError::Empty),
            len if len > Self::MAX_LEN => Err(AidError::TooLong(len)),
            _ => Ok(Self(bytes)),
        }
    }

    /// Parse hex text such as `A0000000031010`, `A0 00 00 00 03 10 10`,
    /// `A0-00-00` or `a0:00:00`
    pub fn from_hex(text: &str) -> Result<Self, AidError> {
        let compact: String = text
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | ':') && !c.is_whitespace())
            .collect();

        let bytes = hex::decode(&compact).map_err(|e| AidError::InvalidHex(e.to_string()))?;
        Self::new(bytes)
    }

    /// Check the registered-AID length rule (5 to 16 bytes)
    pub fn is_well_formed(&self) -> bool {
        (Self::MIN_REGISTERED_LEN..=Self::MAX_LEN).contains(&self.0.len())
    }

    /// The raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Uppercase hex with a space between bytes, e.g. `A0 00 00 00 03`
    pub fn spaced(&self) -> String {
        spaced_hex(&self.0)
    }
}

/// Bytes as uppercase hex with a space between bytes
pub fn spaced_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Aid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(&self.0))
    }
}

impl FromStr for Aid {
    type Err = AidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Aid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Aid> for Bytes {
    fn from(aid: Aid) -> Self {
        aid.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_from_hex_separators() {
        let expected = hex!("A0 00 00 00 03 10 10");
        for text in [
            "A0000000031010",
            "a0000000031010",
            "A0 00 00 00 03 10 10",
            "A0-00-00-00-03-10-10",
            "A0:00:00:00:03:10:10",
            " A0 00 00 00 03 10 10 ",
        ] {
            let aid = Aid::from_hex(text).unwrap();
            assert_eq!(aid.as_bytes(), &expected, "{text}");
        }
    }

    #[test]
    fn test_from_hex_rejects() {
        assert_eq!(Aid::from_hex(""), Err(AidError::Empty));
        assert_eq!(Aid::from_hex(" - "), Err(AidError::Empty));
        assert!(matches!(Aid::from_hex("A0F"), Err(AidError::InvalidHex(_))));
        assert!(matches!(Aid::from_hex("ZZ"), Err(AidError::InvalidHex(_))));
        assert_eq!(
            Aid::from_hex("000102030405060708090A0B0C0D0E0F10"),
            Err(AidError::TooLong(17))
        );
    }

    #[test]
    fn test_well_formed() {
        const KOREA_SMART_CARD: [u8; 5] = hex!("D4 10 00 00 01");
        const PREFIX: [u8; 2] = hex!("F0 01");

        assert!(Aid::from_static(&KOREA_SMART_CARD).is_well_formed());
        assert!(Aid::from_static(&[0u8; 16]).is_well_formed());
        assert!(!Aid::from_static(&PREFIX).is_well_formed());
    }

    #[test]
    fn test_formatting() {
        let aid: Aid = "d2760000850101".parse().unwrap();
        assert_eq!(aid.to_string(), "D2760000850101");
        assert_eq!(aid.spaced(), "D2 76 00 00 85 01 01");
        assert_eq!(spaced_hex(&[0x3B, 0x8A, 0x80]), "3B 8A 80");
        assert_eq!(spaced_hex(&[]), "");
        assert_eq!(aid.len(), 7);
    }
}
