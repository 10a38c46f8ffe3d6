//! Core types for probing ISO/IEC 7816-4 applications by AID
//!
//! This crate provides the exchange engine behind `aidscan` and the types it
//! is built from.
//!
//! ## Overview
//!
//! - [`select_application`] sends `SELECT` by AID through a [`CardTransport`],
//!   follows a `61 XX` with one `GET RESPONSE`, and reports the outcome as a
//!   [`SelectResult`] that tells a refusal apart from a dead channel
//! - [`StatusWord`] and [`classify`] interpret SW1-SW2
//! - [`Aid`] and the [`catalog`] of well-known AIDs to probe
//! - [`scan_category`] and [`scan_catalog`] run the engine over a catalog
//! - [`CardInfo`] reads UID and ATS through the reader's pseudo-APDUs
//! - [`PresenceTracker`] decides when a device on the reader is new
//!
//! Transports are supplied by other crates; nothing here talks to hardware.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod aid;
pub mod card_info;
pub mod catalog;
pub mod command;
pub mod error;
pub mod presence;
pub mod response;
pub mod scan;
pub mod select;
pub mod transport;

pub use aid::{Aid, AidError, spaced_hex};
pub use card_info::CardInfo;
pub use catalog::{AidCatalogEntry, Catalog, Category};
pub use command::{Command, ExpectedLength};
pub use error::{Error, Result, ResultExt};
pub use presence::{PresenceEvent, PresenceTracker};
pub use response::Response;
pub use response::status::{StatusClass, StatusWord, classify};
pub use scan::{CategoryScan, Found, Miss, ScanReport, scan_catalog, scan_category};
pub use select::{SelectKind, SelectResult, select_application};
pub use transport::{CardTransport, TransportError};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    // Core types
    pub use crate::{Aid, Bytes, BytesMut, Error, ResultExt};

    // Exchange engine
    pub use crate::{SelectKind, SelectResult, select_application};

    // Command and response
    pub use crate::Command;
    pub use crate::Response;
    pub use crate::response::status::{StatusClass, StatusWord, common as status};

    // Scanning
    pub use crate::{Catalog, CategoryScan, ScanReport, scan_catalog, scan_category};
    pub use crate::{CardInfo, PresenceEvent, PresenceTracker};

    // Transport layer
    pub use crate::{CardTransport, TransportError};
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // Test the basic types are re-exported correctly
    #[test]
    fn test_reexports() {
        let cmd = Command::select_by_aid(&hex!("A0 00 00 00 03"));
        assert_eq!(cmd.ins, 0xA4);
        assert_eq!(cmd.p1, 0x04);

        let data = Bytes::from_static(&[0x6F, 0x00, 0x90, 0x00]);
        let resp = Response::from_bytes(&data).unwrap();
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
        assert_eq!(resp.payload().as_ref(), &[0x6F, 0x00]);
        assert_eq!(classify(0x61, 0x10), StatusClass::MoreData(0x10));
    }
}
