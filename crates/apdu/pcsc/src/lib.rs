//! PC/SC transport for the aidscan APDU engine
//!
//! This crate implements the `CardTransport` trait from `aidscan-apdu-core`
//! on top of the PC/SC API, so contactless readers such as the ACR122U can
//! be used to probe cards and phones.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use aidscan_apdu_core::select_application;
//! use aidscan_transport_pcsc::PcscDeviceManager;
//!
//! let manager = PcscDeviceManager::new()?;
//! let reader = manager.find_reader(None)?;
//! println!("Connecting to reader: {}", reader.name());
//!
//! let mut transport = manager.open_reader(reader.name());
//! transport.connect()?;
//!
//! let result = select_application(&mut transport, &[0xA0, 0x00, 0x00, 0x00, 0x03, 0x10, 0x10]);
//! println!("Selected: {}", result.success);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod error;
mod manager;
mod reader;
mod transport;

pub use config::{PcscConfig, ShareMode};
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use transport::PcscTransport;

// Re-export some pcsc types for convenience
pub use pcsc::{Protocol, Protocols};
