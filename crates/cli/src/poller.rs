//! Reader polling loop
//!
//! Connects to the reader on a fixed interval, reads the UID of whatever is
//! on it, and hands each new device to the caller. Runs on a blocking thread;
//! the stop flag is checked once per poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use aidscan_apdu_core::card_info::{read_uid, uid_label};
use aidscan_apdu_core::{PresenceEvent, PresenceTracker};
use aidscan_transport_pcsc::{PcscDeviceManager, PcscError, PcscTransport};
use tracing::{debug, info, warn};

use crate::utils::ScanConfig;
use crate::utils::display;

/// Poll until `stop` is set or the reader goes away
pub fn run<F>(
    manager: &PcscDeviceManager,
    reader: &str,
    config: &ScanConfig,
    stop: &AtomicBool,
    mut on_new_device: F,
) -> Result<(), PcscError>
where
    F: FnMut(&mut PcscTransport),
{
    let mut tracker = PresenceTracker::new();

    while !stop.load(Ordering::Relaxed) {
        let mut transport = manager.open_reader_with_config(reader, config.pcsc.clone());

        match transport.connect() {
            Ok(()) => {
                let uid = read_uid(&mut transport)
                    .inspect_err(|e| debug!(error = %e, "UID unavailable"))
                    .ok();
                let label = uid_label(uid.as_deref());

                if let PresenceEvent::NewCard(uid) = tracker.observe_card(&label) {
                    info!(uid = %uid, "New device");
                    on_new_device(&mut transport);

                    if !config.continuous {
                        println!("\nScan complete. Remove device and tap again for re-scan...");
                        println!("(or Ctrl+C to quit)");
                    }
                }
            }
            Err(e) if e.is_no_card() => {
                if tracker.observe_absent() == PresenceEvent::Removed {
                    println!("\n{}", display::info("[Device removed]"));
                }
            }
            Err(e) if e.is_no_reader() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Connection failed");
                tracker.reset();
            }
        }

        transport.disconnect();
        thread::sleep(config.interval);
    }

    Ok(())
}
