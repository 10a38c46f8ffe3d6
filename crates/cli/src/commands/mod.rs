use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use aidscan_apdu_core::Catalog;
use aidscan_transport_pcsc::PcscDeviceManager;
use tracing::{debug, info};

mod card;
mod scan;

pub use card::read_card;
pub use scan::{scan_phone, test_single_aid};

use crate::poller;
use crate::utils::{Profile, ScanConfig, display, reader};

/// Wait for devices on the reader and run the configured profile on each
///
/// Returns when Ctrl+C is pressed or the reader disappears.
pub async fn run_polling(manager: PcscDeviceManager, config: ScanConfig) -> Result<(), Box<dyn Error>> {
    let reader = reader::select_reader(&manager, config.reader.as_deref())?;

    let title = match config.profile {
        Profile::BasicCard => "NFC AID Reader (ACR122U)",
        _ => "Phone NFC AID Scanner (ACR122U)",
    };
    println!("{}", display::banner(title));
    println!("Reader: {}", reader.name());
    println!("Waiting for a device... (Ctrl+C to quit)\n");
    info!(reader = %reader.name(), "Polling reader");

    let stop = Arc::new(AtomicBool::new(false));
    let stop_signal = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl+C received");
            stop_signal.store(true, Ordering::Relaxed);
        }
    });

    let outcome = tokio::task::spawn_blocking(move || {
        poller::run(&manager, reader.name(), &config, &stop, |transport| {
            match &config.profile {
                Profile::Full => {
                    scan_phone(transport, &Catalog::full());
                }
                Profile::Quick => {
                    scan_phone(transport, &Catalog::quick());
                }
                Profile::Single(aid) => {
                    test_single_aid(transport, aid);
                }
                Profile::BasicCard => {
                    read_card(transport);
                }
            }
        })
    })
    .await?;

    if let Err(e) = outcome {
        reader::print_no_reader(&e);
        return Err(e.into());
    }

    println!("\nStopped.");
    Ok(())
}
