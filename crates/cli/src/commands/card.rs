use aidscan_apdu_core::{Bytes, CardInfo, Catalog, select_application};
use aidscan_transport_pcsc::PcscTransport;
use tracing::debug;

use crate::utils::display;

/// Basic card mode: UID, ATR and every entry of the basic list, hit or not
pub fn read_card(transport: &mut PcscTransport) {
    println!("{}", display::section_title("Card detected"));

    let atr = transport
        .atr()
        .inspect_err(|e| debug!(error = %e, "ATR unavailable"))
        .map(Bytes::from)
        .unwrap_or_default();
    let info = CardInfo::collect(transport, atr);
    println!("  Card UID: {}", info.uid_hex());
    println!("  ATR: {}", info.atr_hex());

    println!("{}", display::section_title("AID scan"));
    let mut found = Vec::new();

    for category in Catalog::basic().categories() {
        for entry in &category.entries {
            let spaced = entry.aid.spaced();
            let result = select_application(transport, entry.aid.as_bytes());
            println!("  {}", display::select_line(&entry.name, &spaced, &result));
            if result.success {
                found.push(entry.clone());
            }
        }
    }

    if found.is_empty() {
        println!("\n  {}", display::warning("No known AIDs were found."));
        println!("     Ask the card issuer for the card's AID.");
    } else {
        println!("\n  📋 AIDs found: {}", found.len());
        for entry in &found {
            println!("     - {}: {}", entry.name, entry.aid);
        }
    }
}
