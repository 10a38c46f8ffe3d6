use aidscan_apdu_core::{
    Aid, Bytes, CardInfo, Catalog, scan_catalog, select_application, spaced_hex,
};
use aidscan_transport_pcsc::PcscTransport;
use tracing::{debug, info};

use crate::utils::display;

/// Print device info, probe every catalog category, then the summary
pub fn scan_phone(transport: &mut PcscTransport, catalog: &Catalog) {
    println!("\n{}", display::banner("Phone NFC App AID Scanner"));

    let atr = transport
        .atr()
        .inspect_err(|e| debug!(error = %e, "ATR unavailable"))
        .map(Bytes::from)
        .unwrap_or_default();
    let info = CardInfo::collect(transport, atr);
    println!("\n{}", display::card_info(&info));

    let report = scan_catalog(transport, catalog, |scan| {
        println!("{}", display::category_scan(scan));
    });
    info!(
        found = report.total_found(),
        probed = report.total_probed(),
        "Scan finished"
    );

    println!("{}", display::summary(&report));
}

/// SELECT one AID and say whether the device has it
pub fn test_single_aid(transport: &mut PcscTransport, aid: &Aid) {
    println!("\n  Testing AID: {aid}");

    let result = select_application(transport, aid.as_bytes());

    if result.success {
        println!(
            "  {}",
            display::success(&format!("AID {aid} is PRESENT on this device!"))
        );
        if !result.response_data.is_empty() {
            println!("  Response data: {}", spaced_hex(&result.response_data));
        }
        println!("  SW: {}", result.status_text());
    } else {
        println!(
            "  {}",
            display::error(&format!("AID {aid} not found (SW={})", result.status_text()))
        );
    }
}
