//! Tests for the PcscTransport implementation against real hardware
//!
//! Every test skips when no PC/SC service, reader or card is around.

use aidscan_apdu_core::transport::CardTransport;
use aidscan_apdu_core::{CardInfo, select_application};
use aidscan_transport_pcsc::{PcscConfig, PcscDeviceManager, PcscTransport};

fn get_test_transport() -> Option<PcscTransport> {
    let manager = PcscDeviceManager::new().ok()?;
    let reader = manager.list_readers().ok()?.into_iter().find(|r| r.has_card())?;
    let mut transport = manager.open_reader_with_config(reader.name(), PcscConfig::default());
    transport.connect().ok()?;
    Some(transport)
}

#[test]
fn test_list_readers() {
    let manager = match PcscDeviceManager::new() {
        Ok(manager) => manager,
        Err(_) => {
            println!("Skipping test, PC/SC not available");
            return;
        }
    };

    match manager.list_readers() {
        Ok(readers) => {
            assert!(!readers.is_empty(), "An empty list is reported as an error");
            let first = manager.find_reader(None).unwrap();
            assert_eq!(first.name(), readers[0].name());
        }
        Err(e) => {
            assert!(e.is_no_reader(), "unexpected error: {e}");
            println!("Skipping test, no reader: {e}");
        }
    }
}

#[test]
fn test_unknown_reader() {
    let Ok(manager) = PcscDeviceManager::new() else {
        println!("Skipping test, PC/SC not available");
        return;
    };

    if let Err(e) = manager.find_reader(Some("No Such Reader 0000")) {
        assert!(e.is_no_reader());
    }
}

#[test]
fn test_transport_select() {
    let Some(mut transport) = get_test_transport() else {
        println!("Skipping test, no card available");
        return;
    };
    assert!(transport.is_connected());

    // PPSE is answered by payment cards and most phones; anything else must
    // still come back as a card answer, not a transport failure.
    let result = select_application(
        &mut transport,
        &hex::decode("325041592E5359532E4444463031").unwrap(),
    );
    assert!(!result.is_transport_failure(), "{:?}", result.error_detail);
    println!("PPSE: {result:?}");
}

#[test]
fn test_card_info() {
    let Some(mut transport) = get_test_transport() else {
        println!("Skipping test, no card available");
        return;
    };

    let atr = transport.atr().unwrap();
    assert!(!atr.is_empty());

    let info = CardInfo::collect(&mut transport, atr.into());
    println!("UID: {} ATR: {} phone: {}", info.uid_hex(), info.atr_hex(), info.is_phone);
}

#[test]
fn test_transport_reset() {
    let Some(mut transport) = get_test_transport() else {
        println!("Skipping test, no card available");
        return;
    };

    match transport.reset() {
        Ok(()) => assert!(transport.is_connected()),
        Err(e) => println!("Reset failed (might be expected): {e:?}"),
    }
}
