use aidscan_transport_pcsc::{PcscDeviceManager, PcscError, PcscReader};

use super::display;

/// Pick the reader to poll: by name if given, else the first one
///
/// Reader-level failures get the driver checklist printed before the error
/// is passed on.
pub fn select_reader(
    manager: &PcscDeviceManager,
    reader_name: Option<&str>,
) -> Result<PcscReader, Box<dyn std::error::Error>> {
    match manager.find_reader(reader_name) {
        Ok(reader) => Ok(reader),
        Err(e) => {
            if e.is_no_reader() {
                print_no_reader(&e);
            }
            Err(e.into())
        }
    }
}

/// List all available readers
pub fn list_readers(manager: &PcscDeviceManager) -> Result<(), Box<dyn std::error::Error>> {
    let readers = match manager.list_readers() {
        Ok(readers) => readers,
        Err(PcscError::NoReadersAvailable) => {
            println!("{}", display::warning("No readers found!"));
            println!("\n{}", display::driver_checklist());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Available readers:");
    for (i, reader) in readers.iter().enumerate() {
        println!("{}", display::reader_line(i + 1, reader));
    }

    Ok(())
}

/// Error line plus the driver checklist
pub fn print_no_reader(error: &PcscError) {
    println!("{}", display::error(&format!("No NFC reader found: {error}")));
    println!("\n{}", display::driver_checklist());
}
