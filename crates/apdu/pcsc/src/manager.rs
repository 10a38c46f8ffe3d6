//! Device manager for PC/SC operations

use pcsc::{Context, ReaderState, Scope, State};
use tracing::debug;

use crate::config::PcscConfig;
use crate::error::PcscError;
use crate::reader::PcscReader;
use crate::transport::PcscTransport;

/// Manager for PC/SC device operations
#[allow(missing_debug_implementations)]
pub struct PcscDeviceManager {
    /// PC/SC context
    context: Context,
}

impl PcscDeviceManager {
    /// Create a new PC/SC device manager
    pub fn new() -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self { context })
    }

    /// List all available card readers
    ///
    /// An empty list is reported as [`PcscError::NoReadersAvailable`].
    pub fn list_readers(&self) -> Result<Vec<PcscReader>, PcscError> {
        let readers = match self.context.list_readers_owned() {
            Ok(readers) => readers,
            Err(pcsc::Error::NoReadersAvailable) => return Err(PcscError::NoReadersAvailable),
            Err(e) => return Err(e.into()),
        };
        if readers.is_empty() {
            return Err(PcscError::NoReadersAvailable);
        }

        let mut result = Vec::with_capacity(readers.len());

        for reader_name in readers {
            let mut reader_states = vec![ReaderState::new(reader_name.as_c_str(), State::UNAWARE)];

            match self.context.get_status_change(None, &mut reader_states) {
                Ok(()) => result.push(PcscReader::from_reader_state(&reader_states[0])),
                Err(e) => {
                    // If we can't get status, assume no card
                    debug!(reader = ?reader_name, error = %e, "Reader status unavailable");
                    result.push(PcscReader::new(
                        reader_name.to_string_lossy().into_owned(),
                        false,
                        None,
                    ));
                }
            }
        }

        Ok(result)
    }

    /// Pick a reader by exact name, or the first one when no name is given
    pub fn find_reader(&self, name: Option<&str>) -> Result<PcscReader, PcscError> {
        let readers = self.list_readers()?;

        match name {
            Some(name) => readers
                .into_iter()
                .find(|r| r.name() == name)
                .ok_or_else(|| PcscError::ReaderNotFound(name.to_string())),
            None => readers
                .into_iter()
                .next()
                .ok_or(PcscError::NoReadersAvailable),
        }
    }

    /// Open a connection to a specific reader
    pub fn open_reader(&self, reader_name: &str) -> PcscTransport {
        self.open_reader_with_config(reader_name, PcscConfig::default())
    }

    /// Open a connection to a specific reader with custom configuration
    ///
    /// The returned transport may have no card yet; see
    /// [`PcscTransport::connect`].
    pub fn open_reader_with_config(&self, reader_name: &str, config: PcscConfig) -> PcscTransport {
        // Clone the context to provide ownership to the transport
        PcscTransport::new(self.context.clone(), reader_name, config)
    }
}
