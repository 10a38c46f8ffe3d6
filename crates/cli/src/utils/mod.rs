//! Utility functions and types for the aidscan CLI

pub mod display;
pub mod reader;

use std::time::Duration;

use aidscan_apdu_core::Aid;
use aidscan_transport_pcsc::PcscConfig;
use clap::Args;

/// Arguments shared by every polling command
#[derive(Args, Debug, Clone)]
pub struct PollArgs {
    /// Keep scanning every new device without the re-tap prompt
    #[arg(long = "loop")]
    pub continuous: bool,

    /// Delay between reader polls, in milliseconds
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(10..))]
    pub interval_ms: u64,
}

/// Arguments for the phone scanner
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Quick scan (system, Korean and common HCE AIDs only)
    #[arg(long, conflicts_with = "aid")]
    pub quick: bool,

    /// Test a single AID instead (hex, spaces, `-` and `:` allowed)
    #[arg(long)]
    pub aid: Option<Aid>,

    /// Polling options
    #[command(flatten)]
    pub poll: PollArgs,
}

/// What to do with each new device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    /// Every catalog category plus the F0 prefix sweep
    Full,
    /// The categories most likely to hit on a phone
    Quick,
    /// One user-supplied AID
    Single(Aid),
    /// Plain card reader: UID, ATR and the basic card list
    BasicCard,
}

/// Everything a polling run needs
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Reader to use; the first one when `None`
    pub reader: Option<String>,
    /// What to do with each new device
    pub profile: Profile,
    /// Skip the re-tap prompt after each scan
    pub continuous: bool,
    /// Delay between polls
    pub interval: Duration,
    /// Connection options
    pub pcsc: PcscConfig,
}

impl ScanConfig {
    /// Build the configuration for a polling run
    pub fn new(reader: Option<String>, profile: Profile, poll: &PollArgs) -> Self {
        Self {
            reader,
            profile,
            continuous: poll.continuous,
            interval: Duration::from_millis(poll.interval_ms),
            pcsc: PcscConfig::default(),
        }
    }
}

impl ScanArgs {
    /// Turn the arguments into a configuration
    pub fn into_config(self, reader: Option<String>) -> ScanConfig {
        let profile = match self.aid {
            Some(aid) => Profile::Single(aid),
            None if self.quick => Profile::Quick,
            None => Profile::Full,
        };
        ScanConfig::new(reader, profile, &self.poll)
    }
}
