use aidscan_transport_pcsc::PcscDeviceManager;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

mod commands;
mod poller;
mod utils;

use utils::{PollArgs, Profile, ScanArgs, ScanConfig, reader};

#[derive(Parser)]
#[command(
    name = "aidscan",
    version,
    about = "Probe NFC phones and cards for known application identifiers (AIDs)"
)]
struct Cli {
    /// Optional reader name to use (the first reader if not specified)
    #[arg(short, long, global = true)]
    reader: Option<String>,

    /// Debug level output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    List,

    /// Wait for a phone or card and scan it for known AIDs
    Scan(ScanArgs),

    /// Basic card reader: UID, ATR and a short list of card AIDs
    Card(PollArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    // Create a PC/SC device manager
    let manager = match PcscDeviceManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            reader::print_no_reader(&e);
            return Err(e.into());
        }
    };

    match cli.command {
        Commands::List => reader::list_readers(&manager)?,
        Commands::Scan(args) => {
            commands::run_polling(manager, args.into_config(cli.reader)).await?;
        }
        Commands::Card(poll) => {
            let config = ScanConfig::new(cli.reader, Profile::BasicCard, &poll);
            commands::run_polling(manager, config).await?;
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // stdout carries the scan report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();
}
