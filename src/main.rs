use std::path::PathBuf;
use std::{env, process};

use clap::error::ErrorKind;
use clap::Parser;
use log::{error, info, LevelFilter};

use urbtrace::Config;

/// Exit status for command line usage errors (sysexits EX_USAGE)
const EX_USAGE: i32 = 64;

/// Rebuild HID report transactions for one device from a USB capture.
#[derive(Debug, Parser)]
#[command(name = "urbtrace", version, about)]
struct Cli {
    /// Capture file (.pcap / .pcapng) recorded with usbmon
    capture_file: PathBuf,
    /// USB address of the device as the capture tool prints it, e.g. 3.5.0
    usb_address: String,
    /// Output directory; wiped and recreated on every run
    output_dir: PathBuf,
}

fn init_logging() {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(LevelFilter::Info);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(EX_USAGE),
            }
        }
    };

    init_logging();
    info!("Starting urbtrace v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::new(cli.capture_file, cli.usb_address, cli.output_dir).with_env();
    match urbtrace::run(&config) {
        Ok(summary) => info!(
            "Wrote {} transactions to {}",
            summary.transactions,
            config.output_dir.display()
        ),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}
