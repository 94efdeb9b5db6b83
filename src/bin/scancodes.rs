//! Turns a keymap dump into scan codes, optionally naming the keys.

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, LevelFilter};

use urbtrace::keymap::{annotate, parse_map, to_yaml_list, KeyTable};

#[derive(Debug, Parser)]
#[command(name = "scancodes", version, about)]
struct Cli {
    /// Dump with one `<offset> <b0> <b1> <b2> <b3>` line per key slot
    map_file: PathBuf,
    /// JSON object of key name -> scan code; annotates instead of listing
    #[arg(long)]
    keycodes: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<String> {
    let dump = fs::read_to_string(&cli.map_file)
        .with_context(|| format!("Failed to read {}", cli.map_file.display()))?;
    let entries = parse_map(&dump)?;
    debug!("Parsed {} key slots", entries.len());

    match &cli.keycodes {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let table = KeyTable::from_json(&json)
                .with_context(|| format!("Failed to load key table {}", path.display()))?;
            Ok(annotate(&entries, &table))
        }
        None => Ok(to_yaml_list(&entries)),
    }
}

fn main() {
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Warn)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}
