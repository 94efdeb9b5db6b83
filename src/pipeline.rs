//! Drives one run: capture tool -> packet blocks -> URBs -> transactions -> files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::capture::{packet_bytes, split_packets, CaptureSource, Tshark};
use crate::config::Config;
use crate::usb::{render_transaction, Correlation, TransactionCorrelator, Urb};

pub const RAW_DUMP_FILE: &str = "raw";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub packets: usize,
    pub transactions: usize,
    pub paired: usize,
    pub dropped: usize,
}

/// Run the configured capture tool and write the transactions.
pub fn run(config: &Config) -> Result<RunSummary> {
    run_with(config, &Tshark::new(&config.tshark))
}

pub fn run_with(config: &Config, source: &dyn CaptureSource) -> Result<RunSummary> {
    let out = &config.output_dir;
    info!(
        "Extracting {} traffic for device {} from {}",
        config.interface_description(),
        config.usb_address,
        config.capture_file.display()
    );

    prepare_output_dir(out)?;

    let raw = source
        .hex_dump(&config.capture_file, &config.display_filter())
        .context("Failed to extract packets from capture")?;
    write_raw(out, &raw)?;

    let (transactions, summary) = correlate_dump(&raw)?;
    write_transactions(out, &transactions)?;

    info!(
        "Decoded {} packets into {} transactions ({} with replies, {} packets dropped)",
        summary.packets, summary.transactions, summary.paired, summary.dropped
    );
    Ok(summary)
}

/// Wipe and recreate the output directory so runs never merge.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if let Ok(meta) = fs::symlink_metadata(dir) {
        debug!("Removing previous output in {}", dir.display());
        let removed = if meta.is_dir() {
            fs::remove_dir_all(dir)
        } else {
            fs::remove_file(dir)
        };
        removed.with_context(|| format!("Failed to remove {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

fn write_raw(dir: &Path, raw: &str) -> Result<()> {
    let path = dir.join(RAW_DUMP_FILE);
    let mut contents = raw.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// Decode every packet block of a dump and correlate the resulting URBs.
pub fn correlate_dump(raw: &str) -> Result<(Vec<Urb>, RunSummary)> {
    let mut correlator = TransactionCorrelator::new();
    let mut summary = RunSummary::default();

    for (index, block) in split_packets(raw).iter().enumerate() {
        let bytes = packet_bytes(block);
        let urb = Urb::parse(&bytes)
            .with_context(|| format!("Malformed packet #{} in capture dump", index))?;
        debug!(
            "Packet #{}: {} {} ({} payload bytes)",
            index,
            urb.id,
            urb.kind,
            urb.payload.len()
        );

        summary.packets += 1;
        match correlator.process(urb)? {
            Correlation::Paired(_) => summary.paired += 1,
            Correlation::Opened(_) => {}
            _ => summary.dropped += 1,
        }
    }

    let transactions = correlator.finish();
    summary.transactions = transactions.len();
    Ok((transactions, summary))
}

pub fn write_transactions(dir: &Path, transactions: &[Urb]) -> Result<()> {
    for (index, tx) in transactions.iter().enumerate() {
        let path = dir.join(format!("tx{}.tx", index));
        fs::write(&path, render_transaction(tx))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usb::urb::tests::urb_bytes;
    use itertools::Itertools;

    fn dump_block(bytes: &[u8]) -> String {
        let lines = bytes
            .chunks(16)
            .enumerate()
            .map(|(i, line)| {
                format!(
                    "{:04x}  {}",
                    i * 16,
                    line.iter().map(|b| format!("{:02x}", b)).join(" ")
                )
            })
            .join("\n");
        format!("Frame ({} bytes):\n{}\n", bytes.len(), lines)
    }

    #[test]
    fn correlates_blocks_of_a_dump() {
        let raw = [
            dump_block(&urb_bytes(1, 0x53, 0x09, &[1, 2, 3])),
            dump_block(&urb_bytes(1, 0x43, 0x09, &[])),
            dump_block(&urb_bytes(2, 0x43, 0x09, &[])),
            dump_block(&urb_bytes(3, 0x53, 0x01, &[])),
        ]
        .join("\n");

        let (transactions, summary) = correlate_dump(&raw).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                packets: 4,
                transactions: 2,
                paired: 1,
                dropped: 1,
            }
        );
        assert_eq!(transactions[0].payload, vec![1, 2, 3]);
        assert!(transactions[1].reply().is_none());
    }

    #[test]
    fn short_packet_is_fatal() {
        let raw = dump_block(&[0x53; 20]);
        let err = correlate_dump(&raw).unwrap_err();
        assert!(err.to_string().contains("Malformed packet #0"));
    }

    #[test]
    fn empty_dump_yields_nothing() {
        let (transactions, summary) = correlate_dump("\n").unwrap();
        assert!(transactions.is_empty());
        assert_eq!(summary, RunSummary::default());
    }
}
