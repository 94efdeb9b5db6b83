//! Parsing of `tshark -x` style hex dumps.
//!
//! A dump holds one block per packet, blocks separated by blank lines. When
//! the dissectors produced more than one data source the block is split into
//! sections headed `<Name> (<N> bytes):`, each with offsets relative to its
//! own source. Only the `Frame` section lines up with the usbmon header.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SECTION_RX: Regex = Regex::new(r"^(.+?) \(\d+ bytes\):\s*$").unwrap();
    static ref HEX_LINE_RX: Regex =
        Regex::new(r"^\s*[0-9A-Fa-f]+\s+([0-9A-Fa-f]{2}(?: [0-9A-Fa-f]{2})*)(?:\s|$)").unwrap();
}

const FRAME_SECTION: &str = "frame";

/// Split raw tool output into per-packet blocks.
pub fn split_packets(raw: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

/// Keep only the lines of the frame section.
///
/// Lines ahead of the first section header count as frame lines, since a
/// single-source dump carries no header at all.
pub fn frame_only(block: &str) -> Vec<&str> {
    let mut keep = true;
    let mut lines = Vec::new();
    for line in block.lines() {
        if let Some(section) = SECTION_RX.captures(line) {
            keep = section[1].trim().eq_ignore_ascii_case(FRAME_SECTION);
            continue;
        }
        if keep {
            lines.push(line);
        }
    }
    lines
}

/// Bytes of one `<offset>  XX XX ...` line, or `None` for any other line.
pub fn parse_hex_line(line: &str) -> Option<Vec<u8>> {
    let caps = HEX_LINE_RX.captures(line)?;
    caps[1]
        .split(' ')
        .map(|byte| u8::from_str_radix(byte, 16).ok())
        .collect()
}

pub fn hex_dump_to_bytes<'a, I>(lines: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(parse_hex_line)
        .flatten()
        .collect()
}

/// Frame bytes of one packet block.
pub fn packet_bytes(block: &str) -> Vec<u8> {
    hex_dump_to_bytes(frame_only(block))
}
