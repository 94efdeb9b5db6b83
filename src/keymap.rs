//! Scan codes from keymap dumps lifted out of transaction payloads.
//!
//! Each dump line is `<offset> <b0> <b1> <b2> <b3>`; the four bytes form one
//! little-endian 32-bit scan code per key slot.

use std::collections::{BTreeMap, HashMap};

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("line {line}: expected `<offset> <b0> <b1> <b2> <b3>`, got {text:?}")]
    BadLine { line: usize, text: String },

    #[error("invalid key table: {0}")]
    BadTable(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub text: String,
    pub scan_code: u32,
}

pub fn parse_map(dump: &str) -> Result<Vec<MapEntry>, KeymapError> {
    dump.lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(index, text)| parse_map_line(index + 1, text))
        .collect()
}

fn parse_map_line(line: usize, text: &str) -> Result<MapEntry, KeymapError> {
    let bad_line = || KeymapError::BadLine {
        line,
        text: text.to_string(),
    };

    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(bad_line());
    }
    let mut bytes = [0u8; 4];
    for (slot, field) in bytes.iter_mut().zip(&fields[1..5]) {
        *slot = u8::from_str_radix(field, 16).map_err(|_| bad_line())?;
    }

    Ok(MapEntry {
        text: text.to_string(),
        scan_code: LittleEndian::read_u32(&bytes),
    })
}

/// Key name lookup by scan code, loaded from a `{"name": code}` JSON table.
#[derive(Debug, Default)]
pub struct KeyTable {
    names: HashMap<u32, String>,
}

impl KeyTable {
    pub fn from_json(json: &str) -> Result<Self, KeymapError> {
        let by_name: BTreeMap<String, u32> = serde_json::from_str(json)?;
        let names = by_name.into_iter().map(|(name, code)| (code, name)).collect();
        Ok(KeyTable { names })
    }

    pub fn name(&self, scan_code: u32) -> Option<&str> {
        self.names.get(&scan_code).map(String::as_str)
    }
}

/// One `- 0x%08x` YAML list item per entry.
pub fn to_yaml_list(entries: &[MapEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("- 0x{:08x}\n", entry.scan_code))
        .collect()
}

/// Echo each dump line, naming the key when the table knows its code.
pub fn annotate(entries: &[MapEntry], table: &KeyTable) -> String {
    entries
        .iter()
        .map(|entry| match table.name(entry.scan_code) {
            Some(name) => format!("{} -> {}\n", entry.text, name),
            None => format!("{}\n", entry.text),
        })
        .collect()
}
