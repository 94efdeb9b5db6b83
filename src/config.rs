//! Run configuration: the three CLI arguments plus environment overrides.

use std::path::PathBuf;

use log::info;

use crate::data::{get_class_description, HID_INTERFACE_CLASS};

/// Overrides the capture tool binary (name on PATH or full path)
pub const TSHARK_ENV: &str = "URBTRACE_TSHARK";
pub const DEFAULT_TSHARK: &str = "tshark";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub capture_file: PathBuf,
    pub usb_address: String,
    pub output_dir: PathBuf,
    pub tshark: PathBuf,
    pub interface_class: u8,
}

impl Config {
    pub fn new(
        capture_file: impl Into<PathBuf>,
        usb_address: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Config {
            capture_file: capture_file.into(),
            usb_address: usb_address.into(),
            output_dir: output_dir.into(),
            tshark: PathBuf::from(DEFAULT_TSHARK),
            interface_class: HID_INTERFACE_CLASS,
        }
    }

    /// Apply `URBTRACE_TSHARK` if it is set and non-empty.
    pub fn with_env(mut self) -> Self {
        if let Ok(tool) = std::env::var(TSHARK_ENV) {
            if !tool.trim().is_empty() {
                info!("{} set, using capture tool {}", TSHARK_ENV, tool);
                self.tshark = PathBuf::from(tool);
            }
        }
        self
    }

    pub fn display_filter(&self) -> String {
        format!(
            "usb.addr == \"{}\" and usb.bInterfaceClass == 0x{:02x}",
            self.usb_address, self.interface_class
        )
    }

    pub fn interface_description(&self) -> String {
        get_class_description(self.interface_class)
    }
}
