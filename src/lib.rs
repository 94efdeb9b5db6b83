//! urbtrace: rebuilds HID Set/Get Report transactions from usbmon captures.
//!
//! The pipeline runs packet by packet: the capture tool's hex dump is split
//! into blocks, each block is cut down to its frame section, decoded into a
//! [`usb::Urb`] and fed to the [`usb::TransactionCorrelator`]. Once the
//! capture is consumed every transaction is rendered to its own file.

pub mod capture;
pub mod config;
pub mod data;
pub mod keymap;
pub mod pipeline;
pub mod usb;

pub use config::Config;
pub use pipeline::{run, RunSummary};
