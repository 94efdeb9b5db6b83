pub mod hexdump;
pub mod tshark;

pub use hexdump::{frame_only, hex_dump_to_bytes, packet_bytes, parse_hex_line, split_packets};
pub use tshark::{CaptureError, CaptureSource, Tshark};
