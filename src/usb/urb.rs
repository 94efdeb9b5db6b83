//! usbmon URB records as they appear in the frame bytes of a capture.
//!
//! Layout of the 64-byte usbmon header (all integers little-endian):
//!
//! ```text
//! Offset  Size  Field
//! 0       8     URB id (correlation key)
//! 8       1     event type ('S' submit / 'C' complete)
//! 9       1     transfer type
//! 10      1     endpoint
//! 11      1     device address
//! 12      2     bus id
//! 14      1     setup request flag
//! 15      1     data flag
//! 16      8     timestamp seconds
//! 24      4     timestamp microseconds
//! 28      4     URB status
//! 32      4     URB length
//! 36      4     data length
//! 40      8     setup packet (bmRequestType, bRequest, wValue, ...)
//! 48      4     interval
//! 52      4     start frame
//! 56      4     transfer flags
//! 60      4     isochronous descriptor count
//! 64      ..    payload
//! ```

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use super::packet_types::{HidRequest, UrbKind};

pub const URB_HEADER_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrbError {
    #[error("packet holds {len} bytes, shorter than the 64-byte URB header")]
    TooShort { len: usize },

    #[error("mismatched id: cannot attach reply {reply} to request {request}")]
    MismatchedId { request: String, reply: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urb {
    pub id: String,
    pub kind: UrbKind,
    pub transfer_type: u8,
    pub endpoint: u8,
    pub device: u8,
    pub bus_id: u16,
    pub setup_request: u8,
    pub data_status: u8,

    pub sec: u64,
    // Kept as the raw hex of the four timestamp bytes, unlike `sec`.
    pub usec: String,

    pub urb_status: String,
    pub urb_length: u32,
    pub data_length: u32,

    pub setup_data_raw: String,
    pub request_type: HidRequest,
    pub report_id: u8,
    pub report_type: u8,

    pub interval: u32,
    pub frame: u32,
    pub transfer_flags: String,
    pub iso_desc_count: u32,

    pub payload: Vec<u8>,
    reply: Option<Box<Urb>>,
}

impl Urb {
    /// Decode one packet's frame bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, UrbError> {
        if bytes.len() < URB_HEADER_LEN {
            return Err(UrbError::TooShort { len: bytes.len() });
        }

        Ok(Urb {
            id: hex::encode(&bytes[0..8]),
            kind: UrbKind::from(bytes[8]),
            transfer_type: bytes[9],
            endpoint: bytes[10],
            device: bytes[11],
            bus_id: LittleEndian::read_u16(&bytes[12..14]),
            setup_request: bytes[14],
            data_status: bytes[15],

            sec: LittleEndian::read_u64(&bytes[16..24]),
            usec: hex::encode(&bytes[24..28]),

            urb_status: hex::encode(&bytes[28..32]),
            urb_length: LittleEndian::read_u32(&bytes[32..36]),
            data_length: LittleEndian::read_u32(&bytes[36..40]),

            setup_data_raw: hex::encode(&bytes[40..48]),
            request_type: HidRequest::from(bytes[41]),
            report_id: bytes[42],
            report_type: bytes[43],

            interval: LittleEndian::read_u32(&bytes[48..52]),
            frame: LittleEndian::read_u32(&bytes[52..56]),
            transfer_flags: hex::encode(&bytes[56..60]),
            iso_desc_count: LittleEndian::read_u32(&bytes[60..64]),

            payload: bytes[URB_HEADER_LEN..].to_vec(),
            reply: None,
        })
    }

    pub fn is_request(&self) -> bool {
        self.kind == UrbKind::Submit
    }

    pub fn reply(&self) -> Option<&Urb> {
        self.reply.as_deref()
    }

    /// Pair this request with its completion. Ids must match.
    pub fn add_reply(&mut self, reply: Urb) -> Result<(), UrbError> {
        if self.id != reply.id {
            return Err(UrbError::MismatchedId {
                request: self.id.clone(),
                reply: reply.id,
            });
        }
        self.reply = Some(Box::new(reply));
        Ok(())
    }
}
