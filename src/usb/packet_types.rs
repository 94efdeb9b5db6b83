use std::fmt;

/// usbmon event type, stored in the header byte right after the URB id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrbKind {
    Submit,
    Complete,
    Unknown(u8),
}

pub const URB_SUBMIT: u8 = 0x53; // 'S'
pub const URB_COMPLETE: u8 = 0x43; // 'C'

impl From<u8> for UrbKind {
    fn from(value: u8) -> Self {
        match value {
            URB_SUBMIT => UrbKind::Submit,
            URB_COMPLETE => UrbKind::Complete,
            other => UrbKind::Unknown(other),
        }
    }
}

impl fmt::Display for UrbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrbKind::Submit => write!(f, "submit"),
            UrbKind::Complete => write!(f, "complete"),
            UrbKind::Unknown(value) => write!(f, "unknown:{:02x}", value),
        }
    }
}

/// HID class request carried in bRequest of the setup packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HidRequest {
    SetReport,
    GetReport,
    Unknown(u8),
}

pub const HID_GET_REPORT: u8 = 0x01;
pub const HID_SET_REPORT: u8 = 0x09;

impl From<u8> for HidRequest {
    fn from(value: u8) -> Self {
        match value {
            HID_SET_REPORT => HidRequest::SetReport,
            HID_GET_REPORT => HidRequest::GetReport,
            other => HidRequest::Unknown(other),
        }
    }
}

impl fmt::Display for HidRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HidRequest::SetReport => write!(f, "Set Report"),
            HidRequest::GetReport => write!(f, "Get Report"),
            HidRequest::Unknown(value) => write!(f, "unknown:{:02x}", value),
        }
    }
}
