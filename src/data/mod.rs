pub mod class_codes;

pub use class_codes::{get_class_description, HID_INTERFACE_CLASS};
