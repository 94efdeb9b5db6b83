use lazy_static::lazy_static;
use std::collections::HashMap;

/// bInterfaceClass of HID devices; keyboards expose their report
/// interfaces under this class.
pub const HID_INTERFACE_CLASS: u8 = 0x03;

lazy_static! {
    // Interface-level class codes that show up on keyboard captures.
    static ref CLASS_MAP: HashMap<u8, &'static str> = {
        let mut m = HashMap::new();

        m.insert(0x01, "Audio");
        m.insert(0x02, "Communications and CDC Control");
        m.insert(HID_INTERFACE_CLASS, "Human Interface Device (HID)");
        m.insert(0x08, "Mass Storage");
        m.insert(0x0A, "CDC-Data");
        m.insert(0xFE, "Application Specific");
        m.insert(0xFF, "Vendor Specific");

        m
    };
}

pub fn get_class_description(class_code: u8) -> String {
    CLASS_MAP
        .get(&class_code)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Unknown (0x{:02X})", class_code))
}
