// Short directory entry rules shared by the root directory scanner
// Attribute values, the illegal short-name byte set, and a display helper for names

/// Directory entry attribute values accepted in the root directory
pub mod attributes {
    pub const ATTR_READ_ONLY: u8 = 0x01;
    pub const ATTR_HIDDEN: u8 = 0x02;
    pub const ATTR_SYSTEM: u8 = 0x04;
    pub const ATTR_VOLUME_ID: u8 = 0x08;
    pub const ATTR_DIRECTORY: u8 = 0x10;
    pub const ATTR_ARCHIVE: u8 = 0x20;
    pub const ATTR_LONG_NAME: u8 = 0x0F;  // FAT16/32 LFN marker
}

use attributes::*;

/// An attribute byte is valid only when it is exactly one of the single-purpose
/// values or the long-name marker. Combinations are not accepted.
pub fn is_valid_attribute(attribute: u8) -> bool {
    matches!(
        attribute,
        ATTR_READ_ONLY
            | ATTR_HIDDEN
            | ATTR_SYSTEM
            | ATTR_VOLUME_ID
            | ATTR_DIRECTORY
            | ATTR_ARCHIVE
            | ATTR_LONG_NAME
    )
}

pub fn is_long_name(attribute: u8) -> bool {
    attribute == ATTR_LONG_NAME
}

/// Bytes that may not appear anywhere in an 8.3 short name.
///
/// 0x05 is deliberately absent: in the first position it encodes a leading 0xE5.
/// Bytes at or above 0x80 are left to the OEM code page.
pub fn is_illegal_short_name_byte(byte: u8) -> bool {
    matches!(
        byte,
        0x00..=0x04
            | 0x06..=0x19
            | 0x20
            | 0x22
            | 0x2A..=0x2C
            | 0x2E
            | 0x2F
            | 0x3A..=0x3F
            | 0x5B..=0x5D
            | 0x61..=0x7A
            | 0x7C
    )
}

/// Render raw short-name bytes for diagnostics, one char per byte.
pub fn short_name_lossy(name: &[u8]) -> String {
    name.iter().map(|&b| char::from(b)).collect()
}
