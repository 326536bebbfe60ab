use serde::{Deserialize, Serialize};

/// Short-name filler used when an illegal byte is replaced: ASCII '0'.
pub const DEFAULT_REPLACEMENT_BYTE: u8 = 0x30;

/// Sector FAT32 formatters conventionally place the backup boot sector at.
pub const DEFAULT_BACKUP_SECTOR_HINT: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Byte written over illegal short-name bytes.
    pub replacement_byte: u8,
    /// Sector checked for a backup boot sector before scanning the whole image.
    pub backup_sector_hint: u32,
    /// Overwrite the primary boot sector when a valid backup is used.
    pub repair_boot_sector: bool,
    pub scan_root_directory: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            replacement_byte: DEFAULT_REPLACEMENT_BYTE,
            backup_sector_hint: DEFAULT_BACKUP_SECTOR_HINT,
            repair_boot_sector: true,
            scan_root_directory: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let options: AnalyzerOptions =
            serde_json::from_str(r#"{"repair_boot_sector": false}"#).unwrap();
        assert!(!options.repair_boot_sector);
        assert_eq!(options.replacement_byte, b'0');
        assert_eq!(options.backup_sector_hint, 6);
        assert!(options.scan_root_directory);
    }
}
