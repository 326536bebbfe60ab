use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Every constrained field of a FAT32 BIOS Parameter Block, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BpbField {
    JumpBoot,
    BytesPerSector,
    SectorsPerCluster,
    ReservedSectorCount,
    NumberOfFats,
    RootEntryCount,
    TotalSectors16,
    Media,
    FatSize16,
    TotalSectors32,
    FsVersion,
    Reserved,
    DriveNumber,
    Reserved1,
    EndSignature,
    /// The sector does not fit inside the image at all.
    Truncated,
}

impl fmt::Display for BpbField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BpbField::JumpBoot => "jump instruction",
            BpbField::BytesPerSector => "bytes per sector",
            BpbField::SectorsPerCluster => "sectors per cluster",
            BpbField::ReservedSectorCount => "reserved sector count",
            BpbField::NumberOfFats => "number of FATs",
            BpbField::RootEntryCount => "root entry count",
            BpbField::TotalSectors16 => "16-bit total sectors",
            BpbField::Media => "media descriptor",
            BpbField::FatSize16 => "16-bit FAT size",
            BpbField::TotalSectors32 => "32-bit total sectors",
            BpbField::FsVersion => "filesystem version",
            BpbField::Reserved => "reserved byte 52",
            BpbField::DriveNumber => "drive number",
            BpbField::Reserved1 => "reserved byte 65",
            BpbField::EndSignature => "end signature",
            BpbField::Truncated => "sector extent",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum FatmendError {
    #[error("Boot sector and backup boot sector are missing or corrupted beyond repair (primary: {primary}, {})",
        describe_backup(.backup))]
    UnrecoverableCorruption {
        primary: BpbField,
        backup: Option<(usize, BpbField)>,
    },

    #[error("Boot sector at offset {offset} has an invalid {field}")]
    FieldViolation { offset: usize, field: BpbField },

    #[error("Access of {len} bytes at offset {offset} is outside the image ({image_len} bytes)")]
    OutOfRange {
        offset: u64,
        len: usize,
        image_len: usize,
    },

    #[error("Root directory starting before offset {offset} has no end-of-directory marker")]
    DirectoryUnterminated { offset: usize },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn describe_backup(backup: &Option<(usize, BpbField)>) -> String {
    match backup {
        Some((offset, field)) => format!("backup at offset {}: {}", offset, field),
        None => "no backup found".to_string(),
    }
}

impl FatmendError {
    /// The BPB field this error points at, if it is a boot sector failure.
    pub fn field(&self) -> Option<BpbField> {
        match self {
            FatmendError::FieldViolation { field, .. } => Some(*field),
            FatmendError::UnrecoverableCorruption { primary, .. } => Some(*primary),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecoverable_message_names_both_copies() {
        let err = FatmendError::UnrecoverableCorruption {
            primary: BpbField::Media,
            backup: Some((3072, BpbField::EndSignature)),
        };
        let msg = err.to_string();
        assert!(msg.contains("media descriptor"));
        assert!(msg.contains("backup at offset 3072: end signature"));
    }

    #[test]
    fn test_unrecoverable_message_without_backup() {
        let err = FatmendError::UnrecoverableCorruption {
            primary: BpbField::JumpBoot,
            backup: None,
        };
        assert!(err.to_string().ends_with("no backup found)"));
        assert_eq!(err.field(), Some(BpbField::JumpBoot));
    }
}
