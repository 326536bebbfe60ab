// Structured repair and diagnostic events
// The analyzer never prints; it hands these to an EventSink and the presentation layer decides

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::{BpbField, Geometry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepairEvent {
    BootSectorFound {
        offset: usize,
    },
    BackupBootSectorUsed {
        offset: usize,
        repaired: bool,
    },
    FieldViolation {
        offset: usize,
        field: BpbField,
    },
    GeometryExtracted {
        geometry: Geometry,
    },
    RootDirectoryLocated {
        offset: usize,
    },
    IllegalCharacterReplaced {
        offset: usize,
        original: u8,
    },
    /// Reported only; attribute semantics cannot be inferred safely.
    InvalidAttributeType {
        offset: usize,
        name: String,
        attribute: u8,
    },
    ReservedByteRepaired {
        offset: usize,
        original: u8,
    },
    LongNameReservedRepaired {
        offset: usize,
        original: [u8; 2],
    },
    EndOfDirectory {
        offset: usize,
        entries: usize,
    },
}

impl RepairEvent {
    /// True for events that describe a byte the analyzer changed.
    pub fn is_repair(&self) -> bool {
        matches!(
            self,
            RepairEvent::IllegalCharacterReplaced { .. }
                | RepairEvent::ReservedByteRepaired { .. }
                | RepairEvent::LongNameReservedRepaired { .. }
                | RepairEvent::BackupBootSectorUsed { repaired: true, .. }
        )
    }

    /// True for findings that need manual operator intervention.
    pub fn needs_operator(&self) -> bool {
        matches!(self, RepairEvent::InvalidAttributeType { .. })
    }
}

impl fmt::Display for RepairEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairEvent::BootSectorFound { offset } => {
                write!(f, "Boot sector located at offset {}.", offset)
            }
            RepairEvent::BackupBootSectorUsed { offset, repaired: true } => write!(
                f,
                "Backup boot sector located at offset {}; boot sector repaired using the backup.",
                offset
            ),
            RepairEvent::BackupBootSectorUsed { offset, repaired: false } => write!(
                f,
                "Backup boot sector located at offset {}; boot sector left unchanged.",
                offset
            ),
            RepairEvent::FieldViolation { offset, field } => write!(
                f,
                "Boot sector candidate at offset {} is missing or modified: invalid {}.",
                offset, field
            ),
            RepairEvent::GeometryExtracted { geometry } => write!(
                f,
                "Bytes per sector: {}, sectors per cluster: {}, reserved sectors: {}, FATs: {}, FAT size: {} sectors, root cluster: {}",
                geometry.bytes_per_sector,
                geometry.sectors_per_cluster,
                geometry.reserved_sector_count,
                geometry.number_of_fats,
                geometry.fat_size_sectors,
                geometry.root_cluster
            ),
            RepairEvent::RootDirectoryLocated { offset } => {
                write!(f, "Root directory starts at offset {}.", offset)
            }
            RepairEvent::IllegalCharacterReplaced { offset, original } => write!(
                f,
                "Replaced an illegal character (0x{:02X}) in a directory entry's file name at offset {}.",
                original, offset
            ),
            RepairEvent::InvalidAttributeType { offset, name, attribute } => write!(
                f,
                "{} located at offset {} has an invalid file attribute type (0x{:02X}). This repair cannot be done automatically.",
                name, offset, attribute
            ),
            RepairEvent::ReservedByteRepaired { offset, .. } => write!(
                f,
                "Repaired the directory entry's reserved byte at offset {}.",
                offset
            ),
            RepairEvent::LongNameReservedRepaired { offset, .. } => write!(
                f,
                "Long name entry reserved cluster field was invalid, changed to 00 at offsets {} and {}.",
                offset,
                offset + 1
            ),
            RepairEvent::EndOfDirectory { offset, entries } => write!(
                f,
                "End of root directory reached at offset {} after {} entries.",
                offset, entries
            ),
        }
    }
}

/// Consumer of analyzer events.
pub trait EventSink {
    fn emit(&mut self, event: RepairEvent);
}

impl EventSink for Vec<RepairEvent> {
    fn emit(&mut self, event: RepairEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: RepairEvent) {
        (**self).emit(event);
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: RepairEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_classification() {
        assert!(RepairEvent::IllegalCharacterReplaced { offset: 0, original: 0x2E }.is_repair());
        assert!(RepairEvent::BackupBootSectorUsed { offset: 3072, repaired: true }.is_repair());
        assert!(!RepairEvent::BackupBootSectorUsed { offset: 3072, repaired: false }.is_repair());

        let invalid = RepairEvent::InvalidAttributeType {
            offset: 64,
            name: "README  TXT".to_string(),
            attribute: 0,
        };
        assert!(!invalid.is_repair());
        assert!(invalid.needs_operator());
    }

    #[test]
    fn test_json_is_tagged_by_kind() {
        let event = RepairEvent::ReservedByteRepaired { offset: 12, original: 0x7F };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"kind":"reserved_byte_repaired","offset":12,"original":127}"#);
    }

    #[test]
    fn test_display_matches_operator_wording() {
        let event = RepairEvent::IllegalCharacterReplaced { offset: 1_049_600, original: 0x2E };
        assert_eq!(
            event.to_string(),
            "Replaced an illegal character (0x2E) in a directory entry's file name at offset 1049600."
        );
    }

    #[test]
    fn test_vec_sink_collects_through_reference() {
        let mut events: Vec<RepairEvent> = Vec::new();
        {
            let sink = &mut events;
            sink.emit(RepairEvent::BootSectorFound { offset: 0 });
        }
        assert_eq!(events, vec![RepairEvent::BootSectorFound { offset: 0 }]);
    }
}
