// Root directory scanner
// Walks 32-byte entries from the root directory offset, repairing short names and reserved
// fields in place and reporting attribute bytes that cannot be fixed automatically

use fatmend_core::{ByteImage, EventSink, FatmendError, Geometry, RepairEvent};
use log::debug;
use serde::{Deserialize, Serialize};
use crate::fat_common::constants::*;
use crate::fat_common::directory::{
    is_illegal_short_name_byte, is_long_name, is_valid_attribute, short_name_lossy,
};

/// Counts of everything a scan found or changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub root_directory_offset: usize,
    /// Entries visited, not counting the end-of-directory pair.
    pub entries_scanned: usize,
    pub characters_replaced: usize,
    pub reserved_bytes_repaired: usize,
    pub long_name_reserved_repaired: usize,
    pub invalid_attributes: usize,
}

impl ScanSummary {
    pub fn total_repairs(&self) -> usize {
        self.characters_replaced + self.reserved_bytes_repaired + self.long_name_reserved_repaired
    }
}

pub struct RootDirectoryScanner {
    replacement_byte: u8,
}

impl RootDirectoryScanner {
    pub fn new(replacement_byte: u8) -> Self {
        Self { replacement_byte }
    }

    /// Scan the root directory located by `geometry`.
    pub fn scan(
        &self,
        image: &mut ByteImage,
        geometry: &Geometry,
        sink: &mut dyn EventSink,
    ) -> Result<ScanSummary, FatmendError> {
        let root = geometry.root_directory_offset()?;
        self.scan_at(image, root, sink)
    }

    /// Scan entries starting at `root` until two consecutive zero entries are found.
    ///
    /// Events for every finding are emitted as they happen, so a scan that fails
    /// with `DirectoryUnterminated` has still reported and repaired everything
    /// before the end of the image.
    pub fn scan_at(
        &self,
        image: &mut ByteImage,
        root: usize,
        sink: &mut dyn EventSink,
    ) -> Result<ScanSummary, FatmendError> {
        if !image.contains(root, DIR_ENTRY_SIZE) {
            return Err(FatmendError::OutOfRange {
                offset: root as u64,
                len: DIR_ENTRY_SIZE,
                image_len: image.len(),
            });
        }
        sink.emit(RepairEvent::RootDirectoryLocated { offset: root });

        let mut summary = ScanSummary {
            root_directory_offset: root,
            ..Default::default()
        };
        let mut offset = root;

        loop {
            if !image.contains(offset, DIR_ENTRY_SIZE) {
                return Err(FatmendError::DirectoryUnterminated { offset });
            }
            if self.is_end_of_directory(image, offset)? {
                debug!("End of root directory at offset {}", offset);
                sink.emit(RepairEvent::EndOfDirectory {
                    offset,
                    entries: summary.entries_scanned,
                });
                return Ok(summary);
            }

            self.check_entry(image, offset, &mut summary, sink)?;
            summary.entries_scanned += 1;
            offset += DIR_ENTRY_SIZE;
        }
    }

    /// A zero first byte followed by two zero bytes, with the next entry also
    /// starting with two zero bytes.
    fn is_end_of_directory(&self, image: &ByteImage, offset: usize) -> Result<bool, FatmendError> {
        let head = image.slice(offset, 3)?;
        if head != [DIR_ENTRY_END, 0, 0] {
            return Ok(false);
        }

        let next = offset + DIR_ENTRY_SIZE;
        match image.slice(next, 2) {
            Ok(next_head) => Ok(next_head == [0, 0]),
            Err(_) => Err(FatmendError::DirectoryUnterminated { offset: next }),
        }
    }

    fn check_entry(
        &self,
        image: &mut ByteImage,
        offset: usize,
        summary: &mut ScanSummary,
        sink: &mut dyn EventSink,
    ) -> Result<(), FatmendError> {
        let attribute = image.read_u8(offset + DIR_ATTR)?;

        if !is_valid_attribute(attribute) {
            let name = short_name_lossy(image.slice(offset + DIR_NAME, DIR_NAME_LEN)?);
            summary.invalid_attributes += 1;
            sink.emit(RepairEvent::InvalidAttributeType { offset, name, attribute });
        }

        let reserved = image.read_u8(offset + DIR_NT_RES)?;
        if reserved != 0 {
            image.write_u8(offset + DIR_NT_RES, 0)?;
            summary.reserved_bytes_repaired += 1;
            sink.emit(RepairEvent::ReservedByteRepaired {
                offset: offset + DIR_NT_RES,
                original: reserved,
            });
        }

        let first = image.read_u8(offset)?;
        let replace_first = match first {
            DIR_ENTRY_FREE | b' ' => true,
            // Not a terminator if anything follows the zero
            DIR_ENTRY_END => image.read_u8(offset + 1)? != 0 || image.read_u8(offset + 2)? != 0,
            _ => false,
        };
        if replace_first {
            self.replace(image, offset, first, summary, sink)?;
        }

        if is_long_name(attribute) {
            // Long name characters are UTF-16 and not subject to the short-name rules
            let lo = offset + LDIR_FST_CLUS_LO;
            let pair = [image.read_u8(lo)?, image.read_u8(lo + 1)?];
            if pair != [0, 0] {
                image.write_u8(lo, 0)?;
                image.write_u8(lo + 1, 0)?;
                summary.long_name_reserved_repaired += 1;
                sink.emit(RepairEvent::LongNameReservedRepaired { offset: lo, original: pair });
            }
            return Ok(());
        }

        for pos in offset + DIR_NAME..offset + DIR_NAME + DIR_NAME_LEN {
            let byte = image.read_u8(pos)?;
            if is_illegal_short_name_byte(byte) {
                self.replace(image, pos, byte, summary, sink)?;
            }
        }

        Ok(())
    }

    fn replace(
        &self,
        image: &mut ByteImage,
        pos: usize,
        original: u8,
        summary: &mut ScanSummary,
        sink: &mut dyn EventSink,
    ) -> Result<(), FatmendError> {
        image.write_u8(pos, self.replacement_byte)?;
        summary.characters_replaced += 1;
        sink.emit(RepairEvent::IllegalCharacterReplaced { offset: pos, original });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fat_common::boot_sector::{long_name_entry, short_entry};
    use crate::fat_common::directory::attributes::*;

    const ROOT: usize = 64;

    fn image_with_entries(entries: &[[u8; DIR_ENTRY_SIZE]]) -> ByteImage {
        let mut data = vec![0u8; ROOT + (entries.len() + 2) * DIR_ENTRY_SIZE];
        for (i, entry) in entries.iter().enumerate() {
            let off = ROOT + i * DIR_ENTRY_SIZE;
            data[off..off + DIR_ENTRY_SIZE].copy_from_slice(entry);
        }
        ByteImage::new(data)
    }

    fn scan(image: &mut ByteImage) -> (Result<ScanSummary, FatmendError>, Vec<RepairEvent>) {
        let mut events: Vec<RepairEvent> = Vec::new();
        let result = RootDirectoryScanner::new(b'0').scan_at(image, ROOT, &mut events);
        (result, events)
    }

    fn repairs(events: &[RepairEvent]) -> Vec<&RepairEvent> {
        events.iter().filter(|e| e.is_repair()).collect()
    }

    #[test]
    fn test_dot_in_first_byte_is_replaced() {
        let mut image = image_with_entries(&[short_entry(b".HIDDENFILE", ATTR_ARCHIVE)]);
        let (result, events) = scan(&mut image);

        assert_eq!(result.unwrap().characters_replaced, 1);
        assert_eq!(image.read_u8(ROOT).unwrap(), 0x30);
        assert_eq!(
            repairs(&events),
            vec![&RepairEvent::IllegalCharacterReplaced { offset: ROOT, original: b'.' }]
        );
    }

    #[test]
    fn test_invalid_attribute_is_reported_not_repaired() {
        let entry = short_entry(b"FILENAMETXT", 0x00);
        let mut image = image_with_entries(&[entry]);
        let (result, events) = scan(&mut image);

        let summary = result.unwrap();
        assert_eq!(summary.invalid_attributes, 1);
        assert_eq!(summary.total_repairs(), 0);
        let reported: Vec<_> = events.iter().filter(|e| e.needs_operator()).collect();
        assert_eq!(
            reported,
            vec![&RepairEvent::InvalidAttributeType {
                offset: ROOT,
                name: "FILENAMETXT".to_string(),
                attribute: 0,
            }]
        );
        assert_eq!(image.slice(ROOT, DIR_ENTRY_SIZE).unwrap(), &entry);
    }

    #[test]
    fn test_empty_directory_terminates_immediately() {
        let mut image = image_with_entries(&[]);
        let before = image.clone();
        let (result, events) = scan(&mut image);

        assert_eq!(result.unwrap().entries_scanned, 0);
        assert_eq!(image, before);
        assert_eq!(
            events,
            vec![
                RepairEvent::RootDirectoryLocated { offset: ROOT },
                RepairEvent::EndOfDirectory { offset: ROOT, entries: 0 },
            ]
        );
    }

    #[test]
    fn test_reserved_byte_is_cleared() {
        let mut entry = short_entry(b"KERNEL  BIN", ATTR_SYSTEM);
        entry[DIR_NT_RES] = 0x18;
        entry[4..8].copy_from_slice(b"ELXX");
        let mut image = image_with_entries(&[entry]);
        let (result, events) = scan(&mut image);

        assert_eq!(result.unwrap().reserved_bytes_repaired, 1);
        assert_eq!(image.read_u8(ROOT + DIR_NT_RES).unwrap(), 0);
        assert!(events.contains(&RepairEvent::ReservedByteRepaired {
            offset: ROOT + DIR_NT_RES,
            original: 0x18,
        }));
    }

    #[test]
    fn test_lower_case_and_punctuation_replaced_per_byte() {
        let mut image = image_with_entries(&[short_entry(b"ab|DEF*HTXT", ATTR_ARCHIVE)]);
        let (_, events) = scan(&mut image);

        assert_eq!(image.slice(ROOT, DIR_NAME_LEN).unwrap(), b"000DEF0HTXT");
        let offsets: Vec<usize> = repairs(&events)
            .iter()
            .map(|e| match e {
                RepairEvent::IllegalCharacterReplaced { offset, .. } => *offset,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(offsets, vec![ROOT, ROOT + 1, ROOT + 2, ROOT + 6]);
    }

    #[test]
    fn test_kanji_marker_and_high_bytes_are_kept() {
        let name = [DIR_ENTRY_KANJI_E5, b'A', b'B', 0xE5, 0x81, b'1', b'2', b'3', b'E', b'X', b'E'];
        let mut image = image_with_entries(&[short_entry(&name, ATTR_ARCHIVE)]);
        let (_, events) = scan(&mut image);

        assert!(repairs(&events).is_empty());
        assert_eq!(image.slice(ROOT, DIR_NAME_LEN).unwrap(), &name);
    }

    #[test]
    fn test_deleted_marker_in_first_byte_is_replaced_once() {
        let mut image = image_with_entries(&[short_entry(b"\xE5OLDFILEDAT", ATTR_ARCHIVE)]);
        let (result, _) = scan(&mut image);

        assert_eq!(result.unwrap().characters_replaced, 1);
        assert_eq!(image.read_u8(ROOT).unwrap(), b'0');
    }

    #[test]
    fn test_zero_first_byte_before_name_is_not_a_terminator() {
        let mut image = image_with_entries(&[short_entry(b"\0ILENAMETXT", ATTR_ARCHIVE)]);
        let (result, events) = scan(&mut image);

        let summary = result.unwrap();
        assert_eq!(summary.entries_scanned, 1);
        assert_eq!(summary.characters_replaced, 1);
        assert_eq!(image.read_u8(ROOT).unwrap(), b'0');
        assert!(events.contains(&RepairEvent::EndOfDirectory {
            offset: ROOT + DIR_ENTRY_SIZE,
            entries: 1,
        }));
    }

    #[test]
    fn test_zero_entry_followed_by_live_entry_keeps_scanning() {
        let mut image = image_with_entries(&[
            short_entry(&[0; DIR_NAME_LEN], ATTR_ARCHIVE),
            short_entry(b"SECOND  BIN", ATTR_ARCHIVE),
        ]);
        let (result, _) = scan(&mut image);

        assert_eq!(result.unwrap().entries_scanned, 2);
        // Every zero name byte of the first entry was illegal
        assert_eq!(image.slice(ROOT, DIR_NAME_LEN).unwrap(), b"00000000000");
    }

    #[test]
    fn test_long_name_reserved_pair_cleared_and_name_skipped() {
        let mut lfn = long_name_entry(0x41, "ab.c");
        lfn[LDIR_FST_CLUS_LO] = 0x12;
        lfn[LDIR_FST_CLUS_LO + 1] = 0x34;
        let mut image = image_with_entries(&[lfn, short_entry(b"ABC~1      ", ATTR_ARCHIVE)]);
        let (result, events) = scan(&mut image);

        let summary = result.unwrap();
        assert_eq!(summary.long_name_reserved_repaired, 1);
        assert_eq!(image.slice(ROOT + LDIR_FST_CLUS_LO, 2).unwrap(), &[0, 0]);
        assert!(events.contains(&RepairEvent::LongNameReservedRepaired {
            offset: ROOT + LDIR_FST_CLUS_LO,
            original: [0x12, 0x34],
        }));
        // UTF-16 name bytes of the long entry are untouched
        assert_eq!(image.slice(ROOT + 1, 10).unwrap(), &lfn[1..11]);
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let mut bad = short_entry(b"bad*name.tx", 0x3F);
        bad[DIR_NT_RES] = 1;
        let mut image = image_with_entries(&[bad, short_entry(b" LEADINGSPC", ATTR_DIRECTORY)]);
        let (first, first_events) = scan(&mut image);
        assert!(first.unwrap().total_repairs() > 0);
        assert!(!repairs(&first_events).is_empty());

        let repaired = image.clone();
        let (second, second_events) = scan(&mut image);
        assert_eq!(second.unwrap().total_repairs(), 0);
        assert!(repairs(&second_events).is_empty());
        assert_eq!(image, repaired);
    }

    #[test]
    fn test_unterminated_directory_fails_at_image_end() {
        let mut data = vec![0u8; ROOT + 2 * DIR_ENTRY_SIZE];
        data[ROOT..ROOT + DIR_ENTRY_SIZE].copy_from_slice(&short_entry(b"ONE     TXT", ATTR_ARCHIVE));
        data[ROOT + DIR_ENTRY_SIZE..].copy_from_slice(&short_entry(b"TWO     TXT", ATTR_ARCHIVE));
        let mut image = ByteImage::new(data);
        let (result, events) = scan(&mut image);

        assert!(matches!(
            result,
            Err(FatmendError::DirectoryUnterminated { offset }) if offset == ROOT + 2 * DIR_ENTRY_SIZE
        ));
        // Findings before the end are still reported and applied
        assert!(!repairs(&events).is_empty());
        assert_eq!(image.slice(ROOT, DIR_NAME_LEN).unwrap(), b"ONE00000TXT");
    }

    #[test]
    fn test_zero_entry_at_image_end_is_unterminated() {
        let mut image = ByteImage::zeroed(ROOT + DIR_ENTRY_SIZE);
        let (result, _) = scan(&mut image);
        assert!(matches!(result, Err(FatmendError::DirectoryUnterminated { .. })));
    }

    #[test]
    fn test_root_outside_image() {
        let mut image = ByteImage::zeroed(ROOT);
        let (result, events) = scan(&mut image);
        assert!(matches!(result, Err(FatmendError::OutOfRange { .. })));
        assert!(events.is_empty());
    }
}
