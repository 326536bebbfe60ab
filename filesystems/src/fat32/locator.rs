// Boot sector location
// The primary is always at offset 0; backups are found by signature on 512-byte boundaries

use fatmend_core::ByteImage;
use log::debug;
use crate::fat_common::constants::*;

pub struct BootSectorLocator;

impl BootSectorLocator {
    pub fn locate_primary(_image: &ByteImage) -> usize {
        PRIMARY_BOOT_SECTOR_OFFSET
    }

    /// True when a structurally plausible boot sector starts at `offset`.
    ///
    /// Only the jump instruction, 512-byte alignment and the end signature are
    /// checked; full field validation is the validator's job.
    pub fn is_candidate(image: &ByteImage, offset: usize) -> bool {
        if offset % BOOT_SECTOR_SIZE != 0 {
            return false;
        }
        let sector = match image.slice(offset, BOOT_SECTOR_SIZE) {
            Ok(sector) => sector,
            Err(_) => return false,
        };

        let jump_ok = match sector[BS_JMP_BOOT] {
            JMP_SHORT => sector[BS_JMP_BOOT + 2] == JMP_NOP,
            JMP_NEAR => true,
            _ => false,
        };

        jump_ok && sector[BOOT_SIGNATURE_OFFSET..BOOT_SIGNATURE_OFFSET + 2] == BOOT_SIGNATURE
    }

    /// Every plausible boot sector offset in ascending order, the primary included.
    pub fn candidates(image: &ByteImage) -> impl Iterator<Item = usize> + '_ {
        (0..image.len())
            .step_by(BOOT_SECTOR_SIZE)
            .filter(move |&offset| Self::is_candidate(image, offset))
    }

    /// Offsets where a backup written at `sector_hint` would sit, one per legal sector size.
    pub fn hinted_offsets(image: &ByteImage, sector_hint: u32) -> Vec<usize> {
        LEGAL_BYTES_PER_SECTOR
            .iter()
            .filter_map(|&bps| (sector_hint as usize).checked_mul(bps as usize))
            .filter(|&offset| offset != PRIMARY_BOOT_SECTOR_OFFSET)
            .filter(|&offset| Self::is_candidate(image, offset))
            .collect()
    }

    /// Find a backup boot sector, trying the hinted sector first.
    ///
    /// Falls back to the first plausible candidate after the primary.
    pub fn locate_backup(image: &ByteImage, sector_hint: u32) -> Option<usize> {
        if let Some(&offset) = Self::hinted_offsets(image, sector_hint).first() {
            debug!("Backup boot sector found at hinted offset {}", offset);
            return Some(offset);
        }

        let found = Self::candidates(image).find(|&offset| offset != PRIMARY_BOOT_SECTOR_OFFSET);
        match found {
            Some(offset) => debug!("Backup boot sector found by scan at offset {}", offset),
            None => debug!("No backup boot sector candidate in {} bytes", image.len()),
        }
        found
    }
}
