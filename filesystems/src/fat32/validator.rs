// FAT32 boot sector validation
// Checks every constrained BPB field in on-disk order and decodes geometry from an intact sector

use fatmend_core::{BpbField, ByteImage, FatmendError, Geometry};
use crate::fat_common::constants::*;

pub struct BootSectorValidator;

impl BootSectorValidator {
    /// Validate the boot sector at `offset` and decode its geometry.
    ///
    /// Stops at the first field that fails and reports it. Read-only, so it can be
    /// called repeatedly for diagnostics.
    pub fn validate(image: &ByteImage, offset: usize) -> Result<Geometry, FatmendError> {
        let bs = image.slice(offset, BOOT_SECTOR_SIZE).map_err(|_| FatmendError::FieldViolation {
            offset,
            field: BpbField::Truncated,
        })?;

        Self::check_fields(bs).map_err(|field| FatmendError::FieldViolation { offset, field })?;
        Ok(Self::decode_geometry(bs))
    }

    /// Convenience predicate over [`validate`](Self::validate).
    pub fn is_intact(image: &ByteImage, offset: usize) -> bool {
        Self::validate(image, offset).is_ok()
    }

    fn check_fields(bs: &[u8]) -> Result<(), BpbField> {
        let u16_at = |off: usize| u16::from_le_bytes([bs[off], bs[off + 1]]);
        let u32_at = |off: usize| u32::from_le_bytes([bs[off], bs[off + 1], bs[off + 2], bs[off + 3]]);

        let jump_ok = match bs[BS_JMP_BOOT] {
            JMP_SHORT => bs[BS_JMP_BOOT + 2] == JMP_NOP,
            JMP_NEAR => true,
            _ => false,
        };
        ensure(jump_ok, BpbField::JumpBoot)?;

        ensure(
            LEGAL_BYTES_PER_SECTOR.contains(&u16_at(BPB_BYTES_PER_SEC)),
            BpbField::BytesPerSector,
        )?;
        ensure(
            bs[BPB_SEC_PER_CLUS].is_power_of_two(),
            BpbField::SectorsPerCluster,
        )?;
        ensure(u16_at(BPB_RSVD_SEC_CNT) != 0, BpbField::ReservedSectorCount)?;
        ensure(matches!(bs[BPB_NUM_FATS], 1 | 2), BpbField::NumberOfFats)?;
        ensure(u16_at(BPB_ROOT_ENT_CNT) == 0, BpbField::RootEntryCount)?;
        ensure(u16_at(BPB_TOT_SEC16) == 0, BpbField::TotalSectors16)?;
        ensure(
            matches!(bs[BPB_MEDIA], MEDIA_REMOVABLE | MEDIA_FIXED..=0xFF),
            BpbField::Media,
        )?;
        ensure(u16_at(BPB_FAT_SZ16) == 0, BpbField::FatSize16)?;
        ensure(u32_at(BPB_TOT_SEC32) != 0, BpbField::TotalSectors32)?;
        ensure(u16_at(BPB_FS_VER) == 0, BpbField::FsVersion)?;
        ensure(bs[BPB_RESERVED] == 0, BpbField::Reserved)?;
        ensure(
            matches!(bs[BS32_DRV_NUM], DRIVE_FLOPPY | DRIVE_HARD_DISK),
            BpbField::DriveNumber,
        )?;
        ensure(bs[BS32_RESERVED1] == 0, BpbField::Reserved1)?;
        ensure(
            bs[BOOT_SIGNATURE_OFFSET..BOOT_SIGNATURE_OFFSET + 2] == BOOT_SIGNATURE,
            BpbField::EndSignature,
        )?;

        Ok(())
    }

    fn decode_geometry(bs: &[u8]) -> Geometry {
        Geometry {
            bytes_per_sector: u16::from_le_bytes([bs[BPB_BYTES_PER_SEC], bs[BPB_BYTES_PER_SEC + 1]]),
            sectors_per_cluster: bs[BPB_SEC_PER_CLUS],
            reserved_sector_count: u16::from_le_bytes([bs[BPB_RSVD_SEC_CNT], bs[BPB_RSVD_SEC_CNT + 1]]),
            number_of_fats: bs[BPB_NUM_FATS],
            fat_size_sectors: u32::from_le_bytes([
                bs[BPB_FAT_SZ32],
                bs[BPB_FAT_SZ32 + 1],
                bs[BPB_FAT_SZ32 + 2],
                bs[BPB_FAT_SZ32 + 3],
            ]),
            root_cluster: u32::from_le_bytes([
                bs[BPB_ROOT_CLUS],
                bs[BPB_ROOT_CLUS + 1],
                bs[BPB_ROOT_CLUS + 2],
                bs[BPB_ROOT_CLUS + 3],
            ]),
        }
    }
}

fn ensure(ok: bool, field: BpbField) -> Result<(), BpbField> {
    if ok {
        Ok(())
    } else {
        Err(field)
    }
}
