// Boot sector repair from the backup copy

use fatmend_core::{ByteImage, FatmendError};
use log::info;
use crate::fat_common::constants::BOOT_SECTOR_SIZE;

pub struct BootSectorRepairer;

impl BootSectorRepairer {
    /// Overwrite the sector at `primary_offset` with the sector at `backup_offset`.
    ///
    /// The backup must already have passed validation. Only fails if either
    /// sector lies outside the image.
    pub fn repair(image: &mut ByteImage, primary_offset: usize, backup_offset: usize) -> Result<(), FatmendError> {
        image.copy_within(backup_offset, primary_offset, BOOT_SECTOR_SIZE)?;
        info!(
            "Boot sector at offset {} restored from backup at offset {}",
            primary_offset, backup_offset
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_copies_exactly_one_sector() {
        let mut data = vec![0u8; 3 * BOOT_SECTOR_SIZE];
        for (i, byte) in data[1024..1536].iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }
        data[512] = 0x77;
        let mut image = ByteImage::new(data);

        BootSectorRepairer::repair(&mut image, 0, 1024).unwrap();

        let bytes = image.as_bytes();
        assert_eq!(&bytes[..512], &bytes[1024..1536]);
        assert_eq!(bytes[512], 0x77);
    }

    #[test]
    fn test_repair_rejects_backup_past_end() {
        let mut image = ByteImage::zeroed(1000);
        assert!(matches!(
            BootSectorRepairer::repair(&mut image, 0, 512),
            Err(FatmendError::OutOfRange { .. })
        ));
        assert!(image.as_bytes().iter().all(|&b| b == 0));
    }
}
