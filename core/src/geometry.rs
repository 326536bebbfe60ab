use serde::{Deserialize, Serialize};
use crate::FatmendError;

/// Volume geometry decoded from an intact FAT32 boot sector.
///
/// Only produced by a successful BPB validation and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sector_count: u16,
    pub number_of_fats: u8,
    pub fat_size_sectors: u32,
    pub root_cluster: u32,
}

impl Geometry {
    /// Byte offset of the root directory: the reserved region plus every FAT copy.
    pub fn root_directory_offset(&self) -> Result<usize, FatmendError> {
        let sectors = u64::from(self.number_of_fats) * u64::from(self.fat_size_sectors)
            + u64::from(self.reserved_sector_count);
        let offset = sectors * u64::from(self.bytes_per_sector);

        usize::try_from(offset).map_err(|_| FatmendError::OutOfRange {
            offset,
            len: 0,
            image_len: 0,
        })
    }

    pub fn cluster_size(&self) -> u32 {
        u32::from(self.sectors_per_cluster) * u32::from(self.bytes_per_sector)
    }
}
