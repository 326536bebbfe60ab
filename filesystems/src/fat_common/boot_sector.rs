// FAT32 boot sector and image builder
// Produces well-formed sectors and small in-memory volumes for exercising the analyzer

use fatmend_core::ByteImage;
use super::constants::*;
use super::directory::attributes::ATTR_LONG_NAME;

/// FAT32 boot sector parameters
#[derive(Debug, Clone)]
pub struct Fat32BootSectorParams {
    pub oem_name: [u8; 8],
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub num_fats: u8,
    pub media_descriptor: u8,
    pub total_sectors: u32,
    pub sectors_per_fat: u32,
    pub root_cluster: u32,
    pub fs_info_sector: u16,
    pub backup_boot_sector: u16,
    pub drive_number: u8,
}

impl Default for Fat32BootSectorParams {
    fn default() -> Self {
        Self {
            oem_name: *b"MSWIN4.1",
            bytes_per_sector: 512,
            sectors_per_cluster: 1,
            reserved_sectors: 32,
            num_fats: 2,
            media_descriptor: MEDIA_FIXED,
            total_sectors: 70_000,
            sectors_per_fat: 1,
            root_cluster: 2,
            fs_info_sector: 1,
            backup_boot_sector: 6,
            drive_number: DRIVE_HARD_DISK,
        }
    }
}

impl Fat32BootSectorParams {
    /// Offset of the root directory implied by these parameters.
    pub fn root_directory_offset(&self) -> usize {
        (self.num_fats as usize * self.sectors_per_fat as usize + self.reserved_sectors as usize)
            * self.bytes_per_sector as usize
    }

    pub fn backup_offset(&self) -> usize {
        self.backup_boot_sector as usize * self.bytes_per_sector as usize
    }
}

/// Build a FAT32 boot sector
pub fn build_fat32_boot_sector(params: &Fat32BootSectorParams) -> [u8; BOOT_SECTOR_SIZE] {
    let mut boot_sector = [0u8; BOOT_SECTOR_SIZE];

    // Jump instruction
    boot_sector[BS_JMP_BOOT] = JMP_SHORT;
    boot_sector[BS_JMP_BOOT + 1] = 0x58;
    boot_sector[BS_JMP_BOOT + 2] = JMP_NOP;

    boot_sector[BS_OEM_NAME..BS_OEM_NAME + 8].copy_from_slice(&params.oem_name);

    boot_sector[BPB_BYTES_PER_SEC..BPB_BYTES_PER_SEC + 2]
        .copy_from_slice(&params.bytes_per_sector.to_le_bytes());
    boot_sector[BPB_SEC_PER_CLUS] = params.sectors_per_cluster;
    boot_sector[BPB_RSVD_SEC_CNT..BPB_RSVD_SEC_CNT + 2]
        .copy_from_slice(&params.reserved_sectors.to_le_bytes());
    boot_sector[BPB_NUM_FATS] = params.num_fats;
    // Root entry count, 16-bit total sectors and 16-bit FAT size stay zero
    boot_sector[BPB_MEDIA] = params.media_descriptor;
    boot_sector[BPB_TOT_SEC32..BPB_TOT_SEC32 + 4]
        .copy_from_slice(&params.total_sectors.to_le_bytes());

    boot_sector[BPB_FAT_SZ32..BPB_FAT_SZ32 + 4]
        .copy_from_slice(&params.sectors_per_fat.to_le_bytes());
    boot_sector[BPB_ROOT_CLUS..BPB_ROOT_CLUS + 4]
        .copy_from_slice(&params.root_cluster.to_le_bytes());
    boot_sector[BPB_FS_INFO..BPB_FS_INFO + 2]
        .copy_from_slice(&params.fs_info_sector.to_le_bytes());
    boot_sector[BPB_BK_BOOT_SEC..BPB_BK_BOOT_SEC + 2]
        .copy_from_slice(&params.backup_boot_sector.to_le_bytes());

    boot_sector[BS32_DRV_NUM] = params.drive_number;
    boot_sector[BS32_BOOT_SIG] = 0x29;  // Extended boot signature
    boot_sector[BS32_FIL_SYS_TYPE..BS32_FIL_SYS_TYPE + 8].copy_from_slice(b"FAT32   ");

    boot_sector[BOOT_SIGNATURE_OFFSET..BOOT_SIGNATURE_OFFSET + 2]
        .copy_from_slice(&BOOT_SIGNATURE);

    boot_sector
}

/// A short directory entry with the given name and attribute; everything else zero.
pub fn short_entry(name: &[u8; DIR_NAME_LEN], attribute: u8) -> [u8; DIR_ENTRY_SIZE] {
    let mut entry = [0u8; DIR_ENTRY_SIZE];
    entry[DIR_NAME..DIR_NAME + DIR_NAME_LEN].copy_from_slice(name);
    entry[DIR_ATTR] = attribute;
    entry
}

/// A long name fragment entry with ordinal `order` and a few UTF-16 name characters.
pub fn long_name_entry(order: u8, chars: &str) -> [u8; DIR_ENTRY_SIZE] {
    let mut entry = [0u8; DIR_ENTRY_SIZE];
    entry[0] = order;
    // First five UTF-16 code units live at offsets 1..11
    for (i, unit) in chars.encode_utf16().take(5).enumerate() {
        entry[1 + i * 2..3 + i * 2].copy_from_slice(&unit.to_le_bytes());
    }
    entry[DIR_ATTR] = ATTR_LONG_NAME;
    entry
}

/// Build a volume with primary and backup boot sectors and the given root entries.
///
/// The image ends one cluster after the last entry, so the root directory is
/// always followed by zeroed space that reads as the end-of-directory marker.
pub fn build_fat32_image(params: &Fat32BootSectorParams, entries: &[[u8; DIR_ENTRY_SIZE]]) -> ByteImage {
    let boot_sector = build_fat32_boot_sector(params);
    let root = params.root_directory_offset();
    let cluster = params.sectors_per_cluster as usize * params.bytes_per_sector as usize;
    let len = root + entries.len() * DIR_ENTRY_SIZE + cluster.max(2 * DIR_ENTRY_SIZE);

    let mut data = vec![0u8; len];
    data[..BOOT_SECTOR_SIZE].copy_from_slice(&boot_sector);
    let backup = params.backup_offset();
    if backup != 0 && backup + BOOT_SECTOR_SIZE <= root {
        data[backup..backup + BOOT_SECTOR_SIZE].copy_from_slice(&boot_sector);
    }
    for (i, entry) in entries.iter().enumerate() {
        let offset = root + i * DIR_ENTRY_SIZE;
        data[offset..offset + DIR_ENTRY_SIZE].copy_from_slice(entry);
    }

    ByteImage::new(data)
}
