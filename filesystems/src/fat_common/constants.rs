// FAT32 on-disk layout constants
// Offsets are relative to the start of the boot sector or of a 32-byte directory entry

// Boot sector offsets
pub const BS_JMP_BOOT: usize = 0x00;
pub const BS_OEM_NAME: usize = 0x03;
pub const BPB_BYTES_PER_SEC: usize = 0x0B;
pub const BPB_SEC_PER_CLUS: usize = 0x0D;
pub const BPB_RSVD_SEC_CNT: usize = 0x0E;
pub const BPB_NUM_FATS: usize = 0x10;
pub const BPB_ROOT_ENT_CNT: usize = 0x11;
pub const BPB_TOT_SEC16: usize = 0x13;
pub const BPB_MEDIA: usize = 0x15;
pub const BPB_FAT_SZ16: usize = 0x16;
pub const BPB_TOT_SEC32: usize = 0x20;

// FAT32-specific offsets (start at 36)
pub const BPB_FAT_SZ32: usize = 0x24;
pub const BPB_FS_VER: usize = 0x2A;
pub const BPB_ROOT_CLUS: usize = 0x2C;
pub const BPB_FS_INFO: usize = 0x30;
pub const BPB_BK_BOOT_SEC: usize = 0x32;
pub const BPB_RESERVED: usize = 0x34;
pub const BS32_DRV_NUM: usize = 0x40;
pub const BS32_RESERVED1: usize = 0x41;
pub const BS32_BOOT_SIG: usize = 0x42;
pub const BS32_FIL_SYS_TYPE: usize = 0x52;

// Jump instruction forms
pub const JMP_SHORT: u8 = 0xEB;  // followed by a displacement and a NOP
pub const JMP_NOP: u8 = 0x90;
pub const JMP_NEAR: u8 = 0xE9;

// Boot sector signature
pub const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];
pub const BOOT_SIGNATURE_OFFSET: usize = 0x1FE;
pub const BOOT_SECTOR_SIZE: usize = 512;

// Primary boot sector always sits at the start of the volume
pub const PRIMARY_BOOT_SECTOR_OFFSET: usize = 0;

// Legal bytes-per-sector values; every one is a multiple of BOOT_SECTOR_SIZE
pub const LEGAL_BYTES_PER_SECTOR: [u16; 4] = [512, 1024, 2048, 4096];

// Media descriptors
pub const MEDIA_FIXED: u8 = 0xF8;  // Fixed disk
pub const MEDIA_REMOVABLE: u8 = 0xF0;  // Removable media

// BIOS drive numbers
pub const DRIVE_FLOPPY: u8 = 0x00;
pub const DRIVE_HARD_DISK: u8 = 0x80;

// Directory entry layout
pub const DIR_ENTRY_SIZE: usize = 32;
pub const DIR_NAME: usize = 0x00;
pub const DIR_NAME_LEN: usize = 11;
pub const DIR_ATTR: usize = 0x0B;
pub const DIR_NT_RES: usize = 0x0C;
pub const LDIR_FST_CLUS_LO: usize = 0x1A;  // must be zero in long name entries

// First-byte markers
pub const DIR_ENTRY_END: u8 = 0x00;
pub const DIR_ENTRY_FREE: u8 = 0xE5;
pub const DIR_ENTRY_KANJI_E5: u8 = 0x05;  // stands in for a leading 0xE5
