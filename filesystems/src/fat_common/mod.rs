// FAT on-disk rules shared by the boot sector and directory code

pub mod boot_sector;
pub mod constants;
pub mod directory;

pub use constants::*;
