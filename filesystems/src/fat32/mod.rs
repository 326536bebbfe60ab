// FAT32 boot sector recovery and root directory repair

pub mod analyzer;
pub mod locator;
pub mod repair;
pub mod root_directory;
pub mod validator;


pub use analyzer::{AnalysisReport, BootSectorSource, Fat32Analyzer};
pub use locator::BootSectorLocator;
pub use repair::BootSectorRepairer;
pub use root_directory::{RootDirectoryScanner, ScanSummary};
pub use validator::BootSectorValidator;
