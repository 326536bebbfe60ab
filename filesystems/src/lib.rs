pub mod fat_common;
pub mod fat32;
pub mod image_file;
pub mod logging;

pub use fat32::{
    AnalysisReport, BootSectorLocator, BootSectorRepairer, BootSectorSource, BootSectorValidator,
    Fat32Analyzer, RootDirectoryScanner, ScanSummary,
};
pub use image_file::{analyze_image_file, repair_image_file};
pub use logging::LoggingSink;
