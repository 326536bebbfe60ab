// FAT32 analysis pipeline
// Validate the primary boot sector, fall back to a backup and repair from it,
// then enforce the root directory entry rules using the trusted geometry

use fatmend_core::{
    AnalyzerOptions, BpbField, ByteImage, EventSink, FatmendError, Geometry, RepairEvent,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use crate::fat_common::constants::DIR_ENTRY_FREE;
use crate::fat_common::directory::is_illegal_short_name_byte;
use super::locator::BootSectorLocator;
use super::repair::BootSectorRepairer;
use super::root_directory::{RootDirectoryScanner, ScanSummary};
use super::validator::BootSectorValidator;

/// Which boot sector copy the geometry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum BootSectorSource {
    Primary,
    Backup { offset: usize, repaired: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub boot_sector: BootSectorSource,
    pub geometry: Geometry,
    /// `None` when the root directory scan was disabled.
    pub scan: Option<ScanSummary>,
}

impl AnalysisReport {
    pub fn total_repairs(&self) -> usize {
        let boot = matches!(self.boot_sector, BootSectorSource::Backup { repaired: true, .. }) as usize;
        boot + self.scan.as_ref().map_or(0, ScanSummary::total_repairs)
    }

    /// True when some finding could not be fixed automatically.
    pub fn requires_operator(&self) -> bool {
        self.scan.as_ref().map_or(false, |s| s.invalid_attributes > 0)
    }
}

pub struct Fat32Analyzer {
    options: AnalyzerOptions,
}

impl Fat32Analyzer {
    pub fn new(options: AnalyzerOptions) -> Result<Self, FatmendError> {
        Self::validate_options(&options)?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    fn validate_options(options: &AnalyzerOptions) -> Result<(), FatmendError> {
        let byte = options.replacement_byte;
        if is_illegal_short_name_byte(byte) || byte == DIR_ENTRY_FREE {
            return Err(FatmendError::InvalidOptions(format!(
                "replacement byte 0x{:02X} is not a legal short name character",
                byte
            )));
        }
        Ok(())
    }

    /// Run the whole pipeline over `image`, mutating it in place.
    ///
    /// Fails with `UnrecoverableCorruption` only when neither the primary nor any
    /// backup candidate validates; in that case the image has not been modified.
    pub fn analyze(&self, image: &mut ByteImage, sink: &mut dyn EventSink) -> Result<AnalysisReport, FatmendError> {
        let (boot_sector, geometry) = self.establish_boot_sector(image, sink)?;
        sink.emit(RepairEvent::GeometryExtracted { geometry });
        debug!("Geometry: {:?}", geometry);

        let scan = if self.options.scan_root_directory {
            let scanner = RootDirectoryScanner::new(self.options.replacement_byte);
            Some(scanner.scan(image, &geometry, sink)?)
        } else {
            None
        };

        Ok(AnalysisReport {
            boot_sector,
            geometry,
            scan,
        })
    }

    fn establish_boot_sector(
        &self,
        image: &mut ByteImage,
        sink: &mut dyn EventSink,
    ) -> Result<(BootSectorSource, Geometry), FatmendError> {
        let primary = BootSectorLocator::locate_primary(image);
        let primary_field = match BootSectorValidator::validate(image, primary) {
            Ok(geometry) => {
                info!("Boot sector located at offset {}", primary);
                sink.emit(RepairEvent::BootSectorFound { offset: primary });
                return Ok((BootSectorSource::Primary, geometry));
            }
            Err(err) => violation_field(err)?,
        };

        warn!("Boot sector is missing or modified ({}); checking backup", primary_field);
        sink.emit(RepairEvent::FieldViolation { offset: primary, field: primary_field });

        let (backup, geometry) = self.find_valid_backup(image, primary, primary_field, sink)?;

        let repaired = self.options.repair_boot_sector;
        if repaired {
            BootSectorRepairer::repair(image, primary, backup)?;
        } else {
            info!("Boot sector repair disabled; using backup at offset {} for geometry only", backup);
        }
        sink.emit(RepairEvent::BackupBootSectorUsed { offset: backup, repaired });

        Ok((BootSectorSource::Backup { offset: backup, repaired }, geometry))
    }

    /// Try the hinted backup sector first, then every other plausible candidate.
    fn find_valid_backup(
        &self,
        image: &ByteImage,
        primary: usize,
        primary_field: BpbField,
        sink: &mut dyn EventSink,
    ) -> Result<(usize, Geometry), FatmendError> {
        let hinted = BootSectorLocator::hinted_offsets(image, self.options.backup_sector_hint);
        let scanned = BootSectorLocator::candidates(image).filter(|offset| !hinted.contains(offset));

        let mut first_rejected = None;
        for offset in hinted.iter().copied().chain(scanned) {
            if offset == primary {
                continue;
            }
            match BootSectorValidator::validate(image, offset) {
                Ok(geometry) => {
                    info!("Backup boot sector located at offset {}", offset);
                    return Ok((offset, geometry));
                }
                Err(err) => {
                    let field = violation_field(err)?;
                    debug!("Backup candidate at offset {} rejected: {}", offset, field);
                    sink.emit(RepairEvent::FieldViolation { offset, field });
                    first_rejected.get_or_insert((offset, field));
                }
            }
        }

        Err(FatmendError::UnrecoverableCorruption {
            primary: primary_field,
            backup: first_rejected,
        })
    }
}

fn violation_field(err: FatmendError) -> Result<BpbField, FatmendError> {
    match err {
        FatmendError::FieldViolation { field, .. } => Ok(field),
        other => Err(other),
    }
}
