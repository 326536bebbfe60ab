// File-level entry points
// Reading and writing the image is the only I/O; the analysis itself works on memory

use std::fs;
use std::path::Path;
use fatmend_core::{AnalyzerOptions, ByteImage, EventSink, FatmendError};
use log::info;
use crate::fat32::{AnalysisReport, Fat32Analyzer};

/// Analyze `input` and write the repaired image to `output`.
///
/// Nothing is written when the analysis fails.
pub fn repair_image_file(
    input: &Path,
    output: &Path,
    options: AnalyzerOptions,
    sink: &mut dyn EventSink,
) -> Result<AnalysisReport, FatmendError> {
    let analyzer = Fat32Analyzer::new(options)?;
    let mut image = ByteImage::new(fs::read(input)?);
    info!("Loaded {} bytes from {}", image.len(), input.display());

    let report = analyzer.analyze(&mut image, sink)?;

    fs::write(output, image.as_bytes())?;
    info!("Wrote {} bytes to {}", image.len(), output.display());
    Ok(report)
}

/// Analyze `input` without writing anything back.
pub fn analyze_image_file(
    input: &Path,
    options: AnalyzerOptions,
    sink: &mut dyn EventSink,
) -> Result<AnalysisReport, FatmendError> {
    let analyzer = Fat32Analyzer::new(options)?;
    let mut image = ByteImage::new(fs::read(input)?);
    analyzer.analyze(&mut image, sink)
}
