use anyhow::Context;
use clap::Parser;
use fatmend_core::{AnalyzerOptions, EventSink, RepairEvent};
use fatmend_filesystems::{analyze_image_file, repair_image_file, AnalysisReport, BootSectorSource};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fatmend")]
#[command(about = "Analyze and repair the boot sector and root directory of a FAT32 image", long_about = None)]
struct Cli {
    /// Volume image to analyze
    input: PathBuf,
    /// Where to write the repaired image
    output: PathBuf,
    /// Byte written over illegal short-name characters (hex like 0x5F, or a single character)
    #[arg(long, value_parser = parse_byte, default_value = "0x30")]
    replacement_byte: u8,
    /// Sector checked first for the backup boot sector
    #[arg(long, default_value_t = fatmend_core::options::DEFAULT_BACKUP_SECTOR_HINT)]
    backup_sector: u32,
    /// Use a valid backup for geometry but leave the primary boot sector as is
    #[arg(long)]
    no_boot_repair: bool,
    /// Analyze only; do not write the output image
    #[arg(long)]
    dry_run: bool,
    /// Print events and the final report as JSON lines
    #[arg(long)]
    json: bool,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_byte(value: &str) -> Result<u8, String> {
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        return u8::from_str_radix(hex, 16).map_err(|e| format!("invalid hex byte '{}': {}", value, e));
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!("expected a hex byte or a single ASCII character, got '{}'", value)),
    }
}

/// Prints each event as it arrives, either as a sentence or as a JSON line.
struct ConsoleSink {
    json: bool,
}

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: RepairEvent) {
        if self.json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => log::error!("Failed to serialize event: {}", e),
            }
            return;
        }

        match &event {
            RepairEvent::FieldViolation { offset: 0, .. } => {
                println!("{}", event);
                println!("Boot sector is missing and/or modified. Checking backup...");
            }
            RepairEvent::GeometryExtracted { geometry } => {
                println!("------------------------------------");
                println!("Bytes per sector: {}", geometry.bytes_per_sector);
                println!("Sectors per cluster: {}", geometry.sectors_per_cluster);
                println!("Number of reserved sectors: {}", geometry.reserved_sector_count);
                println!("Number of FATs: {}", geometry.number_of_fats);
                println!("Size of FATs (in sectors): {}", geometry.fat_size_sectors);
                println!("Root cluster: {}", geometry.root_cluster);
                println!("------------------------------------");
            }
            RepairEvent::EndOfDirectory { .. } | RepairEvent::RootDirectoryLocated { .. } => {
                log::info!("{}", event);
            }
            _ => println!("{}", event),
        }
    }
}

fn print_summary(report: &AnalysisReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }

    match report.boot_sector {
        BootSectorSource::Primary => {}
        BootSectorSource::Backup { offset, repaired } => {
            println!(
                "Boot sector {} from backup at offset {}.",
                if repaired { "restored" } else { "read" },
                offset
            );
        }
    }
    if let Some(scan) = &report.scan {
        println!(
            "Root directory: {} entries scanned, {} characters replaced, {} reserved fields repaired.",
            scan.entries_scanned,
            scan.characters_replaced,
            scan.reserved_bytes_repaired + scan.long_name_reserved_repaired
        );
    }
    if report.requires_operator() {
        println!("Some entries have invalid attribute types and need manual repair.");
    }
    println!("All done.");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let options = AnalyzerOptions {
        replacement_byte: cli.replacement_byte,
        backup_sector_hint: cli.backup_sector,
        repair_boot_sector: !cli.no_boot_repair,
        ..Default::default()
    };

    let mut sink = ConsoleSink { json: cli.json };
    if !cli.json {
        println!("Analyzing boot sector...");
    }

    let report = if cli.dry_run {
        analyze_image_file(&cli.input, options, &mut sink)
            .with_context(|| format!("Failed to analyze {}", cli.input.display()))?
    } else {
        repair_image_file(&cli.input, &cli.output, options, &mut sink).with_context(|| {
            format!(
                "Failed to repair {} into {}",
                cli.input.display(),
                cli.output.display()
            )
        })?
    };

    print_summary(&report, cli.json)
}
