//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use cryptpack_core::PackReport;
use cryptpack_core::UnpackReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Serialize)]
struct PackOutput {
    archive: String,
    files_added: usize,
    bytes_read: u64,
    archive_size: u64,
    duration_ms: u128,
}

#[derive(Serialize)]
struct UnpackOutput {
    archive: String,
    output_dir: String,
    files_extracted: usize,
    directories_created: usize,
    bytes_written: u64,
    entries: Vec<String>,
    duration_ms: u128,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn pack_output(archive: &Path, report: &PackReport) -> JsonOutput<PackOutput> {
        JsonOutput::success(
            "pack",
            PackOutput {
                archive: archive.display().to_string(),
                files_added: report.files_added,
                bytes_read: report.bytes_read,
                archive_size: report.archive_size,
                duration_ms: report.duration.as_millis(),
            },
        )
    }

    fn unpack_output(
        archive: &Path,
        output_dir: &Path,
        report: &UnpackReport,
    ) -> JsonOutput<UnpackOutput> {
        JsonOutput::success(
            "unpack",
            UnpackOutput {
                archive: archive.display().to_string(),
                output_dir: output_dir.display().to_string(),
                files_extracted: report.files_extracted,
                directories_created: report.directories_created,
                bytes_written: report.bytes_written,
                entries: report.entries.clone(),
                duration_ms: report.duration.as_millis(),
            },
        )
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_pack_result(&self, archive: &Path, report: &PackReport) -> Result<()> {
        Self::output(&Self::pack_output(archive, report))
    }

    fn format_unpack_result(
        &self,
        archive: &Path,
        output_dir: &Path,
        report: &UnpackReport,
    ) -> Result<()> {
        Self::output(&Self::unpack_output(archive, output_dir, report))
    }

    fn format_detail(&self, _message: &str) {}
}
