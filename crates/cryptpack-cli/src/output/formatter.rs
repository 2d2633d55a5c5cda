//! Output formatter trait for CLI results.

use anyhow::Result;
use cryptpack_core::PackReport;
use cryptpack_core::UnpackReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of packing into `archive`
    fn format_pack_result(&self, archive: &Path, report: &PackReport) -> Result<()>;

    /// Format the result of unpacking `archive` into `output_dir`
    fn format_unpack_result(
        &self,
        archive: &Path,
        output_dir: &Path,
        report: &UnpackReport,
    ) -> Result<()>;

    /// Format a detail line shown only in verbose mode
    fn format_detail(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
        }
    }
}
