//! Unpack command implementation.

use crate::cli::DEFAULT_UNPACK_DIR;
use crate::cli::UnpackArgs;
use crate::error::convert_unpack_error;
use crate::output::OutputFormatter;
use crate::password;
use anyhow::Result;
use anyhow::anyhow;
use cryptpack_core::UnpackConfig;
use cryptpack_core::unpack;
use std::path::Path;
use std::path::PathBuf;

/// Unpacks each archive into `<dir>/<archive file name>`, stopping at the
/// first failure.
pub fn execute(args: &UnpackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let base_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_UNPACK_DIR));
    let config = UnpackConfig::default().with_overwrite(!args.no_clobber);

    let password = password::obtain(args.password.as_deref(), false)?;
    formatter.format_detail(&format!("Password: {}", password::mask(&password)));

    for archive in &args.archives {
        let output_dir = archive_output_dir(&base_dir, archive)?;
        formatter.format_detail(&format!(
            "Unpacking {} into {}",
            archive.display(),
            output_dir.display()
        ));

        let report = unpack(archive, &password, &output_dir, &config)
            .map_err(|e| convert_unpack_error(e, archive))?;
        formatter.format_unpack_result(archive, &output_dir, &report)?;
    }

    Ok(())
}

fn archive_output_dir(base_dir: &Path, archive: &Path) -> Result<PathBuf> {
    let name = archive
        .file_name()
        .ok_or_else(|| anyhow!("'{}' does not name an archive file", archive.display()))?;
    Ok(base_dir.join(name))
}
