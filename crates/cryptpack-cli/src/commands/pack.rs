//! Pack command implementation.

use crate::cli::PackArgs;
use crate::error::convert_pack_error;
use crate::output::OutputFormatter;
use crate::password;
use anyhow::Context;
use anyhow::Result;
use cryptpack_core::PackConfig;
use cryptpack_core::pack;
use std::env;

pub fn execute(args: &PackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };
    let archive_name = args.archive_name.clone().unwrap_or_else(random_archive_name);
    let archive = output_dir.join(&archive_name);

    let config = if args.store {
        PackConfig::default().without_compression()
    } else {
        args.compression_level
            .map_or_else(PackConfig::default, |level| {
                PackConfig::default().with_compression_level(level)
            })
    };

    let password = password::obtain(args.password.as_deref(), true)?;
    formatter.format_detail(&format!("Password: {}", password::mask(&password)));
    formatter.format_detail(&format!("Packing {} file(s)", args.files.len()));

    let report = pack(&args.files, &password, &archive_name, &output_dir, &config)
        .map_err(|e| convert_pack_error(e, &archive))?;

    formatter.format_pack_result(&archive, &report)
}

/// Random 128-bit identifier rendered as hex.
fn random_archive_name() -> String {
    format!("{:032x}", rand::random::<u128>())
}
