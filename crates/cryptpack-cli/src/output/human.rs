//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use cryptpack_core::PackReport;
use cryptpack_core::UnpackReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        match bytes {
            b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
            b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
            b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
            b => format!("{b} B"),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn headline(&self, text: &str) {
        if self.use_colors {
            self.line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            self.line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_pack_result(&self, archive: &Path, report: &PackReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!("Archive created: {}", archive.display()));
        self.line(&format!("  Files packed:  {}", report.files_added));
        self.line(&format!("  Source size:   {}", Self::format_size(report.bytes_read)));
        self.line(&format!(
            "  Archive size:  {}",
            Self::format_size(report.archive_size)
        ));

        if self.verbose {
            self.line(&format!("  Size ratio:    {:.2}", report.size_ratio()));
            self.line(&format!("  Duration:      {:?}", report.duration));
        }

        Ok(())
    }

    fn format_unpack_result(
        &self,
        archive: &Path,
        output_dir: &Path,
        report: &UnpackReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!(
            "Unpacked {} into {}",
            archive.display(),
            output_dir.display()
        ));
        self.line(&format!("  Files extracted: {}", report.files_extracted));
        if report.directories_created > 0 {
            self.line(&format!("  Directories:     {}", report.directories_created));
        }
        self.line(&format!(
            "  Total size:      {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            for name in &report.entries {
                self.line(&format!("    {name}"));
            }
            self.line(&format!("  Duration:        {:?}", report.duration));
        }

        Ok(())
    }

    fn format_detail(&self, message: &str) {
        if !self.verbose {
            return;
        }

        if self.use_colors {
            self.line(&format!("{}", style(message).dim()));
        } else {
            self.line(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(60_000), "58.6 KB");
        assert_eq!(HumanFormatter::format_size(2 * 1024 * 1024), "2.0 MB");
        assert_eq!(HumanFormatter::format_size(1024 * 1024 * 1024), "1.0 GB");
    }
}
