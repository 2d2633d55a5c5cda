//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

/// Default directory for unpacked archives, relative to the working directory.
pub const DEFAULT_UNPACK_DIR: &str = "decrypted";

#[derive(Parser)]
#[command(name = "cryptpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack files into an encrypted archive
    #[command(visible_aliases = ["encrypt", "e"])]
    Pack(PackArgs),
    /// Unpack encrypted archives
    #[command(visible_aliases = ["decrypt", "d"])]
    Unpack(UnpackArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct PackArgs {
    /// Files to pack
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Password (prompted for when omitted)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Archive file name (default: random identifier)
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub archive_name: Option<String>,

    /// Output directory (default: current directory)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Store files without compression
    #[arg(long, conflicts_with = "compression_level")]
    pub store: bool,
}

#[derive(clap::Args)]
pub struct UnpackArgs {
    /// Archives to unpack
    #[arg(value_name = "ARCHIVE", required = true)]
    pub archives: Vec<PathBuf>,

    /// Password (prompted for when omitted)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Output directory (default: ./decrypted)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Refuse to overwrite existing files
    #[arg(long)]
    pub no_clobber: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pack_args() {
        let cli = Cli::try_parse_from([
            "cryptpack", "pack", "-p", "secret", "-n", "out.cpk", "-d", "/tmp/x", "-l", "9", "a.txt",
            "b.txt",
        ])
        .unwrap();

        let Commands::Pack(args) = cli.command else {
            panic!("expected pack command");
        };
        assert_eq!(args.files, [PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(args.password.as_deref(), Some("secret"));
        assert_eq!(args.archive_name.as_deref(), Some("out.cpk"));
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/x")));
        assert_eq!(args.compression_level, Some(9));
        assert!(!args.store);
    }

    #[test]
    fn test_aliases() {
        for alias in ["encrypt", "e"] {
            let cli = Cli::try_parse_from(["cryptpack", alias, "f"]).unwrap();
            assert!(matches!(cli.command, Commands::Pack(_)));
        }
        for alias in ["decrypt", "d"] {
            let cli = Cli::try_parse_from(["cryptpack", alias, "f.cpk"]).unwrap();
            assert!(matches!(cli.command, Commands::Unpack(_)));
        }
    }

    #[test]
    fn test_pack_requires_files() {
        assert!(Cli::try_parse_from(["cryptpack", "pack", "-p", "x"]).is_err());
    }

    #[test]
    fn test_compression_level_range() {
        assert!(Cli::try_parse_from(["cryptpack", "pack", "-l", "0", "f"]).is_err());
        assert!(Cli::try_parse_from(["cryptpack", "pack", "-l", "10", "f"]).is_err());
    }

    #[test]
    fn test_store_conflicts_with_level() {
        assert!(Cli::try_parse_from(["cryptpack", "pack", "--store", "-l", "3", "f"]).is_err());
    }

    #[test]
    fn test_unpack_args() {
        let cli =
            Cli::try_parse_from(["cryptpack", "unpack", "--no-clobber", "a.cpk", "b.cpk"]).unwrap();
        let Commands::Unpack(args) = cli.command else {
            panic!("expected unpack command");
        };
        assert_eq!(args.archives.len(), 2);
        assert!(args.no_clobber);
        assert!(args.password.is_none());
        assert!(args.output_dir.is_none());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["cryptpack", "-q", "-v", "unpack", "a.cpk"]).is_err());
    }
}
