//! cryptpack CLI - pack files into password-protected archives and unpack
//! them safely.

mod cli;
mod commands;
mod error;
mod output;
mod password;

use anyhow::Result;
use clap::Parser;
use output::OutputMode;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let formatter = OutputMode::from_flags(cli.json, cli.verbose, cli.quiet).formatter();

    match &cli.command {
        cli::Commands::Pack(args) => commands::pack::execute(args, &*formatter),
        cli::Commands::Unpack(args) => commands::unpack::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}
