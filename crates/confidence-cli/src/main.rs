//! Confidence CLI
//!
//! Validates configuration documents and resolves keys against criteria.

mod cli;
mod commands;
mod criteria;
mod error;
mod logging;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use confidence_loader::DocumentLoader;

use cli::{Cli, Commands};
use commands::Outcome;
use commands::lookup::GetOptions;
use error::Result;

/// Exit code when the requested key resolves to nothing
const EXIT_MISSING: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Missing) => ExitCode::from(EXIT_MISSING),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<Outcome> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow().bold(), e);
    }
    if cli.verbose {
        tracing::debug!("Verbose mode enabled");
    }

    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<Outcome> {
    let loader = DocumentLoader::new();
    let mut stdout = io::stdout().lock();

    match cmd {
        Commands::Validate { file } => commands::run_validate(&loader, &file, &mut stdout),
        Commands::Get {
            file,
            lookup,
            applied,
            compact,
        } => {
            let options = GetOptions { applied, compact };
            commands::run_get(&loader, &file, &lookup, options, &mut stdout, &mut io::stderr())
        }
        Commands::Meta { file, lookup } => commands::run_meta(&loader, &file, &lookup, &mut stdout),
    }
}
