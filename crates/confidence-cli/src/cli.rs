//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Confidence - Resolve dynamic configuration documents
#[derive(Parser, Debug)]
#[command(name = "confidence")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check that a document is well formed
    Validate {
        /// Document to check (.json, .yaml, .yml or .toml)
        file: PathBuf,
    },

    /// Resolve a key against criteria
    ///
    /// Examples:
    ///   confidence get app.json                          # Whole document
    ///   confidence get app.json --key /db/port           # One key
    ///   confidence get app.json -f env=production -f region.id=eu
    ///   confidence get app.json --criteria prod.yaml --applied
    Get {
        /// Document to resolve
        file: PathBuf,

        #[command(flatten)]
        lookup: Lookup,

        /// Print the applied filters as JSON to stderr
        #[arg(long)]
        applied: bool,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Read the $meta annotation of a key
    Meta {
        /// Document to read
        file: PathBuf,

        #[command(flatten)]
        lookup: Lookup,
    },
}

/// Key and criteria shared by lookups
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// Slash-delimited key, `/` for the whole document
    #[arg(short, long, default_value = "/")]
    pub key: String,

    /// Criteria entry as `path=value`; dotted paths build nested criteria
    #[arg(short, long = "filter", value_name = "PATH=VALUE")]
    pub filters: Vec<String>,

    /// Criteria document, overlaid by any --filter entries
    #[arg(short, long, value_name = "FILE")]
    pub criteria: Option<PathBuf>,
}
