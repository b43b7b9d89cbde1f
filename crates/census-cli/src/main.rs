//! census: build a content-addressed inventory of a directory tree and
//! compare two inventories.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use census_core::types::HashAlgorithm;

mod commands;
mod format;
mod progress;

use commands::{cmd_compare, cmd_index};

#[derive(Parser)]
#[command(name = "census", version)]
#[command(about = "Index every file under a directory and compare indexes")]
#[command(after_help = "\
EXAMPLES:
  census index ~/photos                         # writes ~/photos/file_index.db
  census index /mnt/backup --output backup.db   # write the index elsewhere
  census compare a.db b.db                      # what A has that B lacks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fingerprint every regular file under DIR into an index
    Index {
        /// Directory to scan
        dir: PathBuf,
        /// Index file to write (default: <DIR>/file_index.db)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Hashing threads (0 = one per CPU)
        #[arg(short, long)]
        threads: Option<usize>,
        /// Content hash algorithm
        #[arg(long, value_name = "ALGORITHM", value_parser = parse_hash_algorithm)]
        hash: Option<HashAlgorithm>,
        /// Glob of paths to leave out, relative to DIR (repeatable)
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,
        /// Suppress progress output on stderr
        #[arg(short, long)]
        quiet: bool,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Report files of INDEX_A missing from INDEX_B by content and by path
    Compare {
        index_a: PathBuf,
        index_b: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

fn parse_hash_algorithm(s: &str) -> Result<HashAlgorithm, String> {
    s.parse::<HashAlgorithm>().map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    census_core::tracing::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Index {
            dir,
            output,
            threads,
            hash,
            exclude,
            quiet,
            format,
        } => cmd_index(commands::IndexArgs {
            dir,
            output,
            threads,
            hash,
            exclude,
            quiet,
            format,
        }),
        Commands::Compare {
            index_a,
            index_b,
            format,
        } => cmd_compare(&index_a, &index_b, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
