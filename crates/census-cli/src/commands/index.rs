//! `census index`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use census_core::config::{CensusConfig, CliOverrides};
use census_core::events::EventDispatcher;
use census_core::traits::{Cancellable, CancellationToken};
use census_core::types::HashAlgorithm;
use census_scanner::Indexer;

use super::coded;
use crate::format::format_index_summary;
use crate::progress::ConsoleProgress;
use crate::OutputFormat;

pub struct IndexArgs {
    pub dir: PathBuf,
    pub output: Option<PathBuf>,
    pub threads: Option<usize>,
    pub hash: Option<HashAlgorithm>,
    pub exclude: Vec<String>,
    pub quiet: bool,
    pub format: OutputFormat,
}

pub fn cmd_index(args: IndexArgs) -> Result<()> {
    let overrides = CliOverrides {
        scan_threads: args.threads,
        hash_algorithm: args.hash,
        exclude: args.exclude,
        index_file_name: None,
    };
    let config = CensusConfig::load(&args.dir, Some(&overrides)).map_err(coded)?;

    let token = CancellationToken::new();
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }

    let mut indexer = Indexer::new(config).with_cancellation(token);
    if let Some(output) = args.output {
        indexer = indexer.with_output(output);
    }

    let mut events = EventDispatcher::new();
    if !args.quiet {
        events.register(Arc::new(ConsoleProgress::new()));
    }
    let summary = indexer.run(&args.dir, &events).map_err(coded)?;

    match args.format {
        OutputFormat::Text => print!("{}", format_index_summary(&summary)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serializing summary")?
        ),
    }
    Ok(())
}
