//! `census compare`

use std::path::Path;

use anyhow::{Context, Result};
use census_scanner::Comparator;

use super::coded;
use crate::format::format_comparison;
use crate::OutputFormat;

pub fn cmd_compare(index_a: &Path, index_b: &Path, format: OutputFormat) -> Result<()> {
    let comparator = Comparator::open(index_a, index_b).map_err(coded)?;
    let result = comparator.compare().map_err(coded)?;

    match format {
        OutputFormat::Text => print!("{}", format_comparison(&result)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&result).context("serializing comparison")?
        ),
    }
    Ok(())
}
