use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::data::filter::FilterPredicate;
use crate::data::loader::{self, Format};

// ---------------------------------------------------------------------------
// Argument surface
// ---------------------------------------------------------------------------

/// View and filter delimited sample tables.
#[derive(Debug, Parser)]
#[command(name = "tabcat", version, about = "View and filter delimited sample tables")]
pub struct Args {
    /// Path to the input table.
    pub path: PathBuf,

    /// Input format: "tsv" or "csv". There is no default.
    #[arg(long, value_name = "FORMAT")]
    pub format: String,

    /// Keep only rows passing a threshold comparison,
    /// e.g. "Classified_insects>10000". Operators: > >= < <= == !=
    #[arg(long, value_name = "EXPR")]
    pub filter: Option<String>,

    /// Print only the first N rows.
    #[arg(long, value_name = "N")]
    pub head: Option<usize>,

    /// Print a single column instead of the whole table.
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Also write the resulting table to this path, in the input format.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

pub fn run(args: Args) -> Result<()> {
    // Parsed here, not by clap, so a bad value reports as an invalid format
    // rather than a generic usage error.
    let format: Format = args.format.parse()?;
    let predicate = args
        .filter
        .as_deref()
        .map(str::parse::<FilterPredicate>)
        .transpose()?;

    let mut table = loader::load_and_filter(&args.path, format, predicate.as_ref())?;
    log::info!(
        "Loaded {} with {} rows, columns {:?}",
        args.path.display(),
        table.n_rows(),
        table.column_names()
    );

    if let Some(n) = args.head {
        table = table.head(n);
    }

    if let Some(out) = &args.output {
        loader::write(&table, out, format)?;
        log::info!("Wrote {} rows to {}", table.n_rows(), out.display());
    }

    match &args.column {
        Some(name) => print!("{}", table.column(name)?),
        None => print!("{table}"),
    }
    Ok(())
}
