//! Coverage command implementation.

use std::path::PathBuf;

use clap::Args;
use miette::{IntoDiagnostic, Result};

use crate::output::read_catalog;
use crate::output::table::{format_coverage_table, FileCoverage};

/// Arguments for the coverage command.
#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Translation files (.ts).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Exit with non-zero code if any live message is unfinished or empty.
    #[arg(long)]
    pub strict: bool,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Run the coverage command.
pub fn run_coverage(args: CoverageArgs) -> Result<i32> {
    let mut coverage_data: Vec<FileCoverage> = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let catalog = read_catalog(path)?;
        coverage_data.push(FileCoverage {
            file: path.display().to_string(),
            language: catalog.language().map(str::to_owned),
            stats: catalog.stats(),
        });
    }

    let any_incomplete = coverage_data
        .iter()
        .any(|entry| entry.stats.needs_review > 0 || entry.stats.empty > 0);

    if args.json {
        let json_output = serde_json::to_string_pretty(&coverage_data).into_diagnostic()?;
        println!("{json_output}");
    } else {
        println!("{}", format_coverage_table(&coverage_data));
    }

    if args.strict && any_incomplete {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
