//! Implementation of the `tscat check` command.

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tscat::lint_catalog;

use crate::output::read_catalog;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Files to check (.ts)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// JSON output for one checked file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    contexts: usize,
    messages: usize,
    warnings: Vec<String>,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let file = path.display().to_string();
        let catalog = match read_catalog(path) {
            Ok(catalog) => catalog,
            Err(report) => {
                if !args.json {
                    eprintln!("{report:?}");
                }
                reports.push(FileReport {
                    file,
                    ok: false,
                    error: Some(report.to_string()),
                    contexts: 0,
                    messages: 0,
                    warnings: Vec::new(),
                });
                continue;
            }
        };

        let warnings: Vec<String> = catalog
            .warnings()
            .iter()
            .cloned()
            .chain(lint_catalog(&catalog))
            .map(|warning| warning.to_string())
            .collect();
        let stats = catalog.stats();
        reports.push(FileReport {
            file,
            ok: true,
            error: None,
            contexts: stats.contexts,
            messages: stats.messages,
            warnings,
        });
    }

    if args.json {
        let json_output = serde_json::to_string_pretty(&reports).into_diagnostic()?;
        println!("{json_output}");
    } else {
        for report in reports.iter().filter(|report| report.ok) {
            println!(
                "{} {} ({} contexts, {} messages)",
                "ok".if_supports_color(Stream::Stdout, |text| text.green()),
                report.file,
                report.contexts,
                report.messages
            );
            for warning in &report.warnings {
                println!(
                    "  {} {warning}",
                    "warning:".if_supports_color(Stream::Stdout, |text| text.yellow())
                );
            }
        }
    }

    let failed = reports.iter().any(|report| !report.ok);
    let warned = reports.iter().any(|report| !report.warnings.is_empty());
    if failed || (args.strict && warned) {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
