//! Implementation of the `tscat lookup` command.

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tscat::{suggest_sources, TranslationStatus};

use crate::output::read_catalog;

/// Arguments for the lookup command.
#[derive(Debug, clap::Args)]
pub struct LookupArgs {
    /// Translation file (.ts)
    #[arg(long, env = "TSCAT_FILE")]
    pub file: PathBuf,

    /// Context name, e.g. AddressBookPage
    #[arg(long, env = "TSCAT_CONTEXT")]
    pub context: String,

    /// Source text, with entities resolved ("&New", not "&amp;New")
    #[arg(long)]
    pub source: String,

    /// Disambiguation comment
    #[arg(long)]
    pub comment: Option<String>,

    /// Count for plural-aware lookup; replaces %n
    #[arg(long, allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for lookup results.
#[derive(Serialize)]
struct LookupResult<'a> {
    context: &'a str,
    source: &'a str,
    translation: Option<String>,
    status: Option<TranslationStatus>,
    suggestions: Vec<String>,
}

/// Run the lookup command.
pub fn run_lookup(args: LookupArgs) -> Result<i32> {
    let catalog = read_catalog(&args.file)?;
    let comment = args.comment.as_deref();

    let translation = match args.count {
        Some(count) => catalog.lookup_plural_with(&args.context, &args.source, comment, count),
        None => catalog
            .lookup(&args.context, &args.source, comment)
            .map(str::to_owned),
    };
    let status = catalog
        .message(&args.context, &args.source, comment)
        .map(|message| message.translation.status);
    let suggestions = if translation.is_none() && status.is_none() {
        suggest_sources(&catalog, &args.context, &args.source)
    } else {
        Vec::new()
    };
    let found = translation.is_some();

    if args.json {
        let output = LookupResult {
            context: &args.context,
            source: &args.source,
            translation,
            status,
            suggestions,
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else if let Some(text) = translation {
        if status == Some(TranslationStatus::NeedsReview) {
            eprintln!(
                "{} translation is unfinished",
                "note:".if_supports_color(Stream::Stderr, |text| text.cyan())
            );
        }
        println!("{text}");
    } else {
        eprintln!(
            "{} no translation for '{}' in '{}'",
            "error:".if_supports_color(Stream::Stderr, |text| text.red()),
            args.source,
            args.context
        );
        for suggestion in &suggestions {
            eprintln!("  did you mean '{suggestion}'?");
        }
    }

    if found {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}
