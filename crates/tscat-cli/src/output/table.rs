//! Table formatting utilities for CLI output.

use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use serde::Serialize;
use tscat::CatalogStats;

/// Coverage data for a single file.
#[derive(Debug, Serialize)]
pub struct FileCoverage {
    pub file: String,
    /// `language` attribute of the file, if any.
    pub language: Option<String>,
    #[serde(flatten)]
    pub stats: CatalogStats,
}

/// Format coverage data as a table.
pub fn format_coverage_table(coverage: &[FileCoverage]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "File",
        "Language",
        "Final",
        "Unfinished",
        "Empty",
        "Obsolete",
        "Coverage",
    ]);

    for entry in coverage {
        let stats = &entry.stats;
        table.add_row(vec![
            entry.file.clone(),
            entry.language.clone().unwrap_or_else(|| "-".to_string()),
            stats.finished.to_string(),
            stats.needs_review.to_string(),
            stats.empty.to_string(),
            stats.obsolete.to_string(),
            format!("{:.1}%", stats.completion() * 100.0),
        ]);
    }
    for index in 2..7 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table
}
