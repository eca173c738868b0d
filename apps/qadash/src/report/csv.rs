//! History row appended to the CSV file on every run.
//!
//! Column order: date, stage liveness flags (core available, jobs
//! available, core token, jobs token), the same four for production, then
//! per repository: source count, total lines, linter total/passed/failed,
//! docstyle total/passed/failed. Missing values are written as 0.

use crate::error::Result;
use crate::models::results::Results;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Build the row for `results`; `date` is formatted `YYYY-MM-DD` by the caller.
pub fn record(results: &Results, date: &str) -> Vec<String> {
    let mut row = vec![date.to_string()];
    for liveness in [results.stage, results.production] {
        for flag in liveness.unwrap_or_default().flags() {
            row.push(u8::from(flag).to_string());
        }
    }
    for repo in &results.repositories {
        let src = results.source_files.get(repo).cloned().unwrap_or_default();
        let lint = results.repo_linter_checks.get(repo).cloned().unwrap_or_default();
        let doc = results
            .repo_docstyle_checks
            .get(repo)
            .cloned()
            .unwrap_or_default();
        for n in [
            src.count,
            src.total_lines,
            lint.total,
            lint.passed,
            lint.failed,
            doc.total,
            doc.passed,
            doc.failed,
        ] {
            row.push(n.to_string());
        }
    }
    row
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn format_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| quote(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Append one row to `path`, creating the file if needed.
pub fn append_row(path: &Path, fields: &[String]) -> Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(f, "{}", format_row(fields))?;
    Ok(())
}

/// Append the run's history row.
pub fn export_into_csv(path: &Path, results: &Results, date: &str) -> Result<()> {
    append_row(path, &record(results, date))
}
