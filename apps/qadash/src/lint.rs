//! Parser for linter/docstyle checker reports.
//!
//! The checker scripts print a source path on one line and, for that file,
//! a line ending in four spaces followed by `Pass` or `Fail`. The parser
//! keeps the most recently seen path as the current file and tallies each
//! marker against it. A marker seen before any path is dropped.

use crate::error::Result;
use crate::models::LinterResult;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::io::BufRead;
use std::path::Path;

const PASS_MARKER: &str = "    Pass";
const FAIL_MARKER: &str = "    Fail";

/// Percentage of `part2` in `part1 + part2`, as an integer string.
///
/// Returns `"0"` when both parts are zero. Halves round to the even
/// neighbour.
pub fn percentage(part1: usize, part2: usize) -> String {
    let total = part1 + part2;
    if total == 0 {
        return "0".to_string();
    }
    let num = 100 * part2;
    let mut q = num / total;
    let r = num % total;
    if 2 * r > total || (2 * r == total && q % 2 == 1) {
        q += 1;
    }
    q.to_string()
}

/// CSS class for a progress bar showing `pct` percent done.
pub fn progress_bar_class(pct: &str) -> &'static str {
    match pct.parse::<u32>().unwrap_or(0) {
        90.. => "progress-bar-success",
        50..=89 => "progress-bar-warning",
        _ => "progress-bar-danger",
    }
}

/// Width of a progress bar, clamped to `[0, 100]`.
pub fn progress_bar_width(pct: &str) -> u32 {
    pct.parse::<u32>().unwrap_or(0).min(100)
}

/// Line scanner configured with the source extensions to recognise.
pub struct ReportParser {
    source_line: Regex,
}

impl ReportParser {
    /// `extensions` without leading dots, e.g. `["py"]`.
    pub fn new(extensions: &[String]) -> Self {
        let alts: Vec<String> = if extensions.is_empty() {
            vec![regex::escape("py")]
        } else {
            extensions.iter().map(|e| regex::escape(e)).collect()
        };
        let pattern = format!(r"\.(?:{})$", alts.join("|"));
        Self {
            source_line: Regex::new(&pattern).expect("escaped extensions form a valid regex"),
        }
    }

    pub fn parse_str(&self, text: &str) -> LinterResult {
        self.scan(text.lines().map(|l| l.to_string()))
    }

    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<LinterResult> {
        let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;
        Ok(self.scan(lines.into_iter()))
    }

    /// Parse a report file written by a checker script.
    pub fn parse_file(&self, path: &Path) -> Result<LinterResult> {
        let f = fs::File::open(path)?;
        self.parse_reader(std::io::BufReader::new(f))
    }

    fn scan<I: Iterator<Item = String>>(&self, lines: I) -> LinterResult {
        let mut source: Option<String> = None;
        let mut files: BTreeMap<String, bool> = BTreeMap::new();
        let mut passed = 0usize;
        let mut failed = 0usize;

        for line in lines {
            let line = line.trim_end();
            if self.source_line.is_match(line) {
                source = Some(line.trim().to_string());
            }
            let outcome = if line.ends_with(PASS_MARKER) {
                Some(true)
            } else if line.ends_with(FAIL_MARKER) {
                Some(false)
            } else {
                None
            };
            if let (Some(ok), Some(src)) = (outcome, source.as_ref()) {
                if ok {
                    passed += 1;
                } else {
                    failed += 1;
                }
                files.insert(src.clone(), ok);
            }
        }

        LinterResult {
            total: passed + failed,
            passed,
            failed,
            passed_pct: percentage(failed, passed),
            failed_pct: percentage(passed, failed),
            files,
        }
    }
}
