//! Performance test results and SLA judgement.
//!
//! Each `*.csv` file in the results directory holds the durations of one
//! test (file stem = test name). The last comma-separated field of every
//! line is read as seconds; lines that do not parse (headers) are skipped.

use crate::error::Result;
use crate::models::PerfStatistic;
use glob::glob;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Durations in seconds per test name.
pub type PerfResults = BTreeMap<String, Vec<f64>>;

pub fn parse_durations(text: &str) -> Vec<f64> {
    text.lines()
        .filter_map(|line| line.rsplit(',').next())
        .filter_map(|field| field.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect()
}

/// Read every result file in `dir`. A missing directory yields no results.
pub fn read_results(dir: &Path) -> Result<PerfResults> {
    let mut results = PerfResults::new();
    if !dir.is_dir() {
        warn!("performance results directory {} not found", dir.display());
        return Ok(results);
    }
    let pattern = format!(
        "{}/*.csv",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = match glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("bad results pattern {}: {}", pattern, e);
            return Ok(results);
        }
    };
    for path in entries.flatten() {
        let name = match path.file_stem().and_then(|s| s.to_str()) {
            Some(n) => n.to_string(),
            None => continue,
        };
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                warn!("skipping unreadable results file {}: {}", path.display(), e);
                continue;
            }
        };
        let durations = parse_durations(&text);
        debug!("{}: {} measurements", name, durations.len());
        results.insert(name, durations);
    }
    Ok(results)
}

/// Compute count/min/max/avg per test and compare the average against the
/// SLA threshold when one is configured. Tests without measurements are
/// left out.
pub fn compute_statistic(results: &PerfResults, sla: &BTreeMap<String, f64>) -> Vec<PerfStatistic> {
    results
        .iter()
        .filter(|(_, d)| !d.is_empty())
        .map(|(name, durations)| {
            let count = durations.len();
            let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
            let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let avg = durations.iter().sum::<f64>() / count as f64;
            let threshold = sla.get(name).copied();
            PerfStatistic {
                name: name.clone(),
                count,
                min,
                max,
                avg,
                sla: threshold,
                meets_sla: threshold.map(|t| avg <= t),
            }
        })
        .collect()
}
