//! Unit-test coverage extracted from a test job's console output.

use regex::Regex;

/// Coverage meets the configured minimum when it is at least `threshold`.
pub fn coverage_ok(coverage: u32, threshold: u32) -> bool {
    coverage >= threshold
}

/// Find the last `TOTAL ... NN%` summary line of a coverage report and
/// return its percentage (fractions are truncated).
pub fn parse_coverage_report(text: &str) -> Option<u32> {
    let re = Regex::new(r"^TOTAL\s.*?(\d+(?:\.\d+)?)%\s*$").ok()?;
    text.lines()
        .filter_map(|line| re.captures(line.trim()))
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| (0.0..=100.0).contains(v))
        .map(|v| v.trunc() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_ok_threshold_inclusive() {
        assert!(coverage_ok(80, 80));
        assert!(coverage_ok(85, 80));
        assert!(!coverage_ok(79, 80));
    }

    #[test]
    fn test_parse_coverage_report() {
        let console = "\
Name                 Stmts   Miss  Cover
----------------------------------------
src/__init__.py          0      0   100%
src/worker.py          120     18    85%
----------------------------------------
TOTAL                  120     18    85%
Finished: SUCCESS
";
        assert_eq!(parse_coverage_report(console), Some(85));
    }

    #[test]
    fn test_last_total_wins_and_fractions() {
        let console = "TOTAL 10 5 50%\nrerun\nTOTAL    10   1   90.6%\n";
        assert_eq!(parse_coverage_report(console), Some(90));
    }

    #[test]
    fn test_no_total_line() {
        assert_eq!(parse_coverage_report("Finished: FAILURE\n"), None);
        assert_eq!(parse_coverage_report(""), None);
    }
}
