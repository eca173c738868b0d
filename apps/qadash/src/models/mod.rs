//! Shared data models for checker results, CI state, liveness and the
//! results aggregate consumed by the renderers.

pub mod ci;
pub mod results;

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
/// Tally of one checker report (linter or docstyle).
pub struct LinterResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// `percentage(failed, passed)`
    pub passed_pct: String,
    /// `percentage(passed, failed)`
    pub failed_pct: String,
    /// Source path -> last reported outcome
    pub files: BTreeMap<String, bool>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
/// Source inventory of one repository.
pub struct SourceFiles {
    pub count: usize,
    pub total_lines: usize,
    pub files: Vec<String>,
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Liveness flags of one deployed environment.
pub struct Liveness {
    pub core_api_available: bool,
    pub jobs_api_available: bool,
    pub core_api_auth_token: bool,
    pub jobs_api_auth_token: bool,
}

impl Liveness {
    pub fn is_healthy(&self) -> bool {
        self.core_api_available
            && self.jobs_api_available
            && self.core_api_auth_token
            && self.jobs_api_auth_token
    }

    /// Flags in CSV column order.
    pub fn flags(&self) -> [bool; 4] {
        [
            self.core_api_available,
            self.jobs_api_available,
            self.core_api_auth_token,
            self.jobs_api_auth_token,
        ]
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// Derived health of one repository.
pub struct OverallStatus {
    pub ok: bool,
    pub remarks: Vec<String>,
}

impl OverallStatus {
    /// Remarks joined for HTML display; empty when there are none.
    pub fn remarks_text(&self) -> String {
        self.remarks.join("<br>")
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
/// Statistic over one performance test's recorded durations.
pub struct PerfStatistic {
    pub name: String,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub sla: Option<f64>,
    pub meets_sla: Option<bool>,
}
