//! Results aggregate filled in by the dashboard run and consumed by the
//! HTML/CSV renderers and the console printer.

use super::ci::{BuildSummary, JobLink};
use super::{LinterResult, Liveness, OverallStatus, PerfStatistic, SourceFiles};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
/// Which dashboard tables are produced in this run.
pub struct TableToggles {
    pub ci_jobs: bool,
    pub code_quality: bool,
    pub liveness: bool,
    pub sla: bool,
}

impl Default for TableToggles {
    fn default() -> Self {
        Self {
            ci_jobs: true,
            code_quality: true,
            liveness: true,
            sla: true,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SmokeTest {
    pub environment: String,
    pub job: JobLink,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct Results {
    pub repositories: Vec<String>,
    pub tables: TableToggles,

    pub teams: Vec<String>,
    pub sprint: Option<String>,
    pub sprint_plan_url: Option<String>,
    pub issues_list_url: BTreeMap<String, String>,

    pub source_files: BTreeMap<String, SourceFiles>,
    pub repo_linter_checks: BTreeMap<String, LinterResult>,
    pub repo_docstyle_checks: BTreeMap<String, LinterResult>,
    pub unit_test_coverage: BTreeMap<String, Option<u32>>,
    /// CI job types in configured column order
    pub job_types: Vec<String>,
    /// repository -> job type -> job
    pub ci_jobs: BTreeMap<String, BTreeMap<String, JobLink>>,
    pub overall_status: BTreeMap<String, OverallStatus>,

    pub stage: Option<Liveness>,
    pub production: Option<Liveness>,
    pub smoke_tests: Vec<SmokeTest>,
    pub smoke_tests_builds: Option<BuildSummary>,

    pub perf_tests: Vec<PerfStatistic>,
    pub sla_thresholds: BTreeMap<String, f64>,
}

impl Results {
    pub fn new(repositories: Vec<String>, tables: TableToggles) -> Self {
        Self {
            repositories,
            tables,
            ..Default::default()
        }
    }

    /// Repositories whose overall status is false.
    pub fn unhealthy_repositories(&self) -> Vec<&str> {
        self.overall_status
            .iter()
            .filter(|(_, s)| !s.ok)
            .map(|(r, _)| r.as_str())
            .collect()
    }
}
