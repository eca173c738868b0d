//! Jenkins poller: job colors, build results, job naming and coverage.
//!
//! Two queries cover the dashboard: one bulk query for the color of every
//! job and one per-job query for the results of remembered builds.

use crate::config::CiSettings;
use crate::coverage::parse_coverage_report;
use crate::error::Result;
use crate::http::{get_json, Transport};
use crate::models::ci::{BuildSummary, JobLink};
use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Job name -> color string.
pub type JobStatuses = BTreeMap<String, String>;

pub const TEST_JOB: &str = "test_job";

#[derive(Deserialize)]
struct JobsPayload {
    #[serde(default)]
    jobs: Vec<RawJob>,
}

#[derive(Deserialize)]
struct RawJob {
    name: String,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Deserialize)]
struct BuildsPayload {
    #[serde(default)]
    builds: Vec<RawBuild>,
}

#[derive(Deserialize)]
struct RawBuild {
    #[serde(default)]
    result: Option<String>,
}

pub fn job_statuses_query(ci_url: &str) -> String {
    format!("{}/api/json?tree=jobs[name,color]", ci_url.trim_end_matches('/'))
}

pub fn build_statuses_query(job_url: &str) -> String {
    format!("{}/api/json?tree=builds[result]", job_url.trim_end_matches('/'))
}

/// Read the colors of all jobs. Jobs reported without a color are skipped.
pub fn read_job_statuses(transport: &dyn Transport, ci_url: &str) -> Result<JobStatuses> {
    let query = job_statuses_query(ci_url);
    info!("Reading job statuses from {}", query);
    let payload: JobsPayload = get_json(transport, &query)?;
    Ok(payload
        .jobs
        .into_iter()
        .filter_map(|j| j.color.map(|c| (j.name, c)))
        .collect())
}

/// Count remembered builds of one job that have a result, and those that
/// succeeded.
pub fn read_build_summary(transport: &dyn Transport, job_url: &str) -> Result<BuildSummary> {
    let payload: BuildsPayload = get_json(transport, &build_statuses_query(job_url))?;
    let total = payload.builds.iter().filter(|b| b.result.is_some()).count();
    let success = payload
        .builds
        .iter()
        .filter(|b| b.result.as_deref() == Some("SUCCESS"))
        .count();
    Ok(BuildSummary { total, success })
}

/// Naming of CI jobs for repositories (and environments) per job type.
pub struct CiJobs<'a> {
    settings: &'a CiSettings,
}

impl<'a> CiJobs<'a> {
    pub fn new(settings: &'a CiSettings) -> Self {
        Self { settings }
    }

    /// Explicit `[ci.jobs]` entry, otherwise the name template with
    /// `{repo}`, `{name}` and `{job}` substituted.
    pub fn job_name(&self, repository: &str, job_type: &str) -> String {
        if let Some(name) = self
            .settings
            .jobs
            .get(repository)
            .and_then(|m| m.get(job_type))
        {
            return name.clone();
        }
        let short = repository.rsplit('/').next().unwrap_or(repository);
        self.settings
            .job_name_template
            .replace("{repo}", repository)
            .replace("{name}", short)
            .replace("{job}", job_type)
    }

    pub fn job_url(&self, repository: &str, job_type: &str) -> String {
        format!(
            "{}/job/{}/",
            self.settings.url,
            self.job_name(repository, job_type)
        )
    }

    pub fn job_link(&self, repository: &str, job_type: &str, statuses: &JobStatuses) -> JobLink {
        let name = self.job_name(repository, job_type);
        let color = statuses.get(&name).cloned();
        JobLink::new(name, self.job_url(repository, job_type), color)
    }

    pub fn smoke_test_link(&self, environment: &str, statuses: &JobStatuses) -> JobLink {
        self.job_link(environment, &self.settings.smoke_test_job, statuses)
    }

    pub fn smoke_test_url(&self, environment: &str) -> String {
        self.job_url(environment, &self.settings.smoke_test_job)
    }
}

/// Coverage reported by the last successful build of the repository's
/// test job. Any failure is logged and yields `None`.
pub fn read_unit_test_coverage(
    transport: &dyn Transport,
    jobs: &CiJobs<'_>,
    repository: &str,
) -> Option<u32> {
    let url = format!(
        "{}lastSuccessfulBuild/consoleText",
        jobs.job_url(repository, TEST_JOB)
    );
    match transport.get(&url, &[]) {
        Ok(resp) if resp.is_success() => {
            let coverage = parse_coverage_report(&resp.body);
            if coverage.is_none() {
                warn!("no coverage summary in {}", url);
            }
            coverage
        }
        Ok(resp) => {
            warn!("coverage for {}: status {}", repository, resp.status);
            None
        }
        Err(e) => {
            warn!("coverage for {}: {}", repository, e);
            None
        }
    }
}
