//! One dashboard run: collect every table's data into `Results`, then
//! publish the HTML page and the CSV history row.
//!
//! Everything runs sequentially. Each repository goes through
//! clone/fetch, checkers, inventory, CI lookups, status and cleanup before
//! the next one starts.

use crate::ci::{self, CiJobs, JobStatuses};
use crate::config::Effective;
use crate::env::EnvSettings;
use crate::error::Result;
use crate::http::Transport;
use crate::lint::ReportParser;
use crate::liveness;
use crate::models::results::{Results, TableToggles};
use crate::models::LinterResult;
use crate::perf;
use crate::repos::{CommandRunner, Workspace};
use crate::report;
use crate::sources::get_source_files;
use crate::status::{overall_status, StatusInput};
use log::{info, warn};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub tables: TableToggles,
    pub clone_repositories: bool,
    pub cleanup_repositories: bool,
}

fn parse_report(parser: &ReportParser, path: &Path) -> LinterResult {
    parser.parse_file(path).unwrap_or_else(|e| {
        warn!("cannot read checker report {}: {}", path.display(), e);
        LinterResult {
            passed_pct: "0".into(),
            failed_pct: "0".into(),
            ..Default::default()
        }
    })
}

fn read_job_statuses(
    transport: &dyn Transport,
    eff: &Effective,
    tables: &TableToggles,
) -> Option<JobStatuses> {
    if !(tables.ci_jobs || tables.liveness) {
        return None;
    }
    match ci::read_job_statuses(transport, &eff.ci.url) {
        Ok(statuses) => Some(statuses),
        Err(e) => {
            warn!("cannot read job statuses: {}", e);
            Some(JobStatuses::new())
        }
    }
}

fn prepare_header(results: &mut Results, eff: &Effective) {
    results.teams = eff.teams.clone();
    results.job_types = eff.ci.job_types.clone();
    results.sprint = eff.sprint.name.clone();
    results.sprint_plan_url = eff.sprint.plan_url.clone();
    if let Some(tmpl) = eff.sprint.issues_url_template.as_ref() {
        for team in &eff.teams {
            results
                .issues_list_url
                .insert(team.clone(), tmpl.replace("{team}", team));
        }
    }
    if let Some(sprint) = results.sprint.as_ref() {
        info!("Sprint: {}", sprint);
    }
}

fn prepare_data_for_liveness_table(
    results: &mut Results,
    env: &EnvSettings,
    transport: &dyn Transport,
    jobs: &CiJobs<'_>,
    statuses: &JobStatuses,
) {
    results.stage = Some(liveness::check_system(transport, &env.stage, "stage"));
    results.production = Some(liveness::check_system(transport, &env.prod, "production"));
    results.smoke_tests = liveness::smoke_tests(jobs, statuses);
    match ci::read_build_summary(transport, &jobs.smoke_test_url("production")) {
        Ok(summary) => results.smoke_tests_builds = Some(summary),
        Err(e) => warn!("cannot read production smoke test builds: {}", e),
    }
}

fn prepare_data_for_repositories(
    results: &mut Results,
    eff: &Effective,
    opts: &RunOptions,
    runner: &dyn CommandRunner,
    transport: &dyn Transport,
    jobs: &CiJobs<'_>,
    statuses: &JobStatuses,
) {
    let ws = Workspace::new(
        &eff.work_dir,
        runner,
        &eff.clone_prefix,
        &eff.linter_script,
        &eff.docstyle_script,
    );
    let parser = ReportParser::new(&eff.source_extensions);

    for repository in &eff.repositories {
        info!("Processing {}", repository);
        if opts.clone_repositories {
            ws.clone_or_fetch_repository(repository);
        }

        if opts.tables.code_quality {
            ws.run_linter(repository);
            ws.run_docstyle_check(repository);
            results.source_files.insert(
                repository.clone(),
                get_source_files(&ws.repo_dir(repository), &eff.source_extensions),
            );
            results.repo_linter_checks.insert(
                repository.clone(),
                parse_report(&parser, &ws.linter_report(repository)),
            );
            results.repo_docstyle_checks.insert(
                repository.clone(),
                parse_report(&parser, &ws.docstyle_report(repository)),
            );
        }

        if opts.tables.ci_jobs {
            let links = results.ci_jobs.entry(repository.clone()).or_default();
            for job_type in &eff.ci.job_types {
                links.insert(job_type.clone(), jobs.job_link(repository, job_type, statuses));
            }
            results.unit_test_coverage.insert(
                repository.clone(),
                ci::read_unit_test_coverage(transport, jobs, repository),
            );
        }

        if opts.tables.code_quality {
            let empty = LinterResult::default();
            let status = overall_status(
                &StatusInput {
                    repository,
                    source_files: results.source_files.get(repository).map_or(0, |s| s.count),
                    linter: results.repo_linter_checks.get(repository).unwrap_or(&empty),
                    docstyle: results.repo_docstyle_checks.get(repository).unwrap_or(&empty),
                    coverage: results.unit_test_coverage.get(repository).copied().flatten(),
                    coverage_threshold: eff.coverage_threshold,
                },
                &eff.ignore,
            );
            results.overall_status.insert(repository.clone(), status);
        }

        if opts.cleanup_repositories {
            ws.cleanup_repository(repository);
            ws.delete_work_files(repository);
        }
    }
}

fn prepare_data_for_sla_table(results: &mut Results, eff: &Effective) -> Result<()> {
    let perf_results = perf::read_results(&eff.perf_results_dir)?;
    results.perf_tests = perf::compute_statistic(&perf_results, &eff.sla);
    results.sla_thresholds = eff.sla.clone();
    Ok(())
}

/// Gather the data of every enabled table.
pub fn collect(
    eff: &Effective,
    env: &EnvSettings,
    opts: &RunOptions,
    runner: &dyn CommandRunner,
    transport: &dyn Transport,
) -> Result<Results> {
    let mut results = Results::new(eff.repositories.clone(), opts.tables);
    prepare_header(&mut results, eff);

    let jobs = CiJobs::new(&eff.ci);
    let statuses = read_job_statuses(transport, eff, &opts.tables).unwrap_or_default();

    if opts.tables.liveness {
        prepare_data_for_liveness_table(&mut results, env, transport, &jobs, &statuses);
    }

    prepare_data_for_repositories(&mut results, eff, opts, runner, transport, &jobs, &statuses);

    if opts.tables.sla {
        prepare_data_for_sla_table(&mut results, eff)?;
    }
    Ok(results)
}

/// Write the dashboard page, plus the CSV row when both the code quality
/// and liveness tables were produced.
pub fn publish(eff: &Effective, results: &Results, date: &str, generated_at: &str) -> Result<()> {
    if results.tables.code_quality && results.tables.liveness {
        report::csv::export_into_csv(&eff.csv_output, results, date)?;
        info!("History row appended to {}", eff.csv_output.display());
    }
    report::html::generate_dashboard(&eff.html_output, results, &eff.ignore, generated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_effective;
    use crate::env::{ApiEndpoints, StorageCredentials};
    use crate::http::fake::FakeTransport;
    use crate::repos::fake::FakeRunner;
    use std::fs;
    use tempfile::tempdir;

    fn env() -> EnvSettings {
        let endpoints = |prefix: &str| ApiEndpoints {
            core_api_url: format!("http://core.{}", prefix),
            core_api_token: "ctok".into(),
            jobs_api_url: format!("http://jobs.{}", prefix),
            jobs_api_token: "jtok".into(),
        };
        EnvSettings {
            stage: endpoints("stage"),
            prod: endpoints("prod"),
            storage: StorageCredentials {
                access_key_id: "id".into(),
                secret_access_key: "secret".into(),
                region: "us-east-1".into(),
            },
        }
    }

    fn transport() -> FakeTransport {
        let mut t = FakeTransport::default()
            .with(
                "https://ci.example.org/api/json?tree=jobs[name,color]",
                200,
                r#"{"jobs": [{"name": "beta-build_job", "color": "blue"},
                             {"name": "production-smoketests", "color": "blue"}]}"#,
            )
            .with(
                "https://ci.example.org/job/production-smoketests/api/json?tree=builds[result]",
                200,
                r#"{"builds": [{"result": "SUCCESS"}, {"result": "FAILURE"}]}"#,
            )
            .with(
                "https://ci.example.org/job/beta-test_job/lastSuccessfulBuild/consoleText",
                200,
                "TOTAL  100  10  90%\n",
            );
        for env in ["stage", "prod"] {
            t = t
                .with(&format!("http://core.{}/api/v1/readiness", env), 200, "")
                .with(&format!("http://jobs.{}/api/v1/readiness", env), 200, "")
                .with(&format!("http://core.{}/api/v1/user-intent", env), 200, "")
                .with(&format!("http://jobs.{}/api/v1/jobs", env), 200, "{}");
        }
        t
    }

    fn workspace() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("qadash.toml"),
            r#"
repositories = ["alpha/beta"]
[ci]
url = "https://ci.example.org"
[sprint]
name = "Sprint 3"
issues_url_template = "https://issues.example.org/?team={team}"
[perf.sla]
component_analysis = 2.0
"#,
        )
        .unwrap();
        fs::create_dir_all(root.join("beta/pkg")).unwrap();
        for i in 0..5 {
            fs::write(root.join(format!("beta/pkg/m{}.py", i)), "x = 1\n").unwrap();
        }
        fs::create_dir_all(root.join("perf-results")).unwrap();
        fs::write(root.join("perf-results/component_analysis.csv"), "a,1.0\nb,2.0\n").unwrap();
        dir
    }

    fn all_pass_report() -> String {
        (0..5)
            .map(|i| format!("pkg/m{}.py\n    Pass\n", i))
            .collect()
    }

    #[test]
    fn test_healthy_repository_end_to_end() {
        let dir = workspace();
        let eff = resolve_effective(dir.path().to_str(), None, None, None).unwrap();
        let runner = FakeRunner::default()
            .with_output("./run-linter.sh", &all_pass_report())
            .with_output("./check-docstyle.sh", &all_pass_report());
        let t = transport();
        let opts = RunOptions {
            tables: TableToggles::default(),
            clone_repositories: false,
            cleanup_repositories: false,
        };

        let results = collect(&eff, &env(), &opts, &runner, &t).unwrap();
        let status = &results.overall_status["alpha/beta"];
        assert!(status.ok, "remarks: {:?}", status.remarks);
        assert!(status.remarks.is_empty());
        assert_eq!(results.source_files["alpha/beta"].count, 5);
        assert_eq!(results.repo_linter_checks["alpha/beta"].passed, 5);
        assert_eq!(results.unit_test_coverage["alpha/beta"], Some(90));
        assert_eq!(results.ci_jobs["alpha/beta"].len(), 4);
        assert_eq!(results.job_types, eff.ci.job_types);
        assert!(results.stage.unwrap().is_healthy());
        assert!(results.production.unwrap().is_healthy());
        assert_eq!(results.smoke_tests_builds.unwrap().success, 1);
        assert_eq!(results.perf_tests[0].meets_sla, Some(true));
        assert_eq!(results.sprint.as_deref(), Some("Sprint 3"));
        assert_eq!(
            results.issues_list_url["core"],
            "https://issues.example.org/?team=core"
        );

        publish(&eff, &results, "2024-05-01", "2024-05-01 08:00").unwrap();
        let csv = fs::read_to_string(dir.path().join("dashboard.csv")).unwrap();
        assert_eq!(
            csv.trim_end(),
            "2024-05-01,1,1,1,1,1,1,1,1,5,5,5,5,0,5,5,0"
        );
        assert!(dir.path().join("dashboard.html").exists());
    }

    #[test]
    fn test_disabled_tables_skip_network_and_csv() {
        let dir = workspace();
        let eff = resolve_effective(dir.path().to_str(), None, None, None).unwrap();
        let runner = FakeRunner::default();
        let t = FakeTransport::default();
        let opts = RunOptions {
            tables: TableToggles {
                ci_jobs: false,
                code_quality: true,
                liveness: false,
                sla: false,
            },
            clone_repositories: true,
            cleanup_repositories: true,
        };

        let results = collect(&eff, &env(), &opts, &runner, &t).unwrap();
        assert!(t.requests.borrow().is_empty());
        // no coverage without the CI table
        let status = &results.overall_status["alpha/beta"];
        assert!(!status.ok);
        assert!(status
            .remarks
            .iter()
            .any(|r| r == "unit tests have not been set up"));
        // fetch, linter, docstyle
        assert_eq!(runner.calls.borrow().len(), 3);
        assert!(!dir.path().join("beta").exists());
        assert!(!dir.path().join("beta.linter.txt").exists());

        publish(&eff, &results, "2024-05-01", "now").unwrap();
        assert!(!dir.path().join("dashboard.csv").exists());
        assert!(dir.path().join("dashboard.html").exists());
    }

    #[test]
    fn test_unreadable_perf_file_keeps_the_run() {
        let dir = workspace();
        fs::write(dir.path().join("perf-results/bad.csv"), [0xff, 0xfe, b',', b'1']).unwrap();
        let eff = resolve_effective(dir.path().to_str(), None, None, None).unwrap();
        let runner = FakeRunner::default();
        let t = FakeTransport::default();
        let results = collect(&eff, &env(), &RunOptions::default(), &runner, &t).unwrap();
        assert_eq!(results.perf_tests.len(), 1);
        assert_eq!(results.perf_tests[0].name, "component_analysis");
        publish(&eff, &results, "2024-05-01", "now").unwrap();
        assert!(dir.path().join("dashboard.html").exists());
        assert!(dir.path().join("dashboard.csv").exists());
    }

    #[test]
    fn test_unreachable_ci_degrades() {
        let dir = workspace();
        let eff = resolve_effective(dir.path().to_str(), None, None, None).unwrap();
        let runner = FakeRunner::default();
        let t = FakeTransport::default();
        let opts = RunOptions::default();
        let results = collect(&eff, &env(), &opts, &runner, &t).unwrap();
        assert!(!results.stage.unwrap().core_api_available);
        assert_eq!(results.smoke_tests_builds, None);
        assert_eq!(results.unit_test_coverage["alpha/beta"], None);
        assert!(results.ci_jobs["alpha/beta"].values().all(|j| j.color.is_none()));
    }
}
