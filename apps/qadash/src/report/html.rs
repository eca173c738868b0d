//! HTML dashboard rendered from built-in `minijinja` templates.

use crate::config::IgnoreCfg;
use crate::error::Result;
use crate::lint::{progress_bar_class, progress_bar_width};
use crate::models::results::Results;
use log::{error, info};
use minijinja::{context, Environment, Value};
use std::fs;
use std::path::Path;

pub const TEMPLATE_DASHBOARD: &str = "dashboard.html";
pub const TEMPLATE_STYLES: &str = "styles.css";

fn checked_add_template<'a>(env: &mut Environment<'a>, entry: &'a str, data: &'a str) {
    match env.add_template(entry, data) {
        Ok(_) => {
            info!("Added template {}", entry)
        }
        Err(e) => {
            error!("Error adding template for \"{}\": {}", entry, e)
        }
    }
}

pub fn templates_from_builtin<'a>() -> Environment<'a> {
    let mut env = Environment::new();

    checked_add_template(&mut env, TEMPLATE_DASHBOARD, include_str!("dashboard.jinja"));
    checked_add_template(&mut env, TEMPLATE_STYLES, include_str!("styles.css"));

    env.add_function("progress_bar_class", |pct: String| {
        progress_bar_class(&pct).to_string()
    });
    env.add_function("progress_bar_width", |pct: String| progress_bar_width(&pct));
    env
}

/// Render the dashboard page. `generated_at` is shown in the footer.
pub fn render_dashboard(
    env: &Environment<'_>,
    results: &Results,
    ignore: &IgnoreCfg,
    generated_at: &str,
) -> Result<String> {
    let tmpl = env.get_template(TEMPLATE_DASHBOARD)?;
    let html = tmpl.render(context! {
        results => Value::from_serialize(results),
        ignored_linter => Value::from_serialize(&ignore.linter),
        ignored_docstyle => Value::from_serialize(&ignore.docstyle),
        generated_at => generated_at,
        version => env!("CARGO_PKG_VERSION"),
    })?;
    Ok(html)
}

/// Render the dashboard and write it to `path`.
pub fn generate_dashboard(
    path: &Path,
    results: &Results,
    ignore: &IgnoreCfg,
    generated_at: &str,
) -> Result<()> {
    let env = templates_from_builtin();
    let html = render_dashboard(&env, results, ignore, generated_at)?;
    fs::write(path, html)?;
    info!("Dashboard written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ci::JobLink;
    use crate::models::results::{SmokeTest, TableToggles};
    use crate::models::{LinterResult, Liveness, OverallStatus, PerfStatistic, SourceFiles};
    use std::collections::BTreeMap;

    fn sample() -> Results {
        let mut r = Results::new(vec!["alpha/beta".into()], TableToggles::default());
        r.sprint = Some("Sprint 7".into());
        r.teams = vec!["core".into()];
        r.issues_list_url
            .insert("core".into(), "https://issues.example.org/?label=core".into());
        r.source_files.insert(
            "alpha/beta".into(),
            SourceFiles {
                count: 5,
                total_lines: 100,
                files: vec![],
            },
        );
        r.repo_linter_checks.insert(
            "alpha/beta".into(),
            LinterResult {
                total: 5,
                passed: 5,
                failed: 0,
                passed_pct: "100".into(),
                failed_pct: "0".into(),
                files: BTreeMap::new(),
            },
        );
        r.repo_docstyle_checks.insert(
            "alpha/beta".into(),
            LinterResult {
                total: 5,
                passed: 4,
                failed: 1,
                passed_pct: "80".into(),
                failed_pct: "20".into(),
                files: BTreeMap::new(),
            },
        );
        r.unit_test_coverage.insert("alpha/beta".into(), Some(90));
        r.overall_status.insert(
            "alpha/beta".into(),
            OverallStatus {
                ok: false,
                remarks: vec!["docstyle check failed".into(), "1 file ignored by <docstyle>".into()],
            },
        );
        r.job_types = vec!["test_job".into(), "build_job".into(), "pydoc_job".into()];
        r.ci_jobs.entry("alpha/beta".into()).or_default().insert(
            "test_job".into(),
            JobLink::new(
                "beta-test_job".into(),
                "https://ci.example.org/job/beta-test_job/".into(),
                Some("red".into()),
            ),
        );
        r.ci_jobs.entry("alpha/beta".into()).or_default().insert(
            "build_job".into(),
            JobLink::new(
                "beta-build_job".into(),
                "https://ci.example.org/job/beta-build_job/".into(),
                Some("blue".into()),
            ),
        );
        r.stage = Some(Liveness {
            core_api_available: true,
            jobs_api_available: true,
            core_api_auth_token: true,
            jobs_api_auth_token: true,
        });
        r.production = Some(Liveness::default());
        r.smoke_tests.push(SmokeTest {
            environment: "production".into(),
            job: JobLink::new(
                "production-smoketests".into(),
                "https://ci.example.org/job/production-smoketests/".into(),
                Some("red".into()),
            ),
        });
        r.perf_tests.push(PerfStatistic {
            name: "component_analysis".into(),
            count: 2,
            min: 1.0,
            max: 3.0,
            avg: 2.0,
            sla: Some(2.5),
            meets_sla: Some(true),
        });
        r
    }

    #[test]
    fn test_render_all_tables() {
        let env = templates_from_builtin();
        let html = render_dashboard(&env, &sample(), &IgnoreCfg::default(), "2024-05-01 10:00")
            .unwrap();
        assert!(html.contains("Sprint 7"));
        assert!(html.contains("progress-bar-warning"));
        assert!(html.contains("docstyle check failed<br>"));
        // remarks are escaped
        assert!(html.contains("&lt;docstyle&gt;"));
        assert!(html.contains("beta-build_job"));
        assert!(html.contains("component_analysis"));
        assert!(html.contains("production-smoketests"));
        assert!(html.contains("2024-05-01 10:00"));
    }

    #[test]
    fn test_ci_jobs_follow_configured_order() {
        let env = templates_from_builtin();
        let html = render_dashboard(&env, &sample(), &IgnoreCfg::default(), "now").unwrap();
        let section = &html[html.find("id=\"ci-jobs\"").unwrap()..];
        assert!(section.contains("<th>test_job</th><th>build_job</th><th>pydoc_job</th>"));
        let test_pos = section.find("beta-test_job").unwrap();
        let build_pos = section.find("beta-build_job").unwrap();
        assert!(test_pos < build_pos);
        // no link configured for pydoc_job
        assert!(section.contains("<td class=\"na\">n/a</td>"));
    }

    #[test]
    fn test_disabled_tables_are_skipped() {
        let env = templates_from_builtin();
        let mut r = sample();
        r.tables = TableToggles {
            ci_jobs: false,
            code_quality: false,
            liveness: false,
            sla: false,
        };
        let html = render_dashboard(&env, &r, &IgnoreCfg::default(), "now").unwrap();
        assert!(!html.contains("id=\"code-quality\""));
        assert!(!html.contains("id=\"ci-jobs\""));
        assert!(!html.contains("id=\"liveness\""));
        assert!(!html.contains("id=\"sla\""));
    }

    #[test]
    fn test_generate_dashboard_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.html");
        generate_dashboard(&path, &sample(), &IgnoreCfg::default(), "now").unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
