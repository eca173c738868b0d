//! Console rendering of a dashboard run and of a parsed checker report.
//!
//! Supports `human` (default) and `json` outputs. The JSON form of a run
//! carries the full results plus a top-level summary.

use crate::models::results::Results;
use crate::models::{LinterResult, Liveness};
use crate::utils::use_colors;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn print_json(value: &JsonVal) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} cannot render JSON: {}", crate::utils::error_prefix(), e),
    }
}

fn mark(ok: bool, color: bool) -> String {
    match (ok, color) {
        (true, true) => "✔ OK".green().bold().to_string(),
        (true, false) => "✔ OK".to_string(),
        (false, true) => "✖ FAIL".red().bold().to_string(),
        (false, false) => "✖ FAIL".to_string(),
    }
}

fn liveness_line(environment: &str, l: &Liveness) -> String {
    let flag = |b: bool| if b { "up" } else { "down" };
    let token = |b: bool| if b { "valid" } else { "invalid" };
    format!(
        "{}: core API {} (token {}), jobs API {} (token {})",
        environment,
        flag(l.core_api_available),
        token(l.core_api_auth_token),
        flag(l.jobs_api_available),
        token(l.jobs_api_auth_token)
    )
}

/// Print the outcome of one dashboard run.
pub fn print_summary(results: &Results, output: &str) {
    if output == "json" {
        print_json(&compose_summary_json(results));
        return;
    }
    let color = use_colors(output);

    for (env, l) in [("stage", &results.stage), ("production", &results.production)] {
        if let Some(l) = l {
            println!("{} {}", mark(l.is_healthy(), color), liveness_line(env, l));
        }
    }
    for smoke in &results.smoke_tests {
        println!(
            "  smoke tests ({}): {}",
            smoke.environment,
            smoke.job.state.label()
        );
    }

    for repo in &results.repositories {
        let Some(status) = results.overall_status.get(repo) else {
            continue;
        };
        let name = if color {
            repo.bold().to_string()
        } else {
            repo.clone()
        };
        println!("{} {}", mark(status.ok, color), name);
        for remark in &status.remarks {
            println!("    - {}", remark);
        }
    }

    for stat in &results.perf_tests {
        let verdict = match stat.meets_sla {
            Some(true) => "within SLA",
            Some(false) => "SLA exceeded",
            None => "no SLA",
        };
        println!(
            "  perf {}: avg {:.2}s over {} runs ({})",
            stat.name, stat.avg, stat.count, verdict
        );
    }

    let unhealthy = results.unhealthy_repositories().len();
    let summary = format!(
        "— Summary — repositories={} failing={} tables=[{}]",
        results.repositories.len(),
        unhealthy,
        enabled_tables(results).join(", ")
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

fn enabled_tables(results: &Results) -> Vec<&'static str> {
    let t = &results.tables;
    [
        (t.liveness, "liveness"),
        (t.code_quality, "code-quality"),
        (t.ci_jobs, "ci-jobs"),
        (t.sla, "sla"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect()
}

/// Print one parsed checker report.
pub fn print_lint_result(file: &str, res: &LinterResult, output: &str) {
    if output == "json" {
        print_json(&compose_lint_json(file, res));
        return;
    }
    let color = use_colors(output);
    for (source, passed) in &res.files {
        println!("{} {}", mark(*passed, color), source);
    }
    let summary = format!(
        "— Summary — report={} total={} passed={} ({}%) failed={} ({}%)",
        file, res.total, res.passed, res.passed_pct, res.failed, res.failed_pct
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

/// Compose the run JSON object (pure) for testing/snapshot purposes.
pub fn compose_summary_json(results: &Results) -> JsonVal {
    let results_value = serde_json::to_value(results).unwrap_or(JsonVal::Null);
    let summary = json!({
        "repositories": results.repositories.len(),
        "failing": results.unhealthy_repositories(),
        "stage_healthy": results.stage.map(|l| l.is_healthy()),
        "production_healthy": results.production.map(|l| l.is_healthy()),
    });
    json!({"results": results_value, "summary": summary})
}

/// Compose the report JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(file: &str, res: &LinterResult) -> JsonVal {
    json!({
        "report": file,
        "result": serde_json::to_value(res).unwrap_or(JsonVal::Null),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::results::TableToggles;
    use crate::models::OverallStatus;
    use std::collections::BTreeMap;

    #[test]
    fn test_compose_summary_json_shape() {
        let mut r = Results::new(
            vec!["alpha/beta".into(), "alpha/gamma".into()],
            TableToggles::default(),
        );
        r.overall_status.insert(
            "alpha/beta".into(),
            OverallStatus {
                ok: true,
                remarks: vec![],
            },
        );
        r.overall_status.insert(
            "alpha/gamma".into(),
            OverallStatus {
                ok: false,
                remarks: vec!["linter failed".into()],
            },
        );
        r.stage = Some(Liveness {
            core_api_available: true,
            jobs_api_available: true,
            core_api_auth_token: true,
            jobs_api_auth_token: true,
        });
        let out = compose_summary_json(&r);
        assert_eq!(out["summary"]["repositories"], 2);
        assert_eq!(out["summary"]["failing"][0], "alpha/gamma");
        assert_eq!(out["summary"]["stage_healthy"], true);
        assert!(out["summary"]["production_healthy"].is_null());
        assert_eq!(
            out["results"]["overall_status"]["alpha/gamma"]["remarks"][0],
            "linter failed"
        );
    }

    #[test]
    fn test_compose_lint_json_shape() {
        let mut files = BTreeMap::new();
        files.insert("a.py".to_string(), true);
        let res = LinterResult {
            total: 1,
            passed: 1,
            failed: 0,
            passed_pct: "100".into(),
            failed_pct: "0".into(),
            files,
        };
        let out = compose_lint_json("beta.linter.txt", &res);
        assert_eq!(out["report"], "beta.linter.txt");
        assert_eq!(out["result"]["passed"], 1);
        assert_eq!(out["result"]["files"]["a.py"], true);
    }

    #[test]
    fn test_enabled_tables() {
        let r = Results::new(
            vec![],
            TableToggles {
                ci_jobs: false,
                code_quality: true,
                liveness: false,
                sla: true,
            },
        );
        assert_eq!(enabled_tables(&r), vec!["code-quality", "sla"]);
    }
}
