//! Configuration discovery and effective settings resolution.
//!
//! qadash reads `qadash.toml|yaml|yml` from the work directory (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `repositories`: empty
//! - `teams`: `core`, `integration`
//! - `clone_prefix`: `https://github.com`
//! - `source_extensions`: `py`
//! - `linter_script` / `docstyle_script`: `./run-linter.sh` / `./check-docstyle.sh`
//! - `html_output` / `csv_output`: `dashboard.html` / `dashboard.csv`
//! - `coverage.threshold`: 80
//! - `ci.url`: `https://ci.centos.org`
//! - `output`: `human`, `log_level`: `info`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_NAMES: [&str; 3] = ["qadash.toml", "qadash.yaml", "qadash.yml"];

/// Repository id -> files the checker is told to skip.
pub type IgnoreList = BTreeMap<String, Vec<String>>;

#[derive(Debug, Default, Deserialize, Clone)]
/// Coverage section under `[coverage]`.
pub struct CoverageCfg {
    pub threshold: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// CI server section under `[ci]`.
pub struct CiCfg {
    pub url: Option<String>,
    pub job_types: Option<Vec<String>>,
    pub job_name_template: Option<String>,
    pub smoke_test_job: Option<String>,
    /// `[ci.jobs."org/name"]` job_type -> explicit job name
    #[serde(default)]
    pub jobs: Option<HashMap<String, HashMap<String, String>>>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
/// Ignore lists under `[ignore.linter]` and `[ignore.docstyle]`.
pub struct IgnoreCfg {
    #[serde(default)]
    pub linter: IgnoreList,
    #[serde(default)]
    pub docstyle: IgnoreList,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
/// Sprint metadata shown in the dashboard header.
pub struct SprintCfg {
    pub name: Option<String>,
    pub plan_url: Option<String>,
    /// `{team}` is replaced by the team name
    pub issues_url_template: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Performance results section under `[perf]`.
pub struct PerfCfg {
    pub results_dir: Option<String>,
    /// Test name -> maximum average duration in seconds
    #[serde(default)]
    pub sla: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `qadash.toml|yaml`.
pub struct DashboardConfig {
    pub repositories: Option<Vec<String>>,
    pub teams: Option<Vec<String>>,
    pub clone_prefix: Option<String>,
    pub source_extensions: Option<Vec<String>>,
    pub linter_script: Option<String>,
    pub docstyle_script: Option<String>,
    pub html_output: Option<String>,
    pub csv_output: Option<String>,
    pub output: Option<String>,
    pub log_level: Option<String>,
    #[serde(default)]
    pub coverage: Option<CoverageCfg>,
    #[serde(default)]
    pub ci: Option<CiCfg>,
    #[serde(default)]
    pub ignore: Option<IgnoreCfg>,
    #[serde(default)]
    pub sprint: Option<SprintCfg>,
    #[serde(default)]
    pub perf: Option<PerfCfg>,
}

#[derive(Debug, Clone)]
/// Resolved CI settings.
pub struct CiSettings {
    pub url: String,
    pub job_types: Vec<String>,
    pub job_name_template: String,
    pub smoke_test_job: String,
    pub jobs: HashMap<String, HashMap<String, String>>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub work_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub repositories: Vec<String>,
    pub teams: Vec<String>,
    pub clone_prefix: String,
    pub source_extensions: Vec<String>,
    pub linter_script: String,
    pub docstyle_script: String,
    pub html_output: PathBuf,
    pub csv_output: PathBuf,
    pub output: String,
    pub log_level: String,
    pub coverage_threshold: u32,
    pub ci: CiSettings,
    pub ignore: IgnoreCfg,
    pub sprint: SprintCfg,
    pub perf_results_dir: PathBuf,
    pub sla: BTreeMap<String, f64>,
}

pub fn default_job_types() -> Vec<String> {
    ["test_job", "build_job", "pylint_job", "pydoc_job"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Walk upward from `start` to detect the work directory.
///
/// Stops when a `qadash.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_work_dir(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Parse a config file, choosing the format from its extension.
pub fn load_config_file(path: &Path) -> Result<DashboardConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&s)
            .map_err(|e| Error::config(format!("{} is not valid YAML: {}", path.display(), e)))
    } else {
        toml::from_str(&s)
            .map_err(|e| Error::config(format!("{} is not valid TOML: {}", path.display(), e)))
    }
}

/// Locate and load `qadash.toml` or `qadash.yaml|yml` in `root`.
///
/// `Ok(None)` when no config file exists; a present but broken file is an error.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, DashboardConfig)>> {
    for name in CONFIG_NAMES {
        let p = root.join(name);
        if p.exists() {
            let cfg = load_config_file(&p)?;
            return Ok(Some((p, cfg)));
        }
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_work_dir: Option<&str>,
    cli_config: Option<&str>,
    cli_output: Option<&str>,
    cli_log_level: Option<&str>,
) -> Result<Effective> {
    let start = PathBuf::from(cli_work_dir.unwrap_or("."));
    let work_dir = if cli_work_dir.is_some() {
        start
    } else {
        detect_work_dir(&start)
    };
    let (config_path, cfg) = match cli_config {
        Some(p) => {
            let path = PathBuf::from(p);
            let cfg = load_config_file(&path)?;
            (Some(path), cfg)
        }
        None => match load_config(&work_dir)? {
            Some((p, cfg)) => (Some(p), cfg),
            None => (None, DashboardConfig::default()),
        },
    };

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let log_level = cli_log_level
        .map(|s| s.to_string())
        .or(cfg.log_level)
        .unwrap_or_else(|| "info".to_string());

    let ci_cfg = cfg.ci.unwrap_or_default();
    let ci = CiSettings {
        url: ci_cfg
            .url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "https://ci.centos.org".to_string()),
        job_types: ci_cfg.job_types.unwrap_or_else(default_job_types),
        job_name_template: ci_cfg
            .job_name_template
            .unwrap_or_else(|| "{name}-{job}".to_string()),
        smoke_test_job: ci_cfg
            .smoke_test_job
            .unwrap_or_else(|| "smoketests".to_string()),
        jobs: ci_cfg.jobs.unwrap_or_default(),
    };

    let perf = cfg.perf.unwrap_or_default();
    let source_extensions: Vec<String> = cfg
        .source_extensions
        .unwrap_or_else(|| vec!["py".to_string()])
        .into_iter()
        .map(|e| e.trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect();

    Ok(Effective {
        html_output: work_dir.join(cfg.html_output.unwrap_or_else(|| "dashboard.html".into())),
        csv_output: work_dir.join(cfg.csv_output.unwrap_or_else(|| "dashboard.csv".into())),
        perf_results_dir: work_dir.join(perf.results_dir.unwrap_or_else(|| "perf-results".into())),
        sla: perf.sla.unwrap_or_default(),
        work_dir,
        config_path,
        repositories: cfg.repositories.unwrap_or_default(),
        teams: cfg
            .teams
            .unwrap_or_else(|| vec!["core".to_string(), "integration".to_string()]),
        clone_prefix: cfg
            .clone_prefix
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "https://github.com".to_string()),
        source_extensions,
        linter_script: cfg
            .linter_script
            .unwrap_or_else(|| "./run-linter.sh".to_string()),
        docstyle_script: cfg
            .docstyle_script
            .unwrap_or_else(|| "./check-docstyle.sh".to_string()),
        output,
        log_level,
        coverage_threshold: cfg.coverage.and_then(|c| c.threshold).unwrap_or(80),
        ci,
        ignore: cfg.ignore.unwrap_or_default(),
        sprint: cfg.sprint.unwrap_or_default(),
    })
}
