//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "qadash",
    version,
    about = "QA status dashboard generator",
    long_about = "qadash — collects code quality, CI job, liveness and performance data for a set of repositories and deployed environments, then renders an HTML dashboard and appends a CSV history row.\n\nConfiguration precedence: CLI > qadash.toml > defaults.",
    after_help = "Examples:\n  qadash run\n  qadash run --clone-repositories --cleanup-repositories\n  qadash run --disable-liveness --disable-sla --output json\n  qadash parse beta.linter.txt",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current qadash version.")]
    Version,
    /// Generate the dashboard
    #[command(
        about = "Generate the dashboard",
        long_about = "Check the environment, gather data for every enabled table, write the HTML dashboard and, when both code quality and liveness are enabled, append a CSV history row.",
        after_help = "Examples:\n  qadash run --clone-repositories\n  qadash run --disable-ci-jobs --disable-code-quality"
    )]
    Run {
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip the CI jobs table")]
        disable_ci_jobs: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip the code quality table")]
        disable_code_quality: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip the liveness table")]
        disable_liveness: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip the SLA table")]
        disable_sla: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Clone or fetch every repository first")]
        clone_repositories: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Remove clones and checker reports afterwards")]
        cleanup_repositories: bool,
        #[arg(long, help = "Work directory (default: detected from current dir)")]
        work_dir: Option<String>,
        #[arg(long, help = "Path to qadash.toml|yaml")]
        config: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Log level: error|warn|info|debug|trace (default: info)")]
        log_level: Option<String>,
    },
    /// Validate required environment variables
    #[command(
        about = "Check environment variables",
        long_about = "Report every required environment variable and exit non-zero when any is missing."
    )]
    Env {
        #[arg(long, help = "Log level: error|warn|info|debug|trace (default: info)")]
        log_level: Option<String>,
    },
    /// Parse one checker report
    #[command(
        about = "Parse a checker report",
        long_about = "Tally a linter or docstyle report and print the per-file outcome and percentages.",
        after_help = "Examples:\n  qadash parse beta.linter.txt\n  qadash parse report.txt --extension py --extension pyi --output json"
    )]
    Parse {
        #[arg(help = "Report file written by a checker script")]
        file: String,
        #[arg(long = "extension", help = "Source file extension (repeatable, default: from config)")]
        extensions: Vec<String>,
        #[arg(long, help = "Work directory (default: detected from current dir)")]
        work_dir: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
