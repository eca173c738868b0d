//! qadash CLI binary entry point.
//! Resolves configuration, checks the environment, runs the dashboard and
//! prints the outcome.

use chrono::Local;
use clap::Parser;
use qadash::cli::{Cli, Commands};
use qadash::config::{self, Effective};
use qadash::dashboard::{self, RunOptions};
use qadash::error::Error;
use qadash::http::ReqwestTransport;
use qadash::lint::ReportParser;
use qadash::models::results::TableToggles;
use qadash::repos::ProcessRunner;
use qadash::utils::{error_prefix, info_prefix, note_prefix, use_colors};
use qadash::{env, logging, output};

fn fail(e: &Error) -> ! {
    eprintln!("{} {}", error_prefix(), e);
    std::process::exit(e.exit_code());
}

fn init_logging(level: &str, output: &str) {
    if let Err(e) = logging::setup_logger(logging::parse_level(level), use_colors(output)) {
        eprintln!("{} cannot set up logging: {}", note_prefix(), e);
    }
}

fn effective_or_exit(
    work_dir: Option<&str>,
    config_file: Option<&str>,
    output: Option<&str>,
    log_level: Option<&str>,
) -> Effective {
    let eff = config::resolve_effective(work_dir, config_file, output, log_level)
        .unwrap_or_else(|e| fail(&e));
    if eff.config_path.is_none() {
        eprintln!(
            "{} No qadash.toml found in {}; using defaults.",
            note_prefix(),
            eff.work_dir.display()
        );
    }
    eff
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Env { log_level } => {
            init_logging(log_level.as_deref().unwrap_or("info"), "human");
            if let Err(e) = env::check_environment() {
                fail(&e);
            }
            eprintln!("{} All required environment variables are set.", info_prefix());
        }
        Commands::Parse {
            file,
            extensions,
            work_dir,
            output,
        } => {
            let eff = effective_or_exit(work_dir.as_deref(), None, output.as_deref(), None);
            init_logging(&eff.log_level, &eff.output);
            let extensions = if extensions.is_empty() {
                eff.source_extensions.clone()
            } else {
                extensions
            };
            let parser = ReportParser::new(&extensions);
            match parser.parse_file(std::path::Path::new(&file)) {
                Ok(res) => output::print_lint_result(&file, &res, &eff.output),
                Err(e) => fail(&e),
            }
        }
        Commands::Run {
            disable_ci_jobs,
            disable_code_quality,
            disable_liveness,
            disable_sla,
            clone_repositories,
            cleanup_repositories,
            work_dir,
            config,
            output,
            log_level,
        } => {
            let eff = effective_or_exit(
                work_dir.as_deref(),
                config.as_deref(),
                output.as_deref(),
                log_level.as_deref(),
            );
            init_logging(&eff.log_level, &eff.output);
            if eff.repositories.is_empty() {
                eprintln!(
                    "{} No repositories configured; only the liveness and SLA tables will have data.",
                    note_prefix()
                );
            }
            let env_settings = env::check_environment().unwrap_or_else(|e| fail(&e));

            let opts = RunOptions {
                tables: TableToggles {
                    ci_jobs: !disable_ci_jobs,
                    code_quality: !disable_code_quality,
                    liveness: !disable_liveness,
                    sla: !disable_sla,
                },
                clone_repositories,
                cleanup_repositories,
            };
            let transport = ReqwestTransport::new();
            let results = dashboard::collect(&eff, &env_settings, &opts, &ProcessRunner, &transport)
                .unwrap_or_else(|e| fail(&e));

            let now = Local::now();
            let date = now.format("%Y-%m-%d").to_string();
            let generated_at = now.format("%Y-%m-%d %H:%M:%S").to_string();
            if let Err(e) = dashboard::publish(&eff, &results, &date, &generated_at) {
                fail(&e);
            }
            output::print_summary(&results, &eff.output);
        }
    }
}
