//! qadash core library.
//!
//! This crate collects the QA status of a set of repositories and deployed
//! environments and renders it as an HTML dashboard plus a CSV history.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `env`: Required environment variables.
//! - `repos`: Clone/fetch, checker script runs and cleanup.
//! - `sources`: Source file inventory and line counts.
//! - `lint`: Checker report parsing and percentages.
//! - `status`: Per-repository overall status and remarks.
//! - `http`, `ci`, `coverage`, `liveness`: Jenkins and API polling.
//! - `perf`: Performance results and SLA judgement.
//! - `models`: Data models shared by the run and the renderers.
//! - `report`: HTML dashboard and CSV history row.
//! - `dashboard`: One full run across all enabled tables.
//! - `output`: Human/JSON console printers.
//! - `error`, `logging`, `utils`: Supporting pieces.
pub mod ci;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod dashboard;
pub mod env;
pub mod error;
pub mod http;
pub mod lint;
pub mod liveness;
pub mod logging;
pub mod models;
pub mod output;
pub mod perf;
pub mod repos;
pub mod report;
pub mod sources;
pub mod status;
pub mod utils;
