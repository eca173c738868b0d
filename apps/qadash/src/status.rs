//! Overall per-repository status: file coverage of both checkers, checker
//! failures and unit-test coverage reduced to one boolean plus remarks.

use crate::config::IgnoreCfg;
use crate::coverage::coverage_ok;
use crate::models::{LinterResult, OverallStatus};

/// Inputs of one repository's status computation.
pub struct StatusInput<'a> {
    pub repository: &'a str,
    pub source_files: usize,
    pub linter: &'a LinterResult,
    pub docstyle: &'a LinterResult,
    pub coverage: Option<u32>,
    pub coverage_threshold: u32,
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Compute the overall status and remarks for one repository.
///
/// Files listed in `ignore` for the repository are added back to the
/// checker totals before comparing them with the source file count.
pub fn overall_status(input: &StatusInput<'_>, ignore: &IgnoreCfg) -> OverallStatus {
    let ignored_linter = ignore
        .linter
        .get(input.repository)
        .map_or(0, |files| files.len());
    let ignored_docstyle = ignore
        .docstyle
        .get(input.repository)
        .map_or(0, |files| files.len());

    let linter_covered = input.linter.total + ignored_linter;
    let docstyle_covered = input.docstyle.total + ignored_docstyle;
    let all_linted = input.source_files == linter_covered;
    let all_docchecked = input.source_files == docstyle_covered;
    let coverage_good = input
        .coverage
        .is_some_and(|c| coverage_ok(c, input.coverage_threshold));

    let ok = all_linted
        && all_docchecked
        && input.linter.failed == 0
        && input.docstyle.failed == 0
        && coverage_good;

    let mut remarks = Vec::new();
    if !all_linted {
        remarks.push(format!(
            "not all source files checked by linter (linter checked {} of {} files)",
            input.linter.total, input.source_files
        ));
    }
    if !all_docchecked {
        remarks.push(format!(
            "not all source files checked by docstyle (docstyle checked {} of {} files)",
            input.docstyle.total, input.source_files
        ));
    }
    match input.coverage {
        Some(c) if !coverage_good => remarks.push(format!(
            "improve code coverage ({}% < {}%)",
            c, input.coverage_threshold
        )),
        Some(_) => {}
        None => remarks.push("unit tests have not been set up".to_string()),
    }
    if input.linter.failed != 0 {
        remarks.push("linter failed".to_string());
    }
    if input.docstyle.failed != 0 {
        remarks.push("docstyle check failed".to_string());
    }
    if ignored_linter > 0 {
        remarks.push(format!(
            "{} file{} ignored by linter",
            ignored_linter,
            plural(ignored_linter)
        ));
    }
    if ignored_docstyle > 0 {
        remarks.push(format!(
            "{} file{} ignored by docstyle",
            ignored_docstyle,
            plural(ignored_docstyle)
        ));
    }

    OverallStatus { ok, remarks }
}
