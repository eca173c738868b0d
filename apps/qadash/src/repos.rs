//! Repository workspace: clone-or-fetch, checker script runs and cleanup.
//!
//! External commands go through `CommandRunner`. Their exit statuses are
//! logged but never stop the run.

use crate::error::Result;
use log::{debug, info, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

pub trait CommandRunner {
    /// Run `program` with `args` in `cwd`. When `stdout` is given, the
    /// program's standard output is written to that file.
    ///
    /// Returns the exit code, `None` when terminated by a signal.
    fn run(&self, program: &str, args: &[&str], cwd: &Path, stdout: Option<&Path>)
        -> Result<Option<i32>>;
}

/// Runs commands as child processes of this one.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        stdout: Option<&Path>,
    ) -> Result<Option<i32>> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(cwd);
        if let Some(out) = stdout {
            cmd.stdout(Stdio::from(fs::File::create(out)?));
        }
        let status = cmd.status()?;
        Ok(status.code())
    }
}

/// Directory name of a repository clone: the last segment of `org/name`.
pub fn repo_dir_name(repository: &str) -> &str {
    repository
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(repository)
}

/// Clones and work files of all repositories live in one work directory.
pub struct Workspace<'a> {
    work_dir: &'a Path,
    runner: &'a dyn CommandRunner,
    clone_prefix: &'a str,
    linter_script: &'a str,
    docstyle_script: &'a str,
}

impl<'a> Workspace<'a> {
    pub fn new(
        work_dir: &'a Path,
        runner: &'a dyn CommandRunner,
        clone_prefix: &'a str,
        linter_script: &'a str,
        docstyle_script: &'a str,
    ) -> Self {
        Self {
            work_dir,
            runner,
            clone_prefix,
            linter_script,
            docstyle_script,
        }
    }

    pub fn repo_dir(&self, repository: &str) -> PathBuf {
        self.work_dir.join(repo_dir_name(repository))
    }

    pub fn linter_report(&self, repository: &str) -> PathBuf {
        self.work_dir
            .join(format!("{}.linter.txt", repo_dir_name(repository)))
    }

    pub fn docstyle_report(&self, repository: &str) -> PathBuf {
        self.work_dir
            .join(format!("{}.docstyle.txt", repo_dir_name(repository)))
    }

    pub fn is_repository_cloned(&self, repository: &str) -> bool {
        self.repo_dir(repository).is_dir()
    }

    fn run_logged(&self, what: &str, program: &str, args: &[&str], cwd: &Path, out: Option<&Path>) {
        debug!("{}: {} {}", what, program, args.join(" "));
        match self.runner.run(program, args, cwd, out) {
            Ok(Some(0)) => {}
            Ok(Some(code)) => warn!("{} exited with status {}", what, code),
            Ok(None) => warn!("{} was terminated by a signal", what),
            Err(e) => warn!("{} could not be run: {}", what, e),
        }
    }

    pub fn clone_repository(&self, repository: &str) {
        info!("Cloning the repository {}", repository);
        let url = format!("{}/{}.git", self.clone_prefix, repository);
        self.run_logged(
            "git clone",
            "git",
            &[
                "clone",
                "--single-branch",
                "--depth",
                "1",
                url.as_str(),
                repo_dir_name(repository),
            ],
            self.work_dir,
            None,
        );
    }

    pub fn fetch_repository(&self, repository: &str) {
        info!("Fetching changes from the repository {}", repository);
        self.run_logged(
            "git fetch",
            "git",
            &["fetch"],
            &self.repo_dir(repository),
            None,
        );
    }

    pub fn clone_or_fetch_repository(&self, repository: &str) {
        if self.is_repository_cloned(repository) {
            self.fetch_repository(repository);
        } else {
            self.clone_repository(repository);
        }
    }

    pub fn run_linter(&self, repository: &str) {
        info!("Running linter for {}", repository);
        self.run_logged(
            "linter",
            self.linter_script,
            &[],
            &self.repo_dir(repository),
            Some(&self.linter_report(repository)),
        );
    }

    pub fn run_docstyle_check(&self, repository: &str) {
        info!("Running docstyle check for {}", repository);
        self.run_logged(
            "docstyle check",
            self.docstyle_script,
            &[],
            &self.repo_dir(repository),
            Some(&self.docstyle_report(repository)),
        );
    }

    /// Remove the checker reports of one repository.
    pub fn delete_work_files(&self, repository: &str) {
        for p in [self.linter_report(repository), self.docstyle_report(repository)] {
            if let Err(e) = fs::remove_file(&p) {
                debug!("cannot remove {}: {}", p.display(), e);
            }
        }
    }

    /// Remove the clone of one repository.
    ///
    /// Only a plain directory name directly inside the work directory is
    /// removed. Returns whether a removal was attempted.
    pub fn cleanup_repository(&self, repository: &str) -> bool {
        let name = repo_dir_name(repository);
        let mut comps = Path::new(name).components();
        let plain = matches!(comps.next(), Some(Component::Normal(_))) && comps.next().is_none();
        if !plain || name.is_empty() {
            warn!("refusing to clean up {}", repository);
            return false;
        }
        info!("cleanup {}", name);
        if let Err(e) = fs::remove_dir_all(self.work_dir.join(name)) {
            debug!("cleanup of {} failed: {}", name, e);
        }
        true
    }
}
