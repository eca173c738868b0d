//! Source inventory of a cloned repository: matching files and line totals.

use crate::models::SourceFiles;
use glob::glob;
use log::warn;
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};

fn is_hidden(rel: &Path) -> bool {
    rel.components().any(|c| match c {
        Component::Normal(s) => s.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

fn count_lines(path: &Path) -> usize {
    match fs::read(path) {
        Ok(bytes) => {
            let newlines = bytes.iter().filter(|&&b| b == b'\n').count();
            // a last line without trailing newline still counts
            if bytes.last().is_some_and(|&b| b != b'\n') {
                newlines + 1
            } else {
                newlines
            }
        }
        Err(e) => {
            warn!("cannot read {}: {}", path.display(), e);
            0
        }
    }
}

/// Collect source files below `repo_dir` with one of `extensions`
/// (without dots), skipping hidden directories such as `.git`.
///
/// Paths are reported relative to `repo_dir`, sorted.
pub fn get_source_files(repo_dir: &Path, extensions: &[String]) -> SourceFiles {
    let mut targets: Vec<(String, PathBuf)> = Vec::new();
    for ext in extensions {
        let pattern = format!(
            "{}/**/*.{}",
            glob::Pattern::escape(&repo_dir.to_string_lossy()),
            glob::Pattern::escape(ext)
        );
        let entries = match glob(&pattern) {
            Ok(e) => e,
            Err(e) => {
                warn!("bad source pattern {}: {}", pattern, e);
                continue;
            }
        };
        for path in entries.flatten() {
            if !path.is_file() {
                continue;
            }
            let rel = pathdiff::diff_paths(&path, repo_dir).unwrap_or_else(|| path.clone());
            if is_hidden(&rel) {
                continue;
            }
            targets.push((rel.to_string_lossy().replace('\\', "/"), path));
        }
    }
    targets.sort_by(|a, b| a.0.cmp(&b.0));
    targets.dedup_by(|a, b| a.0 == b.0);

    let total_lines = targets.par_iter().map(|(_, p)| count_lines(p)).sum();
    SourceFiles {
        count: targets.len(),
        total_lines,
        files: targets.into_iter().map(|(rel, _)| rel).collect(),
    }
}
