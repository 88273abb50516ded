use crate::document;
use crate::lint::{self, Diagnostic, Severity};
use crate::staged::{self, GitError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

/// Filename globs that identify settings documents by default.
pub const DEFAULT_PATTERNS: &[&str] = &["ruleset.toml", "*.ruleset.toml"];

#[derive(Debug)]
pub enum CheckError {
    GlobParse(globset::Error),
    MissingTarget(PathBuf),
    Git(GitError),
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::GlobParse(e) => write!(f, "invalid settings-file pattern: {}", e),
            CheckError::MissingTarget(p) => {
                write!(f, "target '{}' does not exist", p.display())
            }
            CheckError::Git(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CheckError {}

impl From<GitError> for CheckError {
    fn from(e: GitError) -> Self {
        CheckError::Git(e)
    }
}

/// Findings for one settings document.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of entries under `Rules`, zero when the file failed to parse.
    pub rules_configured: usize,
}

#[derive(Debug)]
pub struct CheckResult {
    pub files: Vec<FileReport>,
    pub files_checked: usize,
    pub rules_configured: usize,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.files
            .iter()
            .flat_map(|f| &f.diagnostics)
            .any(|d| d.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.files
            .iter()
            .flat_map(|f| &f.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Run a full check: discover settings documents, parse and lint each.
///
/// Explicit file targets are checked as-is; directory targets are walked
/// gitignore-aware and filtered to filenames matching `patterns`. A parse
/// failure in one file becomes an error diagnostic for that file and does
/// not abort the run.
pub fn run_check(targets: &[PathBuf], patterns: &[String]) -> Result<CheckResult, CheckError> {
    let pattern_set = build_pattern_set(patterns)?;

    let mut files: Vec<PathBuf> = Vec::new();
    for target in targets {
        if !target.exists() {
            return Err(CheckError::MissingTarget(target.clone()));
        }
        if target.is_file() {
            files.push(target.clone());
        } else {
            for entry in WalkBuilder::new(target).build().filter_map(|e| e.ok()) {
                if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                    continue;
                }
                if matches_patterns(&pattern_set, entry.path()) {
                    files.push(entry.into_path());
                }
            }
        }
    }
    files.sort();
    files.dedup();

    let reports: Vec<FileReport> = files.par_iter().map(|path| check_file(path)).collect();

    let files_checked = reports.len();
    let rules_configured = reports.iter().map(|r| r.rules_configured).sum();

    Ok(CheckResult {
        files: reports,
        files_checked,
        rules_configured,
    })
}

/// Check the settings documents staged for commit, for the pre-commit hook.
pub fn run_staged_check(patterns: &[String]) -> Result<CheckResult, CheckError> {
    let pattern_set = build_pattern_set(patterns)?;
    let files = staged_targets(staged::staged_files()?, &pattern_set);
    run_check(&files, patterns)
}

/// Narrow staged paths to settings documents still present in the working
/// tree. A path staged and then deleted has nothing left to validate and
/// must not abort the hook.
fn staged_targets(files: Vec<PathBuf>, pattern_set: &GlobSet) -> Vec<PathBuf> {
    files
        .into_iter()
        .filter(|path| matches_patterns(pattern_set, path))
        .filter(|path| path.exists())
        .collect()
}

fn check_file(path: &Path) -> FileReport {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => return parse_failure(path, document::ParseError::Read(e)),
    };

    let doc = match document::parse_str(&text) {
        Ok(d) => d,
        Err(e) => return parse_failure(path, e),
    };

    FileReport {
        path: path.to_path_buf(),
        rules_configured: doc.rules.len(),
        diagnostics: lint::check_document(&doc),
    }
}

fn parse_failure(path: &Path, error: document::ParseError) -> FileReport {
    FileReport {
        path: path.to_path_buf(),
        rules_configured: 0,
        diagnostics: vec![Diagnostic {
            check: "syntax",
            severity: Severity::Error,
            rule_id: None,
            message: error.to_string(),
            suggest: None,
        }],
    }
}

fn build_pattern_set(patterns: &[String]) -> Result<GlobSet, CheckError> {
    let mut builder = GlobSetBuilder::new();
    if patterns.is_empty() {
        for pattern in DEFAULT_PATTERNS {
            builder.add(Glob::new(pattern).map_err(CheckError::GlobParse)?);
        }
    } else {
        for pattern in patterns {
            builder.add(Glob::new(pattern).map_err(CheckError::GlobParse)?);
        }
    }
    builder.build().map_err(CheckError::GlobParse)
}

fn matches_patterns(set: &GlobSet, path: &Path) -> bool {
    path.file_name()
        .map(|name| set.is_match(name))
        .unwrap_or(false)
}
