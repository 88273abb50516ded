use std::fmt;
use std::path::PathBuf;
use std::process::Command;

#[derive(Debug)]
pub enum GitError {
    GitNotFound,
    NotARepo,
    CommandFailed(String),
}

impl fmt::Display for GitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitError::GitNotFound => write!(f, "git is not installed or not in PATH"),
            GitError::NotARepo => write!(f, "not inside a git repository"),
            GitError::CommandFailed(msg) => write!(f, "git command failed: {}", msg),
        }
    }
}

impl std::error::Error for GitError {}

/// Get the repository root directory.
pub fn repo_root() -> Result<PathBuf, GitError> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .map_err(|_| GitError::GitNotFound)?;

    if !output.status.success() {
        return Err(GitError::NotARepo);
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(root))
}

/// Files staged for commit, as absolute paths.
///
/// Only Added, Copied, Modified, Renamed entries (`--diff-filter=ACMR`);
/// deletions have nothing left to validate.
pub fn staged_files() -> Result<Vec<PathBuf>, GitError> {
    let root = repo_root()?;

    let output = Command::new("git")
        .args([
            "diff",
            "--cached",
            "--name-only",
            "--diff-filter=ACMR",
        ])
        .output()
        .map_err(|_| GitError::GitNotFound)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(GitError::CommandFailed(stderr));
    }

    let listing = String::from_utf8_lossy(&output.stdout);
    Ok(parse_name_list(&listing)
        .into_iter()
        .map(|rel| root.join(rel))
        .collect())
}

/// Parse `git diff --name-only` output into relative paths.
fn parse_name_list(listing: &str) -> Vec<PathBuf> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_list_splits_lines() {
        let listing = "ruleset.toml\ndocs/strict.ruleset.toml\nsrc/main.rs\n";
        let paths = parse_name_list(listing);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("ruleset.toml"),
                PathBuf::from("docs/strict.ruleset.toml"),
                PathBuf::from("src/main.rs"),
            ]
        );
    }

    #[test]
    fn parse_name_list_skips_blank_lines() {
        let paths = parse_name_list("\nruleset.toml\n\n");
        assert_eq!(paths, vec![PathBuf::from("ruleset.toml")]);
    }

    #[test]
    fn parse_name_list_empty_output() {
        assert!(parse_name_list("").is_empty());
    }
}
