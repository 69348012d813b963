use std::path::Path;

use crate::command::CommandSpec;

// ============================================================================
// Git command descriptors (path-based)
// ============================================================================

/// Initialize a repository in `repo_dir`.
pub fn init(git: &str, repo_dir: &Path) -> CommandSpec {
    CommandSpec::new(git).arg("init").current_dir(repo_dir)
}

/// Stage a single path, relative to `repo_dir`.
pub fn add(git: &str, repo_dir: &Path, path: &str) -> CommandSpec {
    CommandSpec::new(git)
        .arg("add")
        .arg(path)
        .current_dir(repo_dir)
}

/// Commit what is staged.
pub fn commit(git: &str, repo_dir: &Path, message: &str) -> CommandSpec {
    CommandSpec::new(git)
        .args(["commit", "-m", message])
        .current_dir(repo_dir)
}

/// Commit every change to tracked files.
pub fn commit_all(git: &str, repo_dir: &Path, message: &str) -> CommandSpec {
    CommandSpec::new(git)
        .args(["commit", "-a", "-m", message])
        .current_dir(repo_dir)
}
