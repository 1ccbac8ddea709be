//! Git diff capture for the review tool.
//!
//! Shells out to the `git` CLI; the review contract is the diff *text*
//! git prints, so there is nothing to gain from a bindings library.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::debug;

use crate::error::{ConsultError, ConsultResult};
use crate::util::proc::run_captured;

/// Git commands are quick; a stuck git (e.g. lock contention) should
/// not hold a tool call for the full codex deadline.
const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch the diff of current changes in `repo_dir`: unstaged changes
/// against HEAD first, falling back to staged changes when the working
/// tree is clean.
///
/// Returns the raw diff text. An empty string means there is nothing to
/// review — that is a signal for the caller, not an error. Git itself
/// failing (not a repository, no HEAD, etc.) is an error.
pub fn changes_for_review(repo_dir: &Path) -> ConsultResult<String> {
    let unstaged = run_diff(repo_dir, &["diff", "HEAD"])?;
    if !unstaged.is_empty() {
        return Ok(unstaged);
    }

    debug!("no unstaged changes, checking staged");
    run_diff(repo_dir, &["diff", "--staged"])
}

fn run_diff(repo_dir: &Path, args: &[&str]) -> ConsultResult<String> {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(repo_dir);

    let captured = run_captured(cmd, GIT_TIMEOUT)?;
    if !captured.success() {
        return Err(ConsultError::Git {
            reason: format!(
                "`git {}` exited with status {}: {}",
                args.join(" "),
                captured.code,
                captured.output.trim()
            ),
        });
    }
    Ok(captured.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .expect("git should run");
        assert!(status.success(), "git {args:?} failed");
    }

    fn init_repo_with_commit(dir: &Path) {
        git(dir, &["init", "-q"]);
        git(dir, &["config", "user.email", "test@example.com"]);
        git(dir, &["config", "user.name", "Test"]);
        std::fs::write(dir.join("a.txt"), "one\n").expect("write");
        git(dir, &["add", "a.txt"]);
        git(dir, &["commit", "-q", "-m", "initial"]);
    }

    #[test]
    fn test_clean_tree_yields_empty_diff() {
        let dir = tempfile::tempdir().expect("tempdir");
        init_repo_with_commit(dir.path());

        let diff = changes_for_review(dir.path()).expect("diff");
        assert!(diff.is_empty());
    }

    #[test]
    fn test_unstaged_change_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        init_repo_with_commit(dir.path());
        std::fs::write(dir.path().join("a.txt"), "one\ntwo\n").expect("write");

        let diff = changes_for_review(dir.path()).expect("diff");
        assert!(diff.contains("a.txt"));
        assert!(diff.contains("+two"));
    }

    #[test]
    fn test_staged_change_with_clean_worktree_uses_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        init_repo_with_commit(dir.path());

        // Stage an edit, then restore the working tree to HEAD content:
        // `diff HEAD` is empty, only `diff --staged` sees the change.
        std::fs::write(dir.path().join("a.txt"), "one\nstaged\n").expect("write");
        git(dir.path(), &["add", "a.txt"]);
        std::fs::write(dir.path().join("a.txt"), "one\n").expect("write");

        let diff = changes_for_review(dir.path()).expect("diff");
        assert!(diff.contains("+staged"));
    }

    #[test]
    fn test_not_a_repository_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = changes_for_review(dir.path()).expect_err("should fail outside a repo");
        assert!(matches!(err, ConsultError::Git { .. }));
    }
}
