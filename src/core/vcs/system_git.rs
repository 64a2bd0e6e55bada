//! System git backend
//!
//! Uses git plumbing/porcelain commands through `std::process::Command` in an isolated
//! environment. All paths it returns are relative to the directory the repository was
//! opened from (the workspace root) and use forward slashes. File lists are read with `-z`
//! so names containing quotes, backslashes or newlines come back verbatim.

use crate::core::error::{GitError, RailError, RailResult, ResultExt};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Directory git commands run in (workspace root)
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to check `path` is inside a work tree.
  pub fn open(path: &Path) -> RailResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(RailError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(RailError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    tracing::debug!(work_tree = stdout.trim(), "opened git repository");

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Files changed between `since` and `to`, or between `since` and the working tree.
  ///
  /// Renames are reported as a deletion plus an addition so both the old and the new
  /// location count as changed. Without `to`, uncommitted tracked changes and untracked
  /// (non-ignored) files are included as well. The result is sorted and deduplicated.
  pub fn changed_files(&self, since: &str, to: Option<&str>) -> RailResult<Vec<String>> {
    let mut args = vec!["diff", "--name-only", "-z", "--relative", "--no-renames", since];
    if let Some(to) = to {
      args.push(to);
    }

    let mut files: BTreeSet<String> = parse_name_list(&self.run(&args)?).collect();

    if to.is_none() {
      files.extend(self.untracked_files()?);
    }

    tracing::debug!(since, ?to, files = files.len(), "listed changed files");
    Ok(files.into_iter().collect())
  }

  /// Untracked files that are not ignored
  pub fn untracked_files(&self) -> RailResult<Vec<String>> {
    let stdout = self.run(&["ls-files", "-z", "--others", "--exclude-standard"])?;
    Ok(parse_name_list(&stdout).collect())
  }

  fn run(&self, args: &[&str]) -> RailResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(RailError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(String::from_utf8(output.stdout)?)
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

/// Split NUL-terminated `-z` output into paths
fn parse_name_list(stdout: &str) -> impl Iterator<Item = String> + '_ {
  stdout.split('\0').filter(|path| !path.is_empty()).map(str::to_string)
}
