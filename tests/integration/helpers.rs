//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throw-away Node workspace with git history
pub struct NodeWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl NodeWorkspace {
  /// npm/yarn style workspace: root package.json with a "workspaces" array
  pub fn new_npm() -> Result<Self> {
    let ws = Self::init()?;
    ws.write_file(
      "package.json",
      r#"{
  "name": "test-monorepo",
  "private": true,
  "workspaces": ["packages/*", "apps/*"]
}
"#,
    )?;
    ws.commit("Initial workspace setup")?;
    Ok(ws)
  }

  /// pnpm workspace: pnpm-workspace.yaml next to a plain root package.json
  pub fn new_pnpm() -> Result<Self> {
    let ws = Self::init()?;
    ws.write_file("package.json", "{ \"name\": \"test-monorepo\", \"private\": true }\n")?;
    ws.write_file("pnpm-workspace.yaml", "packages:\n  - \"packages/*\"\n  - \"apps/*\"\n")?;
    ws.commit("Initial workspace setup")?;
    Ok(ws)
  }

  fn init() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    Ok(Self { _root: root, path })
  }

  /// Add a package under `dir` (relative to the workspace root)
  ///
  /// `deps` are `(name, section)` pairs where section is `dependencies`, `devDependencies`
  /// or `optionalDependencies`.
  pub fn add_package(&self, name: &str, dir: &str, deps: &[(&str, &str)]) -> Result<PathBuf> {
    let package_path = self.path.join(dir);
    std::fs::create_dir_all(package_path.join("src"))?;

    let mut manifest = serde_json::json!({
      "name": name,
      "version": "1.0.0",
    });
    for (dep_name, section) in deps {
      if manifest.get(*section).is_none() {
        manifest[*section] = serde_json::json!({});
      }
      manifest[*section][*dep_name] = serde_json::json!("workspace:*");
    }

    std::fs::write(
      package_path.join("package.json"),
      serde_json::to_string_pretty(&manifest)?,
    )?;
    std::fs::write(
      package_path.join("src/index.ts"),
      format!("export const name = \"{}\";\n", name),
    )?;

    Ok(package_path)
  }

  /// Write a file relative to the workspace root, creating parent directories
  pub fn write_file(&self, rel: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(rel);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Mark the current HEAD as the comparison base (`base` branch)
  pub fn mark_base(&self) -> Result<()> {
    git(&self.path, &["branch", "base"])?;
    Ok(())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the pkg-rail CLI, failing on a non-zero exit
pub fn run_pkg_rail(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_pkg_rail_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "pkg-rail command failed: pkg-rail {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the pkg-rail CLI and return its output whatever the exit status
pub fn run_pkg_rail_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_pkg-rail"))
    .current_dir(cwd)
    .env_remove("PKG_RAIL_LOG")
    .args(args)
    .output()
    .context("Failed to run pkg-rail")
}

/// Parse stdout as JSON
pub fn stdout_json(output: &Output) -> Result<serde_json::Value> {
  serde_json::from_slice(&output.stdout).context("stdout is not valid JSON")
}

/// stdout split into non-empty lines
pub fn stdout_lines(output: &Output) -> Vec<String> {
  String::from_utf8_lossy(&output.stdout)
    .lines()
    .filter(|line| !line.trim().is_empty())
    .map(String::from)
    .collect()
}
