//! Node.js/TypeScript workspace discovery
//!
//! Supports all modern package managers:
//! - npm workspaces (package.json with "workspaces")
//! - pnpm workspaces (pnpm-workspace.yaml)
//! - yarn workspaces (package.json with "workspaces", array or `{ packages }` form)
//! - bun workspaces (package.json with "workspaces")
//!
//! Discovery produces one `PackageDescriptor` per member manifest. Duplicate names are not
//! checked here; the graph builder rejects them with both directories.

use super::PackageDescriptor;
use crate::core::config::DiscoveryConfig;
use crate::core::error::{RailError, RailResult, ResultExt, ValidationError};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

const MANIFEST: &str = "package.json";

/// Package manager in use at the workspace root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
  Npm,
  Pnpm,
  Yarn,
  Bun,
}

impl PackageManager {
  pub fn as_str(self) -> &'static str {
    match self {
      PackageManager::Npm => "npm",
      PackageManager::Pnpm => "pnpm",
      PackageManager::Yarn => "yarn",
      PackageManager::Bun => "bun",
    }
  }
}

/// package.json structure (minimal fields we care about)
#[derive(Debug, Deserialize)]
struct PackageJson {
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  version: Option<String>,
  #[serde(default)]
  workspaces: Option<WorkspaceSpec>,
  #[serde(default)]
  dependencies: BTreeMap<String, String>,
  #[serde(default, rename = "devDependencies")]
  dev_dependencies: BTreeMap<String, String>,
  #[serde(default, rename = "optionalDependencies")]
  optional_dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkspaceSpec {
  Array(Vec<String>),
  Object {
    #[serde(default)]
    packages: Vec<String>,
  },
}

impl WorkspaceSpec {
  fn patterns(&self) -> &[String] {
    match self {
      WorkspaceSpec::Array(patterns) => patterns,
      WorkspaceSpec::Object { packages } => packages,
    }
  }
}

/// pnpm-workspace.yaml structure
#[derive(Debug, Deserialize)]
struct PnpmWorkspace {
  #[serde(default)]
  packages: Vec<String>,
}

/// Detect which package manager is being used
///
/// Lockfiles win over workspace config files; a bare package.json with workspaces is npm.
pub fn detect_package_manager(root: &Path) -> Option<PackageManager> {
  if root.join("bun.lockb").exists() || root.join("bun.lock").exists() {
    return Some(PackageManager::Bun);
  }
  if root.join("pnpm-lock.yaml").exists() || root.join("pnpm-workspace.yaml").exists() {
    return Some(PackageManager::Pnpm);
  }
  if root.join("yarn.lock").exists() {
    return Some(PackageManager::Yarn);
  }
  if root.join("package-lock.json").exists() || root.join(MANIFEST).exists() {
    return Some(PackageManager::Npm);
  }
  None
}

/// Discover all workspace packages under `root`.
pub fn discover(root: &Path, config: &DiscoveryConfig) -> RailResult<Vec<PackageDescriptor>> {
  let patterns = workspace_patterns(root, config)?;
  tracing::debug!(?patterns, "workspace patterns");

  let dirs = expand_patterns(root, &patterns)?;

  let mut packages = dirs
    .par_iter()
    .map(|dir| load_package(dir))
    .collect::<RailResult<Vec<_>>>()?;

  packages.sort_by(|a, b| a.dir.cmp(&b.dir));

  tracing::info!(
    root = %root.display(),
    packages = packages.len(),
    "discovered workspace packages"
  );

  Ok(packages)
}

/// Workspace patterns from config, pnpm-workspace.yaml, or package.json (in that order).
pub fn workspace_patterns(root: &Path, config: &DiscoveryConfig) -> RailResult<Vec<String>> {
  if !config.patterns.is_empty() {
    return Ok(config.patterns.clone());
  }

  let pnpm_workspace = root.join("pnpm-workspace.yaml");
  if pnpm_workspace.exists() {
    let content = std::fs::read_to_string(&pnpm_workspace)?;
    let workspace: PnpmWorkspace =
      serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", pnpm_workspace.display()))?;
    if !workspace.packages.is_empty() {
      return Ok(workspace.packages);
    }
  }

  let package_json = root.join(MANIFEST);
  if package_json.exists() {
    let content = std::fs::read_to_string(&package_json)?;
    let pkg: PackageJson =
      serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", package_json.display()))?;
    if let Some(workspaces) = pkg.workspaces {
      return Ok(workspaces.patterns().to_vec());
    }
  }

  Err(RailError::Validation(ValidationError::WorkspaceInvalid {
    reason: format!(
      "No workspace configuration found in {} - expected pnpm-workspace.yaml or package.json with 'workspaces' field",
      root.display()
    ),
  }))
}

/// Expand workspace globs into package directories.
///
/// `!`-prefixed patterns exclude. Only directories holding a package.json count, and
/// anything inside `node_modules` is skipped.
pub fn expand_patterns(root: &Path, patterns: &[String]) -> RailResult<Vec<PathBuf>> {
  let mut excludes = Vec::new();
  let mut includes = Vec::new();
  for pattern in patterns {
    match pattern.strip_prefix('!') {
      Some(excluded) => excludes.push(glob::Pattern::new(clean_pattern(excluded))?),
      None => includes.push(clean_pattern(pattern)),
    }
  }

  let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
  let mut dirs = BTreeSet::new();

  for pattern in includes {
    let full = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern);
    for entry in glob::glob(&full)? {
      let dir = entry?;
      if !dir.is_dir() || !dir.join(MANIFEST).is_file() {
        continue;
      }

      let Ok(rel) = dir.strip_prefix(root) else {
        continue;
      };
      if rel.components().any(|c| c.as_os_str() == "node_modules") {
        continue;
      }
      if excludes.iter().any(|exclude| exclude.matches_path(rel)) {
        tracing::debug!(dir = %rel.display(), "excluded by workspace pattern");
        continue;
      }

      dirs.insert(dir);
    }
  }

  Ok(dirs.into_iter().collect())
}

fn clean_pattern(pattern: &str) -> &str {
  let pattern = pattern.trim();
  let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
  pattern.trim_end_matches('/')
}

/// Load a single package from a directory
pub fn load_package(dir: &Path) -> RailResult<PackageDescriptor> {
  let manifest_path = dir.join(MANIFEST);
  let content = std::fs::read_to_string(&manifest_path)
    .with_context(|| format!("Failed to read {}", manifest_path.display()))?;

  let metadata: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
    RailError::Validation(ValidationError::ManifestInvalid {
      path: manifest_path.clone(),
      reason: e.to_string(),
    })
  })?;
  let pkg: PackageJson = serde_json::from_value(metadata.clone()).map_err(|e| {
    RailError::Validation(ValidationError::ManifestInvalid {
      path: manifest_path.clone(),
      reason: e.to_string(),
    })
  })?;

  let name = pkg.name.filter(|name| !name.is_empty()).ok_or_else(|| {
    RailError::Validation(ValidationError::ManifestInvalid {
      path: manifest_path.clone(),
      reason: "missing \"name\" field".to_string(),
    })
  })?;

  Ok(PackageDescriptor {
    name,
    dir: dir.to_path_buf(),
    version: pkg.version,
    dependencies: pkg.dependencies,
    dev_dependencies: pkg.dev_dependencies,
    optional_dependencies: pkg.optional_dependencies,
    metadata,
  })
}
