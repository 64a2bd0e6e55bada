//! Unified workspace context - build once, pass everywhere
//!
//! # Design
//!
//! WorkspaceContext loads config, discovers packages and builds the package graph once in
//! main.rs, then passes by reference to all commands.
//!
//! ```text
//! main.rs:
//!   WorkspaceContext::build() -> &WorkspaceContext
//!   |
//!   v
//! commands/affected.rs, deps.rs, etc:
//!   fn run_*(ctx: &WorkspaceContext, ...)
//! ```

use crate::core::config::RailConfig;
use crate::core::error::{RailResult, ResultExt};
use crate::graph::PackageGraph;
use crate::workspace::{self, PackageManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Unified workspace context containing all shared workspace-level data.
///
/// Uses Arc for sharing graph data without clones.
#[derive(Clone)]
pub struct WorkspaceContext {
  /// Workspace root directory (absolute path)
  pub root: PathBuf,

  /// Package graph (built from discovered manifests)
  pub graph: Arc<PackageGraph>,

  /// pkg-rail configuration (defaults when no pkg-rail.toml exists)
  pub config: Arc<RailConfig>,

  /// Package manager detected at the root, if any
  pub package_manager: Option<PackageManager>,
}

impl WorkspaceContext {
  /// Build workspace context from a root directory.
  ///
  /// Loads config, discovers packages and builds the graph. Fails on duplicate package
  /// names, since nothing downstream can work with an ambiguous graph.
  pub fn build(workspace_root: &Path) -> RailResult<Self> {
    let root = workspace_root
      .canonicalize()
      .with_context(|| format!("Workspace root {} does not exist", workspace_root.display()))?;

    let config = RailConfig::load(&root)?;
    let descriptors = workspace::discover(&root, &config.discovery)?;
    let graph = PackageGraph::build(descriptors)?;
    let package_manager = workspace::detect_package_manager(&root);

    tracing::debug!(
      root = %root.display(),
      packages = graph.len(),
      package_manager = package_manager.map(PackageManager::as_str),
      "workspace context ready"
    );

    Ok(Self {
      root,
      graph: Arc::new(graph),
      config: Arc::new(config),
      package_manager,
    })
  }

  /// Get workspace root as Path reference (convenience)
  pub fn workspace_root(&self) -> &Path {
    &self.root
  }
}
