//! Affected package analysis
//!
//! Given a set of changed files, determine:
//! - Which packages directly contain those files
//! - Which packages transitively depend on the changed packages
//! - The combined set that needs rebuilding/testing

use super::package_graph::{DependencyView, PackageGraph};
use crate::core::error::RailResult;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Set of affected packages from file changes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AffectedSet {
  /// Packages directly containing changed files (sorted directory order)
  pub direct: Vec<String>,

  /// Transitive dependents of changed packages, excluding `direct`
  pub dependents: BTreeSet<String>,

  /// direct + dependents
  pub targets: BTreeSet<String>,
}

impl AffectedSet {
  pub fn is_empty(&self) -> bool {
    self.direct.is_empty()
  }

  pub fn total_affected(&self) -> usize {
    self.targets.len()
  }
}

/// Complete affected analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AffectedAnalysis {
  /// Files that changed
  pub changed_files: Vec<String>,

  /// Edge kinds followed when propagating to dependents
  #[serde(serialize_with = "serialize_view")]
  pub view: DependencyView,

  /// Impact set
  pub impact: AffectedSet,
}

fn serialize_view<S: serde::Serializer>(view: &DependencyView, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.collect_str(view)
}

/// Analyze which packages are affected by file changes.
///
/// Algorithm:
/// 1. Map files → owning packages (single sorted merge pass)
/// 2. Walk dependents of those packages through `view` edges with `collect_names`
/// 3. Split the result into direct and transitive
pub fn analyze(
  graph: &PackageGraph,
  root: &Path,
  changed_files: &[impl AsRef<str>],
  view: DependencyView,
) -> RailResult<AffectedAnalysis> {
  let changed_files: Vec<String> = changed_files.iter().map(|f| f.as_ref().to_string()).collect();

  let direct: Vec<String> = graph
    .changed_packages(root, changed_files.as_slice())
    .into_iter()
    .map(|node| node.name.clone())
    .collect();

  if direct.is_empty() {
    // No workspace packages affected (e.g., root README, CI config)
    return Ok(AffectedAnalysis {
      changed_files,
      view,
      impact: AffectedSet::default(),
    });
  }

  let targets = graph.collect_names(direct.iter().map(String::as_str), |node| {
    Some(graph.direct_dependents(&node.name, view))
  })?;

  let dependents: BTreeSet<String> = targets
    .iter()
    .filter(|name| !direct.contains(*name))
    .cloned()
    .collect();

  tracing::info!(
    changed_files = changed_files.len(),
    direct = direct.len(),
    targets = targets.len(),
    "affected analysis complete"
  );

  Ok(AffectedAnalysis {
    changed_files,
    view,
    impact: AffectedSet {
      direct,
      dependents,
      targets,
    },
  })
}
