//! Changed-package detection
//!
//! Maps a list of changed files to the packages that own them with one merge pass over
//! two sorted lists (file paths, package directory prefixes) instead of testing every file
//! against every package.

use super::package_graph::{GraphNode, PackageGraph};
use crate::utils::path_to_git_format;
use std::path::Path;

/// Directory prefix of `node` relative to `root`, forward slashes, trailing `/`.
///
/// The trailing separator keeps `pkg-a/` from claiming files of `pkg-ab/`.
/// Packages at or outside `root` have no prefix.
pub fn package_prefix(root: &Path, node: &GraphNode) -> Option<String> {
  let rel = node.dir.strip_prefix(root).ok()?;
  let rel = path_to_git_format(rel);
  let rel = rel.trim_matches('/');
  if rel.is_empty() {
    return None;
  }
  Some(format!("{}/", rel))
}

impl PackageGraph {
  /// Packages owning at least one of `changed_files`.
  ///
  /// `changed_files` are relative to `root` with forward slashes, in any order. The result
  /// follows sorted directory-prefix order. A file under nested packages (`pkg/` and
  /// `pkg/sub/`) marks every enclosing package as changed.
  ///
  /// # Performance
  /// O(F log F + P log P) for the sorts, then a single O(F + P) merge.
  pub fn changed_packages(&self, root: &Path, changed_files: &[impl AsRef<str>]) -> Vec<&GraphNode> {
    if changed_files.is_empty() {
      return Vec::new();
    }

    let mut files: Vec<&str> = changed_files.iter().map(|file| file.as_ref()).collect();
    files.sort_unstable();

    let mut prefixes: Vec<(String, &GraphNode)> = self
      .nodes()
      .filter_map(|node| package_prefix(root, node).map(|prefix| (prefix, node)))
      .collect();
    prefixes.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name.cmp(&b.1.name)));

    let mut changed = Vec::new();
    let mut cursor = 0;

    for (prefix, node) in &prefixes {
      // Files below this prefix sort before every later prefix too
      while cursor < files.len() && files[cursor] < prefix.as_str() {
        cursor += 1;
      }
      if cursor == files.len() {
        break;
      }
      // Not consumed: a nested package further down may own the same files
      if files[cursor].starts_with(prefix.as_str()) {
        changed.push(*node);
      }
    }

    tracing::debug!(
      files = files.len(),
      packages = prefixes.len(),
      changed = changed.len(),
      "matched changed files to packages"
    );

    changed
  }
}
