//! Package descriptor - the data shape discovery hands to the graph builder
//!
//! A descriptor is a flat snapshot of one manifest: its name, where it lives, and the
//! names it depends on. Version specs are carried along but never interpreted.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One package of the workspace, as read from its manifest.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageDescriptor {
  /// Package name (unique within a workspace)
  pub name: String,
  /// Absolute package directory
  pub dir: PathBuf,
  /// Declared version, if any
  pub version: Option<String>,
  /// `dependencies`: name → version spec
  pub dependencies: BTreeMap<String, String>,
  /// `devDependencies`: name → version spec
  pub dev_dependencies: BTreeMap<String, String>,
  /// `optionalDependencies`: name → version spec
  pub optional_dependencies: BTreeMap<String, String>,
  /// Raw manifest payload, opaque to the graph
  #[serde(skip)]
  pub metadata: serde_json::Value,
}

impl PackageDescriptor {
  pub fn new(name: impl Into<String>, dir: impl AsRef<Path>) -> Self {
    Self {
      name: name.into(),
      dir: dir.as_ref().to_path_buf(),
      ..Self::default()
    }
  }

  pub fn with_dependency(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
    self.dependencies.insert(name.into(), spec.into());
    self
  }

  pub fn with_dev_dependency(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
    self.dev_dependencies.insert(name.into(), spec.into());
    self
  }

  pub fn with_optional_dependency(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
    self.optional_dependencies.insert(name.into(), spec.into());
    self
  }
}
