use crate::core::error::{ConfigError, RailError, RailResult, ResultExt};
use crate::graph::DependencyView;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for pkg-rail
/// Searched in order: pkg-rail.toml, .pkg-rail.toml, .config/pkg-rail.toml
///
/// Every section is optional; a workspace without a config file gets the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RailConfig {
  #[serde(default)]
  pub discovery: DiscoveryConfig,
  #[serde(default)]
  pub affected: AffectedConfig,
}

/// Where workspace packages live
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryConfig {
  /// Workspace globs, overriding pnpm-workspace.yaml / package.json "workspaces".
  /// `!`-prefixed entries exclude.
  #[serde(default)]
  pub patterns: Vec<String>,
}

/// Defaults for `pkg-rail affected` / `pkg-rail changed`
///
/// # Example
///
/// ```toml
/// [affected]
/// since = "origin/main"
/// kind = "published"  # dev-only dependents are not affected
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AffectedConfig {
  /// Git ref to compare against when --since is not given
  #[serde(default = "default_since")]
  pub since: String,

  /// Dependency edges that propagate a change to dependents
  #[serde(default)]
  pub kind: DependencyView,
}

fn default_since() -> String {
  "origin/main".to_string()
}

impl Default for AffectedConfig {
  fn default() -> Self {
    Self {
      since: default_since(),
      kind: DependencyView::default(),
    }
  }
}

impl AffectedConfig {
  pub fn validate(&self) -> RailResult<()> {
    if self.since.trim().is_empty() {
      return Err(RailError::Config(ConfigError::InvalidValue {
        field: "affected.since".to_string(),
        value: self.since.clone(),
        expected: "a git ref such as origin/main".to_string(),
      }));
    }
    Ok(())
  }
}

impl RailConfig {
  /// Find config file in search order: pkg-rail.toml, .pkg-rail.toml, .config/pkg-rail.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("pkg-rail.toml"),
      path.join(".pkg-rail.toml"),
      path.join(".config").join("pkg-rail.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no config file exists
  pub fn load(path: &Path) -> RailResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      tracing::debug!(root = %path.display(), "no pkg-rail.toml found, using defaults");
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: RailConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .affected
      .validate()
      .with_context(|| format!("Invalid [affected] configuration in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
  }
}
