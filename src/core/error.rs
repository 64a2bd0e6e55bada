//! Error types for pkg-rail with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to users. Graph errors (duplicate package names, unknown
//! packages) are the only failures the graph core itself can produce; everything else
//! comes from the collaborators around it (discovery, git, config).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for pkg-rail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, unknown packages)
  User = 1,
  /// System error (git, I/O)
  System = 2,
  /// Validation failure (malformed workspace or manifests)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for pkg-rail
#[derive(Debug)]
pub enum RailError {
  /// Package graph errors
  Graph(GraphError),

  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Validation errors (workspace layout, manifests)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// A structured error with context added on the way up
  ///
  /// Keeps the inner error's exit code and help text.
  Context { context: String, source: Box<RailError> },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl RailError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    RailError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    RailError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      RailError::Message { message, context, help } => RailError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      RailError::Io(err) => RailError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      RailError::Context { context, source } => RailError::Context {
        context: format!("{}\n{}", ctx_str, context),
        source,
      },
      other => RailError::Context {
        context: ctx_str,
        source: Box::new(other),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      RailError::Graph(_) => ExitCode::User,
      RailError::Config(_) => ExitCode::User,
      RailError::Git(_) => ExitCode::System,
      RailError::Validation(_) => ExitCode::Validation,
      RailError::Io(_) => ExitCode::System,
      RailError::Context { source, .. } => source.exit_code(),
      RailError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      RailError::Graph(e) => e.help_message(),
      RailError::Config(e) => e.help_message(),
      RailError::Git(e) => e.help_message(),
      RailError::Validation(e) => e.help_message(),
      RailError::Context { source, .. } => source.help_message(),
      RailError::Message { help, .. } => help.clone(),
      RailError::Io(_) => None,
    }
  }
}

impl fmt::Display for RailError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RailError::Graph(e) => write!(f, "{}", e),
      RailError::Config(e) => write!(f, "{}", e),
      RailError::Git(e) => write!(f, "{}", e),
      RailError::Validation(e) => write!(f, "{}", e),
      RailError::Io(e) => write!(f, "I/O error: {}", e),
      RailError::Context { context, source } => write!(f, "{}\n{}", source, context),
      RailError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for RailError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      RailError::Io(e) => Some(e),
      RailError::Context { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<GraphError> for RailError {
  fn from(err: GraphError) -> Self {
    RailError::Graph(err)
  }
}

impl From<io::Error> for RailError {
  fn from(err: io::Error) -> Self {
    RailError::Io(err)
  }
}

impl From<String> for RailError {
  fn from(msg: String) -> Self {
    RailError::message(msg)
  }
}

impl From<&str> for RailError {
  fn from(msg: &str) -> Self {
    RailError::message(msg)
  }
}

impl From<toml_edit::de::Error> for RailError {
  fn from(err: toml_edit::de::Error) -> Self {
    RailError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for RailError {
  fn from(err: serde_json::Error) -> Self {
    RailError::message(format!("JSON error: {}", err))
  }
}

impl From<serde_yaml::Error> for RailError {
  fn from(err: serde_yaml::Error) -> Self {
    RailError::message(format!("YAML error: {}", err))
  }
}

impl From<glob::PatternError> for RailError {
  fn from(err: glob::PatternError) -> Self {
    RailError::message(format!("Invalid workspace pattern: {}", err))
  }
}

impl From<glob::GlobError> for RailError {
  fn from(err: glob::GlobError) -> Self {
    RailError::message(format!("Workspace pattern expansion error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for RailError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    RailError::message(format!("UTF-8 conversion error: {}", err))
  }
}


/// Package graph errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
  /// Two package descriptors share a name
  DuplicateName {
    name: String,
    first_dir: PathBuf,
    second_dir: PathBuf,
  },

  /// A name reached during traversal has no node in the graph
  PackageNotFound { name: String },
}

impl GraphError {
  fn help_message(&self) -> Option<String> {
    match self {
      GraphError::DuplicateName { .. } => {
        Some("Package names must be unique across the workspace. Rename one of the packages.".to_string())
      }
      GraphError::PackageNotFound { .. } => Some("Run `pkg-rail list` to see the packages in this workspace.".to_string()),
    }
  }
}

impl fmt::Display for GraphError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GraphError::DuplicateName {
        name,
        first_dir,
        second_dir,
      } => write!(
        f,
        "Two packages are named '{}':\n  {}\n  {}",
        name,
        first_dir.display(),
        second_dir.display()
      ),
      GraphError::PackageNotFound { name } => write!(f, "Package '{}' not found in the workspace", name),
    }
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Invalid value for a config field
  InvalidValue { field: String, value: String, expected: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidValue { expected, .. } => Some(format!("Expected one of: {}", expected)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidValue { field, value, .. } => {
        write!(f, "Invalid value '{}' for config field '{}'", value, field)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("unknown revision") || stderr.contains("bad revision") {
          Some("Check that the ref exists locally (e.g. `git fetch origin`) or pass a different --since.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Changed-file detection needs a git repository. Initialize one or check the path: {}",
        path.display()
      )),
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// Workspace validation failed
  WorkspaceInvalid { reason: String },

  /// A package manifest is malformed
  ManifestInvalid { path: PathBuf, reason: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::WorkspaceInvalid { .. } => Some(
        "Declare workspaces in package.json (\"workspaces\"), pnpm-workspace.yaml, or [discovery] patterns in pkg-rail.toml."
          .to_string(),
      ),
      ValidationError::ManifestInvalid { path, .. } => Some(format!("Fix the manifest at {}", path.display())),
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::WorkspaceInvalid { reason } => {
        write!(f, "Workspace validation failed: {}", reason)
      }
      ValidationError::ManifestInvalid { path, reason } => {
        write!(f, "Invalid manifest {}: {}", path.display(), reason)
      }
    }
  }
}

/// Result type alias for pkg-rail
pub type RailResult<T> = Result<T, RailError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> RailResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> RailResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<RailError>,
{
  fn context(self, ctx: impl Into<String>) -> RailResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> RailResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &RailError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
