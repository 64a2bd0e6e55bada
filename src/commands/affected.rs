//! `pkg-rail changed` / `pkg-rail affected` - Show which packages are touched by changes
//!
//! Both commands ask git for the changed files and map them onto workspace packages:
//! - `changed` stops at the packages that directly contain changed files
//! - `affected` also walks every package that transitively depends on those packages

use super::{display_dir, resolve_view};
use pkg_rail::core::context::WorkspaceContext;
use pkg_rail::core::error::{RailError, RailResult};
use pkg_rail::core::vcs::SystemGit;
use pkg_rail::graph::{AffectedAnalysis, affected};
use serde_json::json;

/// Output format for changed/affected commands
#[derive(Debug, Clone, Copy)]
enum OutputFormat {
  Text,
  Json,
  NamesOnly,
}

impl OutputFormat {
  fn from_str(s: &str) -> RailResult<Self> {
    match s.to_lowercase().as_str() {
      "text" => Ok(Self::Text),
      "json" => Ok(Self::Json),
      "names" | "names-only" => Ok(Self::NamesOnly),
      _ => Err(RailError::with_help(
        format!("Unknown format '{}'", s),
        "Valid formats: text, json, names",
      )),
    }
  }
}

/// Git range the changed files are taken from
#[derive(Debug, Clone, Default)]
pub struct ChangeRange {
  pub since: Option<String>,
  pub from: Option<String>,
  pub to: Option<String>,
}

/// Run the changed command
pub fn run_changed(ctx: &WorkspaceContext, range: ChangeRange, format: String) -> RailResult<()> {
  let output_format = OutputFormat::from_str(&format)?;
  let changed_files = get_changed_files(ctx, &range)?;

  let packages = ctx.graph.changed_packages(ctx.workspace_root(), changed_files.as_slice());

  match output_format {
    OutputFormat::Text => {
      println!("Changed files: {}", changed_files.len());
      println!("Changed packages: {}", packages.len());
      for node in &packages {
        println!("  📦 {} ({})", node.name, display_dir(ctx, &node.dir));
      }
    }
    OutputFormat::Json => {
      let packages: Vec<_> = packages
        .iter()
        .map(|node| json!({ "name": node.name, "dir": display_dir(ctx, &node.dir) }))
        .collect();
      let output = json!({
        "changed_files": changed_files,
        "packages": packages,
      });
      println!("{}", serde_json::to_string_pretty(&output)?);
    }
    OutputFormat::NamesOnly => {
      for node in &packages {
        println!("{}", node.name);
      }
    }
  }

  Ok(())
}

/// Run the affected command
pub fn run_affected(
  ctx: &WorkspaceContext,
  range: ChangeRange,
  format: String,
  kind: Option<String>,
) -> RailResult<()> {
  let output_format = OutputFormat::from_str(&format)?;
  let view = resolve_view(ctx, kind.as_deref())?;

  let changed_files = get_changed_files(ctx, &range)?;
  let analysis = affected::analyze(&ctx.graph, ctx.workspace_root(), changed_files.as_slice(), view)?;

  match output_format {
    OutputFormat::Text => display_text(&analysis),
    OutputFormat::Json => display_json(&analysis)?,
    OutputFormat::NamesOnly => {
      for name in &analysis.impact.targets {
        println!("{}", name);
      }
    }
  }

  Ok(())
}

/// Get changed files from git
///
/// `--from`/`--to` compare two commits; otherwise the working tree is compared with
/// `--since`, or `[affected] since` from config.
fn get_changed_files(ctx: &WorkspaceContext, range: &ChangeRange) -> RailResult<Vec<String>> {
  let git = SystemGit::open(ctx.workspace_root())?;

  match (&range.from, &range.to) {
    (Some(from), Some(to)) => git.changed_files(from, Some(to)),
    (Some(from), None) => git.changed_files(from, Some("HEAD")),
    _ => {
      let since = range.since.as_deref().unwrap_or(&ctx.config.affected.since);
      git.changed_files(since, None)
    }
  }
}

/// Display results in human-readable text format
fn display_text(analysis: &AffectedAnalysis) {
  println!("Affected Analysis ({} dependencies)", analysis.view);
  println!("=================");
  println!();

  println!("Changed files: {}", analysis.changed_files.len());
  if !analysis.changed_files.is_empty() && analysis.changed_files.len() <= 20 {
    for file in &analysis.changed_files {
      println!("  {}", file);
    }
    println!();
  }

  println!("Direct impact: {} packages", analysis.impact.direct.len());
  for name in &analysis.impact.direct {
    println!("  📦 {}", name);
  }
  println!();

  println!("Transitive dependents: {} packages", analysis.impact.dependents.len());
  for name in &analysis.impact.dependents {
    println!("  ⬆  {}", name);
  }
  println!();

  println!("Targets (direct + dependents): {} packages", analysis.impact.total_affected());
  for name in &analysis.impact.targets {
    println!("  🎯 {}", name);
  }
}

/// Display results in JSON format
fn display_json(analysis: &AffectedAnalysis) -> RailResult<()> {
  let output = json!({
    "changed_files": analysis.changed_files,
    "view": analysis.view.to_string(),
    "impact": analysis.impact,
    "summary": {
      "changed_files_count": analysis.changed_files.len(),
      "direct_count": analysis.impact.direct.len(),
      "dependents_count": analysis.impact.dependents.len(),
      "targets_count": analysis.impact.total_affected(),
    }
  });

  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}
