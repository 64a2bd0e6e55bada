mod commands;

use clap::{Parser, Subcommand};
use commands::affected::ChangeRange;
use pkg_rail::core::context::WorkspaceContext;
use pkg_rail::core::error::{RailError, print_error};
use std::path::PathBuf;

/// Package graph and affected-package analysis for JavaScript/TypeScript monorepos
#[derive(Parser)]
#[command(name = "pkg-rail")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Workspace root (default: current directory)
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Inspection
  // ============================================================================
  /// List workspace packages and their local dependencies
  List {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show local dependencies of a package
  Deps {
    /// Package name (from package.json)
    name: String,
    /// Follow dependencies transitively
    #[arg(long)]
    transitive: bool,
    /// Dependency kinds to follow: all, published, prod, dev, optional (default: all)
    #[arg(long)]
    kind: Option<String>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show packages that depend on a package
  Dependents {
    /// Package name (from package.json)
    name: String,
    /// Follow dependents transitively
    #[arg(long)]
    transitive: bool,
    /// Dependency kinds to follow: all, published, prod, dev, optional (default: all)
    #[arg(long)]
    kind: Option<String>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Export the package graph in Graphviz DOT format
  Dot,

  // ============================================================================
  // Change Analysis
  // ============================================================================
  /// Show which packages contain changed files
  Changed {
    /// Git ref to compare the working tree against (default: [affected] since, or origin/main)
    #[arg(long)]
    since: Option<String>,
    /// Start ref (for SHA pair mode)
    #[arg(long, conflicts_with = "since")]
    from: Option<String>,
    /// End ref (for SHA pair mode, default: HEAD)
    #[arg(long, requires = "from")]
    to: Option<String>,
    /// Output format: text (default), json, names
    #[arg(long, default_value = "text")]
    format: String,
  },

  /// Show which packages are affected by changes (changed + transitive dependents)
  Affected {
    /// Git ref to compare the working tree against (default: [affected] since, or origin/main)
    #[arg(long)]
    since: Option<String>,
    /// Start ref (for SHA pair mode)
    #[arg(long, conflicts_with = "since")]
    from: Option<String>,
    /// End ref (for SHA pair mode, default: HEAD)
    #[arg(long, requires = "from")]
    to: Option<String>,
    /// Output format: text (default), json, names
    #[arg(long, default_value = "text")]
    format: String,
    /// Dependency kinds that propagate changes (default: [affected] kind, or all)
    #[arg(long)]
    kind: Option<String>,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  // Diagnostics go to stderr so stdout stays machine-readable
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_env("PKG_RAIL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();

  let cli = Cli::parse();

  let workspace_root = match cli.root {
    Some(root) => root,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(RailError::message(format!("Failed to get current directory: {}", e))),
    },
  };

  // Build workspace context once (config, discovery, graph)
  let ctx = match WorkspaceContext::build(&workspace_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::List { json } => commands::run_list(&ctx, json),
    Commands::Deps {
      name,
      transitive,
      kind,
      json,
    } => commands::run_deps(&ctx, name, transitive, kind, json),
    Commands::Dependents {
      name,
      transitive,
      kind,
      json,
    } => commands::run_dependents(&ctx, name, transitive, kind, json),
    Commands::Dot => commands::run_dot(&ctx),
    Commands::Changed { since, from, to, format } => {
      commands::run_changed(&ctx, ChangeRange { since, from, to }, format)
    }
    Commands::Affected {
      since,
      from,
      to,
      format,
      kind,
    } => commands::run_affected(&ctx, ChangeRange { since, from, to }, format, kind),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: RailError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
