mod commands;

use changelog_rail::core::context::ChangelogContext;
use changelog_rail::core::error::{ChangelogError, ChangelogResult, print_error};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Keep a Markdown changelog in sync with registry, tag and release-host truth
#[derive(Parser)]
#[command(name = "changelog-rail")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Changelog file (default: project.changelog from the config, or CHANGELOG.md)
  #[arg(long, global = true)]
  changelog: Option<PathBuf>,

  /// Config file (default: search changelog.toml, .changelog.toml, .config/changelog.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  /// Emit logs as JSON lines on stderr
  #[arg(long, global = true)]
  log_json: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Release lifecycle
  // ============================================================================
  /// Open an unreleased section for the next version
  Draft {
    /// Version just released (default: project.current_version)
    #[arg(long)]
    version: Option<String>,
    /// Development branch the draft compares against (default: project.default_branch)
    #[arg(long)]
    branch: Option<String>,
  },

  /// Turn the unreleased section into a dated release
  Freeze {
    /// Version being released (default: project.current_version)
    #[arg(long)]
    version: Option<String>,
    /// Release date, YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<String>,
    /// Branch the draft compared against (default: project.default_branch)
    #[arg(long)]
    branch: Option<String>,
  },

  // ============================================================================
  // Inspection
  // ============================================================================
  /// Show the structure of one version section
  Show {
    /// Version to show
    version: String,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// List all released versions with their dates
  Releases {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Repair
  // ============================================================================
  /// Insert a section for a release the changelog is missing
  Insert {
    /// Version to insert
    version: String,
    /// Release date, YYYY-MM-DD
    #[arg(long)]
    date: String,
  },

  /// Check the changelog against external release records
  Lint {
    /// Repair dates, missing sections and notices in place
    #[arg(long)]
    fix: bool,
    /// Registry lookup table (JSON object keyed by version)
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Release host lookup table (JSON object keyed by version)
    #[arg(long)]
    host: Option<PathBuf>,
    /// Tag lookup table (JSON object keyed by version)
    #[arg(long)]
    tags: Option<PathBuf>,
    /// Version in development, never reported as missing (default: project.current_version)
    #[arg(long)]
    current_version: Option<String>,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
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
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: u8, json: bool) {
  // RUST_LOG wins; otherwise stay quiet unless asked
  let base_filter = match std::env::var("RUST_LOG") {
    Ok(filter) => filter,
    Err(_) => match verbose {
      0 => "warn".to_string(),
      1 => "warn,changelog_rail=info".to_string(),
      2 => "info,changelog_rail=debug".to_string(),
      _ => "debug,changelog_rail=trace".to_string(),
    },
  };

  let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

  if json {
    tracing_subscriber::registry()
      .with(filter)
      .with(fmt::layer().json().with_writer(std::io::stderr))
      .init();
  } else {
    tracing_subscriber::registry()
      .with(filter)
      .with(
        fmt::layer()
          .with_target(verbose >= 2)
          .with_file(verbose >= 3)
          .with_line_number(verbose >= 3)
          .with_writer(std::io::stderr)
          .compact(),
      )
      .init();
  }
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose, cli.log_json);

  let cwd = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(ChangelogError::Io(e).context("Failed to get current directory")),
  };

  let ctx = match ChangelogContext::build(&cwd, cli.config.as_deref(), cli.changelog.as_deref()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  if let Err(err) = run(&ctx, cli.command) {
    handle_error(err);
  }
}

fn run(ctx: &ChangelogContext, command: Commands) -> ChangelogResult<()> {
  match command {
    // Release lifecycle
    Commands::Draft { version, branch } => commands::run_draft(ctx, version, branch),
    Commands::Freeze { version, date, branch } => commands::run_freeze(ctx, version, date, branch),

    // Inspection
    Commands::Show { version, json } => commands::run_show(ctx, &version, json),
    Commands::Releases { json } => commands::run_releases(ctx, json),

    // Repair
    Commands::Insert { version, date } => commands::run_insert(ctx, &version, &date),
    Commands::Lint {
      fix,
      registry,
      host,
      tags,
      current_version,
      json,
    } => commands::run_lint(
      ctx,
      commands::LintArgs {
        fix,
        registry,
        host,
        tags,
        current_version,
        json,
      },
    ),
  }
}

fn handle_error(err: ChangelogError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
