//! Lint command implementation

use changelog_rail::changelog::parse_version;
use changelog_rail::core::context::ChangelogContext;
use changelog_rail::core::error::ChangelogResult;
use changelog_rail::reconcile::{LintIssue, LintOptions, LintReport, ReleaseSources, Severity, lint};
use std::path::PathBuf;

/// Arguments of the lint subcommand
pub struct LintArgs {
  pub fix: bool,
  pub registry: Option<PathBuf>,
  pub host: Option<PathBuf>,
  pub tags: Option<PathBuf>,
  pub current_version: Option<String>,
  pub json: bool,
}

/// Run the lint command
pub fn run_lint(ctx: &ChangelogContext, args: LintArgs) -> ChangelogResult<()> {
  let mut changelog = ctx.load_changelog()?;
  let project = ctx.project();

  let repo_url = ctx.repo_url(&changelog)?;
  let current_version = match args.current_version.as_deref() {
    Some(version) => Some(parse_version(version)?),
    None => project.current_version()?,
  };
  let options = LintOptions {
    package: ctx.package(&repo_url),
    repo_url,
    registry: project.registry,
    current_version,
  };

  let mut sources = ReleaseSources::default();
  if let Some(path) = &args.registry {
    sources.registry = ReleaseSources::load_table(path)?;
  }
  if let Some(path) = &args.host {
    sources.host = ReleaseSources::load_table(path)?;
  }
  if let Some(path) = &args.tags {
    sources.tags = ReleaseSources::load_table(path)?;
  }

  let report = lint(&mut changelog, &sources, &options, args.fix);
  if report.changed {
    ctx.write_changelog(&changelog)?;
  }

  if args.json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_lint_report(&report, args.fix);
  }

  // Unresolved errors fail the run
  if report.has_issues() {
    std::process::exit(1);
  }

  Ok(())
}

fn print_lint_report(report: &LintReport, fix: bool) {
  if report.issues.is_empty() {
    println!("✅ Changelog matches all release records");
    return;
  }

  let errors: Vec<&LintIssue> = report.issues.iter().filter(|i| i.severity == Severity::Error).collect();
  let warnings: Vec<&LintIssue> = report.issues.iter().filter(|i| i.severity == Severity::Warning).collect();

  if !errors.is_empty() {
    println!("❌ {} error(s)", errors.len());
    for issue in &errors {
      print_issue(issue);
    }
    println!();
  }

  if !warnings.is_empty() {
    println!("⚠️  {} warning(s)", warnings.len());
    for issue in &warnings {
      print_issue(issue);
    }
    println!();
  }

  if fix {
    println!("🔧 Fixed {} issue(s)", report.fixed);
  } else if report.issues.iter().any(|i| !i.fixed) {
    println!("💡 Run with --fix to repair the changelog in place");
  }
}

fn print_issue(issue: &LintIssue) {
  let marker = if issue.fixed { "fixed" } else { "     " };
  println!("   [{}] {:<10} {}", marker, issue.version, issue.message);
}
