//! Draft command implementation

use changelog_rail::core::context::ChangelogContext;
use changelog_rail::core::error::ChangelogResult;

/// Run the draft command
pub fn run_draft(ctx: &ChangelogContext, version: Option<String>, branch: Option<String>) -> ChangelogResult<()> {
  let current = ctx.version_or_current(version.as_deref())?;
  let branch = branch.unwrap_or_else(|| ctx.project().default_branch);

  let mut changelog = ctx.load_changelog()?;
  if !changelog.advance_to_draft(&current, &branch) {
    println!("✅ Nothing to do: {} is already drafted or has no section to start from", current);
    return Ok(());
  }

  ctx.write_changelog(&changelog)?;
  println!("📝 Opened unreleased section after {}", current);
  println!("   Compare: v{}...{}", current, branch);
  println!("   File:    {}", ctx.changelog_path.display());
  Ok(())
}
