//! Unified command context - resolve once, pass everywhere
//!
//! ```text
//! main.rs:
//!   ChangelogContext::build() -> &ChangelogContext
//!   |
//!   v
//! commands/draft.rs, lint.rs, etc:
//!   fn run_*(ctx: &ChangelogContext, ...)
//! ```

use crate::changelog::Changelog;
use crate::core::config::{ChangelogConfig, ProjectConfig};
use crate::core::error::{ChangelogError, ChangelogResult, ConfigError, ResultExt};
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Shared state for all commands: where the project lives, its config and
/// which changelog file to operate on.
#[derive(Debug, Clone)]
pub struct ChangelogContext {
  /// Project root (directory holding the config, or the working directory)
  pub root: PathBuf,

  /// changelog.toml, when one was found.
  /// Optional because not all commands require configuration
  pub config: Option<ChangelogConfig>,

  /// Changelog file to read and write
  pub changelog_path: PathBuf,
}

impl ChangelogContext {
  /// Build the context from the working directory and CLI overrides.
  ///
  /// An explicit `config_path` must exist. Otherwise the usual locations are
  /// searched and a missing config is fine; a present but invalid one is not.
  pub fn build(cwd: &Path, config_path: Option<&Path>, changelog_path: Option<&Path>) -> ChangelogResult<Self> {
    let (root, config) = match config_path {
      Some(path) => (project_root(path, cwd), Some(ChangelogConfig::load_file(path)?)),
      None => match ChangelogConfig::find_config_path(cwd) {
        Some(path) => (project_root(&path, cwd), Some(ChangelogConfig::load_file(&path)?)),
        None => {
          debug!(cwd = %cwd.display(), "no configuration file, using defaults");
          (cwd.to_path_buf(), None)
        }
      },
    };

    let changelog_path = match changelog_path {
      Some(path) => path.to_path_buf(),
      None => {
        let relative = config
          .as_ref()
          .map(|c| c.project.changelog.clone())
          .unwrap_or_else(|| ProjectConfig::default().changelog);
        root.join(relative)
      }
    };

    Ok(Self {
      root,
      config,
      changelog_path,
    })
  }

  /// Project settings, defaults when no config was found
  pub fn project(&self) -> ProjectConfig {
    self.config.as_ref().map(|c| c.project.clone()).unwrap_or_default()
  }

  /// Read and parse the changelog. A missing file reads as an empty document.
  pub fn load_changelog(&self) -> ChangelogResult<Changelog> {
    if !self.changelog_path.exists() {
      debug!(path = %self.changelog_path.display(), "changelog does not exist yet");
      return Ok(Changelog::default());
    }
    let text = fs::read_to_string(&self.changelog_path)
      .with_context(|| format!("Failed to read changelog from {}", self.changelog_path.display()))?;
    Ok(Changelog::parse(&text))
  }

  /// Write the rendered changelog back
  pub fn write_changelog(&self, changelog: &Changelog) -> ChangelogResult<()> {
    fs::write(&self.changelog_path, changelog.render())
      .with_context(|| format!("Failed to write changelog to {}", self.changelog_path.display()))?;
    debug!(path = %self.changelog_path.display(), "changelog written");
    Ok(())
  }

  /// Repository URL from config, falling back to the document's first heading
  pub fn repo_url(&self, changelog: &Changelog) -> ChangelogResult<String> {
    if let Some(repository) = self.project().repository {
      return Ok(repository);
    }
    changelog.repo_url().map(str::to_string).ok_or_else(|| {
      ChangelogError::Config(ConfigError::MissingField {
        field: "project.repository".to_string(),
      })
    })
  }

  /// Registry package name, falling back to the repository name
  pub fn package(&self, repo_url: &str) -> String {
    self.project().package.unwrap_or_else(|| {
      let name = repo_url.rsplit('/').next().unwrap_or(repo_url).to_string();
      debug!(package = %name, "no package configured, using repository name");
      name
    })
  }

  /// Explicit version, or `project.current_version` from the config
  pub fn version_or_current(&self, explicit: Option<&str>) -> ChangelogResult<Version> {
    if let Some(version) = explicit {
      return crate::changelog::parse_version(version);
    }
    self.project().current_version()?.ok_or_else(|| {
      ChangelogError::Config(ConfigError::MissingField {
        field: "project.current_version".to_string(),
      })
    })
  }
}

/// Directory a config file describes; `.config/changelog.toml` belongs to its parent
fn project_root(config_path: &Path, cwd: &Path) -> PathBuf {
  let parent = match config_path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => return cwd.to_path_buf(),
  };
  if parent.file_name().is_some_and(|name| name == ".config") {
    return parent.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
  }
  parent.to_path_buf()
}
