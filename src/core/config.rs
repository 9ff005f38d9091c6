use crate::changelog::{Registry, parse_version};
use crate::core::error::{ChangelogError, ChangelogResult, ConfigError, ResultExt};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for changelog-rail
/// Searched in order: changelog.toml, .changelog.toml, .config/changelog.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangelogConfig {
  #[serde(default)]
  pub project: ProjectConfig,
}

/// Project metadata used to build links and notices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
  /// Package name on the registry
  #[serde(default)]
  pub package: Option<String>,

  /// Repository URL, e.g. https://github.com/org/repo (no trailing slash)
  #[serde(default)]
  pub repository: Option<String>,

  /// Branch unreleased sections compare against (default: "main")
  #[serde(default = "default_branch")]
  pub default_branch: String,

  #[serde(default)]
  pub registry: Registry,

  /// Version currently in development
  #[serde(default)]
  pub current_version: Option<String>,

  /// Changelog path, relative to the config's project root (default: "CHANGELOG.md")
  #[serde(default = "default_changelog")]
  pub changelog: PathBuf,
}

fn default_branch() -> String {
  "main".to_string()
}

fn default_changelog() -> PathBuf {
  PathBuf::from("CHANGELOG.md")
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      package: None,
      repository: None,
      default_branch: default_branch(),
      registry: Registry::default(),
      current_version: None,
      changelog: default_changelog(),
    }
  }
}

impl ProjectConfig {
  /// Validate project configuration
  pub fn validate(&self) -> ChangelogResult<()> {
    if let Some(ref repository) = self.repository {
      if repository.trim().is_empty() {
        return Err(ChangelogError::Config(ConfigError::InvalidField {
          field: "project.repository".to_string(),
          reason: "must not be empty".to_string(),
        }));
      }
      if repository.ends_with('/') {
        return Err(ChangelogError::with_help(
          format!("Repository URL '{}' ends with a slash", repository),
          "Remove the trailing '/' from project.repository in changelog.toml",
        ));
      }
    }

    if self.default_branch.trim().is_empty() {
      return Err(ChangelogError::Config(ConfigError::InvalidField {
        field: "project.default_branch".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    self.current_version()?;
    Ok(())
  }

  /// Parsed `current_version`, if set
  pub fn current_version(&self) -> ChangelogResult<Option<Version>> {
    self.current_version.as_deref().map(parse_version).transpose()
  }
}

impl ChangelogConfig {
  /// Find config file in search order: changelog.toml, .changelog.toml, .config/changelog.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("changelog.toml"),
      path.join(".changelog.toml"),
      path.join(".config").join("changelog.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from an explicit file
  pub fn load_file(config_path: &Path) -> ChangelogResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;
    Ok(config)
  }

  pub fn parse(content: &str) -> ChangelogResult<Self> {
    let config: ChangelogConfig = toml_edit::de::from_str(content)?;
    config.project.validate()?;
    Ok(config)
  }
}
