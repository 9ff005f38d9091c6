//! Error types for changelog-rail with contextual messages and exit codes
//!
//! Parsing anomalies inside a changelog are never errors: the engine degrades
//! them into freeform text. Only caller contract violations (bad versions,
//! bad dates, malformed replacement sections), configuration problems and I/O
//! surface here.

use std::fmt;
use std::io;

/// Exit codes for changelog-rail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (I/O)
  System = 2,
  /// Validation failure (malformed input handed to the engine)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for changelog-rail
#[derive(Debug)]
pub enum ChangelogError {
  /// Configuration errors
  Config(ConfigError),

  /// A caller-supplied version string is not `major.minor.patch[-pre]`
  InvalidVersion { input: String, reason: String },

  /// A caller-supplied date is not `YYYY-MM-DD`
  InvalidDate { input: String },

  /// Replacement text does not start with a version heading
  MalformedSection { version: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ChangelogError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ChangelogError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ChangelogError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ChangelogError::Message { message, context, help } => ChangelogError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ChangelogError::Io(err) => ChangelogError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      other => ChangelogError::Message {
        message: other.to_string(),
        context: Some(ctx_str),
        help: other.help_message(),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ChangelogError::Config(_) => ExitCode::User,
      ChangelogError::InvalidVersion { .. } => ExitCode::User,
      ChangelogError::InvalidDate { .. } => ExitCode::User,
      ChangelogError::MalformedSection { .. } => ExitCode::Validation,
      ChangelogError::Io(_) => ExitCode::System,
      ChangelogError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ChangelogError::Config(e) => e.help_message(),
      ChangelogError::InvalidVersion { .. } => {
        Some("Versions must look like 1.2.3 or 1.2.3-rc.1 (a leading 'v' is accepted).".to_string())
      }
      ChangelogError::InvalidDate { .. } => Some("Dates must use the ISO format YYYY-MM-DD.".to_string()),
      ChangelogError::MalformedSection { .. } => Some(
        "A section must start with a heading like: ## [1.2.3 (2026-02-14)](https://github.com/org/repo/compare/v1.2.2...v1.2.3)"
          .to_string(),
      ),
      ChangelogError::Message { help, .. } => help.clone(),
      ChangelogError::Io(_) => None,
    }
  }
}

impl fmt::Display for ChangelogError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChangelogError::Config(e) => write!(f, "{}", e),
      ChangelogError::InvalidVersion { input, reason } => {
        write!(f, "Invalid version '{}': {}", input, reason)
      }
      ChangelogError::InvalidDate { input } => write!(f, "Invalid date '{}'", input),
      ChangelogError::MalformedSection { version } => {
        write!(f, "Replacement for version {} is not a valid changelog section", version)
      }
      ChangelogError::Io(e) => write!(f, "I/O error: {}", e),
      ChangelogError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ChangelogError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ChangelogError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ChangelogError {
  fn from(err: io::Error) -> Self {
    ChangelogError::Io(err)
  }
}

impl From<ConfigError> for ChangelogError {
  fn from(err: ConfigError) -> Self {
    ChangelogError::Config(err)
  }
}

impl From<toml_edit::de::Error> for ChangelogError {
  fn from(err: toml_edit::de::Error) -> Self {
    ChangelogError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ChangelogError {
  fn from(err: serde_json::Error) -> Self {
    ChangelogError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Missing required field
  MissingField { field: String },

  /// Field present but unusable
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingField { field } => Some(format!("Add `{}` to the [project] table of changelog.toml.", field)),
      ConfigError::InvalidField { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid value for '{}': {}", field, reason)
      }
    }
  }
}

/// Result type alias for changelog-rail
pub type ChangelogResult<T> = Result<T, ChangelogError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ChangelogResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ChangelogResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ChangelogError>,
{
  fn context(self, ctx: impl Into<String>) -> ChangelogResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ChangelogResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ChangelogError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
