//! Core plumbing shared by the engine and the CLI
//!
//! - **config**: changelog.toml parsing and validation
//! - **context**: resolved project paths and settings, built once per command
//! - **error**: error types with exit codes and contextual help

pub mod config;
pub mod context;
pub mod error;
