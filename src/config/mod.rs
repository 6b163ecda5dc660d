//! Configuration management for reposweep
//!
//! Settings are layered with figment (see [`core`]): the embedded
//! `default-config.toml`, user and directory-local config files, an
//! explicit `--config` file, `REPOSWEEP_*` environment variables and
//! finally command-line flags.

use serde::{Deserialize, Serialize};

pub mod core;
mod smart_load;

pub use self::core::{CliOverrides, ConfigLoader};

use crate::error::ConfigError;
use crate::scheduler::CancelPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReposweepConfig {
    /// Repository discovery settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Maintenance run settings
    #[serde(default)]
    pub run: RunConfig,
}

/// Repository discovery settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Directory to search (None = home directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Entry whose presence marks a directory as a repository
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Descend into symlinked directories
    #[serde(default)]
    pub follow_symlinks: bool,
}

/// Maintenance run settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Maximum concurrent maintenance processes (0 = auto-detect)
    #[serde(default)]
    pub parallel: usize,

    /// Percentage of processing units to use when auto-detecting (1-100)
    #[serde(default = "default_thread_percentage")]
    pub thread_percentage: u8,

    /// Maintenance program
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments passed to the maintenance program
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Behaviour on operator abort
    #[serde(default)]
    pub on_interrupt: CancelPolicy,
}

fn default_marker() -> String {
    ".git".to_string()
}

fn default_thread_percentage() -> u8 {
    100
}

fn default_program() -> String {
    "git".to_string()
}

fn default_args() -> Vec<String> {
    vec!["gc".to_string()]
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: None,
            marker: default_marker(),
            follow_symlinks: false,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel: 0,
            thread_percentage: default_thread_percentage(),
            program: default_program(),
            args: default_args(),
            on_interrupt: CancelPolicy::default(),
        }
    }
}

impl ReposweepConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.marker.is_empty() {
            return Err(ConfigError::Invalid("scan.marker cannot be empty".into()));
        }
        if self.scan.marker.contains(std::path::is_separator) {
            return Err(ConfigError::Invalid(format!(
                "scan.marker must be a single path component, got '{}'",
                self.scan.marker
            )));
        }
        if self.run.program.trim().is_empty() {
            return Err(ConfigError::Invalid("run.program cannot be empty".into()));
        }
        if !(1..=100).contains(&self.run.thread_percentage) {
            return Err(ConfigError::Invalid(format!(
                "run.thread_percentage must be between 1 and 100, got {}",
                self.run.thread_percentage
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
