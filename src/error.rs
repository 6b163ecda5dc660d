//! Fatal error types.
//!
//! Only failures that abort the whole run live here. Per-repository
//! failures are plain values (see [`crate::work::Outcome`]) and never
//! travel through `Result`.

use std::path::PathBuf;
use thiserror::Error;

/// Enumeration could not produce a repository list.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("root directory '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("root dir '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read root directory '{}': {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to traverse '{}': {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("no root directory given and the home directory could not be determined")]
    NoHomeDirectory,
}

/// Configuration could not be loaded or is invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}
