//! # reposweep - parallel maintenance for every repository on disk
//!
//! reposweep walks a directory tree, collects every git repository beneath
//! it and runs `git gc` (or any other configured command) in each one,
//! keeping a bounded number of processes running at once while a live
//! progress bar tracks completions.
//!
//! ## Pieces
//!
//! - [`discovery`]: finds repositories, skipping hidden directories
//! - [`runner`]: runs the maintenance command in one repository
//! - [`scheduler`]: the bounded-concurrency control loop and its state machine
//! - [`progress`]: turns completions into a monotonic progress fraction
//! - [`config`]: figment-layered configuration
//!
//! ## Quick Start
//!
//! ```bash
//! # Garbage-collect everything under your home directory
//! reposweep
//!
//! # Only ~/code, four at a time
//! reposweep --root ~/code --parallel 4
//!
//! # See what would be swept
//! reposweep list --root ~/code
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod progress;
pub mod runner;
pub mod scheduler;
pub mod work;

pub use cli::{Cli, Output};
pub use config::ReposweepConfig;

/// Result type alias for reposweep operations
pub type Result<T> = anyhow::Result<T>;

/// Version reported by `--version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
