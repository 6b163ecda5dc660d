//! Command implementations for the reposweep CLI

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::ReposweepConfig;
use crate::discovery::{self, RepoFinder};
use crate::work::WorkItem;

pub mod config;
pub mod list;
pub mod run;

/// Resolve the configured root and enumerate the repositories beneath it.
///
/// The walk runs on the blocking pool so it does not stall the runtime
/// threads that `run` listens for signals on.
async fn discover(config: &ReposweepConfig, output: &Output) -> Result<(PathBuf, Vec<WorkItem>)> {
    let root = discovery::resolve_root(config.scan.root.as_deref())?;
    output.verbose(&format!("Searching {} for repositories", root.display()));

    let finder = RepoFinder::new(config.scan.marker.as_str())
        .follow_symlinks(config.scan.follow_symlinks);
    let walk_root = root.clone();
    let repos = tokio::task::spawn_blocking(move || finder.find(&walk_root))
        .await
        .context("repository discovery task failed")??;

    tracing::info!("found {} repositories under {}", repos.len(), root.display());
    Ok((root, repos))
}
