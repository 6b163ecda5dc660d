//! Command-line interface for reposweep
//!
//! Parses arguments with clap, installs logging, loads the layered
//! configuration and hands off to a command. Running without a subcommand
//! performs the sweep.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
mod output;

pub use output::Output;

use crate::config::{CliOverrides, ConfigLoader, ReposweepConfig};
use crate::scheduler::CancelPolicy;

#[derive(Parser)]
#[command(
    name = "reposweep",
    version = crate::VERSION,
    about = "Find every git repository under a directory and garbage-collect them in parallel",
    long_about = "reposweep walks a directory tree, collects every repository it finds \
                  (hidden directories are skipped) and runs `git gc` in each one, with a \
                  bounded number running at once."
)]
pub struct Cli {
    /// Directory to search (defaults to your home directory)
    #[arg(short, long, value_name = "DIR", global = true)]
    pub root: Option<String>,

    /// Maximum number of repositories processed at once (0 = number of CPUs)
    #[arg(short, long, value_name = "N", global = true)]
    pub parallel: Option<usize>,

    /// What to do with running work on Ctrl+C
    #[arg(long, value_enum, value_name = "POLICY", global = true)]
    pub on_interrupt: Option<CancelPolicy>,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the maintenance command in every repository (default)
    Run,
    /// Print the repositories that would be swept, one per line
    List,
    /// Configuration management
    Config(commands::config::ConfigArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let config = self.load_config()?;
        tracing::debug!("effective configuration: {:?}", config);

        match self.command {
            None | Some(Commands::Run) => commands::run::execute(config, &output).await,
            Some(Commands::List) => commands::list::execute(config, &output).await,
            Some(Commands::Config(args)) => commands::config::execute(args, config, &output).await,
        }
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root: self.root.clone(),
            parallel: self.parallel,
            on_interrupt: self.on_interrupt,
        }
    }

    fn load_config(&self) -> Result<ReposweepConfig> {
        if let Some(path) = &self.config
            && !path.is_file()
        {
            anyhow::bail!("config file '{}' does not exist", path.display());
        }

        ConfigLoader::load_with_custom_config(self.config.as_deref())
            .with_overrides(&self.overrides())
            .extract()
            .context("could not load configuration")
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // stdout carries the per-repository lines, keep logs off it
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
