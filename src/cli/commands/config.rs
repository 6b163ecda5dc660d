use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::Output;
use crate::config::ReposweepConfig;
use crate::runner::CommandRunner;
use crate::scheduler::budget::resolve_concurrency;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration as TOML
    Show,
    /// Check that the merged configuration is valid
    Validate,
}

pub async fn execute(args: ConfigArgs, config: ReposweepConfig, output: &Output) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let rendered =
                toml::to_string_pretty(&config).context("failed to serialize configuration")?;
            print!("{rendered}");
        }
        ConfigCommand::Validate => {
            // Loading already validated it
            output.success("Configuration is valid");
            output.table_row(
                "Root",
                config.scan.root.as_deref().unwrap_or("(home directory)"),
            );
            output.table_row("Marker", &config.scan.marker);
            output.table_row(
                "Command",
                &CommandRunner::new(config.run.program.as_str(), config.run.args.clone()).display(),
            );
            output.table_row(
                "Concurrency",
                &resolve_concurrency(config.run.parallel, config.run.thread_percentage)
                    .to_string(),
            );
        }
    }
    Ok(())
}
