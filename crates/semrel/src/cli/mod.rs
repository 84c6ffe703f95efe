//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use semrel_changelog::{Convention, ConventionRegistry, ReleaseHistoryBuilder};
use semrel_core::config::{load_config_from_dir, Config, VersioningConfig};
use semrel_core::{ConfigError, SemrelError};

use commands::{ChangelogCommand, GenerateConfigCommand, VersionCommand};

/// Work out the next release from the commit history of a git repository
#[derive(Debug, Parser)]
#[command(name = "semrel", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only results and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// How results are printed
    #[arg(long, global = true, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Run as if started in DIR
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Styled report for a terminal
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute the next version, optionally committing and tagging the release
    Version(VersionCommand),

    /// Print the release history grouped by section
    Changelog(ChangelogCommand),

    /// Print the default configuration
    GenerateConfig(GenerateConfigCommand),
}

impl Cli {
    /// Run the selected subcommand
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("cannot enter {}", dir.display()))?;
        }

        match &self.command {
            Commands::Version(cmd) => cmd.execute(&self),
            Commands::Changelog(cmd) => cmd.execute(&self),
            Commands::GenerateConfig(cmd) => cmd.execute(&self),
        }
    }
}

/// Load the configuration for `dir`, using defaults when no file exists.
///
/// A file that exists but does not parse or validate is an error.
pub fn load_config(dir: &Path) -> anyhow::Result<Config> {
    match load_config_from_dir(dir) {
        Ok((config, path)) => {
            debug!(path = %path.display(), "loaded configuration");
            Ok(config)
        }
        Err(SemrelError::Config(ConfigError::NotFound(_))) => {
            debug!(dir = %dir.display(), "no config found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Build the convention registry and pick the configured convention
pub fn load_registry(config: &Config) -> anyhow::Result<ConventionRegistry> {
    Ok(ConventionRegistry::from_config(&config.commit_parser)?)
}

/// Create a history builder for the configured convention
pub fn history_builder<'p>(
    convention: &'p Convention,
    versioning: &VersioningConfig,
) -> anyhow::Result<ReleaseHistoryBuilder<'p>> {
    Ok(ReleaseHistoryBuilder::from_config(convention, versioning)?)
}
