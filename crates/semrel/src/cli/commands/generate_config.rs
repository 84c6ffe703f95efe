//! Generate-config command

use clap::{Args, ValueEnum};
use tracing::info;

use semrel_core::config::Config;

use crate::cli::{Cli, OutputFormat};

/// Configuration file syntax
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ConfigSyntax {
    #[default]
    Toml,
    Yaml,
}

/// Print a default configuration file
#[derive(Debug, Args)]
pub struct GenerateConfigCommand {
    /// Configuration file syntax
    #[arg(value_enum, default_value = "toml")]
    pub syntax: ConfigSyntax,
}

impl GenerateConfigCommand {
    /// Execute the generate-config command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(syntax = ?self.syntax, "executing generate-config command");
        println!("{}", self.render(cli.format)?);
        Ok(())
    }

    fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        let config = Config::default();

        let content = match (format, self.syntax) {
            (OutputFormat::Json, _) => serde_json::to_string_pretty(&config)?,
            (OutputFormat::Text, ConfigSyntax::Toml) => toml::to_string_pretty(&config)?,
            (OutputFormat::Text, ConfigSyntax::Yaml) => serde_yaml::to_string(&config)?,
        };

        Ok(content)
    }
}
