//! CLI commands

mod changelog;
mod generate_config;
mod version;

pub use changelog::ChangelogCommand;
pub use generate_config::GenerateConfigCommand;
pub use version::VersionCommand;
