//! Locating and reading semrel config files

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Serialization syntax of a config file, picked from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Syntax {
    Toml,
    Yaml,
}

impl Syntax {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    fn parse(self, content: &str) -> Result<Config> {
        let config = match self {
            Self::Toml => toml::from_str(content).map_err(ConfigError::TomlError)?,
            Self::Yaml => serde_yaml::from_str(content).map_err(ConfigError::YamlError)?,
        };
        Ok(config)
    }
}

/// Read, parse and validate the config file at `path`
pub fn load_config(path: &Path) -> Result<Config> {
    let syntax = Syntax::of(path);
    info!(path = %path.display(), ?syntax, "loading config");

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let config = syntax.parse(&content)?;

    validate_config(&config)?;
    debug!(convention = %config.commit_parser.convention, "config validated");
    Ok(config)
}

/// Paths checked in one directory, in priority order.
///
/// Every known file name is tried at the top level before `.github/`.
fn candidates(dir: &Path) -> Vec<PathBuf> {
    let github = dir.join(".github");
    let names = config_file_names();
    names
        .iter()
        .map(|n| dir.join(n))
        .chain(names.iter().map(|n| github.join(n)))
        .collect()
}

/// Search `start_dir` and its ancestors for a config file
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let found = start_dir
        .ancestors()
        .flat_map(candidates)
        .find(|path| path.is_file());

    match &found {
        Some(path) => info!(path = %path.display(), "found config file"),
        None => debug!(start_dir = %start_dir.display(), "no config file found"),
    }
    found
}

/// Find and load the nearest config file for `dir`
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf)> {
    let path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;
    let config = load_config(&path)?;
    Ok((config, path))
}

/// Load the nearest config, falling back to [`Config::default`].
///
/// A file that exists but fails to parse or validate is reported with a
/// warning before the fallback.
pub fn load_config_or_default(dir: &Path) -> (Config, Option<PathBuf>) {
    match load_config_from_dir(dir) {
        Ok((config, path)) => (config, Some(path)),
        Err(crate::SemrelError::Config(ConfigError::NotFound(_))) => (Config::default(), None),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "invalid config, using defaults");
            (Config::default(), None)
        }
    }
}
