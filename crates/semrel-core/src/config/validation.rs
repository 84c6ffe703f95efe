//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::{CommitParserConfig, Config};

/// Conventions shipped with semrel
pub const BUILTIN_CONVENTIONS: &[&str] = &["angular", "emoji", "scipy", "tag"];

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_versioning(config)?;
    validate_commit_parser(&config.commit_parser)?;
    validate_git(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> crate::SemrelError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
    .into()
}

fn validate_versioning(config: &Config) -> Result<()> {
    let tag_format = &config.versioning.tag_format;
    if !tag_format.contains("{version}") {
        return Err(invalid(
            "versioning.tag_format",
            "must contain {version} placeholder",
        ));
    }
    if !tag_format.ends_with("{version}") {
        return Err(invalid(
            "versioning.tag_format",
            "{version} must be the last part of the tag",
        ));
    }

    if let Err(e) = semver::Version::parse(&config.versioning.initial_version) {
        return Err(invalid("versioning.initial_version", e.to_string()));
    }

    if config.versioning.prerelease {
        let token = &config.versioning.prerelease_token;
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid(
                "versioning.prerelease_token",
                "must be a non-empty alphanumeric identifier",
            ));
        }
    }

    Ok(())
}

fn validate_commit_parser(parser: &CommitParserConfig) -> Result<()> {
    if !BUILTIN_CONVENTIONS.contains(&parser.convention.as_str()) {
        return Err(invalid(
            "commit_parser.convention",
            format!("must be one of: {}", BUILTIN_CONVENTIONS.join(", ")),
        ));
    }

    if let Err(e) = regex::Regex::new(&parser.breaking_marker) {
        return Err(invalid("commit_parser.breaking_marker", e.to_string()));
    }

    if let Some(options) = &parser.options {
        if options.allowed_tags.is_empty() {
            return Err(invalid(
                "commit_parser.options.allowed_tags",
                "must list at least one tag",
            ));
        }

        let lists = [
            ("major_tags", &options.major_tags),
            ("minor_tags", &options.minor_tags),
            ("patch_tags", &options.patch_tags),
        ];
        for (name, tags) in lists {
            if let Some(stray) = tags.iter().find(|t| !options.allowed_tags.contains(t)) {
                return Err(invalid(
                    &format!("commit_parser.options.{}", name),
                    format!("'{}' is not listed in allowed_tags", stray),
                ));
            }
        }
    }

    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if !config.git.commit_message.contains("{version}") {
        return Err(invalid(
            "git.commit_message",
            "must contain {version} placeholder",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserOptionsConfig;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_tag_format() {
        let mut config = Config::default();
        config.versioning.tag_format = "no-placeholder".to_string();
        assert!(validate_config(&config).is_err());

        config.versioning.tag_format = "{version}-final".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_initial_version() {
        let mut config = Config::default();
        config.versioning.initial_version = "1.0".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_unknown_convention() {
        let mut config = Config::default();
        config.commit_parser.convention = "gitmoji-ish".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_breaking_marker_regex() {
        let mut config = Config::default();
        config.commit_parser.breaking_marker = "(unclosed".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_parser_option_lists() {
        let mut config = Config::default();
        config.commit_parser.options = Some(ParserOptionsConfig {
            allowed_tags: vec!["foo".into(), "bar".into()],
            minor_tags: vec!["baz".into()],
            ..Default::default()
        });
        assert!(validate_config(&config).is_err());

        config.commit_parser.options = Some(ParserOptionsConfig {
            allowed_tags: vec!["foo".into(), "bar".into()],
            minor_tags: vec!["bar".into()],
            ..Default::default()
        });
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_prerelease_token() {
        let mut config = Config::default();
        config.versioning.prerelease = true;
        config.versioning.prerelease_token = "rc.1".to_string();
        assert!(validate_config(&config).is_err());
    }
}
