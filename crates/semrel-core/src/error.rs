//! Error types for semrel

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using SemrelError
pub type Result<T> = std::result::Result<T, SemrelError>;

/// Every failure a semrel library call can report
#[derive(Debug, Error)]
pub enum SemrelError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Convention(#[from] ConventionError),
}

/// Problems locating or reading a semrel config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config file in the directory or any parent
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// A field holds a value semrel cannot use
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Failures talking to the release repository
#[derive(Debug, Error)]
pub enum GitError {
    /// Neither the path nor any parent holds a repository
    #[error("No git repository at or above {0}")]
    NoRepository(PathBuf),

    /// HEAD does not point at a commit yet
    #[error("Repository has no commits")]
    EmptyHistory,

    /// A release tag with this name is already present
    #[error("Tag already exists: {0}")]
    TagExists(String),

    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Failures producing or changing a version value
#[derive(Debug, Error)]
pub enum VersionError {
    /// The text does not hold a `MAJOR.MINOR.PATCH` version
    #[error("Invalid version format '{input}': {reason}")]
    InvalidVersionFormat { input: String, reason: String },

    /// Bumping would push a component past `u64::MAX`
    #[error("Cannot bump {version} by {level}: {component} would overflow")]
    Overflow {
        version: String,
        level: String,
        component: &'static str,
    },

    /// Tag format template is unusable
    #[error("Invalid tag format '{0}': must end with the {{version}} placeholder")]
    InvalidTagFormat(String),
}

impl VersionError {
    /// Create an invalid-format error for `input`
    pub fn invalid_format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVersionFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while building a commit convention
#[derive(Debug, Error)]
pub enum ConventionError {
    /// Two rules share the same trigger token
    #[error("Ambiguous commit rule in convention '{convention}': trigger '{trigger}' is defined more than once")]
    AmbiguousCommitRule { convention: String, trigger: String },

    /// The breaking-change marker matches a type trigger
    #[error("Breaking-change marker in convention '{convention}' collides with trigger '{trigger}'")]
    BreakingMarkerCollision { convention: String, trigger: String },

    /// A rule or marker pattern is not a valid regex
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No convention registered under that name
    #[error("Unknown commit convention: {0}")]
    UnknownConvention(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_version_format_display() {
        let err = VersionError::invalid_format("1.x", "minor is not numeric");
        assert_eq!(
            err.to_string(),
            "Invalid version format '1.x': minor is not numeric"
        );
    }

    #[test]
    fn test_transparent_wrapping() {
        let err: SemrelError = ConventionError::AmbiguousCommitRule {
            convention: "angular".to_string(),
            trigger: "fix".to_string(),
        }
        .into();
        assert!(err.to_string().contains("trigger 'fix'"));
        assert!(matches!(err, SemrelError::Convention(_)));
    }

    #[test]
    fn test_every_variant_wraps_a_domain_error() {
        let errors: Vec<SemrelError> = vec![
            ConfigError::NotFound(PathBuf::from("/repo")).into(),
            GitError::EmptyHistory.into(),
            VersionError::InvalidTagFormat("v".to_string()).into(),
            ConventionError::UnknownConvention("nope".to_string()).into(),
        ];
        for err in errors {
            match err {
                SemrelError::Config(_)
                | SemrelError::Git(_)
                | SemrelError::Version(_)
                | SemrelError::Convention(_) => {}
            }
        }
    }

    #[test]
    fn test_overflow_display() {
        let err = VersionError::Overflow {
            version: "18446744073709551615.0.0".to_string(),
            level: "major".to_string(),
            component: "major",
        };
        assert!(err.to_string().contains("major would overflow"));
    }
}
