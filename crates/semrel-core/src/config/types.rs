//! Configuration types

use serde::{Deserialize, Serialize};

use crate::types::LevelBump;

/// Main configuration for semrel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name
    pub name: Option<String>,

    /// Versioning configuration
    pub versioning: VersioningConfig,

    /// Commit parser configuration
    pub commit_parser: CommitParserConfig,

    /// Git configuration
    pub git: GitConfig,
}

/// Versioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersioningConfig {
    /// Tag format (e.g., "v{version}")
    pub tag_format: String,

    /// Version used for the first release of a repository
    pub initial_version: String,

    /// Whether a breaking change may move a 0.x version to 1.0.0
    pub major_on_zero: bool,

    /// Whether to produce prerelease versions
    pub prerelease: bool,

    /// Prerelease token used when `prerelease` is set
    pub prerelease_token: String,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            tag_format: "v{version}".to_string(),
            initial_version: "0.1.0".to_string(),
            major_on_zero: true,
            prerelease: false,
            prerelease_token: "rc".to_string(),
        }
    }
}

/// Commit parser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitParserConfig {
    /// Name of the commit convention (angular, emoji, scipy, tag)
    pub convention: String,

    /// Regex matched against each message line to detect breaking changes
    pub breaking_marker: String,

    /// Footer keywords that mark issue references (e.g. "Closes #12")
    pub issue_closure_keywords: Vec<String>,

    /// Overrides for the convention's tag tables
    pub options: Option<ParserOptionsConfig>,
}

impl Default for CommitParserConfig {
    fn default() -> Self {
        Self {
            convention: "angular".to_string(),
            breaking_marker: super::defaults::DEFAULT_BREAKING_MARKER.to_string(),
            issue_closure_keywords: super::defaults::issue_closure_keywords(),
            options: None,
        }
    }
}

/// Tag tables that replace a convention's built-in rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptionsConfig {
    /// Every tag the parser accepts
    pub allowed_tags: Vec<String>,

    /// Tags that trigger a major bump
    pub major_tags: Vec<String>,

    /// Tags that trigger a minor bump
    pub minor_tags: Vec<String>,

    /// Tags that trigger a patch bump
    pub patch_tags: Vec<String>,

    /// Bump applied to allowed tags not listed above
    pub default_bump_level: LevelBump,
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Release commit message template
    pub commit_message: String,

    /// Annotated tag message template
    pub tag_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            commit_message: "{version}\n\nAutomatically generated by semrel".to_string(),
            tag_message: "{version}".to_string(),
        }
    }
}

impl GitConfig {
    /// Render the tag message for a version string
    pub fn render_tag_message(&self, version: &str) -> String {
        self.tag_message.replace("{version}", version)
    }

    /// Render the release commit message for a version string
    pub fn render_commit_message(&self, version: &str) -> String {
        self.commit_message.replace("{version}", version)
    }
}
