//! Tag format handling

use semrel_core::VersionError;

use crate::version::Version;
use crate::VersionResult;

const PLACEHOLDER: &str = "{version}";

/// Template mapping versions to tag names, e.g. `v{version}`.
///
/// Only `{prefix}{version}` templates are supported so that any tag can be
/// mapped back to its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFormat {
    template: String,
    prefix: String,
}

impl TagFormat {
    /// Create a tag format from a template
    pub fn new(template: impl Into<String>) -> VersionResult<Self> {
        let template = template.into();

        let prefix = match template.strip_suffix(PLACEHOLDER) {
            Some(prefix) if !prefix.contains(PLACEHOLDER) => prefix.to_string(),
            _ => return Err(VersionError::InvalidTagFormat(template)),
        };

        Ok(Self { template, prefix })
    }

    /// The template as written
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Text placed before the version
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Render the tag name for a version
    pub fn render(&self, version: &Version) -> String {
        format!("{}{}", self.prefix, version.as_semver_str())
    }

    /// Decode the version held in a tag name
    pub fn parse_tag(&self, tag: &str) -> VersionResult<Version> {
        Version::parse(tag, Some(&self.prefix))
    }

    /// Whether a tag name follows this format
    pub fn matches(&self, tag: &str) -> bool {
        self.parse_tag(tag).is_ok()
    }
}

impl Default for TagFormat {
    fn default() -> Self {
        Self {
            template: format!("v{}", PLACEHOLDER),
            prefix: "v".to_string(),
        }
    }
}
