//! Semantic version value

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use semrel_core::{LevelBump, VersionError};

use crate::VersionResult;

/// Token used when a prerelease is started from a final version
pub const DEFAULT_PRERELEASE_TOKEN: &str = "rc";

/// A prerelease identifier of the form `token.revision`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Prerelease {
    /// Prerelease name (e.g. "rc", "dev")
    pub token: String,
    /// Numeric counter
    pub revision: u64,
}

impl Prerelease {
    /// Create a new prerelease identifier
    pub fn new(token: impl Into<String>, revision: u64) -> Self {
        Self {
            token: token.into(),
            revision,
        }
    }

    fn parse(input: &str, pre: &str) -> VersionResult<Self> {
        let (token, revision) = pre.rsplit_once('.').ok_or_else(|| {
            VersionError::invalid_format(input, format!("prerelease '{}' is not token.N", pre))
        })?;

        if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(VersionError::invalid_format(
                input,
                format!("invalid prerelease token '{}'", token),
            ));
        }

        let revision = revision.parse::<u64>().map_err(|_| {
            VersionError::invalid_format(
                input,
                format!("prerelease revision '{}' is not numeric", revision),
            )
        })?;

        Ok(Self::new(token, revision))
    }
}

impl std::fmt::Display for Prerelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.token, self.revision)
    }
}

/// An immutable semantic version.
///
/// Ordering and equality look at `major.minor.patch` and the prerelease only;
/// build metadata and the tag prefix are carried for rendering.
#[derive(Debug, Clone)]
pub struct Version {
    /// Major version
    pub major: u64,
    /// Minor version
    pub minor: u64,
    /// Patch version
    pub patch: u64,
    /// Prerelease identifier
    pub prerelease: Option<Prerelease>,
    /// Build metadata, kept verbatim
    pub build_metadata: Option<String>,
    /// Leading text of the tag this version was read from (e.g. "v")
    pub tag_prefix: String,
}

impl Version {
    /// Create a final version with no prefix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build_metadata: None,
            tag_prefix: String::new(),
        }
    }

    /// Set the prerelease identifier
    pub fn with_prerelease(mut self, token: impl Into<String>, revision: u64) -> Self {
        self.prerelease = Some(Prerelease::new(token, revision));
        self
    }

    /// Set build metadata
    pub fn with_build_metadata(mut self, build: impl Into<String>) -> Self {
        self.build_metadata = Some(build.into());
        self
    }

    /// Set the tag prefix used for rendering
    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = prefix.into();
        self
    }

    /// Parse a version, optionally behind a tag prefix.
    ///
    /// With `tag_prefix` set the text must start with it. Without one, any
    /// leading non-numeric text is taken as the prefix.
    pub fn parse(text: &str, tag_prefix: Option<&str>) -> VersionResult<Self> {
        let text = text.trim();

        let (prefix, rest) = match tag_prefix {
            Some(prefix) => {
                let rest = text.strip_prefix(prefix).ok_or_else(|| {
                    VersionError::invalid_format(text, format!("missing tag prefix '{}'", prefix))
                })?;
                (prefix, rest)
            }
            None => {
                let start = text
                    .find(|c: char| c.is_ascii_digit())
                    .ok_or_else(|| VersionError::invalid_format(text, "no numeric version found"))?;
                text.split_at(start)
            }
        };

        let parsed = semver::Version::parse(rest)
            .map_err(|e| VersionError::invalid_format(text, e.to_string()))?;

        let prerelease = if parsed.pre.is_empty() {
            None
        } else {
            Some(Prerelease::parse(text, parsed.pre.as_str())?)
        };

        let build_metadata = if parsed.build.is_empty() {
            None
        } else {
            Some(parsed.build.as_str().to_string())
        };

        Ok(Self {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease,
            build_metadata,
            tag_prefix: prefix.to_string(),
        })
    }

    /// Whether this is a prerelease version
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Copy of this version without its prerelease identifier
    pub fn finalize(&self) -> Self {
        Self {
            prerelease: None,
            ..self.clone()
        }
    }

    /// Return the version produced by applying `level`.
    ///
    /// Major, minor and patch bumps drop the prerelease and build metadata.
    /// A prerelease revision bump only increments the counter, starting a
    /// `rc.1` prerelease when there is none. Fails with
    /// [`VersionError::Overflow`] instead of wrapping a component.
    pub fn bump(&self, level: LevelBump) -> VersionResult<Self> {
        let mut next = self.clone();
        let step = |value: u64, component: &'static str| {
            value.checked_add(1).ok_or_else(|| VersionError::Overflow {
                version: self.to_string(),
                level: level.to_string(),
                component,
            })
        };

        match level {
            LevelBump::None => return Ok(next),
            LevelBump::Major => {
                next.major = step(self.major, "major")?;
                next.minor = 0;
                next.patch = 0;
                next.prerelease = None;
            }
            LevelBump::Minor => {
                next.minor = step(self.minor, "minor")?;
                next.patch = 0;
                next.prerelease = None;
            }
            LevelBump::Patch => {
                next.patch = step(self.patch, "patch")?;
                next.prerelease = None;
            }
            LevelBump::PrereleaseRevision => {
                next.prerelease = Some(match &self.prerelease {
                    Some(pre) => Prerelease::new(pre.token.clone(), step(pre.revision, "prerelease")?),
                    None => Prerelease::new(DEFAULT_PRERELEASE_TOKEN, 1),
                });
            }
        }

        next.build_metadata = None;
        Ok(next)
    }

    /// Render without the tag prefix: `MAJOR.MINOR.PATCH[-pre.N][+build]`
    pub fn as_semver_str(&self) -> String {
        let mut v = format!("{}.{}.{}", self.major, self.minor, self.patch);

        if let Some(pre) = &self.prerelease {
            v.push('-');
            v.push_str(&pre.to_string());
        }

        if let Some(build) = &self.build_metadata {
            v.push('+');
            v.push_str(build);
        }

        v
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.tag_prefix, self.as_semver_str())
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.prerelease.hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s, None).map_err(serde::de::Error::custom)
    }
}
