//! Core types for semrel

use serde::{Deserialize, Serialize};

/// How far a commit or a release moves the version.
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `None < PrereleaseRevision < Patch < Minor < Major`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LevelBump {
    /// No version change
    #[default]
    None,
    /// Increment only the prerelease counter
    PrereleaseRevision,
    /// `x.y.Z`: fixes
    Patch,
    /// `x.Y.0`: backwards-compatible features
    Minor,
    /// `X.0.0`: breaking changes
    Major,
}

impl LevelBump {
    /// Name used in config files, CLI flags and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelBump::None => "none",
            LevelBump::PrereleaseRevision => "prerelease_revision",
            LevelBump::Patch => "patch",
            LevelBump::Minor => "minor",
            LevelBump::Major => "major",
        }
    }

    /// Whether this level warrants a release
    pub fn is_release(&self) -> bool {
        *self != Self::None
    }
}

impl std::fmt::Display for LevelBump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LevelBump {
    type Err = String;

    /// Case-insensitive; also accepts `no_release`, `prerelease` and `pre`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_ascii_lowercase().as_str() {
            "none" | "no_release" => LevelBump::None,
            "prerelease_revision" | "prerelease" | "pre" => LevelBump::PrereleaseRevision,
            "patch" => LevelBump::Patch,
            "minor" => LevelBump::Minor,
            "major" => LevelBump::Major,
            _ => return Err(format!("Unknown bump level: {}", s)),
        };
        Ok(level)
    }
}
