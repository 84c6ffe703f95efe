//! Release history
//!
//! [`ReleaseHistory`] holds the classified commits not yet released and one
//! [`Release`] per published version, newest first.

mod builder;

pub use builder::{PendingRelease, ReleaseDecision, ReleaseHistoryBuilder, TagMetadata};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use semrel_git::Actor;
use semrel_version::Version;

use crate::types::ParseResult;

/// Bucket for commits no rule of the active convention matched
pub const UNPARSED_LABEL: &str = "unknown";

/// Classified commits grouped by type label, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Elements<'c>(IndexMap<String, Vec<ParseResult<'c>>>);

impl<'c> Elements<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit to the bucket for `type_label`, creating the bucket if needed
    pub fn insert_or_append(&mut self, type_label: &str, commit: ParseResult<'c>) {
        match self.0.get_mut(type_label) {
            Some(bucket) => bucket.push(commit),
            None => {
                self.0.insert(type_label.to_string(), vec![commit]);
            }
        }
    }

    /// Commits in one bucket
    pub fn get(&self, type_label: &str) -> Option<&[ParseResult<'c>]> {
        self.0.get(type_label).map(Vec::as_slice)
    }

    /// Buckets in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ParseResult<'c>])> {
        self.0.iter().map(|(label, commits)| (label.as_str(), commits.as_slice()))
    }

    /// Type labels in insertion order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of commits across all buckets
    pub fn commit_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// One published version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release<'c> {
    pub tagger: Actor,
    pub committer: Actor,
    pub tagged_date: DateTime<Utc>,
    pub version: Version,
    pub elements: Elements<'c>,
}

/// Unreleased commits plus every release, newest version first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseHistory<'c> {
    pub unreleased: Elements<'c>,
    released: IndexMap<Version, Release<'c>>,
}

impl<'c> ReleaseHistory<'c> {
    /// An empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases in insertion order, newest version first
    pub fn released(&self) -> impl Iterator<Item = &Release<'c>> {
        self.released.values()
    }

    /// Release for a version
    pub fn release(&self, version: &Version) -> Option<&Release<'c>> {
        self.released.get(version)
    }

    pub fn latest_release(&self) -> Option<&Release<'c>> {
        self.released.first().map(|(_, release)| release)
    }

    pub fn latest_version(&self) -> Option<&Version> {
        self.released.first().map(|(version, _)| version)
    }

    pub fn release_count(&self) -> usize {
        self.released.len()
    }

    /// Whether the history holds nothing at all
    pub fn is_empty(&self) -> bool {
        self.unreleased.is_empty() && self.released.is_empty()
    }

    /// Seal the unreleased commits into a release at the front of the history.
    ///
    /// Hands the version back when it is not newer than the latest release,
    /// leaving the history untouched.
    pub(crate) fn seal(
        &mut self,
        version: Version,
        tag: TagMetadata,
    ) -> std::result::Result<(), Version> {
        if self.latest_version().is_some_and(|latest| &version <= latest) {
            return Err(version);
        }

        let release = Release {
            tagger: tag.tagger,
            committer: tag.committer,
            tagged_date: tag.tagged_date,
            version: version.clone(),
            elements: std::mem::take(&mut self.unreleased),
        };
        self.released.shift_insert(0, version, release);
        Ok(())
    }
}
