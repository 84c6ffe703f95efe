//! Folding classified commits into a release history

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use semrel_core::config::VersioningConfig;
use semrel_core::LevelBump;
use semrel_git::{Actor, CommitInfo, TagInfo};
use semrel_version::{TagFormat, Version, VersionResult, DEFAULT_PRERELEASE_TOKEN};

use super::{ReleaseHistory, UNPARSED_LABEL};
use crate::parser::{CommitParser, Convention};
use crate::types::ParseResult;

/// Who tagged a release and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMetadata {
    pub tagger: Actor,
    pub committer: Actor,
    pub tagged_date: DateTime<Utc>,
}

impl TagMetadata {
    pub fn new(tagger: Actor, committer: Actor, tagged_date: DateTime<Utc>) -> Self {
        Self {
            tagger,
            committer,
            tagged_date,
        }
    }

    /// Metadata of a tag, falling back to the tagged commit for lightweight tags
    pub fn from_tag(tag: &TagInfo, commit: &CommitInfo) -> Self {
        Self {
            tagger: tag.tagger().unwrap_or(&commit.author).clone(),
            committer: commit.author.clone(),
            tagged_date: tag.date().unwrap_or(commit.timestamp),
        }
    }
}

/// A release that is warranted but not yet tagged
#[derive(Debug, Clone)]
pub struct PendingRelease<'c> {
    history: ReleaseHistory<'c>,
    level: LevelBump,
    next_version: Version,
}

impl<'c> PendingRelease<'c> {
    /// Aggregate bump level of the new commits
    pub fn level(&self) -> LevelBump {
        self.level
    }

    pub fn next_version(&self) -> &Version {
        &self.next_version
    }

    /// History with the new commits still unreleased
    pub fn history(&self) -> &ReleaseHistory<'c> {
        &self.history
    }

    /// Seal the unreleased commits into a release once its tag exists.
    ///
    /// Fails with the rejected version when it is not newer than the latest
    /// release already in the history.
    pub fn finalize(self, tag: TagMetadata) -> Result<ReleaseHistory<'c>, Version> {
        let mut history = self.history;
        history.seal(self.next_version, tag)?;
        Ok(history)
    }

    /// Drop the release and keep the commits unreleased
    pub fn abandon(self) -> ReleaseHistory<'c> {
        self.history
    }
}

/// Result of folding new commits into a history
#[derive(Debug, Clone)]
pub enum ReleaseDecision<'c> {
    /// Nothing warrants a version change; new commits stay unreleased
    NoRelease(ReleaseHistory<'c>),
    Release(PendingRelease<'c>),
}

impl<'c> ReleaseDecision<'c> {
    pub fn is_release(&self) -> bool {
        matches!(self, Self::Release(_))
    }

    pub fn level(&self) -> LevelBump {
        match self {
            Self::NoRelease(_) => LevelBump::None,
            Self::Release(pending) => pending.level,
        }
    }

    pub fn history(&self) -> &ReleaseHistory<'c> {
        match self {
            Self::NoRelease(history) => history,
            Self::Release(pending) => &pending.history,
        }
    }

    /// The history without sealing any release
    pub fn into_history(self) -> ReleaseHistory<'c> {
        match self {
            Self::NoRelease(history) => history,
            Self::Release(pending) => pending.abandon(),
        }
    }
}

/// Builds release histories from commits classified under one convention
#[derive(Debug, Clone)]
pub struct ReleaseHistoryBuilder<'p> {
    convention: &'p Convention,
    initial_version: Version,
    major_on_zero: bool,
    prerelease_token: Option<String>,
    forced_level: Option<LevelBump>,
}

impl<'p> ReleaseHistoryBuilder<'p> {
    /// Create a builder starting new repositories at 0.1.0
    pub fn new(convention: &'p Convention) -> Self {
        Self {
            convention,
            initial_version: Version::new(0, 1, 0),
            major_on_zero: true,
            prerelease_token: None,
            forced_level: None,
        }
    }

    /// Create a builder from versioning configuration
    pub fn from_config(
        convention: &'p Convention,
        config: &VersioningConfig,
    ) -> semrel_core::Result<Self> {
        let initial_version = Version::parse(&config.initial_version, None)?;

        Ok(Self::new(convention)
            .with_initial_version(initial_version)
            .with_major_on_zero(config.major_on_zero)
            .with_prerelease_token(config.prerelease.then(|| config.prerelease_token.clone())))
    }

    /// Version used for the first release
    pub fn with_initial_version(mut self, version: Version) -> Self {
        self.initial_version = version;
        self
    }

    /// Whether MAJOR may leave 0.x; when false it is demoted to MINOR
    pub fn with_major_on_zero(mut self, major_on_zero: bool) -> Self {
        self.major_on_zero = major_on_zero;
        self
    }

    /// Produce prerelease versions with this token
    pub fn with_prerelease_token(mut self, token: Option<String>) -> Self {
        self.prerelease_token = token;
        self
    }

    /// Use this level instead of the one computed from commits
    pub fn with_forced_level(mut self, level: Option<LevelBump>) -> Self {
        self.forced_level = level;
        self
    }

    pub fn convention(&self) -> &'p Convention {
        self.convention
    }

    /// Classify a commit and file it under its type label in `unreleased`
    fn file_commit<'c>(&self, history: &mut ReleaseHistory<'c>, commit: &'c CommitInfo) -> LevelBump {
        let result = self.convention.classify(commit);
        let bump = result.bump();

        let label = match &result {
            ParseResult::Parsed(parsed) => parsed.commit_type.clone(),
            ParseResult::Unparsed(error) => {
                warn!(
                    commit = %commit.short_hash,
                    reason = %error.reason,
                    "commit does not follow the {} convention",
                    self.convention.name()
                );
                UNPARSED_LABEL.to_string()
            }
        };

        history.unreleased.insert_or_append(&label, result);
        bump
    }

    /// Fold commits made since `previous` (oldest first) into `history`.
    ///
    /// The aggregate level is the highest bump among the new commits. When
    /// it is NONE no release is produced and the commits stay unreleased.
    /// Fails only when the next version cannot be represented.
    #[instrument(skip_all, fields(commits = commits.len(), previous = ?previous.map(|v| v.to_string())))]
    pub fn fold<'c>(
        &self,
        mut history: ReleaseHistory<'c>,
        previous: Option<&Version>,
        commits: &'c [CommitInfo],
    ) -> VersionResult<ReleaseDecision<'c>> {
        let mut level = LevelBump::None;
        for commit in commits {
            level = level.max(self.file_commit(&mut history, commit));
        }

        let level = self.forced_level.unwrap_or(level);
        if level == LevelBump::None {
            info!(commits = commits.len(), "no release needed");
            return Ok(ReleaseDecision::NoRelease(history));
        }

        let previous = match (previous, history.latest_version()) {
            (Some(given), Some(latest)) => Some(given.max(latest).clone()),
            (given, latest) => given.or(latest).cloned(),
        };
        let next_version = self.next_version(previous.as_ref(), level)?;
        info!(%level, %next_version, "release warranted");

        Ok(ReleaseDecision::Release(PendingRelease {
            history,
            level,
            next_version,
        }))
    }

    /// Version following `previous` for a bump `level`
    pub fn next_version(&self, previous: Option<&Version>, level: LevelBump) -> VersionResult<Version> {
        let Some(previous) = previous else {
            let initial = self.initial_version.clone();
            return Ok(match &self.prerelease_token {
                Some(token) if !initial.is_prerelease() => initial.with_prerelease(token.as_str(), 1),
                _ => initial,
            });
        };

        let level = if !self.major_on_zero && previous.major == 0 && level == LevelBump::Major {
            debug!("major_on_zero is off, demoting major bump to minor");
            LevelBump::Minor
        } else {
            level
        };

        match &self.prerelease_token {
            Some(token) => match &previous.prerelease {
                Some(pre) if &pre.token == token => previous.bump(LevelBump::PrereleaseRevision),
                _ => Ok(previous
                    .bump(release_level(level))?
                    .with_prerelease(token.as_str(), 1)),
            },
            None if level == LevelBump::PrereleaseRevision && !previous.is_prerelease() => Ok(previous
                .bump(LevelBump::Patch)?
                .with_prerelease(DEFAULT_PRERELEASE_TOKEN, 1)),
            None => previous.bump(level),
        }
    }

    /// Rebuild a full history from every commit (oldest first) and the repository's tags.
    ///
    /// Each tagged commit seals the commits up to and including it into a
    /// release named after the highest version tag on that commit.
    #[instrument(skip_all, fields(commits = commits.len(), tags = tags.len()))]
    pub fn replay<'c>(
        &self,
        commits: &'c [CommitInfo],
        tags: &[TagInfo],
        format: &TagFormat,
    ) -> ReleaseHistory<'c> {
        let mut tagged: HashMap<&str, (Version, &TagInfo)> = HashMap::new();
        for tag in tags {
            let Some(version) = tag.version(format) else {
                debug!(tag = %tag.name, "ignoring non-version tag");
                continue;
            };

            let newer = tagged
                .get(tag.commit_hash.as_str())
                .map_or(true, |(existing, _)| &version > existing);
            if newer {
                tagged.insert(tag.commit_hash.as_str(), (version, tag));
            }
        }

        let mut history = ReleaseHistory::new();
        for commit in commits {
            self.file_commit(&mut history, commit);

            if let Some((version, tag)) = tagged.remove(commit.hash.as_str()) {
                match history.seal(version, TagMetadata::from_tag(tag, commit)) {
                    Ok(()) => debug!(tag = %tag.name, "sealed release"),
                    Err(version) => warn!(
                        tag = %tag.name,
                        %version,
                        "tag is not newer than the latest release, skipping"
                    ),
                }
            }
        }

        info!(
            releases = history.release_count(),
            unreleased = history.unreleased.commit_count(),
            "replayed history"
        );
        history
    }
}

/// Bump used for the final part of a new prerelease
fn release_level(level: LevelBump) -> LevelBump {
    match level {
        LevelBump::PrereleaseRevision => LevelBump::Patch,
        other => other,
    }
}
