//! Plain data read out of the repository

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use semrel_version::{TagFormat, Version};

/// Name and email of a commit author or tagger
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub email: String,
}

impl Actor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub(crate) fn from_signature(sig: &git2::Signature<'_>) -> Self {
        Self::new(
            sig.name().unwrap_or("Unknown"),
            sig.email().unwrap_or("unknown@example.com"),
        )
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// One commit as the release engine sees it.
///
/// The subject line and the body are kept apart; conventions match on the
/// subject and scan the body for breaking-change and issue footers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub hash: String,
    /// First seven characters of `hash`
    pub short_hash: String,
    /// Subject line
    pub message: String,
    /// Everything after the subject, blank separator lines removed
    pub body: Option<String>,
    pub author: Actor,
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    /// A commit with only a subject line
    pub fn new(
        hash: impl Into<String>,
        subject: impl Into<String>,
        author: Actor,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let hash = hash.into();
        Self {
            short_hash: hash.chars().take(7).collect(),
            hash,
            message: subject.into(),
            body: None,
            author,
            timestamp,
        }
    }

    /// Split a raw commit message into subject and body
    pub fn from_raw_message(
        hash: impl Into<String>,
        raw: &str,
        author: Actor,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let raw = raw.trim_end();
        let (subject, body) = match raw.split_once('\n') {
            Some((subject, body)) => (subject, body.trim_matches('\n')),
            None => (raw, ""),
        };

        let commit = Self::new(hash, subject.trim_end(), author, timestamp);
        if body.is_empty() {
            commit
        } else {
            commit.with_body(body)
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Subject and body joined by a blank line, as a parser expects them
    pub fn full_message(&self) -> String {
        self.body.as_ref().map_or_else(
            || self.message.clone(),
            |body| format!("{}\n\n{}", self.message, body),
        )
    }
}

/// What an annotated tag records beyond its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAnnotation {
    pub message: String,
    pub tagger: Actor,
    pub date: DateTime<Utc>,
}

impl TagAnnotation {
    pub fn new(message: impl Into<String>, tagger: Actor, date: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            tagger,
            date,
        }
    }
}

/// A tag and the commit it points at.
///
/// Lightweight tags carry no annotation; release metadata then comes from
/// the tagged commit itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    pub name: String,
    pub commit_hash: String,
    pub annotation: Option<TagAnnotation>,
}

impl TagInfo {
    /// A lightweight tag
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_hash: commit_hash.into(),
            annotation: None,
        }
    }

    pub fn annotated(mut self, annotation: TagAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn tagger(&self) -> Option<&Actor> {
        self.annotation.as_ref().map(|a| &a.tagger)
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.annotation.as_ref().map(|a| a.date)
    }

    pub fn message(&self) -> Option<&str> {
        self.annotation.as_ref().map(|a| a.message.as_str())
    }

    /// Decode the version this tag names, if it follows `format`
    pub fn version(&self, format: &TagFormat) -> Option<Version> {
        format.parse_tag(&self.name).ok()
    }
}
