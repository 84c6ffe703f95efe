//! Classification results

use serde::Serialize;

use semrel_core::LevelBump;
use semrel_git::CommitInfo;

/// Structured fields extracted from a commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Bump level the message calls for
    pub bump: LevelBump,
    /// Type label (e.g. "fix", "feature")
    pub commit_type: String,
    /// Scope, when the subject names one
    pub scope: Option<String>,
    /// Summary first, then each body paragraph
    pub descriptions: Vec<String>,
    /// Text of each breaking-change note
    pub breaking_descriptions: Vec<String>,
    /// Issues the message closes (e.g. "#12")
    pub linked_issues: Vec<String>,
}

/// A commit classified under a convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCommit<'c> {
    pub bump: LevelBump,
    #[serde(rename = "type")]
    pub commit_type: String,
    pub scope: Option<String>,
    pub descriptions: Vec<String>,
    pub breaking_descriptions: Vec<String>,
    pub linked_issues: Vec<String>,
    /// The commit this classification came from
    #[serde(serialize_with = "serialize_hash")]
    pub commit: &'c CommitInfo,
}

impl<'c> ParsedCommit<'c> {
    /// Attach a parsed message to the commit it came from
    pub fn from_message(message: ParsedMessage, commit: &'c CommitInfo) -> Self {
        Self {
            bump: message.bump,
            commit_type: message.commit_type,
            scope: message.scope,
            descriptions: message.descriptions,
            breaking_descriptions: message.breaking_descriptions,
            linked_issues: message.linked_issues,
            commit,
        }
    }

    /// First description line
    pub fn summary(&self) -> &str {
        self.descriptions.first().map(String::as_str).unwrap_or("")
    }

    /// Whether the commit carries a breaking change
    pub fn is_breaking(&self) -> bool {
        !self.breaking_descriptions.is_empty()
    }
}

/// A commit whose subject matched no rule of the active convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError<'c> {
    #[serde(serialize_with = "serialize_hash")]
    pub commit: &'c CommitInfo,
    /// Raw message text
    pub message: String,
    /// Why the subject was not recognised
    pub reason: String,
}

/// Outcome of classifying one commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseResult<'c> {
    Parsed(ParsedCommit<'c>),
    Unparsed(ParseError<'c>),
}

impl<'c> ParseResult<'c> {
    /// Bump level of the outcome; unparsed commits never bump
    pub fn bump(&self) -> LevelBump {
        match self {
            Self::Parsed(parsed) => parsed.bump,
            Self::Unparsed(_) => LevelBump::None,
        }
    }

    /// The classified commit
    pub fn commit(&self) -> &'c CommitInfo {
        match self {
            Self::Parsed(parsed) => parsed.commit,
            Self::Unparsed(error) => error.commit,
        }
    }

    pub fn as_parsed(&self) -> Option<&ParsedCommit<'c>> {
        match self {
            Self::Parsed(parsed) => Some(parsed),
            Self::Unparsed(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// Summary line for display; the subject line for unparsed commits
    pub fn summary(&self) -> &str {
        match self {
            Self::Parsed(parsed) => parsed.summary(),
            Self::Unparsed(error) => error.message.lines().next().unwrap_or(""),
        }
    }
}

fn serialize_hash<S: serde::Serializer>(
    commit: &&CommitInfo,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&commit.hash)
}
