//! Commit parsing
//!
//! A [`Convention`] turns one commit message into a [`ParsedMessage`]. The
//! built-in flavours differ only in how they read the subject line;
//! body analysis (breaking-change notes, paragraphs, closed issues) is shared.

mod body;
mod marker;
mod pattern;
mod prefix;
mod registry;
mod rules;

pub use body::{BodyAnalysis, BodyAnalyzer};
pub use marker::{
    emoji_rules, tag_rules, SymbolicMarkerConvention, TAG_MINOR_MARKER, TAG_PATCH_MARKER,
};
pub use pattern::{scipy_rules, RegexConvention, SCIPY_SUBJECT_PATTERN};
pub use prefix::{angular_rules, TextPrefixConvention};
pub use registry::ConventionRegistry;
pub use rules::{CommitRule, RuleSet};

use semrel_core::config::ParserOptionsConfig;
use semrel_core::{ConventionError, LevelBump, Result};
use semrel_git::CommitInfo;

use crate::types::{ParseError, ParseResult, ParsedCommit, ParsedMessage};

/// Trait for commit parsers
pub trait CommitParser: Send + Sync {
    /// Parse a raw message. `Err` carries the reason the subject was not recognised.
    fn parse_message(&self, message: &str) -> std::result::Result<ParsedMessage, String>;

    /// Classify a commit. Unrecognised commits come back as [`ParseResult::Unparsed`].
    fn classify<'c>(&self, commit: &'c CommitInfo) -> ParseResult<'c> {
        let message = commit.full_message();
        match self.parse_message(&message) {
            Ok(parsed) => ParseResult::Parsed(ParsedCommit::from_message(parsed, commit)),
            Err(reason) => ParseResult::Unparsed(ParseError {
                commit,
                message,
                reason,
            }),
        }
    }
}

/// A commit convention
#[derive(Debug, Clone)]
pub enum Convention {
    /// `type(scope)!: summary` subjects
    TextPrefix(TextPrefixConvention),
    /// Subjects led by a marker such as `:bug:`
    SymbolicMarker(SymbolicMarkerConvention),
    /// Subjects read by a regular expression
    Regex(RegexConvention),
}

impl Convention {
    /// The angular convention
    pub fn angular(body: BodyAnalyzer) -> Self {
        Self::TextPrefix(TextPrefixConvention::new(angular_rules(), body))
    }

    /// The emoji convention
    pub fn emoji(body: BodyAnalyzer) -> Self {
        Self::SymbolicMarker(SymbolicMarkerConvention::new(emoji_rules(), body))
    }

    /// The tag convention: `:sparkles:` features and `:nut_and_bolt:` fixes
    pub fn tag(body: BodyAnalyzer) -> Self {
        Self::SymbolicMarker(SymbolicMarkerConvention::new(tag_rules(), body))
    }

    /// The scipy convention
    pub fn scipy(body: BodyAnalyzer) -> Result<Self> {
        RegexConvention::new(scipy_rules(), SCIPY_SUBJECT_PATTERN, body).map(Self::Regex)
    }

    /// Look up a built-in convention by name
    pub fn builtin(name: &str, body: BodyAnalyzer) -> Result<Self> {
        match name {
            "angular" => Ok(Self::angular(body)),
            "emoji" => Ok(Self::emoji(body)),
            "scipy" => Self::scipy(body),
            "tag" => Ok(Self::tag(body)),
            other => Err(ConventionError::UnknownConvention(other.to_string()).into()),
        }
    }

    pub fn rule_set(&self) -> &RuleSet {
        match self {
            Self::TextPrefix(c) => &c.rules,
            Self::SymbolicMarker(c) => &c.rules,
            Self::Regex(c) => &c.rules,
        }
    }

    fn body(&self) -> &BodyAnalyzer {
        match self {
            Self::TextPrefix(c) => &c.body,
            Self::SymbolicMarker(c) => &c.body,
            Self::Regex(c) => &c.body,
        }
    }

    /// Convention name
    pub fn name(&self) -> &str {
        self.rule_set().name()
    }

    /// Bucket label for unrecognised commits
    pub fn unknown_label(&self) -> &str {
        self.rule_set().unknown_label()
    }

    /// Changelog section for a type label
    pub fn section_for<'a>(&'a self, type_label: &'a str) -> &'a str {
        self.rule_set().section_for(type_label)
    }

    /// Replace the rule table with one built from parser options
    pub fn with_options(self, options: &ParserOptionsConfig) -> Self {
        match self {
            Self::TextPrefix(mut c) => {
                c.rules = c.rules.with_options(options);
                Self::TextPrefix(c)
            }
            Self::SymbolicMarker(mut c) => {
                c.rules = c.rules.with_options(options);
                Self::SymbolicMarker(c)
            }
            Self::Regex(mut c) => {
                c.rules = c.rules.with_options(options);
                Self::Regex(c)
            }
        }
    }

    /// Check the rule table against the breaking-change marker
    pub fn validate(&self) -> Result<()> {
        self.rule_set().validate(self.body().breaking_marker())
    }
}

impl CommitParser for Convention {
    fn parse_message(&self, message: &str) -> std::result::Result<ParsedMessage, String> {
        match self {
            Self::TextPrefix(c) => c.parse_message(message),
            Self::SymbolicMarker(c) => c.parse_message(message),
            Self::Regex(c) => c.parse_message(message),
        }
    }
}

/// What a convention read from a subject line
pub(crate) struct SubjectMatch<'r> {
    pub rule: &'r CommitRule,
    pub scope: Option<String>,
    pub summary: String,
    /// The subject itself flags a breaking change (e.g. `feat!:`)
    pub breaking: bool,
}

/// Split a message into its subject line and the rest
pub(crate) fn split_message(message: &str) -> (&str, &str) {
    let message = message.trim();
    match message.split_once('\n') {
        Some((subject, rest)) => (subject.trim(), rest),
        None => (message, ""),
    }
}

/// Combine a subject match with body analysis into the final classification
pub(crate) fn assemble(
    rules: &RuleSet,
    body: &BodyAnalyzer,
    message: &str,
    subject: std::result::Result<SubjectMatch<'_>, String>,
) -> std::result::Result<ParsedMessage, String> {
    let (subject_line, rest) = split_message(message);
    let analysis = body.analyze(rest);
    let mut breaking = analysis.breaking;

    let (bump, commit_type, scope, summary) = match subject {
        Ok(m) => {
            if m.breaking && breaking.is_empty() {
                breaking.push(m.summary.clone());
            }
            (m.rule.bump, m.rule.type_label.clone(), m.scope, m.summary)
        }
        Err(reason) => {
            if let Some(note) = body.breaking_text(subject_line) {
                breaking.insert(0, note);
            }
            if breaking.is_empty() {
                return Err(reason);
            }
            (
                LevelBump::None,
                rules.unknown_label().to_string(),
                None,
                subject_line.to_string(),
            )
        }
    };

    let bump = if breaking.is_empty() {
        bump
    } else {
        LevelBump::Major
    };

    let mut descriptions = vec![summary];
    descriptions.extend(analysis.paragraphs);

    Ok(ParsedMessage {
        bump,
        commit_type,
        scope,
        descriptions,
        breaking_descriptions: breaking,
        linked_issues: analysis.issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use semrel_git::Actor;

    fn make_commit(message: &str) -> CommitInfo {
        CommitInfo::from_raw_message(
            "abc1234567890",
            message,
            Actor::new("Test Author", "test@example.com"),
            Utc::now(),
        )
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(Convention::builtin("angular", BodyAnalyzer::default()).unwrap().name(), "angular");
        assert_eq!(Convention::builtin("emoji", BodyAnalyzer::default()).unwrap().name(), "emoji");
        assert_eq!(Convention::builtin("scipy", BodyAnalyzer::default()).unwrap().name(), "scipy");
        assert_eq!(Convention::builtin("tag", BodyAnalyzer::default()).unwrap().name(), "tag");
        assert!(Convention::builtin("gitmoji", BodyAnalyzer::default()).is_err());
    }

    #[test]
    fn test_builtins_validate() {
        for name in ["angular", "emoji", "scipy", "tag"] {
            let convention = Convention::builtin(name, BodyAnalyzer::default()).unwrap();
            assert!(convention.validate().is_ok(), "{} should validate", name);
        }
    }

    #[test]
    fn test_classify_keeps_commit_handle() {
        let convention = Convention::angular(BodyAnalyzer::default());
        let commit = make_commit("fix(cli): correct some text");
        let result = convention.classify(&commit);

        let parsed = result.as_parsed().unwrap();
        assert_eq!(parsed.bump, LevelBump::Patch);
        assert_eq!(parsed.commit_type, "fix");
        assert_eq!(parsed.scope.as_deref(), Some("cli"));
        assert_eq!(parsed.descriptions, vec!["correct some text"]);
        assert!(std::ptr::eq(parsed.commit, &commit));
    }

    #[test]
    fn test_classify_unparsed() {
        let convention = Convention::angular(BodyAnalyzer::default());
        let commit = make_commit("Initial commit");
        match convention.classify(&commit) {
            ParseResult::Unparsed(error) => {
                assert_eq!(error.message, "Initial commit");
                assert!(!error.reason.is_empty());
            }
            other => panic!("expected unparsed, got {:?}", other),
        }
    }

    #[test]
    fn test_breaking_marker_beats_subject_type() {
        for name in ["angular", "emoji", "scipy", "tag"] {
            let convention = Convention::builtin(name, BodyAnalyzer::default()).unwrap();
            let parsed = convention
                .parse_message("whatever subject\n\nBREAKING CHANGE: reworked X")
                .unwrap();
            assert_eq!(parsed.bump, LevelBump::Major, "{}", name);
            assert_eq!(parsed.commit_type, convention.unknown_label());
            assert_eq!(parsed.breaking_descriptions, vec!["reworked X"]);
        }
    }

    #[test]
    fn test_classification_is_idempotent() {
        let convention = Convention::angular(BodyAnalyzer::default());
        let message = "feat(api)!: new endpoint\n\nBody text\n\nCloses #5";
        assert_eq!(
            convention.parse_message(message),
            convention.parse_message(message)
        );
    }

    #[test]
    fn test_with_options() {
        let options = ParserOptionsConfig {
            allowed_tags: vec!["feat".into(), "chore".into()],
            major_tags: vec!["chore".into()],
            ..Default::default()
        };
        let convention = Convention::angular(BodyAnalyzer::default()).with_options(&options);

        assert_eq!(convention.parse_message("chore: tidy").unwrap().bump, LevelBump::Major);
        assert_eq!(convention.parse_message("feat: thing").unwrap().bump, LevelBump::None);
        assert!(convention.parse_message("fix: thing").is_err());
    }
}
