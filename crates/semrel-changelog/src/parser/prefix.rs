//! Textual prefix conventions (angular style)
//!
//! Subjects look like `type(scope)!: summary`. The scope and the `!`
//! breaking flag are optional.

use std::sync::LazyLock;

use regex::Regex;

use semrel_core::LevelBump;

use super::{assemble, split_message, BodyAnalyzer, CommitRule, RuleSet, SubjectMatch};
use crate::types::ParsedMessage;

/// Regex for parsing prefixed subjects
static PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>\w+)(?:\((?P<scope>[^)\n]*)\))?(?P<breaking>!)?:\s+(?P<summary>\S.*)$")
        .expect("Invalid regex")
});

/// The angular rule table
pub fn angular_rules() -> RuleSet {
    RuleSet::new(
        "angular",
        vec![
            CommitRule::new("build", LevelBump::None, "build", "Build System"),
            CommitRule::new("chore", LevelBump::None, "chore", "Chores"),
            CommitRule::new("ci", LevelBump::None, "ci", "Continuous Integration"),
            CommitRule::new("docs", LevelBump::None, "documentation", "Documentation"),
            CommitRule::new("feat", LevelBump::Minor, "feature", "Features"),
            CommitRule::new("fix", LevelBump::Patch, "fix", "Bug Fixes"),
            CommitRule::new("perf", LevelBump::Patch, "performance", "Performance Improvements"),
            CommitRule::new("refactor", LevelBump::None, "refactoring", "Code Refactoring"),
            CommitRule::new("style", LevelBump::None, "style", "Code Style"),
            CommitRule::new("test", LevelBump::None, "test", "Testing"),
        ],
        "unknown",
    )
}

/// Convention matching subjects on a leading `type(scope)!:` prefix
#[derive(Debug, Clone)]
pub struct TextPrefixConvention {
    pub(crate) rules: RuleSet,
    pub(crate) body: BodyAnalyzer,
}

impl TextPrefixConvention {
    pub fn new(rules: RuleSet, body: BodyAnalyzer) -> Self {
        Self { rules, body }
    }

    fn match_subject(&self, subject: &str) -> Result<SubjectMatch<'_>, String> {
        let caps = PREFIX_REGEX
            .captures(subject)
            .ok_or_else(|| format!("subject does not follow the {} format", self.rules.name()))?;

        let commit_type = &caps["type"];
        let rule = self
            .rules
            .find(commit_type)
            .ok_or_else(|| format!("unknown commit type '{}'", commit_type))?;

        Ok(SubjectMatch {
            rule,
            scope: caps
                .name("scope")
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            summary: caps["summary"].trim().to_string(),
            breaking: caps.name("breaking").is_some(),
        })
    }

    /// Parse a commit message
    pub fn parse_message(&self, message: &str) -> Result<ParsedMessage, String> {
        let (subject, _) = split_message(message);
        assemble(&self.rules, &self.body, message, self.match_subject(subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> TextPrefixConvention {
        TextPrefixConvention::new(angular_rules(), BodyAnalyzer::default())
    }

    #[test]
    fn test_parse_simple_feat() {
        let parsed = parser().parse_message("feat: add new feature").unwrap();

        assert_eq!(parsed.bump, LevelBump::Minor);
        assert_eq!(parsed.commit_type, "feature");
        assert_eq!(parsed.descriptions, vec!["add new feature"]);
        assert!(parsed.scope.is_none());
        assert!(parsed.breaking_descriptions.is_empty());
    }

    #[test]
    fn test_parse_with_scope() {
        let parsed = parser().parse_message("fix(cli): correct some text").unwrap();

        assert_eq!(parsed.bump, LevelBump::Patch);
        assert_eq!(parsed.commit_type, "fix");
        assert_eq!(parsed.scope, Some("cli".to_string()));
        assert_eq!(parsed.descriptions, vec!["correct some text"]);
    }

    #[test]
    fn test_empty_scope_is_none() {
        let parsed = parser().parse_message("fix(): correct some text").unwrap();
        assert!(parsed.scope.is_none());
    }

    #[test]
    fn test_chore_does_not_bump() {
        let parsed = parser().parse_message("ci: added a commit lint job\n").unwrap();
        assert_eq!(parsed.bump, LevelBump::None);
        assert_eq!(parsed.commit_type, "ci");
    }

    #[test]
    fn test_parse_breaking_change_marker() {
        let parsed = parser().parse_message("feat!: breaking change").unwrap();

        assert_eq!(parsed.bump, LevelBump::Major);
        assert_eq!(parsed.breaking_descriptions, vec!["breaking change"]);
    }

    #[test]
    fn test_parse_breaking_with_scope() {
        let parsed = parser().parse_message("refactor(core)!: major refactoring").unwrap();

        assert_eq!(parsed.commit_type, "refactoring");
        assert_eq!(parsed.scope, Some("core".to_string()));
        assert_eq!(parsed.bump, LevelBump::Major);
    }

    #[test]
    fn test_breaking_footer_replaces_summary_note() {
        let parsed = parser()
            .parse_message(
                "fix!: big change\n\nBREAKING CHANGE: reworked something for previous feature\n",
            )
            .unwrap();

        assert_eq!(parsed.bump, LevelBump::Major);
        assert_eq!(parsed.commit_type, "fix");
        assert_eq!(
            parsed.breaking_descriptions,
            vec!["reworked something for previous feature"]
        );
        assert_eq!(parsed.descriptions, vec!["big change"]);
    }

    #[test]
    fn test_breaking_footer_on_docs_commit() {
        let parsed = parser()
            .parse_message("docs: update readme\n\nBREAKING CHANGE: reworked X")
            .unwrap();
        assert_eq!(parsed.bump, LevelBump::Major);
        assert_eq!(parsed.commit_type, "documentation");
    }

    #[test]
    fn test_parse_with_body() {
        let parsed = parser()
            .parse_message("feat: add feature\n\nThis is the body\n\nWith multiple paragraphs.")
            .unwrap();
        assert_eq!(
            parsed.descriptions,
            vec!["add feature", "This is the body", "With multiple paragraphs."]
        );
    }

    #[test]
    fn test_issue_closure_is_annotation_only() {
        let parsed = parser()
            .parse_message("docs: explain setup\n\nResolves #123")
            .unwrap();
        assert_eq!(parsed.bump, LevelBump::None);
        assert_eq!(parsed.linked_issues, vec!["#123"]);
        assert_eq!(parsed.descriptions, vec!["explain setup", "Resolves #123"]);
    }

    #[test]
    fn test_parse_non_conventional() {
        let err = parser().parse_message("Just a regular commit message").unwrap_err();
        assert!(err.contains("angular"));
    }

    #[test]
    fn test_unknown_type() {
        let err = parser().parse_message("wip: half done").unwrap_err();
        assert!(err.contains("wip"));
    }
}
