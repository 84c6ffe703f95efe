//! Regex-driven conventions (scipy style)

use regex::Regex;

use semrel_core::{ConventionError, LevelBump};

use super::{assemble, split_message, BodyAnalyzer, CommitRule, RuleSet, SubjectMatch};
use crate::types::ParsedMessage;

/// Subject pattern for scipy commits: `TAG(scope): summary`, colon optional
pub const SCIPY_SUBJECT_PATTERN: &str =
    r"^(?P<tag>[A-Z]+)(?:\((?P<scope>[^)\n]*)\))?(?::\s*|\s+)(?P<summary>\S.*)$";

/// The scipy rule table
pub fn scipy_rules() -> RuleSet {
    let table: &[(&str, LevelBump, &str)] = &[
        ("API", LevelBump::Major, "Breaking"),
        ("DEP", LevelBump::Minor, "Deprecation"),
        ("DEV", LevelBump::Minor, "Development"),
        ("ENH", LevelBump::Minor, "Feature"),
        ("FEAT", LevelBump::Minor, "Feature"),
        ("REV", LevelBump::Minor, "Other"),
        ("BLD", LevelBump::Patch, "Build"),
        ("BUG", LevelBump::Patch, "Fix"),
        ("MAINT", LevelBump::Patch, "Fix"),
        ("BENCH", LevelBump::None, "Benchmark"),
        ("DOC", LevelBump::None, "Documentation"),
        ("STY", LevelBump::None, "Style"),
        ("TST", LevelBump::None, "Test"),
        ("TEST", LevelBump::None, "Test"),
        ("REL", LevelBump::None, "Release"),
    ];

    let rules = table
        .iter()
        .map(|(tag, bump, label)| CommitRule::new(*tag, *bump, *label, *label))
        .collect();

    RuleSet::new("scipy", rules, "Other")
}

/// Convention reading the subject with a regular expression.
///
/// The pattern must capture a `tag` group, which is looked up in the rule
/// table. Optional `scope` and `summary` groups fill those fields.
#[derive(Debug, Clone)]
pub struct RegexConvention {
    pub(crate) rules: RuleSet,
    pub(crate) body: BodyAnalyzer,
    subject: Regex,
}

impl RegexConvention {
    pub fn new(rules: RuleSet, pattern: &str, body: BodyAnalyzer) -> semrel_core::Result<Self> {
        let subject = Regex::new(pattern).map_err(|e| ConventionError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        if !subject.capture_names().flatten().any(|name| name == "tag") {
            return Err(ConventionError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "missing a named `tag` group".to_string(),
            }
            .into());
        }

        Ok(Self {
            rules,
            body,
            subject,
        })
    }

    fn match_subject(&self, subject: &str) -> Result<SubjectMatch<'_>, String> {
        let caps = self
            .subject
            .captures(subject)
            .ok_or_else(|| format!("subject does not follow the {} format", self.rules.name()))?;

        let tag = &caps["tag"];
        let rule = self
            .rules
            .find(tag)
            .ok_or_else(|| format!("unknown commit tag '{}'", tag))?;

        Ok(SubjectMatch {
            rule,
            scope: caps
                .name("scope")
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            summary: caps
                .name("summary")
                .map_or(subject, |m| m.as_str())
                .trim()
                .to_string(),
            breaking: false,
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

    fn parser() -> RegexConvention {
        RegexConvention::new(scipy_rules(), SCIPY_SUBJECT_PATTERN, BodyAnalyzer::default()).unwrap()
    }

    #[test]
    fn test_feature_tag() {
        let parsed = parser().parse_message("ENH: add new feature").unwrap();
        assert_eq!(parsed.bump, LevelBump::Minor);
        assert_eq!(parsed.commit_type, "Feature");
        assert_eq!(parsed.descriptions, vec!["add new feature"]);
    }

    #[test]
    fn test_maint_is_patch() {
        let parsed = parser().parse_message("MAINT: correct some text").unwrap();
        assert_eq!(parsed.bump, LevelBump::Patch);
        assert_eq!(parsed.commit_type, "Fix");
    }

    #[test]
    fn test_api_is_major() {
        let parsed = parser().parse_message("API(io): drop legacy reader").unwrap();
        assert_eq!(parsed.bump, LevelBump::Major);
        assert_eq!(parsed.scope.as_deref(), Some("io"));
        assert_eq!(parsed.commit_type, "Breaking");
    }

    #[test]
    fn test_colon_is_optional() {
        let parsed = parser().parse_message("DOC update the tutorial").unwrap();
        assert_eq!(parsed.bump, LevelBump::None);
        assert_eq!(parsed.commit_type, "Documentation");
        assert_eq!(parsed.descriptions, vec!["update the tutorial"]);
    }

    #[test]
    fn test_unknown_tag() {
        let err = parser().parse_message("WIP: nothing yet").unwrap_err();
        assert!(err.contains("WIP"));
        assert!(parser().parse_message("lowercase: nope").is_err());
    }

    #[test]
    fn test_pattern_requires_tag_group() {
        assert!(RegexConvention::new(scipy_rules(), r"^(?P<kind>\w+):", BodyAnalyzer::default()).is_err());
        assert!(RegexConvention::new(scipy_rules(), r"^(unclosed", BodyAnalyzer::default()).is_err());
    }

    #[test]
    fn test_pattern_without_summary_group() {
        let convention =
            RegexConvention::new(scipy_rules(), r"^(?P<tag>[A-Z]+)\b", BodyAnalyzer::default()).unwrap();
        let parsed = convention.parse_message("BUG fix overflow").unwrap();
        assert_eq!(parsed.descriptions, vec!["BUG fix overflow"]);
    }
}
