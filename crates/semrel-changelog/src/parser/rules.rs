//! Rule tables shared by every convention

use std::collections::HashSet;

use regex::Regex;
use tracing::warn;

use semrel_core::config::ParserOptionsConfig;
use semrel_core::{ConventionError, LevelBump, Result};

/// Maps one trigger token to its bump level, type label and changelog section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRule {
    /// Token the subject is matched on (e.g. "feat", ":bug:", "ENH")
    pub trigger: String,
    pub bump: LevelBump,
    /// Label commits are bucketed under
    pub type_label: String,
    /// Changelog section title
    pub section: String,
}

impl CommitRule {
    pub fn new(
        trigger: impl Into<String>,
        bump: LevelBump,
        type_label: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            bump,
            type_label: type_label.into(),
            section: section.into(),
        }
    }
}

/// A named, ordered set of rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    rules: Vec<CommitRule>,
    unknown_label: String,
}

impl RuleSet {
    /// Create a rule set; `unknown_label` names the bucket for unrecognised commits
    pub fn new(
        name: impl Into<String>,
        rules: Vec<CommitRule>,
        unknown_label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rules,
            unknown_label: unknown_label.into(),
        }
    }

    /// Convention name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[CommitRule] {
        &self.rules
    }

    /// Bucket label for commits no rule recognises
    pub fn unknown_label(&self) -> &str {
        &self.unknown_label
    }

    /// Find the rule for an exact trigger token
    pub fn find(&self, trigger: &str) -> Option<&CommitRule> {
        self.rules.iter().find(|r| r.trigger == trigger)
    }

    /// Changelog section for a type label; unknown labels are their own section
    pub fn section_for<'a>(&'a self, type_label: &'a str) -> &'a str {
        self.rules
            .iter()
            .find(|r| r.type_label == type_label)
            .map(|r| r.section.as_str())
            .unwrap_or(type_label)
    }

    /// Replace the rules with tables built from parser options.
    ///
    /// Allowed tags that already have a rule keep its label and section.
    pub fn with_options(self, options: &ParserOptionsConfig) -> Self {
        let rules = options
            .allowed_tags
            .iter()
            .map(|tag| {
                let bump = if options.major_tags.contains(tag) {
                    LevelBump::Major
                } else if options.minor_tags.contains(tag) {
                    LevelBump::Minor
                } else if options.patch_tags.contains(tag) {
                    LevelBump::Patch
                } else {
                    options.default_bump_level
                };

                match self.find(tag) {
                    Some(existing) => CommitRule::new(
                        tag.as_str(),
                        bump,
                        existing.type_label.as_str(),
                        existing.section.as_str(),
                    ),
                    None => CommitRule::new(tag.as_str(), bump, tag.as_str(), tag.as_str()),
                }
            })
            .collect();

        Self { rules, ..self }
    }

    /// Check the table is usable with the given breaking-change marker.
    ///
    /// Duplicate triggers and triggers the marker would also match are
    /// errors. Bump levels no rule can produce only warn.
    pub fn validate(&self, breaking_marker: &Regex) -> Result<()> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.trigger.as_str()) {
                return Err(ConventionError::AmbiguousCommitRule {
                    convention: self.name.clone(),
                    trigger: rule.trigger.clone(),
                }
                .into());
            }

            if breaking_marker.is_match(&rule.trigger)
                || breaking_marker.is_match(&format!("{}: ", rule.trigger))
            {
                return Err(ConventionError::BreakingMarkerCollision {
                    convention: self.name.clone(),
                    trigger: rule.trigger.clone(),
                }
                .into());
            }
        }

        // The breaking-change marker always reaches MAJOR
        for level in [LevelBump::Patch, LevelBump::Minor] {
            if !self.rules.iter().any(|r| r.bump == level) {
                warn!(convention = %self.name, %level, "no rule produces this bump level");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semrel_core::config::defaults::DEFAULT_BREAKING_MARKER;
    use semrel_core::SemrelError;

    fn marker() -> Regex {
        Regex::new(DEFAULT_BREAKING_MARKER).unwrap()
    }

    fn sample() -> RuleSet {
        RuleSet::new(
            "sample",
            vec![
                CommitRule::new("feat", LevelBump::Minor, "feature", "Features"),
                CommitRule::new("fix", LevelBump::Patch, "fix", "Bug Fixes"),
                CommitRule::new("chore", LevelBump::None, "chore", "Chores"),
            ],
            "unknown",
        )
    }

    #[test]
    fn test_find_and_sections() {
        let rules = sample();
        assert_eq!(rules.find("feat").unwrap().type_label, "feature");
        assert!(rules.find("Feat").is_none());
        assert_eq!(rules.section_for("feature"), "Features");
        assert_eq!(rules.section_for("unknown"), "unknown");
    }

    #[test]
    fn test_validate_accepts_disjoint_rules() {
        assert!(sample().validate(&marker()).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_trigger() {
        let mut rules = sample().rules().to_vec();
        rules.push(CommitRule::new("fix", LevelBump::Minor, "fix", "Fixes"));
        let set = RuleSet::new("dup", rules, "unknown");

        let err = set.validate(&marker()).unwrap_err();
        assert!(matches!(
            err,
            SemrelError::Convention(ConventionError::AmbiguousCommitRule { ref trigger, .. })
                if trigger == "fix"
        ));
    }

    #[test]
    fn test_validate_rejects_marker_collision() {
        let set = RuleSet::new(
            "collide",
            vec![CommitRule::new("BREAKING CHANGE", LevelBump::Major, "breaking", "Breaking")],
            "unknown",
        );

        let err = set.validate(&marker()).unwrap_err();
        assert!(matches!(
            err,
            SemrelError::Convention(ConventionError::BreakingMarkerCollision { .. })
        ));
    }

    #[test]
    fn test_unreachable_level_only_warns() {
        let set = RuleSet::new(
            "docs-only",
            vec![CommitRule::new("docs", LevelBump::None, "documentation", "Documentation")],
            "unknown",
        );
        assert!(set.validate(&marker()).is_ok());
    }

    #[test]
    fn test_with_options_rebuilds_table() {
        let options = ParserOptionsConfig {
            allowed_tags: vec!["feat".into(), "fix".into(), "deps".into()],
            minor_tags: vec!["feat".into()],
            patch_tags: vec!["fix".into(), "deps".into()],
            ..Default::default()
        };

        let rules = sample().with_options(&options);
        assert_eq!(rules.rules().len(), 3);
        assert!(rules.find("chore").is_none());
        assert_eq!(rules.find("feat").unwrap().section, "Features");

        let deps = rules.find("deps").unwrap();
        assert_eq!(deps.bump, LevelBump::Patch);
        assert_eq!(deps.type_label, "deps");
    }

    #[test]
    fn test_with_options_default_bump() {
        let options = ParserOptionsConfig {
            allowed_tags: vec!["misc".into()],
            default_bump_level: LevelBump::Patch,
            ..Default::default()
        };

        let rules = sample().with_options(&options);
        assert_eq!(rules.find("misc").unwrap().bump, LevelBump::Patch);
    }
}
