//! Symbolic marker conventions (emoji and tag styles)

use semrel_core::LevelBump;

use super::{assemble, split_message, BodyAnalyzer, CommitRule, RuleSet, SubjectMatch};
use crate::types::ParsedMessage;

const MAJOR_MARKERS: &[&str] = &[":boom:"];

const MINOR_MARKERS: &[&str] = &[
    ":sparkles:",
    ":children_crossing:",
    ":lipstick:",
    ":iphone:",
    ":egg:",
    ":chart_with_upwards_trend:",
];

const PATCH_MARKERS: &[&str] = &[
    ":ambulance:",
    ":lock:",
    ":bug:",
    ":zap:",
    ":goal_net:",
    ":alien:",
    ":wheelchair:",
    ":speech_balloon:",
    ":mag:",
    ":apple:",
    ":penguin:",
    ":checkered_flag:",
    ":robot:",
    ":green_apple:",
];

/// The emoji rule table. Each marker is its own type label and section.
pub fn emoji_rules() -> RuleSet {
    let tiers = [
        (MAJOR_MARKERS, LevelBump::Major),
        (MINOR_MARKERS, LevelBump::Minor),
        (PATCH_MARKERS, LevelBump::Patch),
    ];

    let rules = tiers
        .into_iter()
        .flat_map(|(markers, bump)| {
            markers
                .iter()
                .map(move |marker| CommitRule::new(*marker, bump, *marker, *marker))
        })
        .collect();

    RuleSet::new("emoji", rules, "Other")
}

/// Marker that flags a feature under the tag convention
pub const TAG_MINOR_MARKER: &str = ":sparkles:";

/// Marker that flags a fix under the tag convention
pub const TAG_PATCH_MARKER: &str = ":nut_and_bolt:";

/// The tag rule table: one feature marker and one fix marker.
///
/// Breaking changes are only announced through the body marker.
pub fn tag_rules() -> RuleSet {
    RuleSet::new(
        "tag",
        vec![
            CommitRule::new(TAG_MINOR_MARKER, LevelBump::Minor, "feature", "Features"),
            CommitRule::new(TAG_PATCH_MARKER, LevelBump::Patch, "fix", "Fixes"),
        ],
        "unknown",
    )
}

/// Convention matching subjects that lead with a known marker.
///
/// Markers anywhere else in the message never change the type.
#[derive(Debug, Clone)]
pub struct SymbolicMarkerConvention {
    pub(crate) rules: RuleSet,
    pub(crate) body: BodyAnalyzer,
}

impl SymbolicMarkerConvention {
    pub fn new(rules: RuleSet, body: BodyAnalyzer) -> Self {
        Self { rules, body }
    }

    fn match_subject(&self, subject: &str) -> Result<SubjectMatch<'_>, String> {
        // Longest trigger wins when one marker is a prefix of another
        let rule = self
            .rules
            .rules()
            .iter()
            .filter(|r| subject.starts_with(r.trigger.as_str()))
            .max_by_key(|r| r.trigger.len())
            .ok_or_else(|| "subject does not start with a known marker".to_string())?;

        Ok(SubjectMatch {
            rule,
            scope: None,
            summary: subject[rule.trigger.len()..].trim().to_string(),
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

    fn parser() -> SymbolicMarkerConvention {
        SymbolicMarkerConvention::new(emoji_rules(), BodyAnalyzer::default())
    }

    #[test]
    fn test_rule_table() {
        let rules = emoji_rules();
        assert_eq!(rules.rules().len(), 21);
        assert_eq!(rules.find(":boom:").unwrap().bump, LevelBump::Major);
        assert_eq!(rules.section_for(":bug:"), ":bug:");
        assert_eq!(rules.unknown_label(), "Other");
    }

    #[test]
    fn test_patch_marker() {
        let parsed = parser()
            .parse_message(":bug: fixed voltage in the flux capacitor\n")
            .unwrap();
        assert_eq!(parsed.bump, LevelBump::Patch);
        assert_eq!(parsed.commit_type, ":bug:");
        assert_eq!(parsed.descriptions, vec!["fixed voltage in the flux capacitor"]);
    }

    #[test]
    fn test_leading_marker_only() {
        let parsed = parser()
            .parse_message(":sparkles::pencil: docs for something special\n")
            .unwrap();
        assert_eq!(parsed.bump, LevelBump::Minor);
        assert_eq!(parsed.commit_type, ":sparkles:");
    }

    #[test]
    fn test_body_marker_ignored() {
        let parsed = parser()
            .parse_message(":sparkles: last minute rush order\n\n:boom: Good thing we're 10x developers\n")
            .unwrap();
        assert_eq!(parsed.bump, LevelBump::Minor);
        assert_eq!(parsed.commit_type, ":sparkles:");
        assert!(parsed.breaking_descriptions.is_empty());
    }

    #[test]
    fn test_major_marker() {
        let parsed = parser().parse_message(":boom: Move to the blockchain\n").unwrap();
        assert_eq!(parsed.bump, LevelBump::Major);
    }

    #[test]
    fn test_tag_convention() {
        let parser = SymbolicMarkerConvention::new(tag_rules(), BodyAnalyzer::default());

        let feature = parser.parse_message(":sparkles: add a new feature").unwrap();
        assert_eq!(feature.bump, LevelBump::Minor);
        assert_eq!(feature.commit_type, "feature");
        assert_eq!(feature.descriptions, vec!["add a new feature"]);

        let fix = parser.parse_message(":nut_and_bolt: correct some text").unwrap();
        assert_eq!(fix.bump, LevelBump::Patch);
        assert_eq!(fix.commit_type, "fix");
        assert_eq!(tag_rules().section_for("fix"), "Fixes");

        let breaking = parser
            .parse_message(":nut_and_bolt: rework\n\nBREAKING CHANGE: config keys renamed")
            .unwrap();
        assert_eq!(breaking.bump, LevelBump::Major);
        assert_eq!(breaking.breaking_descriptions, vec!["config keys renamed"]);

        assert!(parser.parse_message(":bug: emoji markers mean nothing here").is_err());
        assert!(parser.parse_message("feat: nor do angular prefixes").is_err());
    }

    #[test]
    fn test_unknown_markers_are_unparsed() {
        assert!(parser().parse_message(":broom: updated lint & code style\n").is_err());
        assert!(parser().parse_message(":none: updated ci pipeline\n").is_err());
        assert!(parser().parse_message("fixed things :bug:").is_err());
    }
}
