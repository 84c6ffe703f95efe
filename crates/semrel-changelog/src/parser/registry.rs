//! Convention registry

use indexmap::IndexMap;
use tracing::{debug, instrument};

use semrel_core::config::CommitParserConfig;
use semrel_core::{ConventionError, Result};

use super::{BodyAnalyzer, Convention};

/// Registry of available commit conventions, keyed by name
#[derive(Debug, Clone)]
pub struct ConventionRegistry {
    conventions: IndexMap<String, Convention>,
}

impl ConventionRegistry {
    /// Create a registry with all built-in conventions
    pub fn new() -> Result<Self> {
        Self::with_body(BodyAnalyzer::default())
    }

    /// Create a registry with the built-ins sharing one body analyzer
    pub fn with_body(body: BodyAnalyzer) -> Result<Self> {
        let mut registry = Self::empty();
        registry.register(Convention::angular(body.clone()))?;
        registry.register(Convention::emoji(body.clone()))?;
        registry.register(Convention::scipy(body.clone())?)?;
        registry.register(Convention::tag(body))?;
        Ok(registry)
    }

    /// Build the registry described by the commit parser configuration.
    ///
    /// Tag-table overrides apply to the configured convention only.
    #[instrument(skip(config), fields(convention = %config.convention))]
    pub fn from_config(config: &CommitParserConfig) -> Result<Self> {
        let body = BodyAnalyzer::new(&config.breaking_marker, &config.issue_closure_keywords)?;
        let mut registry = Self::with_body(body)?;

        if let Some(options) = &config.options {
            let convention = registry
                .conventions
                .shift_remove(&config.convention)
                .ok_or_else(|| ConventionError::UnknownConvention(config.convention.clone()))?;
            registry.register(convention.with_options(options))?;
        }

        Ok(registry)
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            conventions: IndexMap::new(),
        }
    }

    /// Validate and register a convention, replacing one with the same name
    pub fn register(&mut self, convention: Convention) -> Result<()> {
        convention.validate()?;
        debug!(
            name = convention.name(),
            rules = convention.rule_set().rules().len(),
            "registered convention"
        );
        self.conventions
            .insert(convention.name().to_string(), convention);
        Ok(())
    }

    /// Get a convention by name
    pub fn get(&self, name: &str) -> Result<&Convention> {
        self.conventions
            .get(name)
            .ok_or_else(|| ConventionError::UnknownConvention(name.to_string()).into())
    }

    /// Names of all registered conventions
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.conventions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{CommitParser, CommitRule, RuleSet, TextPrefixConvention};
    use semrel_core::config::ParserOptionsConfig;
    use semrel_core::{LevelBump, SemrelError};

    #[test]
    fn test_registry_creation() {
        let registry = ConventionRegistry::new().unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["angular", "emoji", "scipy", "tag"]);
    }

    #[test]
    fn test_unknown_convention() {
        let registry = ConventionRegistry::new().unwrap();
        assert!(matches!(
            registry.get("tag"),
            Err(SemrelError::Convention(ConventionError::UnknownConvention(_)))
        ));
    }

    #[test]
    fn test_empty_registry() {
        let registry = ConventionRegistry::empty();
        assert!(registry.get("angular").is_err());
        assert_eq!(registry.names().count(), 0);
    }

    #[test]
    fn test_register_rejects_ambiguous_rules() {
        let rules = RuleSet::new(
            "custom",
            vec![
                CommitRule::new("feat", LevelBump::Minor, "feature", "Features"),
                CommitRule::new("feat", LevelBump::Patch, "feature", "Features"),
            ],
            "unknown",
        );
        let convention =
            Convention::TextPrefix(TextPrefixConvention::new(rules, BodyAnalyzer::default()));

        let mut registry = ConventionRegistry::empty();
        let err = registry.register(convention).unwrap_err();
        assert!(matches!(
            err,
            SemrelError::Convention(ConventionError::AmbiguousCommitRule { .. })
        ));
    }

    #[test]
    fn test_from_config_uses_breaking_marker() {
        let config = CommitParserConfig {
            breaking_marker: r"^BREAKS:\s*".to_string(),
            ..Default::default()
        };
        let registry = ConventionRegistry::from_config(&config).unwrap();
        let angular = registry.get("angular").unwrap();

        let parsed = angular.parse_message("fix: x\n\nBREAKS: api").unwrap();
        assert_eq!(parsed.bump, LevelBump::Major);
        let parsed = angular.parse_message("fix: x\n\nBREAKING CHANGE: api").unwrap();
        assert_eq!(parsed.bump, LevelBump::Patch);
    }

    #[test]
    fn test_from_config_applies_options() {
        let config = CommitParserConfig {
            convention: "emoji".to_string(),
            options: Some(ParserOptionsConfig {
                allowed_tags: vec![":boom:".into(), ":broom:".into()],
                major_tags: vec![":boom:".into()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let registry = ConventionRegistry::from_config(&config).unwrap();

        let emoji = registry.get("emoji").unwrap();
        assert_eq!(emoji.rule_set().rules().len(), 2);
        assert_eq!(
            emoji.parse_message(":broom: tidy").unwrap().bump,
            LevelBump::None
        );
        // other conventions keep their tables
        assert!(registry.get("angular").unwrap().rule_set().find("feat").is_some());
    }

    #[test]
    fn test_from_config_rejects_bad_marker() {
        let config = CommitParserConfig {
            breaking_marker: "(".to_string(),
            ..Default::default()
        };
        assert!(ConventionRegistry::from_config(&config).is_err());
    }
}
