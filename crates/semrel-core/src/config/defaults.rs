//! Default configuration values

use super::types::Config;

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "semrel.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "semrel.yaml";

/// Default breaking-change marker, matched per line
pub const DEFAULT_BREAKING_MARKER: &str = r"^BREAKING[ -]CHANGE:\s*";

/// Keywords that close issues from a commit footer
pub const ISSUE_CLOSURE_KEYWORDS: &[&str] = &[
    "Close",
    "Closes",
    "Closed",
    "Closing",
    "Fix",
    "Fixes",
    "Fixed",
    "Fixing",
    "Resolve",
    "Resolves",
    "Resolved",
    "Resolving",
    "Implement",
    "Implements",
    "Implemented",
    "Implementing",
];

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".semrel.toml",
        ".semrel.yaml",
    ]
}

/// Owned copy of [`ISSUE_CLOSURE_KEYWORDS`]
pub fn issue_closure_keywords() -> Vec<String> {
    ISSUE_CLOSURE_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

/// Generate default configuration TOML
pub fn default_config_toml() -> String {
    toml::to_string_pretty(&Config::default()).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Generate default configuration YAML
pub fn default_config_yaml() -> String {
    serde_yaml::to_string(&Config::default()).unwrap_or_default()
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# semrel configuration

[versioning]
tag_format = "v{version}"
initial_version = "0.1.0"
major_on_zero = true
prerelease = false
prerelease_token = "rc"

[commit_parser]
convention = "angular"

[git]
tag_message = "{version}"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_toml_roundtrips() {
        let rendered = default_config_toml();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.versioning.tag_format, "v{version}");
        assert_eq!(parsed.commit_parser.convention, "angular");
        assert_eq!(parsed.commit_parser.issue_closure_keywords.len(), 16);
    }

    #[test]
    fn test_template_parses() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(parsed.versioning.initial_version, "0.1.0");
    }
}
