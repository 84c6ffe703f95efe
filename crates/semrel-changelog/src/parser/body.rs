//! Message body analysis: breaking-change notes, paragraphs and issue references

use std::sync::LazyLock;

use regex::Regex;

use semrel_core::config::defaults::{issue_closure_keywords, DEFAULT_BREAKING_MARKER};
use semrel_core::{ConventionError, Result};

/// Issue references: `#12`, `org/repo#4`, `GH-3`
static ISSUE_REF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[\w.-]+/[\w.-]+)?#\d+|\b[A-Z][A-Z0-9]*-\d+\b").expect("Invalid regex")
});

/// What a message body contributes to a classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyAnalysis {
    /// Body paragraphs with breaking-change lines removed
    pub paragraphs: Vec<String>,
    /// Breaking-change notes with the marker stripped
    pub breaking: Vec<String>,
    /// Referenced issues from issue-closure lines
    pub issues: Vec<String>,
}

/// Detects breaking-change markers and issue-closure lines
#[derive(Debug, Clone)]
pub struct BodyAnalyzer {
    breaking_marker: Regex,
    issue_keywords: Vec<String>,
}

impl BodyAnalyzer {
    /// Build an analyzer from a marker pattern and closure keywords
    pub fn new(breaking_marker: &str, issue_keywords: &[String]) -> Result<Self> {
        let breaking_marker =
            Regex::new(breaking_marker).map_err(|e| ConventionError::InvalidPattern {
                pattern: breaking_marker.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            breaking_marker,
            issue_keywords: issue_keywords.iter().map(|k| k.to_lowercase()).collect(),
        })
    }

    pub fn breaking_marker(&self) -> &Regex {
        &self.breaking_marker
    }

    /// Marker-stripped text of a breaking-change line
    pub fn breaking_text(&self, line: &str) -> Option<String> {
        let line = line.trim();
        self.breaking_marker
            .find(line)
            .map(|m| format!("{}{}", &line[..m.start()], &line[m.end()..]).trim().to_string())
    }

    /// Issue references on an issue-closure line
    pub fn closed_issues(&self, line: &str) -> Vec<String> {
        let line = line.trim();
        let Some((keyword, rest)) = line.split_once(|c: char| c.is_whitespace() || c == ':')
        else {
            return Vec::new();
        };

        if !self.issue_keywords.contains(&keyword.to_lowercase()) {
            return Vec::new();
        }

        ISSUE_REF_REGEX
            .find_iter(rest)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Analyze the part of a message after the subject line
    pub fn analyze(&self, body: &str) -> BodyAnalysis {
        let mut analysis = BodyAnalysis::default();

        for paragraph in body.split("\n\n") {
            let mut kept = Vec::new();

            for line in paragraph.lines().map(str::trim).filter(|l| !l.is_empty()) {
                if let Some(note) = self.breaking_text(line) {
                    analysis.breaking.push(note);
                    continue;
                }

                for issue in self.closed_issues(line) {
                    if !analysis.issues.contains(&issue) {
                        analysis.issues.push(issue);
                    }
                }
                kept.push(line);
            }

            if !kept.is_empty() {
                analysis.paragraphs.push(kept.join(" "));
            }
        }

        analysis
    }
}

impl Default for BodyAnalyzer {
    fn default() -> Self {
        Self {
            breaking_marker: Regex::new(DEFAULT_BREAKING_MARKER).expect("Invalid regex"),
            issue_keywords: issue_closure_keywords()
                .into_iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }
}
