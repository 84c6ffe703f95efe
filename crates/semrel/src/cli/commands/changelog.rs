//! Changelog command

use std::fmt::{self, Write};

use clap::Args;
use console::style;
use tracing::info;

use semrel_changelog::{Convention, Elements, ReleaseHistory};
use semrel_git::GitRepo;
use semrel_version::TagFormat;

use crate::cli::{history_builder, load_config, load_registry, Cli, OutputFormat};

/// Show the release history
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    /// Only show changes since the latest release
    #[arg(long)]
    pub unreleased: bool,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(unreleased = self.unreleased, "executing changelog command");
        let cwd = std::env::current_dir()?;
        let config = load_config(&cwd)?;

        let tag_format = TagFormat::new(config.versioning.tag_format.as_str())?;
        let registry = load_registry(&config)?;
        let convention = registry.get(&config.commit_parser.convention)?;
        let builder = history_builder(convention, &config.versioning)?;

        let repo = GitRepo::discover(&cwd)?;
        let commits = repo.all_commits()?;
        let tags = repo.tags()?;
        let history = builder.replay(&commits, &tags, &tag_format);

        match cli.format {
            OutputFormat::Json => {
                if self.unreleased {
                    println!("{}", serde_json::to_string_pretty(&history.unreleased)?);
                } else {
                    println!("{}", serde_json::to_string_pretty(&history)?);
                }
            }
            OutputFormat::Text => {
                if history.is_empty() {
                    if !cli.quiet {
                        println!("{}", style("No commits found.").yellow());
                    }
                    return Ok(());
                }
                print!(
                    "{}",
                    render_history(&history, convention, UNRELEASED_HEADING, self.unreleased)?
                );
            }
        }

        Ok(())
    }
}

/// Heading for commits made since the latest release
pub(crate) const UNRELEASED_HEADING: &str = "Unreleased";

/// Render a history as plain text sections, newest first.
///
/// `unreleased_heading` names the section for commits not yet released.
pub(crate) fn render_history(
    history: &ReleaseHistory<'_>,
    convention: &Convention,
    unreleased_heading: &str,
    unreleased_only: bool,
) -> anyhow::Result<String> {
    let mut out = String::new();
    write_history(&mut out, history, convention, unreleased_heading, unreleased_only)?;
    Ok(out)
}

fn write_history(
    out: &mut impl Write,
    history: &ReleaseHistory<'_>,
    convention: &Convention,
    unreleased_heading: &str,
    unreleased_only: bool,
) -> fmt::Result {
    if !history.unreleased.is_empty() {
        writeln!(out, "## {}", unreleased_heading)?;
        write_elements(out, &history.unreleased, convention)?;
    }

    if unreleased_only {
        return Ok(());
    }

    for release in history.released() {
        writeln!(
            out,
            "## {} ({})",
            release.version,
            release.tagged_date.format("%Y-%m-%d")
        )?;
        write_elements(out, &release.elements, convention)?;
    }
    Ok(())
}

fn write_elements(out: &mut impl Write, elements: &Elements<'_>, convention: &Convention) -> fmt::Result {
    let mut breaking = Vec::new();

    for (label, commits) in elements.iter() {
        writeln!(out, "\n### {}\n", convention.section_for(label))?;
        for commit in commits {
            let summary = match commit.as_parsed() {
                Some(parsed) => {
                    breaking.extend(parsed.breaking_descriptions.iter().cloned());
                    match &parsed.scope {
                        Some(scope) => format!("**{}:** {}", scope, parsed.summary()),
                        None => parsed.summary().to_string(),
                    }
                }
                None => commit.summary().to_string(),
            };
            writeln!(out, "- {} ({})", summary, commit.commit().short_hash)?;
        }
    }

    if !breaking.is_empty() {
        out.write_str("\n### BREAKING CHANGES\n\n")?;
        for note in breaking {
            writeln!(out, "- {}", note)?;
        }
    }

    out.write_char('\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use semrel_changelog::parser::BodyAnalyzer;
    use semrel_changelog::ReleaseHistoryBuilder;
    use semrel_git::{Actor, CommitInfo, TagInfo};

    fn commit(hash: &str, message: &str) -> CommitInfo {
        CommitInfo::from_raw_message(
            hash,
            message,
            Actor::new("semantic-release", "not-a.real@email.com"),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_render_history() {
        let convention = Convention::angular(BodyAnalyzer::default());
        let builder = ReleaseHistoryBuilder::new(&convention);
        let commits = vec![
            commit("aaaaaaaaaa", "feat(cli): add a new feature"),
            commit("bbbbbbbbbb", "fix!: big change\n\nBREAKING CHANGE: reworked something"),
            commit("cccccccccc", "Initial work"),
        ];
        let tags = vec![TagInfo::new("v1.0.0", "aaaaaaaaaa")];

        let history = builder.replay(&commits, &tags, &TagFormat::default());
        let text = render_history(&history, &convention, UNRELEASED_HEADING, false).unwrap();

        assert!(text.starts_with("## Unreleased\n"));
        assert!(text.contains("### Bug Fixes\n\n- big change (bbbbbbb)"));
        assert!(text.contains("### BREAKING CHANGES\n\n- reworked something"));
        assert!(text.contains("### unknown\n\n- Initial work (ccccccc)"));
        assert!(text.contains("## v1.0.0 (2024-03-01)"));
        assert!(text.contains("### Features\n\n- **cli:** add a new feature (aaaaaaa)"));

        let unreleased = render_history(&history, &convention, UNRELEASED_HEADING, true).unwrap();
        assert!(!unreleased.contains("v1.0.0"));
    }

    #[test]
    fn test_write_errors_are_reported() {
        struct Refuse;
        impl Write for Refuse {
            fn write_str(&mut self, _: &str) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let convention = Convention::angular(BodyAnalyzer::default());
        let builder = ReleaseHistoryBuilder::new(&convention);
        let commits = vec![commit("aaaaaaaaaa", "fix: a bug")];
        let history = builder.replay(&commits, &[], &TagFormat::default());

        let result = write_history(&mut Refuse, &history, &convention, UNRELEASED_HEADING, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_unreleased_heading() {
        let convention = Convention::angular(BodyAnalyzer::default());
        let builder = ReleaseHistoryBuilder::new(&convention);
        let commits = vec![commit("aaaaaaaaaa", "feat: first feature")];
        let history = builder.replay(&commits, &[], &TagFormat::default());

        let text = render_history(&history, &convention, "v0.1.0 (2024-03-01)", false).unwrap();
        assert!(text.starts_with("## v0.1.0 (2024-03-01)\n"));
        assert!(!text.contains("Unreleased"));
    }
}
