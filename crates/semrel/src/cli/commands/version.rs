//! Version command

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use semrel_changelog::{Convention, ReleaseDecision, ReleaseHistory, ReleaseHistoryBuilder, TagMetadata};
use semrel_core::LevelBump;
use semrel_git::{CommitInfo, GitRepo};
use semrel_version::TagFormat;

use super::changelog::render_history;
use crate::cli::{history_builder, load_config, load_registry, output, Cli, OutputFormat};

/// Calculate the next version
#[derive(Debug, Args)]
pub struct VersionCommand {
    /// Only print the next version
    #[arg(long)]
    pub print: bool,

    /// Create the release tag
    #[arg(long)]
    pub tag: bool,

    /// Produce a prerelease version
    #[arg(long)]
    pub prerelease: bool,

    /// Force a bump level (major, minor, patch, prerelease)
    #[arg(long, value_name = "LEVEL")]
    pub force: Option<LevelBump>,

    /// Write the changelog, with the new release as its top section, to FILE
    #[arg(long, value_name = "FILE")]
    pub changelog: Option<PathBuf>,

    /// Commit the written changelog as the release commit
    #[arg(long, requires = "changelog")]
    pub commit: bool,
}

#[derive(Debug, Serialize)]
struct VersionOutput {
    current: Option<String>,
    next: Option<String>,
    level: LevelBump,
    commits: usize,
    tag: Option<String>,
    committed: Option<String>,
    tagged: bool,
}

impl VersionCommand {
    /// Execute the version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(print = self.print, tag = self.tag, prerelease = self.prerelease, force = ?self.force, "executing version command");
        let cwd = std::env::current_dir()?;
        let config = load_config(&cwd)?;

        let tag_format = TagFormat::new(config.versioning.tag_format.as_str())?;
        let registry = load_registry(&config)?;
        let convention = registry.get(&config.commit_parser.convention)?;

        let mut versioning = config.versioning.clone();
        versioning.prerelease |= self.prerelease;
        let builder = history_builder(convention, &versioning)?.with_forced_level(self.force);

        let repo = GitRepo::discover(&cwd)?;
        let latest = repo.find_latest_version_tag(&tag_format)?;
        let commits = match &latest {
            Some((tag, _)) => repo.commits_since_tag(&tag.name)?,
            None => repo.all_commits()?,
        };

        let current = latest.as_ref().map(|(_, version)| version);
        let mut result = VersionOutput {
            current: current.map(|v| v.to_string()),
            next: None,
            level: LevelBump::None,
            commits: commits.len(),
            tag: None,
            committed: None,
            tagged: false,
        };

        let pending = match builder.fold(ReleaseHistory::new(), current, &commits)? {
            ReleaseDecision::NoRelease(_) => return self.output(&result, cli),
            ReleaseDecision::Release(pending) => pending,
        };

        let next = pending.next_version().clone().with_tag_prefix(tag_format.prefix());
        let tag_name = tag_format.render(&next);
        result.level = pending.level();
        result.next = Some(next.to_string());
        result.tag = Some(tag_name.clone());

        if let Some(file) = &self.changelog {
            let heading = format!("{} ({})", tag_name, Utc::now().format("%Y-%m-%d"));
            write_changelog(&repo, &builder, convention, &tag_format, &heading, file)?;
            info!(file = %file.display(), "changelog written");

            if self.commit {
                let message = config.git.render_commit_message(&next.as_semver_str());
                let release_commit = commit_changelog(&repo, file, &message)?;
                result.committed = Some(release_commit.short_hash);
            }
        }

        if self.tag {
            let message = config.git.render_tag_message(&next.as_semver_str());
            let tag = repo.create_tag(&tag_name, &message)?;
            let tagged_commit = repo.get_commit(&tag.commit_hash)?;
            let history = pending
                .finalize(TagMetadata::from_tag(&tag, &tagged_commit))
                .map_err(|stale| anyhow::anyhow!("{} is not newer than the latest release", stale))?;

            info!(
                tag = %tag_name,
                commits = history.latest_release().map_or(0, |r| r.elements.commit_count()),
                "release tagged"
            );
            result.tagged = true;
        }

        self.output(&result, cli)
    }

    fn output(&self, result: &VersionOutput, cli: &Cli) -> anyhow::Result<()> {
        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(result)?);
            }
            OutputFormat::Text => {
                let Some(next) = &result.next else {
                    if !cli.quiet {
                        println!("no release needed");
                    }
                    return Ok(());
                };

                if self.print || cli.quiet {
                    println!("{}", next);
                    return Ok(());
                }

                println!("{}\n", output::title("Next release"));
                output::field(
                    "Current version",
                    style(result.current.as_deref().unwrap_or("none")).cyan(),
                );
                output::field("Next version", output::version(next));
                output::field("Bump level", style(result.level).yellow());
                output::field("Commits analyzed", result.commits);

                if let Some(hash) = &result.committed {
                    output::done(format_args!("Committed release as {}", style(hash).dim()));
                }
                if let (true, Some(tag)) = (result.tagged, &result.tag) {
                    output::done(format_args!("Created tag {}", output::tag(tag)));
                }
            }
        }
        Ok(())
    }
}

/// Render the full history to `file`, heading the unreleased commits as the new release
fn write_changelog(
    repo: &GitRepo,
    builder: &ReleaseHistoryBuilder<'_>,
    convention: &Convention,
    tag_format: &TagFormat,
    heading: &str,
    file: &Path,
) -> anyhow::Result<()> {
    let commits = repo.all_commits()?;
    let tags = repo.tags()?;
    let history = builder.replay(&commits, &tags, tag_format);
    let text = render_history(&history, convention, heading, false)?;
    std::fs::write(file, text).with_context(|| format!("failed to write {}", file.display()))?;
    Ok(())
}

/// Stage `file` and record it in a release commit on HEAD
fn commit_changelog(repo: &GitRepo, file: &Path, message: &str) -> anyhow::Result<CommitInfo> {
    let root = repo.path().canonicalize()?;
    let absolute = file
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", file.display()))?;
    let relative = absolute
        .strip_prefix(&root)
        .with_context(|| format!("{} is outside the repository", file.display()))?;
    Ok(repo.commit_paths(&[relative], message)?)
}
