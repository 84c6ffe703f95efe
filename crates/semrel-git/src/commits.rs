//! Commit history operations

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::{Oid, Sort};
use tracing::{debug, info, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::{Actor, CommitInfo};

impl GitRepo {
    /// Commits reachable from HEAD but not from `since`, oldest first
    pub fn commits_since_oid(&self, since: Oid) -> Result<Vec<CommitInfo>> {
        self.history(Some(since))
    }

    /// Commits made after the commit `tag_name` points at, oldest first
    #[instrument(skip(self))]
    pub fn commits_since_tag(&self, tag_name: &str) -> Result<Vec<CommitInfo>> {
        let tagged = self
            .repo
            .revparse_single(&format!("refs/tags/{}", tag_name))?
            .peel_to_commit()?;
        self.commits_since_oid(tagged.id())
    }

    /// Every commit reachable from HEAD, oldest first
    pub fn all_commits(&self) -> Result<Vec<CommitInfo>> {
        self.history(None)
    }

    /// Look up one commit by its full hash
    pub fn get_commit(&self, hash: &str) -> Result<CommitInfo> {
        let found = self.repo.find_commit(Oid::from_str(hash)?)?;
        Ok(describe(&found))
    }

    /// Stage `paths` (relative to the working tree) and commit them on HEAD
    #[instrument(skip(self, message), fields(files = paths.len()))]
    pub fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<CommitInfo> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path)?;
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = self.head_commit()?;
        let sig = self.signature()?;
        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])?;

        info!(hash = %oid, "created release commit");
        self.get_commit(&oid.to_string())
    }

    fn history(&self, exclude: Option<Oid>) -> Result<Vec<CommitInfo>> {
        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)?;
        walk.push(self.head_commit()?.id())?;
        if let Some(oid) = exclude {
            walk.hide(oid)?;
        }

        let commits = walk
            .map(|oid| Ok(describe(&self.repo.find_commit(oid?)?)))
            .collect::<Result<Vec<_>>>()?;

        debug!(count = commits.len(), "walked commit history");
        Ok(commits)
    }
}

/// Seconds-precision UTC time of a git timestamp
pub(crate) fn to_utc(time: git2::Time) -> DateTime<Utc> {
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn describe(commit: &git2::Commit<'_>) -> CommitInfo {
    CommitInfo::from_raw_message(
        commit.id().to_string(),
        &String::from_utf8_lossy(commit.message_bytes()),
        Actor::from_signature(&commit.author()),
        to_utc(commit.time()),
    )
}
