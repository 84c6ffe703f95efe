//! The repository a release is cut from

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Oid, Repository, Signature};
use tracing::debug;

use semrel_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Handle on the repository whose history drives versioning
pub struct GitRepo {
    pub(crate) repo: Repository,
    workdir: PathBuf,
}

impl GitRepo {
    /// Open the repository rooted exactly at `path`
    pub fn open(path: &Path) -> Result<Self> {
        Self::wrap(path, Repository::open(path))
    }

    /// Open the repository containing `path`, searching parent directories
    pub fn discover(path: &Path) -> Result<Self> {
        Self::wrap(path, Repository::discover(path))
    }

    fn wrap(requested: &Path, opened: std::result::Result<Repository, git2::Error>) -> Result<Self> {
        let repo = opened.map_err(|e| match e.code() {
            ErrorCode::NotFound => GitError::NoRepository(requested.to_path_buf()),
            _ => GitError::Git2(e),
        })?;

        // bare repositories have no working tree, fall back to the git dir
        let workdir = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        debug!(workdir = %workdir.display(), "opened release repository");

        Ok(Self { repo, workdir })
    }

    /// Root of the working tree
    pub fn path(&self) -> &Path {
        &self.workdir
    }

    /// The commit HEAD points at
    pub fn head_commit(&self) -> Result<git2::Commit<'_>> {
        let head = self.repo.head().map_err(|e| match e.code() {
            ErrorCode::UnbornBranch => GitError::EmptyHistory,
            _ => GitError::Git2(e),
        })?;
        Ok(head.peel_to_commit()?)
    }

    /// Whether `oid` is HEAD itself or one of its ancestors.
    ///
    /// Only such commits can carry the previous release of the current branch.
    pub fn reachable_from_head(&self, oid: Oid) -> Result<bool> {
        let head = self.head_commit()?.id();
        Ok(head == oid || self.repo.graph_descendant_of(head, oid)?)
    }

    /// Identity used for release commits and tags
    pub(crate) fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig),
            Err(e) => {
                debug!(error = %e, "no configured identity, releasing as semrel");
                Ok(Signature::now("semrel", "semrel@localhost")?)
            }
        }
    }
}
