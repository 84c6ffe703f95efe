//! Reading and writing release tags

use git2::{ErrorCode, ObjectType, Oid};
use tracing::{debug, info, instrument};

use semrel_core::error::GitError;
use semrel_version::{TagFormat, Version};

use crate::commits::to_utc;
use crate::repository::{GitRepo, Result};
use crate::types::{Actor, TagAnnotation, TagInfo};

impl GitRepo {
    /// Every tag in the repository that resolves to a commit
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut refs = Vec::new();
        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name);
            refs.push((name.trim_start_matches("refs/tags/").to_string(), oid));
            true
        })?;

        let tags: Vec<_> = refs
            .into_iter()
            .filter_map(|(name, oid)| self.resolve_tag(name, oid))
            .collect();
        debug!(count = tags.len(), "read tags");
        Ok(tags)
    }

    /// Release tags of the current branch, newest version first.
    ///
    /// Only tags that follow `format` and sit on HEAD or one of its ancestors
    /// count; a higher version tagged on another branch is not a previous
    /// release of this one.
    pub fn version_tags(&self, format: &TagFormat) -> Result<Vec<(TagInfo, Version)>> {
        let mut versioned = Vec::new();
        for tag in self.tags()? {
            let Some(version) = tag.version(format) else {
                continue;
            };
            let target = Oid::from_str(&tag.commit_hash)?;
            if !self.reachable_from_head(target)? {
                debug!(tag = %tag.name, "skipping tag outside HEAD history");
                continue;
            }
            versioned.push((tag, version));
        }

        versioned.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(versioned)
    }

    /// The previous release of the current branch
    #[instrument(skip(self, format), fields(template = format.template()))]
    pub fn find_latest_version_tag(&self, format: &TagFormat) -> Result<Option<(TagInfo, Version)>> {
        let latest = self.version_tags(format)?.into_iter().next();
        debug!(latest = ?latest.as_ref().map(|(t, _)| &t.name), "previous release tag");
        Ok(latest)
    }

    /// Look up one tag by name
    pub fn find_tag(&self, name: &str) -> Result<Option<TagInfo>> {
        let oid = match self.repo.refname_to_id(&format!("refs/tags/{}", name)) {
            Ok(oid) => oid,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(self.resolve_tag(name.to_string(), oid))
    }

    /// Tag HEAD with an annotated release tag
    #[instrument(skip(self, message))]
    pub fn create_tag(&self, name: &str, message: &str) -> Result<TagInfo> {
        if self.find_tag(name)?.is_some() {
            return Err(GitError::TagExists(name.to_string()));
        }

        let head = self.head_commit()?;
        let sig = self.signature()?;
        self.repo.tag(name, head.as_object(), &sig, message, false)?;
        info!(name, commit = %head.id(), "tagged release");

        let annotation = TagAnnotation::new(message, Actor::from_signature(&sig), to_utc(sig.when()));
        Ok(TagInfo::new(name, head.id().to_string()).annotated(annotation))
    }

    /// Remove a tag reference
    #[instrument(skip(self))]
    pub fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo.tag_delete(name)?;
        info!(name, "removed tag");
        Ok(())
    }

    /// Turn a tag reference target into a [`TagInfo`].
    ///
    /// `oid` is either a commit (lightweight tag) or a tag object. Tags that
    /// point at trees or blobs are not release tags and yield `None`.
    fn resolve_tag(&self, name: String, oid: Oid) -> Option<TagInfo> {
        let object = self.repo.find_object(oid, None).ok()?;
        match object.kind() {
            Some(ObjectType::Commit) => Some(TagInfo::new(name, oid.to_string())),
            Some(ObjectType::Tag) => {
                let tag = object.into_tag().ok()?;
                let target = tag.target().ok()?.peel_to_commit().ok()?;
                let info = TagInfo::new(name, target.id().to_string());
                let resolved = match tag.tagger() {
                    Some(tagger) => info.annotated(TagAnnotation::new(
                        tag.message().unwrap_or_default().trim_end(),
                        Actor::from_signature(&tagger),
                        to_utc(tagger.when()),
                    )),
                    None => info,
                };
                Some(resolved)
            }
            _ => None,
        }
    }
}
