//! semrel Git - Git operations for release automation
//!
//! This crate reads commit history and tags from a repository and creates
//! release tags. Everything it returns is plain data the release engine
//! borrows while it classifies commits.

mod commits;
mod repository;
mod tags;
pub mod types;

pub use repository::{GitRepo, Result};
pub use types::{Actor, CommitInfo, TagAnnotation, TagInfo};
