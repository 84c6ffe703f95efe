//! semrel Changelog - Commit classification and release history
//!
//! This crate classifies commits under a commit convention and folds them
//! into a [`ReleaseHistory`], deciding the next version along the way.

pub mod history;
pub mod parser;
pub mod types;

pub use history::{
    Elements, PendingRelease, Release, ReleaseDecision, ReleaseHistory, ReleaseHistoryBuilder,
    TagMetadata, UNPARSED_LABEL,
};
pub use parser::{CommitParser, Convention, ConventionRegistry};
pub use types::{ParseError, ParseResult, ParsedCommit, ParsedMessage};
