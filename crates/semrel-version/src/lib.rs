//! semrel Version - Semantic version values for release automation
//!
//! This crate provides the immutable [`Version`] value with its ordering and
//! bump operations, and [`TagFormat`] for mapping versions to git tags.

mod tag;
mod version;

pub use tag::TagFormat;
pub use version::{Prerelease, Version, DEFAULT_PRERELEASE_TOKEN};

/// Result type for version operations
pub type VersionResult<T> = std::result::Result<T, semrel_core::VersionError>;
