//! semrel Core - Core library for release automation
//!
//! This crate provides the foundational types, error handling and
//! configuration shared by the semrel crates.

pub mod config;
pub mod error;
pub mod types;

pub use error::{
    ConfigError, ConventionError, GitError, Result, SemrelError, VersionError,
};
pub use types::LevelBump;
