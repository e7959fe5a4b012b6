//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`SvnNavigatorError`] which covers every failure mode of
//! svn-navigator. It uses `thiserror` for ergonomic error definitions and includes
//! constructors for the common failure scenarios.
//!
//! # Public API
//! - [`SvnNavigatorError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, SvnNavigatorError>`
//!
//! # Error Categories
//! - **Command execution**: svn exited non-zero, or could not be launched
//! - **Output parsing**: malformed XML, unknown status codes, bad revisions/dates
//! - **Working copy**: entries outside the configured root, missing working copy
//! - **Validation**: nothing staged for commit
//!
//! Every variant is `Send` so that errors raised on a worker thread can be handed
//! back to the UI thread.

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for svn-navigator
#[derive(Error, Debug)]
pub enum SvnNavigatorError {
    // External command errors
    #[error("command: {command}\n\nmsg: {stderr}")]
    Command { command: String, stderr: String },

    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    // Parsing errors
    #[error("Malformed svn XML output: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Unknown status '{value}' in svn output")]
    UnknownStatus { value: String },

    #[error("Invalid revision '{value}' in svn output")]
    InvalidRevision { value: String },

    #[error("Invalid date '{value}' in svn output: {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },

    // Working copy errors
    #[error("The path {path} does not start with the expected local path {root}")]
    PathMismatch { path: PathBuf, root: PathBuf },

    #[error("Not a working copy directory: {path}")]
    NotAWorkingCopy { path: PathBuf },

    #[error("Revision r{revision} is not in the log cache")]
    LogCacheMiss { revision: u32 },

    // Validation errors
    #[error("Nothing to commit")]
    NothingToCommit,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using SvnNavigatorError
pub type Result<T> = std::result::Result<T, SvnNavigatorError>;

impl SvnNavigatorError {
    /// Create a command failure from an already redacted command line
    pub fn command_failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a spawn failure for the given program
    pub fn spawn_failed(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Create a path mismatch error
    pub fn path_mismatch(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self::PathMismatch {
            path: path.into(),
            root: root.into(),
        }
    }

    pub fn unknown_status(value: impl Into<String>) -> Self {
        Self::UnknownStatus {
            value: value.into(),
        }
    }

    pub fn invalid_revision(value: impl Into<String>) -> Self {
        Self::InvalidRevision {
            value: value.into(),
        }
    }

    pub fn invalid_date(value: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::InvalidDate {
            value: value.into(),
            source,
        }
    }

    pub fn not_a_working_copy(path: impl Into<PathBuf>) -> Self {
        Self::NotAWorkingCopy { path: path.into() }
    }

    pub fn log_cache_miss(revision: u32) -> Self {
        Self::LogCacheMiss { revision }
    }

    /// True for failures the user caused and can fix, as opposed to tool or environment failures
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NothingToCommit)
    }
}
