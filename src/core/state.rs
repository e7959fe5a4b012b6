//! Working-copy state data structures.
//!
//! This module defines the records that parsed svn output is turned into, and the
//! snapshot the working-copy model hands to the views.
//!
//! # Public API
//! - [`ChangeEntry`]: One status code plus a path
//! - [`LogEntry`]: One revision from `svn log`
//! - [`CachedRevision`]: What the log cache keeps per revision
//! - [`StagingSet`]: The staging area, mirrored into the reserved `staged` changelist
//! - [`CommitPlan`]: How a commit of the staging set must be issued
//! - [`WorkingCopySnapshot`]: Unstaged changes plus staging set, replaced wholesale on refresh

use crate::core::error::{Result, SvnNavigatorError};
use crate::core::svn_status::SvnStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the svn changelist used to emulate a staging area
pub const STAGED_CHANGELIST: &str = "staged";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub status: SvnStatus,
    /// Relative to the working-copy root for status entries; repository path for log entries
    pub path: PathBuf,
}

impl ChangeEntry {
    pub fn new(status: SvnStatus, path: impl Into<PathBuf>) -> Self {
        Self {
            status,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub revision: u32,
    pub author: String,
    /// Absent when the revision properties are not readable
    pub date: Option<DateTime<Utc>>,
    pub message: String,
    pub touched_paths: Vec<ChangeEntry>,
}

impl LogEntry {
    /// First line of the message, for single-row display
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn short_date(&self) -> String {
        self.date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRevision {
    pub date: Option<DateTime<Utc>>,
    pub touched_paths: Vec<ChangeEntry>,
}

impl From<&LogEntry> for CachedRevision {
    fn from(entry: &LogEntry) -> Self {
        Self {
            date: entry.date,
            touched_paths: entry.touched_paths.clone(),
        }
    }
}

/// How `svn commit` has to be invoked for the current staging set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitPlan {
    /// `commit --changelist staged`
    Changelist,
    /// `commit --depth=empty <paths>`; added directories first, then staged changes
    ExplicitPaths(Vec<PathBuf>),
}

/// Staged changes (members of the `staged` changelist) and newly added directories.
///
/// svn cannot put directories in a changelist, so added directories are committed
/// alongside the changelist members, one path at a time with `--depth=empty`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingSet {
    changes: Vec<ChangeEntry>,
    added_directories: Vec<ChangeEntry>,
}

impl StagingSet {
    pub fn new(changes: Vec<ChangeEntry>, added_directories: Vec<ChangeEntry>) -> Self {
        Self {
            changes,
            added_directories,
        }
    }

    pub fn changes(&self) -> &[ChangeEntry] {
        &self.changes
    }

    pub fn added_directories(&self) -> &[ChangeEntry] {
        &self.added_directories
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.added_directories.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.changes.iter().any(|entry| entry.path == path)
    }

    /// Rows shown in the staged panel: added directories, then changelist members
    pub fn entries(&self) -> impl Iterator<Item = &ChangeEntry> {
        self.added_directories.iter().chain(self.changes.iter())
    }

    /// Decide the commit strategy. The choice depends only on whether added
    /// directories exist; committing one at full depth would also commit its
    /// unstaged children.
    pub fn commit_plan(&self) -> Result<CommitPlan> {
        if self.is_empty() {
            return Err(SvnNavigatorError::NothingToCommit);
        }
        if self.added_directories.is_empty() {
            return Ok(CommitPlan::Changelist);
        }
        Ok(CommitPlan::ExplicitPaths(
            self.entries().map(|entry| entry.path.clone()).collect(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopySnapshot {
    pub unstaged: Vec<ChangeEntry>,
    pub staging: StagingSet,
    pub hide_unversioned: bool,
}

impl WorkingCopySnapshot {
    pub fn empty(hide_unversioned: bool) -> Self {
        Self {
            unstaged: Vec::new(),
            staging: StagingSet::default(),
            hide_unversioned,
        }
    }
}
