//! Type-safe svn item status enumeration.
//!
//! This module defines [`SvnStatus`], the closed set of working-copy item states
//! reported by `svn status --xml` and by the `action` codes of `svn log --verbose`.
//! Each status has a canonical single-character wire code which is used both to
//! parse tool output and to display entries.
//!
//! # Public API
//! - [`SvnStatus`]: Main enumeration for all svn item status types
//!
//! # Key Features
//! - **Two wire forms**: item names (`"added"`) from `status`, characters (`'A'`) from `log`
//! - **Display formatting**: Single-character representation for UI output
//! - **Sorting logic**: Built-in priority ordering for status display

use crate::core::error::{Result, SvnNavigatorError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SvnStatus {
    /// Scheduled for addition (A)
    Added,
    /// Content or property conflict (C)
    Conflicted,
    /// Scheduled for deletion (D)
    Deleted,
    /// Ignored through svn:ignore (I)
    Ignored,
    /// Local modifications (M)
    Modified,
    /// Deleted and re-added in place (R)
    Replaced,
    /// Unversioned directory created by an externals definition (X)
    External,
    /// Not under version control (?)
    Unversioned,
    /// Removed by a non-svn command, or incomplete (!)
    Missing,
    /// Versioned item obstructed by an item of a different kind (~)
    Obstructed,
    /// No local change; listed only for changelist membership ( )
    Normal,
}

impl SvnStatus {
    pub const ALL: [SvnStatus; 11] = [
        SvnStatus::Added,
        SvnStatus::Conflicted,
        SvnStatus::Deleted,
        SvnStatus::Ignored,
        SvnStatus::Modified,
        SvnStatus::Replaced,
        SvnStatus::External,
        SvnStatus::Unversioned,
        SvnStatus::Missing,
        SvnStatus::Obstructed,
        SvnStatus::Normal,
    ];

    /// Canonical single-character code
    pub fn code(&self) -> char {
        match self {
            SvnStatus::Added => 'A',
            SvnStatus::Conflicted => 'C',
            SvnStatus::Deleted => 'D',
            SvnStatus::Ignored => 'I',
            SvnStatus::Modified => 'M',
            SvnStatus::Replaced => 'R',
            SvnStatus::External => 'X',
            SvnStatus::Unversioned => '?',
            SvnStatus::Missing => '!',
            SvnStatus::Obstructed => '~',
            SvnStatus::Normal => ' ',
        }
    }

    /// Parse a single-character code, as found in `<path action="M">`
    pub fn from_code(code: &str) -> Result<SvnStatus> {
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => SvnStatus::ALL
                .into_iter()
                .find(|status| status.code() == c)
                .ok_or_else(|| SvnNavigatorError::unknown_status(code)),
            _ => Err(SvnNavigatorError::unknown_status(code)),
        }
    }

    /// Item name as written in `<wc-status item="...">`
    pub fn item_name(&self) -> &'static str {
        match self {
            SvnStatus::Added => "added",
            SvnStatus::Conflicted => "conflicted",
            SvnStatus::Deleted => "deleted",
            SvnStatus::Ignored => "ignored",
            SvnStatus::Modified => "modified",
            SvnStatus::Replaced => "replaced",
            SvnStatus::External => "external",
            SvnStatus::Unversioned => "unversioned",
            SvnStatus::Missing => "missing",
            SvnStatus::Obstructed => "obstructed",
            SvnStatus::Normal => "normal",
        }
    }

    /// Parse a `wc-status` item together with its `props` attribute.
    ///
    /// Returns `Ok(None)` for items svn reports but that carry no state worth listing
    /// (`none`). A `normal` item with modified or conflicted properties takes the
    /// property state.
    pub fn from_wc_status(item: &str, props: Option<&str>) -> Result<Option<SvnStatus>> {
        let status = match item {
            "none" => return Ok(None),
            "incomplete" => SvnStatus::Missing,
            "normal" => match props {
                Some("modified") => SvnStatus::Modified,
                Some("conflicted") => SvnStatus::Conflicted,
                _ => SvnStatus::Normal,
            },
            other => SvnStatus::ALL
                .into_iter()
                .find(|status| status.item_name() == other)
                .ok_or_else(|| SvnNavigatorError::unknown_status(other))?,
        };
        Ok(Some(status))
    }

    /// Get sort priority for status ordering; conflicts first, unversioned last
    pub fn sort_priority(&self) -> u8 {
        match self {
            SvnStatus::Conflicted => 0,
            SvnStatus::Obstructed => 1,
            SvnStatus::Missing => 2,
            SvnStatus::Added => 3,
            SvnStatus::Modified => 4,
            SvnStatus::Replaced => 5,
            SvnStatus::Deleted => 6,
            SvnStatus::Normal => 7,
            SvnStatus::External => 8,
            SvnStatus::Unversioned => 9,
            SvnStatus::Ignored => 10,
        }
    }

    /// Whether `svn diff` has anything to show for an entry in this state
    pub fn has_diff(&self) -> bool {
        !matches!(
            self,
            SvnStatus::Unversioned | SvnStatus::Ignored | SvnStatus::External
        )
    }
}

impl fmt::Display for SvnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
