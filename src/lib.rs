//! SVN Navigator - a terminal client for Subversion working copies.
//!
//! The library holds everything below the binary's argument parsing: the working-copy
//! model that drives the `svn` command line, the status and log views, and the
//! terminal front end.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - The working-copy model and its staging area
//! - Parsing of `svn --xml` output
//! - Command execution with password redaction
//! - Error handling and result types

pub mod commands;
pub mod core;
pub mod tui;

pub use core::{
    ChangeEntry,
    CommandRunner,
    Config,
    Credentials,
    LogEntry,
    Result,
    StagingSet,
    SvnModel,
    SvnNavigatorError,
    SvnStatus,
};
