//! Shared test utilities for svn-navigator
//!
//! Integration tests run against a fake `svn` executable: a shell script that
//! records its arguments and replays canned output, so no Subversion install or
//! repository server is needed.

pub mod assertions;
pub mod fixtures;
pub mod repository;
