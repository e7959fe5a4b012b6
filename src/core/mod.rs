//! Core functionality for the svn-navigator tool.
//!
//! This module provides the building blocks below the views: running svn,
//! parsing its XML output, the working-copy model, panels, background tasks,
//! configuration and console output.

pub mod colors;
pub mod config;
pub mod dirs;
pub mod error;
pub mod model;
pub mod output;
pub mod panel;
pub mod parser;
pub mod runner;
pub mod state;
pub mod svn_status;
pub mod worker;

// === Error handling ===
pub use error::{Result, SvnNavigatorError};

// === Running svn ===
// Argument layout, credentials, password redaction and the audit queue
pub use runner::{AuditLog, CommandRunner, Credentials, ExecOutput, Executor, ProcessExecutor};

// === Status codes and records ===
pub use state::{ChangeEntry, CommitPlan, LogEntry, StagingSet, WorkingCopySnapshot};
pub use svn_status::SvnStatus;

// === Working-copy model ===
pub use model::{LogQuery, PageMode, SvnModel, DEFAULT_LOG_LIMIT};

// === Presentation boundary ===
pub use panel::{LogPanel, Panel, SortHint, TablePanel};

// === Background work ===
pub use worker::{BackgroundTasks, TaskKind, TaskOutcome};

// === Settings ===
pub use config::Config;

// === Output formatting ===
pub use output::{print_error, print_info, print_section_header, print_success, print_warning};
