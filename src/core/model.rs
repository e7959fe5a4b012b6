//! The working-copy model: the authoritative in-process view of a Subversion
//! working copy.
//!
//! [`SvnModel`] owns the current [`WorkingCopySnapshot`], the diff cache, the log
//! cache, the most recently fetched log page and the saved commit message. All
//! mutations go through svn; the model never edits its snapshot in place. After a
//! mutation the caller re-fetches status, which replaces the snapshot wholesale.
//!
//! The slow, read-only operations (log paging, the server up-to-date query) are also
//! available as free functions over a [`CommandRunner`] so that a worker thread can
//! run them and hand the result back to the thread that owns the model.

use crate::core::error::{Result, SvnNavigatorError};
use crate::core::parser::{self, normalize_path};
use crate::core::runner::{AuditLog, CommandRunner};
use crate::core::state::{
    CachedRevision, ChangeEntry, CommitPlan, LogEntry, StagingSet, WorkingCopySnapshot,
    STAGED_CHANGELIST,
};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Default number of log entries per page
pub const DEFAULT_LOG_LIMIT: u32 = 100;

/// Revision range and size of one `svn log` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogQuery {
    pub from: Option<u32>,
    pub to: Option<u32>,
    pub limit: Option<u32>,
}

impl LogQuery {
    /// The most recent `limit` entries
    pub fn latest(limit: u32) -> Self {
        Self {
            from: None,
            to: None,
            limit: Some(limit),
        }
    }

    pub fn range(from: Option<u32>, to: Option<u32>, limit: Option<u32>) -> Self {
        Self { from, to, limit }
    }

    /// Arguments for `svn log`; a missing bound defaults to `1` / `HEAD` when the other is set
    pub fn args(&self, root: &Path) -> Vec<String> {
        let mut args = Vec::new();
        if self.from.is_some() || self.to.is_some() {
            let from = self.from.map_or_else(|| "1".to_string(), |r| r.to_string());
            let to = self.to.map_or_else(|| "HEAD".to_string(), |r| r.to_string());
            args.push("-r".to_string());
            args.push(format!("{from}:{to}"));
        }
        if let Some(limit) = self.limit {
            args.push("-l".to_string());
            args.push(limit.to_string());
        }
        args.push("--xml".to_string());
        args.push("--verbose".to_string());
        args.push(root.to_string_lossy().into_owned());
        args
    }
}

/// Whether a fetched log page replaces the current page or extends it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    Replace,
    Append,
}

/// Run one log query and parse the result. Safe to call from a worker thread.
pub fn run_log_query(
    runner: &CommandRunner,
    root: &Path,
    query: &LogQuery,
) -> Result<Vec<LogEntry>> {
    let xml = runner.run("log", &query.args(root))?;
    parser::parse_log(&xml)
}

/// Ask the server whether the working copy is behind HEAD. Safe to call from a worker thread.
pub fn check_up_to_date(runner: &CommandRunner, root: &Path) -> Result<bool> {
    let xml = runner.run(
        "status",
        &[
            "-u".to_string(),
            "--xml".to_string(),
            root.to_string_lossy().into_owned(),
        ],
    )?;
    parser::parse_up_to_date(&xml)
}

pub struct SvnModel {
    runner: CommandRunner,
    root: PathBuf,

    // status view
    snapshot: WorkingCopySnapshot,
    diff_cache: HashMap<PathBuf, String>,

    // log view
    fetched_log: Vec<LogEntry>,
    log_cache: BTreeMap<u32, CachedRevision>,
    saved_message: String,
}

impl SvnModel {
    /// Create a model for `root`, which is normalized lexically but not resolved on disk
    pub fn new(runner: CommandRunner, root: impl AsRef<Path>) -> Self {
        Self {
            runner,
            root: normalize_path(root.as_ref()),
            snapshot: WorkingCopySnapshot::empty(true),
            diff_cache: HashMap::new(),
            fetched_log: Vec::new(),
            log_cache: BTreeMap::new(),
            saved_message: String::new(),
        }
    }

    /// Create a model for an existing directory, resolving it to its canonical path
    pub fn open(runner: CommandRunner, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(SvnNavigatorError::not_a_working_copy(path));
        }
        let root = std::fs::canonicalize(path)?;
        log::info!("Opened working copy at {}", root.display());
        Ok(Self::new(runner, root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    pub fn command_log(&self) -> &AuditLog {
        self.runner.audit_log()
    }

    fn absolute(&self, rel_path: &Path) -> String {
        self.root.join(rel_path).to_string_lossy().into_owned()
    }

    fn root_arg(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }

    // ---------------------------------------------------------------- status

    pub fn snapshot(&self) -> &WorkingCopySnapshot {
        &self.snapshot
    }

    pub fn unstaged_changes(&self) -> &[ChangeEntry] {
        &self.snapshot.unstaged
    }

    pub fn staged_changes(&self) -> &[ChangeEntry] {
        self.snapshot.staging.changes()
    }

    pub fn added_directories(&self) -> &[ChangeEntry] {
        self.snapshot.staging.added_directories()
    }

    pub fn staging(&self) -> &StagingSet {
        &self.snapshot.staging
    }

    pub fn hide_unversioned(&self) -> bool {
        self.snapshot.hide_unversioned
    }

    pub fn set_hide_unversioned(&mut self, hide: bool) {
        self.snapshot.hide_unversioned = hide;
    }

    /// Flip the flag; takes effect on the next fetch
    pub fn toggle_hide_unversioned(&mut self) {
        self.snapshot.hide_unversioned = !self.snapshot.hide_unversioned;
    }

    /// Drop cached diffs and fetch status again
    pub fn refresh_status(&mut self) -> Result<()> {
        self.diff_cache.clear();
        self.fetch_status()
    }

    /// Run `svn status --xml` and replace the snapshot. On error the previous
    /// snapshot stays in place untouched.
    pub fn fetch_status(&mut self) -> Result<()> {
        let xml = self.runner.run("status", &["--xml".to_string(), self.root_arg()])?;
        let hide_unversioned = self.snapshot.hide_unversioned;
        let parsed = parser::parse_status(&xml, &self.root, hide_unversioned, Path::is_dir)?;

        log::debug!(
            "Status: {} unstaged, {} staged, {} added directories",
            parsed.unstaged.len(),
            parsed.staging.changes().len(),
            parsed.staging.added_directories().len()
        );

        self.snapshot = WorkingCopySnapshot {
            unstaged: parsed.unstaged,
            staging: parsed.staging,
            hide_unversioned,
        };
        Ok(())
    }

    /// `svn add --depth=empty`; schedules an unversioned path without its children
    pub fn add_file(&self, rel_path: &Path) -> Result<()> {
        self.runner
            .run("add", &["--depth=empty".to_string(), self.absolute(rel_path)])?;
        Ok(())
    }

    /// Put a path into the `staged` changelist
    pub fn stage_file(&self, rel_path: &Path) -> Result<()> {
        self.runner.run(
            "changelist",
            &[STAGED_CHANGELIST.to_string(), self.absolute(rel_path)],
        )?;
        Ok(())
    }

    pub fn unstage_file(&self, rel_path: &Path) -> Result<()> {
        self.runner
            .run("changelist", &["--remove".to_string(), self.absolute(rel_path)])?;
        Ok(())
    }

    pub fn revert_file(&self, rel_path: &Path) -> Result<()> {
        self.runner
            .run("revert", &["-R".to_string(), self.absolute(rel_path)])?;
        Ok(())
    }

    /// Diff of one path, served from the cache until the next [`refresh_status`](Self::refresh_status)
    pub fn diff_file(&mut self, rel_path: &Path) -> Result<String> {
        if let Some(diff) = self.diff_cache.get(rel_path) {
            log::debug!("Diff cache hit for {}", rel_path.display());
            return Ok(diff.clone());
        }

        let diff = self.runner.run("diff", &[self.absolute(rel_path)])?;
        self.diff_cache.insert(rel_path.to_path_buf(), diff.clone());
        Ok(diff)
    }

    /// Commit the staging set. Without added directories the changelist is committed;
    /// otherwise every staged path is listed explicitly with `--depth=empty`.
    pub fn commit_staged(&self, message: &str) -> Result<()> {
        let args = match self.snapshot.staging.commit_plan()? {
            CommitPlan::Changelist => vec![
                "--changelist".to_string(),
                STAGED_CHANGELIST.to_string(),
                "-m".to_string(),
                message.to_string(),
                self.root_arg(),
            ],
            CommitPlan::ExplicitPaths(paths) => {
                let mut args = vec![
                    "--depth=empty".to_string(),
                    "-m".to_string(),
                    message.to_string(),
                ];
                args.extend(paths.iter().map(|path| self.absolute(path)));
                args
            }
        };

        self.runner.run("commit", &args)?;
        log::info!("Committed staged changes");
        Ok(())
    }

    pub fn is_up_to_date(&self) -> Result<bool> {
        check_up_to_date(&self.runner, &self.root)
    }

    // ------------------------------------------------------------------- log

    /// The current log page, newest first
    pub fn fetched_log(&self) -> &[LogEntry] {
        &self.fetched_log
    }

    pub fn log_entry(&self, revision: u32) -> Option<&LogEntry> {
        self.fetched_log.iter().find(|entry| entry.revision == revision)
    }

    pub fn log_cache_entry(&self, revision: u32) -> Option<&CachedRevision> {
        self.log_cache.get(&revision)
    }

    pub fn log_cache_len(&self) -> usize {
        self.log_cache.len()
    }

    /// Fetch a log page and make it the current page. Without bounds the most
    /// recent `limit` entries are fetched; `limit` defaults to [`DEFAULT_LOG_LIMIT`].
    pub fn fetch_log(
        &mut self,
        from: Option<u32>,
        to: Option<u32>,
        limit: Option<u32>,
    ) -> Result<()> {
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT);
        let query = LogQuery::range(from, to, Some(limit));
        let entries = run_log_query(&self.runner, &self.root, &query)?;
        self.apply_log_page(entries, PageMode::Replace);
        Ok(())
    }

    /// Query for the page of `quantity` revisions older than the oldest fetched one.
    /// `None` once revision 1 has been fetched, or before anything was fetched.
    pub fn next_page_query(&self, quantity: u32) -> Option<LogQuery> {
        let oldest = self.fetched_log.last()?.revision;
        let from = oldest.checked_sub(1).filter(|r| *r > 0)?;
        let to = from.saturating_sub(quantity.saturating_sub(1)).max(1);
        Some(LogQuery::range(Some(from), Some(to), Some(quantity)))
    }

    /// Fetch the next older page and append it. Returns false, without running any
    /// command, when there is no older history.
    pub fn fetch_more_logs(&mut self, quantity: u32) -> Result<bool> {
        let Some(query) = self.next_page_query(quantity) else {
            return Ok(false);
        };
        let entries = run_log_query(&self.runner, &self.root, &query)?;
        self.apply_log_page(entries, PageMode::Append);
        Ok(true)
    }

    /// Store a fetched page: every entry goes into the log cache (existing revisions
    /// are kept as they are), then the page replaces or extends the current page.
    pub fn apply_log_page(&mut self, entries: Vec<LogEntry>, mode: PageMode) {
        for entry in &entries {
            self.log_cache
                .entry(entry.revision)
                .or_insert_with(|| CachedRevision::from(entry));
        }

        match mode {
            PageMode::Replace => self.fetched_log = entries,
            PageMode::Append => {
                for entry in entries {
                    if self.log_entry(entry.revision).is_none() {
                        self.fetched_log.push(entry);
                    }
                }
            }
        }
        log::debug!(
            "Log page applied: {} entries shown, {} cached",
            self.fetched_log.len(),
            self.log_cache.len()
        );
    }

    pub fn saved_message(&self) -> &str {
        &self.saved_message
    }

    pub fn set_saved_message(&mut self, message: impl Into<String>) {
        self.saved_message = message.into();
    }
}
