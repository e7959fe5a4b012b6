//! The log view: revision list, plus info, message and changelist panels that
//! follow the selected revision.
//!
//! # Public API
//! - [`LogView`]: Focus ring, cursors and derived panels of the interactive log view
//! - [`LogAction`]: Input events the log view understands
//! - [`execute_log`]: Non-interactive `log` command

use crate::core::{
    error::{Result, SvnNavigatorError},
    model::{LogQuery, PageMode, SvnModel},
    output::{print_info, print_section_header},
    panel::{LogPanel, Panel, TablePanel},
    state::LogEntry,
};
use colored::*;

pub const LOG_COLUMNS: [&str; 4] = ["Revision", "Author", "Date", "Message"];
pub const CHANGELIST_COLUMNS: [&str; 2] = ["Action", "Path"];

/// Panel ring of the log view: Log → Message → Changelist → Log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFocus {
    Log,
    Message,
    Changelist,
}

impl LogFocus {
    pub fn next(self) -> Self {
        match self {
            LogFocus::Log => LogFocus::Message,
            LogFocus::Message => LogFocus::Changelist,
            LogFocus::Changelist => LogFocus::Log,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            LogFocus::Log => LogFocus::Changelist,
            LogFocus::Message => LogFocus::Log,
            LogFocus::Changelist => LogFocus::Message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    Down,
    Up,
    NextPanel,
    PrevPanel,
    CopyMessage,
    FetchMore,
}

pub struct LogView {
    focus: LogFocus,
    log: LogPanel,
    message: TablePanel,
    changelist: TablePanel,
    info: String,
    page_size: u32,
    loading: bool,
}

impl LogView {
    pub fn new(page_size: u32) -> Self {
        let mut log = LogPanel::new("Log");
        let mut message = TablePanel::new("Message");
        let mut changelist = TablePanel::new("Changelist");
        log.set_columns(&LOG_COLUMNS);
        message.set_columns(&["Message"]);
        changelist.set_columns(&CHANGELIST_COLUMNS);

        let mut view = Self {
            focus: LogFocus::Log,
            log,
            message,
            changelist,
            info: String::new(),
            page_size: page_size.max(1),
            loading: false,
        };
        view.sync_focus();
        view
    }

    pub fn focus(&self) -> LogFocus {
        self.focus
    }

    pub fn log_panel(&self) -> &LogPanel {
        &self.log
    }

    pub fn message_panel(&self) -> &TablePanel {
        &self.message
    }

    pub fn changelist_panel(&self) -> &TablePanel {
        &self.changelist
    }

    /// `r<revision> | <author> | <date>` of the selected revision
    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Query for the first page, shown when the view is opened
    pub fn first_page_query(&self) -> LogQuery {
        LogQuery::latest(self.page_size)
    }

    /// Store a page fetched in the background and redraw the list
    pub fn apply_page(
        &mut self,
        model: &mut SvnModel,
        entries: Vec<LogEntry>,
        mode: PageMode,
    ) -> Result<()> {
        self.loading = false;
        model.apply_log_page(entries, mode);
        self.show_page(model)
    }

    /// Rebuild the revision list from the model's current page, newest first
    pub fn show_page(&mut self, model: &SvnModel) -> Result<()> {
        let rows = model
            .fetched_log()
            .iter()
            .map(|entry| {
                vec![
                    entry.revision.to_string(),
                    entry.author.clone(),
                    entry.short_date(),
                    entry.summary().to_string(),
                ]
            })
            .collect();
        self.log.set_data(rows, None);
        self.update_selection(model)
    }

    /// Handle one input event. Returns the query for an older page when the
    /// action asks for more history; the caller runs it in the background.
    pub fn handle(
        &mut self,
        action: LogAction,
        model: &mut SvnModel,
    ) -> Result<Option<LogQuery>> {
        match action {
            LogAction::Down => match self.focus {
                LogFocus::Log if self.log.is_at_last_row() => {
                    return Ok(model.next_page_query(self.page_size));
                }
                LogFocus::Log => {
                    self.log.next_row();
                    self.update_selection(model)?;
                }
                LogFocus::Message => self.message.next_row(),
                LogFocus::Changelist => self.changelist.next_row(),
            },
            LogAction::Up => match self.focus {
                LogFocus::Log => {
                    self.log.prev_row();
                    self.update_selection(model)?;
                }
                LogFocus::Message => self.message.prev_row(),
                LogFocus::Changelist => self.changelist.prev_row(),
            },
            LogAction::NextPanel => {
                self.focus = self.focus.next();
                self.sync_focus();
            }
            LogAction::PrevPanel => {
                self.focus = self.focus.prev();
                self.sync_focus();
            }
            LogAction::CopyMessage => self.copy_message(model),
            LogAction::FetchMore => return Ok(model.next_page_query(self.page_size)),
        }
        Ok(None)
    }

    /// Recompute the info, message and changelist panels from the selected row.
    ///
    /// Every listed revision was cached by the fetch that listed it, so a cache
    /// miss means the list and the model went out of sync.
    fn update_selection(&mut self, model: &SvnModel) -> Result<()> {
        let Some(revision) = self.log.selected_revision() else {
            self.info.clear();
            self.message.set_data(Vec::new(), None);
            self.changelist.set_data(Vec::new(), None);
            return Ok(());
        };

        let cached = model.log_cache_entry(revision);
        debug_assert!(cached.is_some(), "revision r{revision} is listed but not cached");
        let Some(cached) = cached else {
            return Err(SvnNavigatorError::log_cache_miss(revision));
        };

        let changed_paths = cached
            .touched_paths
            .iter()
            .map(|change| {
                vec![
                    change.status.code().to_string(),
                    change.path.to_string_lossy().into_owned(),
                ]
            })
            .collect();
        self.changelist.set_data(changed_paths, None);

        match model.log_entry(revision) {
            Some(entry) => {
                self.info = format!(
                    "r{} | {} | {}",
                    entry.revision,
                    entry.author,
                    cached
                        .date
                        .map(|date| date.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_default()
                );
                let lines = entry
                    .message
                    .lines()
                    .map(|line| vec![line.to_string()])
                    .collect();
                self.message.set_data(lines, None);
            }
            None => {
                self.info = format!("r{revision}");
                self.message.set_data(Vec::new(), None);
            }
        }
        Ok(())
    }

    fn copy_message(&self, model: &mut SvnModel) {
        let Some(entry) = self
            .log
            .selected_revision()
            .and_then(|revision| model.log_entry(revision))
        else {
            return;
        };
        let message = entry.message.clone();
        log::debug!("Saved message of r{}", entry.revision);
        model.set_saved_message(message);
    }

    fn sync_focus(&mut self) {
        self.log.release_focus();
        self.message.release_focus();
        self.changelist.release_focus();
        match self.focus {
            LogFocus::Log => self.log.give_focus(),
            LogFocus::Message => self.message.give_focus(),
            LogFocus::Changelist => self.changelist.give_focus(),
        }
    }
}

/// Print the most recent `limit` revisions without starting the interactive client
pub fn execute_log(model: &mut SvnModel, limit: u32) -> Result<()> {
    model.fetch_log(None, None, Some(limit.max(1)))?;

    if model.fetched_log().is_empty() {
        print_info("No revisions found");
        return Ok(());
    }

    print_section_header("Log");
    for entry in model.fetched_log() {
        println!(
            "  {}  {}  {}  {}",
            format!("r{}", entry.revision).yellow(),
            entry.author.cyan(),
            entry.short_date().bright_black(),
            entry.summary().white()
        );
    }
    println!();

    Ok(())
}
