//! Interactive application state.
//!
//! [`App`] owns the model, the three views and the notification stack. Keys are
//! dispatched by [`Mode`]: a few global keys first, then the bindings of the active
//! view. Slow svn calls run as background tasks whose outcomes are applied on
//! [`App::tick`].

use crate::commands::{
    commit::CommitView,
    log::{LogAction, LogView},
    status::{StatusAction, StatusView},
};
use crate::core::{
    config::Config,
    error::{Result, SvnNavigatorError},
    model::{check_up_to_date, run_log_query, LogQuery, PageMode, SvnModel},
    worker::{BackgroundTasks, TaskKind, TaskOutcome},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);
const OUT_OF_DATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Status,
    Log,
    Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    created: Instant,
    timeout: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) >= self.timeout
    }
}

pub struct App {
    pub mode: Mode,
    pub model: SvnModel,
    pub status: StatusView,
    pub log: LogView,
    pub commit: CommitView,
    pub notifications: Vec<Notification>,
    pub should_quit: bool,
    tasks: BackgroundTasks,
    check_up_to_date: bool,
    log_mounted: bool,
}

impl App {
    pub fn new(model: SvnModel, config: &Config) -> Self {
        Self {
            mode: Mode::Status,
            model,
            status: StatusView::new(),
            log: LogView::new(config.log_page_size),
            commit: CommitView::new(),
            notifications: Vec::new(),
            should_quit: false,
            tasks: BackgroundTasks::new(),
            check_up_to_date: config.check_up_to_date,
            log_mounted: false,
        }
    }

    /// Fill the status view and start the out-of-date check
    pub fn mount(&mut self) {
        let mounted = self.status.mount(&mut self.model);
        self.report(mounted);

        if self.check_up_to_date {
            let runner = self.model.runner().clone();
            let root = self.model.root().to_path_buf();
            self.tasks.spawn(TaskKind::UpToDate, move || {
                TaskOutcome::UpToDate(check_up_to_date(&runner, &root))
            });
        }
    }

    pub fn is_busy(&self) -> bool {
        self.tasks.any_busy()
    }

    pub fn notify(&mut self, title: &str, message: &str, severity: Severity) {
        self.notify_for(title, message, severity, NOTIFICATION_TIMEOUT);
    }

    fn notify_for(
        &mut self,
        title: &str,
        message: &str,
        severity: Severity,
        timeout: Duration,
    ) {
        self.notifications.push(Notification {
            title: title.to_string(),
            message: message.to_string(),
            severity,
            created: Instant::now(),
            timeout,
        });
    }

    /// Turn a failed action into a notification; the views keep their state
    fn report<T>(&mut self, result: Result<T>) {
        if let Err(e) = result {
            self.report_error(&e);
        }
    }

    fn report_error(&mut self, error: &SvnNavigatorError) {
        log::warn!("Action failed: {error}");
        if error.is_validation() {
            self.notify("Warning", &error.to_string(), Severity::Warning);
        } else {
            self.notify("Error", &error.to_string(), Severity::Error);
        }
    }

    /// Apply finished background work and drop expired notifications
    pub fn tick(&mut self) {
        for outcome in self.tasks.poll() {
            self.apply_outcome(outcome);
        }
        let now = Instant::now();
        self.notifications.retain(|n| !n.is_expired(now));
    }

    fn apply_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::UpToDate(Ok(true)) => log::info!("Working copy is up to date"),
            TaskOutcome::UpToDate(Ok(false)) => self.notify_for(
                "Working copy out of date",
                "Run 'svn update' to sync with the repository",
                Severity::Warning,
                OUT_OF_DATE_TIMEOUT,
            ),
            // the check is advisory; an unreachable server is not worth a popup
            TaskOutcome::UpToDate(Err(e)) => log::warn!("Up-to-date check failed: {e}"),
            TaskOutcome::LogPage { mode, result } => {
                self.log.set_loading(false);
                match result {
                    Ok(entries) => {
                        let shown = self.log.apply_page(&mut self.model, entries, mode);
                        self.report(shown);
                    }
                    Err(e) => {
                        // a failed first page is retried the next time the view is used
                        if mode == PageMode::Replace {
                            self.log_mounted = false;
                        }
                        self.report_error(&e);
                    }
                }
            }
        }
    }

    fn request_log_page(&mut self, query: LogQuery, mode: PageMode) {
        let runner = self.model.runner().clone();
        let root = self.model.root().to_path_buf();
        let started = self.tasks.spawn(TaskKind::LogPage, move || TaskOutcome::LogPage {
            mode,
            result: run_log_query(&runner, &root, &query),
        });
        if started {
            self.log.set_loading(true);
        }
    }

    fn show_status(&mut self) {
        self.mode = Mode::Status;
    }

    fn show_log(&mut self) {
        self.mode = Mode::Log;
        if !self.log_mounted {
            self.mount_log();
        }
    }

    fn mount_log(&mut self) {
        self.log_mounted = true;
        let query = self.log.first_page_query();
        self.request_log_page(query, PageMode::Replace);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.mode == Mode::Commit {
            self.handle_commit_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.show_status(),
            KeyCode::Char('2') => self.show_log(),
            KeyCode::Char('x') => {
                self.notifications.pop();
            }
            _ => match self.mode {
                Mode::Status => self.handle_status_key(key),
                Mode::Log => self.handle_log_key(key),
                Mode::Commit => {}
            },
        }
    }

    fn handle_status_key(&mut self, key: KeyEvent) {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => StatusAction::Down,
            KeyCode::Char('k') | KeyCode::Up => StatusAction::Up,
            KeyCode::Char('h')
            | KeyCode::Char('l')
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::BackTab => StatusAction::TogglePanel,
            KeyCode::Char(' ') => StatusAction::StageOrUnstage,
            KeyCode::Char('t') => StatusAction::ToggleUnversioned,
            KeyCode::Char('r') => StatusAction::Refresh,
            KeyCode::Char('c') => {
                self.commit.open(&self.model);
                self.mode = Mode::Commit;
                return;
            }
            _ => return,
        };
        let handled = self.status.handle(action, &mut self.model);
        self.report(handled);
    }

    fn handle_log_key(&mut self, key: KeyEvent) {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => LogAction::Down,
            KeyCode::Char('k') | KeyCode::Up => LogAction::Up,
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => LogAction::PrevPanel,
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => LogAction::NextPanel,
            KeyCode::Char('y') => LogAction::CopyMessage,
            KeyCode::Char('m') => LogAction::FetchMore,
            _ => return,
        };

        if !self.log_mounted && matches!(action, LogAction::Down | LogAction::FetchMore) {
            self.mount_log();
            return;
        }

        match self.log.handle(action, &mut self.model) {
            Ok(Some(query)) => self.request_log_page(query, PageMode::Append),
            Ok(None) if action == LogAction::CopyMessage => {
                if !self.model.saved_message().is_empty() {
                    let hint = "Message saved for the next commit";
                    self.notify("Copied", hint, Severity::Info);
                }
            }
            Ok(None) => {}
            Err(e) => self.report_error(&e),
        }
    }

    fn handle_commit_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.show_status(),
            KeyCode::Char('s') if ctrl => self.submit_commit(),
            KeyCode::Char('y') if ctrl => self.commit.insert_saved_message(&self.model),
            KeyCode::Enter => self.commit.newline(),
            KeyCode::Backspace => self.commit.pop_char(),
            KeyCode::Char(c) if !ctrl => self.commit.push_char(c),
            _ => {}
        }
    }

    fn submit_commit(&mut self) {
        let summary = self.commit.message().lines().next().unwrap_or("").to_string();
        self.notify("Committing...", &summary, Severity::Info);
        match self.commit.submit(&self.model) {
            Ok(()) => {
                self.show_status();
                let refreshed = self.status.refresh(&mut self.model);
                self.report(refreshed);
            }
            Err(e) => self.report_error(&e),
        }
    }
}
