//! Background execution of slow svn queries.
//!
//! A worker thread only runs the external command and parses its output. The result
//! travels back over a channel as a [`TaskOutcome`] and is applied to the model by
//! the thread that owns it, during [`BackgroundTasks::poll`]. While a task of some
//! [`TaskKind`] is in flight, further requests of the same kind are refused.

use crate::core::error::Result;
use crate::core::model::PageMode;
use crate::core::state::LogEntry;
use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// `svn status -u` against the server
    UpToDate,
    /// One `svn log` page
    LogPage,
}

#[derive(Debug)]
pub enum TaskOutcome {
    UpToDate(Result<bool>),
    LogPage {
        mode: PageMode,
        result: Result<Vec<LogEntry>>,
    },
}

impl TaskOutcome {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskOutcome::UpToDate(_) => TaskKind::UpToDate,
            TaskOutcome::LogPage { .. } => TaskKind::LogPage,
        }
    }
}

pub struct BackgroundTasks {
    busy: HashSet<TaskKind>,
    sender: Sender<TaskOutcome>,
    receiver: Receiver<TaskOutcome>,
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundTasks {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            busy: HashSet::new(),
            sender,
            receiver,
        }
    }

    /// Start `job` on a new thread. Returns false, without starting anything, when a
    /// task of the same kind is still running.
    pub fn spawn<F>(&mut self, kind: TaskKind, job: F) -> bool
    where
        F: FnOnce() -> TaskOutcome + Send + 'static,
    {
        if !self.busy.insert(kind) {
            log::debug!("{kind:?} already in flight, request ignored");
            return false;
        }

        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let outcome = job();
            // receiver is gone only when the app is shutting down
            let _ = sender.send(outcome);
        });
        log::debug!("Started background task {kind:?}");
        true
    }

    pub fn is_busy(&self, kind: TaskKind) -> bool {
        self.busy.contains(&kind)
    }

    pub fn any_busy(&self) -> bool {
        !self.busy.is_empty()
    }

    /// Collect every finished task without blocking
    pub fn poll(&mut self) -> Vec<TaskOutcome> {
        let mut finished = Vec::new();
        while let Ok(outcome) = self.receiver.try_recv() {
            self.finish(&outcome);
            finished.push(outcome);
        }
        finished
    }

    /// Wait up to `timeout` for the next finished task
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<TaskOutcome> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => {
                self.finish(&outcome);
                Some(outcome)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn finish(&mut self, outcome: &TaskOutcome) {
        let kind = outcome.kind();
        self.busy.remove(&kind);
        log::debug!("Background task {kind:?} finished");
    }
}
