//! Invocation of the external `svn` executable.
//!
//! [`CommandRunner`] builds the full argument vector (`--non-interactive`, credentials,
//! subcommand, arguments), runs it through an [`Executor`], and turns a non-zero exit
//! into [`SvnNavigatorError::Command`]. Every command other than the high-frequency
//! read-only ones (`status`, `diff`) is also written to an [`AuditLog`] that the UI
//! drains after each user-visible action.
//!
//! Passwords never leave this module in clear text: audit entries, log records and
//! error messages all go through [`Credentials::redact`].

use crate::core::error::{Result, SvnNavigatorError};
use std::process::Command;
use std::sync::{Arc, Mutex, MutexGuard};

/// Replacement text for a password in any rendered command line
pub const PASSWORD_MASK: &str = "********";

/// Subcommands that are not recorded in the audit log
const UNAUDITED_SUBCOMMANDS: [&str; 2] = ["status", "diff"];

/// Captured result of one process run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs a fully built argument vector. `argv[0]` is the program.
pub trait Executor: Send + Sync {
    fn execute(&self, argv: &[String]) -> std::io::Result<ExecOutput>;
}

/// Executes real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&self, argv: &[String]) -> std::io::Result<ExecOutput> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line")
        })?;

        let output = Command::new(program).args(args).output()?;

        Ok(ExecOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        // an empty flag value means "not configured"
        Self {
            username: username.filter(|u| !u.is_empty()),
            password: password.filter(|p| !p.is_empty()),
        }
    }

    fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(username) = &self.username {
            args.push(format!("--username={username}"));
        }
        if let Some(password) = &self.password {
            args.push(format!("--password={password}"));
        }
        args
    }

    /// Replace every literal occurrence of the password with [`PASSWORD_MASK`]
    pub fn redact(&self, text: &str) -> String {
        match &self.password {
            Some(password) => text.replace(password.as_str(), PASSWORD_MASK),
            None => text.to_string(),
        }
    }
}

/// Append-only queue of executed command lines, shared with worker threads
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl AuditLog {
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        // a panic elsewhere never leaves the Vec half-written
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(&self, command: String) {
        self.lock().push(command);
    }

    /// Take every entry recorded since the last drain
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Runs svn subcommands. Cheap to clone; clones share the executor and audit log.
#[derive(Clone)]
pub struct CommandRunner {
    program: String,
    credentials: Credentials,
    executor: Arc<dyn Executor>,
    audit: AuditLog,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, credentials: Credentials) -> Self {
        Self::with_executor(program, credentials, Arc::new(ProcessExecutor))
    }

    pub fn with_executor(
        program: impl Into<String>,
        credentials: Credentials,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            program: program.into(),
            credentials,
            executor,
            audit: AuditLog::default(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Run `svn <subcommand> <args...>` and return its stdout
    pub fn run(&self, subcommand: &str, args: &[String]) -> Result<String> {
        if !UNAUDITED_SUBCOMMANDS.contains(&subcommand) {
            let rendered = format!("{} {} {}", self.program, subcommand, args.join(" "));
            self.audit.record(self.credentials.redact(rendered.trim_end()));
        }

        let mut argv = vec![self.program.clone(), "--non-interactive".to_string()];
        argv.extend(self.credentials.args());
        argv.push(subcommand.to_string());
        argv.extend(args.iter().cloned());

        let rendered = self.credentials.redact(&argv.join(" "));
        log::debug!("Running: {rendered}");

        let output = self
            .executor
            .execute(&argv)
            .map_err(|e| SvnNavigatorError::spawn_failed(&self.program, e))?;

        if !output.success {
            log::warn!("Command failed: {rendered}");
            return Err(SvnNavigatorError::command_failed(
                rendered,
                self.credentials.redact(&output.stderr),
            ));
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process executor double that replays canned output per subcommand.

    use super::*;
    use std::collections::{HashMap, VecDeque};

    #[derive(Default)]
    pub struct ScriptedExecutor {
        responses: Mutex<HashMap<String, VecDeque<ExecOutput>>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedExecutor {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Queue a successful response for the next call of `subcommand`
        pub fn respond(&self, subcommand: &str, stdout: &str) {
            self.push(
                subcommand,
                ExecOutput {
                    success: true,
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                },
            );
        }

        pub fn fail(&self, subcommand: &str, stderr: &str) {
            self.push(
                subcommand,
                ExecOutput {
                    success: false,
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                },
            );
        }

        fn push(&self, subcommand: &str, output: ExecOutput) {
            self.responses
                .lock()
                .unwrap()
                .entry(subcommand.to_string())
                .or_default()
                .push_back(output);
        }

        /// Every argv executed so far
        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }

        /// Executed calls as `"<subcommand> <args...>"`, without program and global flags
        pub fn invocations(&self) -> Vec<String> {
            self.calls()
                .iter()
                .map(|argv| {
                    argv.iter()
                        .skip(1)
                        .skip_while(|arg| arg.starts_with("--"))
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect()
        }

        pub fn count(&self, subcommand: &str) -> usize {
            self.invocations()
                .iter()
                .filter(|call| call.split(' ').next() == Some(subcommand))
                .count()
        }
    }

    impl Executor for ScriptedExecutor {
        fn execute(&self, argv: &[String]) -> std::io::Result<ExecOutput> {
            self.calls.lock().unwrap().push(argv.to_vec());
            let subcommand = argv
                .iter()
                .skip(1)
                .find(|arg| !arg.starts_with("--"))
                .cloned()
                .unwrap_or_default();
            let mut responses = self.responses.lock().unwrap();
            let output = responses
                .get_mut(&subcommand)
                .and_then(|queue| queue.pop_front())
                .unwrap_or(ExecOutput {
                    success: true,
                    ..ExecOutput::default()
                });
            Ok(output)
        }
    }

    pub fn runner(executor: &Arc<ScriptedExecutor>) -> CommandRunner {
        CommandRunner::with_executor("svn", Credentials::default(), executor.clone())
    }
}
