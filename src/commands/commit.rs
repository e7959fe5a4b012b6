//! Commit message editor state.

use crate::core::{error::Result, model::SvnModel};

#[derive(Debug, Clone, Default)]
pub struct CommitView {
    message: String,
}

impl CommitView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing; the saved message, if any, is the initial text
    pub fn open(&mut self, model: &SvnModel) {
        self.message = model.saved_message().to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn push_char(&mut self, c: char) {
        self.message.push(c);
    }

    pub fn pop_char(&mut self) {
        self.message.pop();
    }

    pub fn newline(&mut self) {
        self.message.push('\n');
    }

    pub fn insert_saved_message(&mut self, model: &SvnModel) {
        self.message.push_str(model.saved_message());
    }

    /// Commit the staging set with the current text. The text is kept when the
    /// commit fails so it can be corrected and submitted again.
    pub fn submit(&mut self, model: &SvnModel) -> Result<()> {
        model.commit_staged(&self.message)?;
        self.message.clear();
        Ok(())
    }
}
