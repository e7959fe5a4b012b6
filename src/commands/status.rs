//! The status view: unstaged and staged lists, the diff of the selected row, and the
//! command log.
//!
//! # Public API
//! - [`StatusView`]: Focus, cursors and derived panels of the interactive status view
//! - [`StatusAction`]: Input events the status view understands
//! - [`execute_status`]: Non-interactive `status` command

use crate::core::{
    colors::get_colored_status_line,
    error::Result,
    model::SvnModel,
    output::{print_info, print_section_header},
    panel::{Panel, SortHint, TablePanel},
    state::ChangeEntry,
    svn_status::SvnStatus,
};
use std::path::PathBuf;

pub const STATUS_COLUMNS: [&str; 2] = ["Status", "Path"];

/// Which list holds input focus. There is no state in which neither does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFocus {
    Unstaged,
    Staged,
}

impl StatusFocus {
    pub fn toggle(self) -> Self {
        match self {
            StatusFocus::Unstaged => StatusFocus::Staged,
            StatusFocus::Staged => StatusFocus::Unstaged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Down,
    Up,
    TogglePanel,
    StageOrUnstage,
    ToggleUnversioned,
    Refresh,
}

fn rows_for<'a>(entries: impl Iterator<Item = &'a ChangeEntry>) -> Vec<Vec<String>> {
    entries
        .map(|entry| {
            vec![
                entry.status.code().to_string(),
                entry.path.to_string_lossy().into_owned(),
            ]
        })
        .collect()
}

pub struct StatusView {
    focus: StatusFocus,
    unstaged: TablePanel,
    staged: TablePanel,
    diff_text: String,
    command_log: Vec<String>,
}

impl Default for StatusView {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusView {
    pub fn new() -> Self {
        let mut unstaged = TablePanel::new("Unstaged");
        let mut staged = TablePanel::new("Staged");
        unstaged.set_columns(&STATUS_COLUMNS);
        staged.set_columns(&STATUS_COLUMNS);

        let mut view = Self {
            focus: StatusFocus::Unstaged,
            unstaged,
            staged,
            diff_text: String::new(),
            command_log: Vec::new(),
        };
        view.sync_focus();
        view
    }

    pub fn focus(&self) -> StatusFocus {
        self.focus
    }

    pub fn unstaged_panel(&self) -> &TablePanel {
        &self.unstaged
    }

    pub fn staged_panel(&self) -> &TablePanel {
        &self.staged
    }

    pub fn diff_text(&self) -> &str {
        &self.diff_text
    }

    /// Every audited command issued so far, oldest first
    pub fn command_log(&self) -> &[String] {
        &self.command_log
    }

    pub fn mount(&mut self, model: &mut SvnModel) -> Result<()> {
        self.refresh(model)
    }

    /// Re-fetch status and rebuild both lists and the diff. The command log is
    /// drained even when the fetch fails.
    pub fn refresh(&mut self, model: &mut SvnModel) -> Result<()> {
        let fetched = model.refresh_status();
        self.update_command_log(model);
        fetched?;

        self.sync_focus();
        self.reset_view_data(model)
    }

    pub fn handle(&mut self, action: StatusAction, model: &mut SvnModel) -> Result<()> {
        match action {
            StatusAction::Down => {
                self.focused_panel_mut().next_row();
                self.update_diff(model)
            }
            StatusAction::Up => {
                self.focused_panel_mut().prev_row();
                self.update_diff(model)
            }
            StatusAction::TogglePanel => {
                self.focus = self.focus.toggle();
                self.sync_focus();
                self.update_diff(model)
            }
            StatusAction::StageOrUnstage => {
                // the lists are rebuilt even when one of the svn commands failed
                let toggled = self.stage_or_unstage(model);
                let refreshed = self.refresh(model);
                toggled.and(refreshed)
            }
            StatusAction::ToggleUnversioned => {
                model.toggle_hide_unversioned();
                self.refresh(model)
            }
            StatusAction::Refresh => self.refresh(model),
        }
    }

    /// The entry under the cursor of the focused list
    pub fn selected_entry(&self) -> Option<ChangeEntry> {
        let row = self.focused_panel().current_row()?;
        let status = SvnStatus::from_code(row.first()?).ok()?;
        let path = row.get(1).filter(|path| !path.is_empty())?;
        Some(ChangeEntry::new(status, PathBuf::from(path)))
    }

    fn focused_panel(&self) -> &TablePanel {
        match self.focus {
            StatusFocus::Unstaged => &self.unstaged,
            StatusFocus::Staged => &self.staged,
        }
    }

    fn focused_panel_mut(&mut self) -> &mut TablePanel {
        match self.focus {
            StatusFocus::Unstaged => &mut self.unstaged,
            StatusFocus::Staged => &mut self.staged,
        }
    }

    fn sync_focus(&mut self) {
        match self.focus {
            StatusFocus::Unstaged => {
                self.unstaged.give_focus();
                self.staged.release_focus();
            }
            StatusFocus::Staged => {
                self.staged.give_focus();
                self.unstaged.release_focus();
            }
        }
    }

    fn reset_view_data(&mut self, model: &mut SvnModel) -> Result<()> {
        let path_sort = Some(SortHint::ascending("Path"));
        self.unstaged
            .set_data(rows_for(model.unstaged_changes().iter()), path_sort);
        self.staged
            .set_data(rows_for(model.staging().entries()), path_sort);
        self.update_diff(model)
    }

    fn update_diff(&mut self, model: &mut SvnModel) -> Result<()> {
        self.diff_text = match self.selected_entry() {
            Some(entry) if entry.status.has_diff() => model.diff_file(&entry.path)?,
            _ => String::new(),
        };
        Ok(())
    }

    fn update_command_log(&mut self, model: &SvnModel) {
        self.command_log.extend(model.command_log().drain());
    }

    /// Unversioned paths are added and then staged; an added directory is only added,
    /// since svn keeps directories out of changelists and the model tracks them apart.
    /// Unstaging an added file also reverts it back to unversioned.
    fn stage_or_unstage(&mut self, model: &mut SvnModel) -> Result<()> {
        let Some(entry) = self.selected_entry() else {
            return Ok(());
        };

        match self.focus {
            StatusFocus::Unstaged => {
                if entry.status == SvnStatus::Unversioned {
                    model.add_file(&entry.path)?;
                    if model.root().join(&entry.path).is_dir() {
                        return Ok(());
                    }
                }
                model.stage_file(&entry.path)
            }
            StatusFocus::Staged => {
                let is_added_directory = model
                    .added_directories()
                    .iter()
                    .any(|dir| dir.path == entry.path);
                if !is_added_directory {
                    model.unstage_file(&entry.path)?;
                }
                if entry.status == SvnStatus::Added {
                    model.revert_file(&entry.path)?;
                }
                Ok(())
            }
        }
    }
}

/// Print the working copy's changes without starting the interactive client
pub fn execute_status(model: &mut SvnModel, show_all: bool) -> Result<()> {
    if show_all {
        model.set_hide_unversioned(false);
    }
    model.fetch_status()?;

    if model.unstaged_changes().is_empty() && model.staging().is_empty() {
        print_info("Nothing to commit, working copy clean");
        return Ok(());
    }

    if !model.unstaged_changes().is_empty() {
        print_section_header("Unstaged changes");
        for entry in model.unstaged_changes() {
            println!(
                "  {}",
                get_colored_status_line(entry.status, &entry.path.to_string_lossy())
            );
        }
    }

    if !model.staging().is_empty() {
        print_section_header("Staged changes");
        for entry in model.staging().entries() {
            println!(
                "  {}",
                get_colored_status_line(entry.status, &entry.path.to_string_lossy())
            );
        }
    }
    println!();

    Ok(())
}
