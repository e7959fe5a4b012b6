//! Presentation-agnostic list panels.
//!
//! The views drive their lists only through the [`Panel`] capability set; the
//! terminal front end reads the same state to draw them. [`TablePanel`] is the one
//! implementation for plain lists; [`LogPanel`] wraps it and adds the revision of
//! the selected row, which the log view uses to look up touched paths.

/// How rows should be ordered when they are set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortHint<'a> {
    pub column: &'a str,
    pub descending: bool,
}

impl<'a> SortHint<'a> {
    pub fn ascending(column: &'a str) -> Self {
        Self {
            column,
            descending: false,
        }
    }
}

pub trait Panel {
    fn set_columns(&mut self, columns: &[&str]);

    /// Replace all rows. The cursor keeps its index, clamped to the new row count.
    fn set_data(&mut self, rows: Vec<Vec<String>>, sort: Option<SortHint<'_>>);

    fn next_row(&mut self);

    fn prev_row(&mut self);

    /// `None` when the panel is empty
    fn current_row(&self) -> Option<&[String]>;

    fn has_focus(&self) -> bool;

    fn give_focus(&mut self);

    fn release_focus(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct TablePanel {
    title: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    cursor: usize,
    focused: bool,
}

impl TablePanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_at_last_row(&self) -> bool {
        !self.rows.is_empty() && self.cursor + 1 == self.rows.len()
    }

    pub fn move_cursor(&mut self, row: usize) {
        self.cursor = row.min(self.rows.len().saturating_sub(1));
    }
}

impl Panel for TablePanel {
    fn set_columns(&mut self, columns: &[&str]) {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
    }

    fn set_data(&mut self, mut rows: Vec<Vec<String>>, sort: Option<SortHint<'_>>) {
        if let Some(hint) = sort {
            if let Some(index) = self.columns.iter().position(|c| c == hint.column) {
                rows.sort_by(|a, b| {
                    let ordering = a.get(index).cmp(&b.get(index));
                    if hint.descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                });
            } else {
                log::warn!("Panel '{}' has no column '{}' to sort by", self.title, hint.column);
            }
        }
        self.rows = rows;
        let previous = self.cursor;
        self.move_cursor(previous);
    }

    fn next_row(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    fn prev_row(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn current_row(&self) -> Option<&[String]> {
        self.rows.get(self.cursor).map(Vec::as_slice)
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn give_focus(&mut self) {
        self.focused = true;
    }

    fn release_focus(&mut self) {
        self.focused = false;
    }
}

/// Revision list. The first column holds the revision number.
#[derive(Debug, Clone, Default)]
pub struct LogPanel {
    table: TablePanel,
}

impl LogPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            table: TablePanel::new(title),
        }
    }

    pub fn table(&self) -> &TablePanel {
        &self.table
    }

    /// Revision of the selected row, if any
    pub fn selected_revision(&self) -> Option<u32> {
        self.table
            .current_row()
            .and_then(|row| row.first())
            .and_then(|revision| revision.parse().ok())
    }

    pub fn is_at_last_row(&self) -> bool {
        self.table.is_at_last_row()
    }
}

impl Panel for LogPanel {
    fn set_columns(&mut self, columns: &[&str]) {
        self.table.set_columns(columns);
    }

    fn set_data(&mut self, rows: Vec<Vec<String>>, sort: Option<SortHint<'_>>) {
        self.table.set_data(rows, sort);
    }

    fn next_row(&mut self) {
        self.table.next_row();
    }

    fn prev_row(&mut self) {
        self.table.prev_row();
    }

    fn current_row(&self) -> Option<&[String]> {
        self.table.current_row()
    }

    fn has_focus(&self) -> bool {
        self.table.has_focus()
    }

    fn give_focus(&mut self) {
        self.table.give_focus();
    }

    fn release_focus(&mut self) {
        self.table.release_focus();
    }
}
