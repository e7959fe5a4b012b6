use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::commands::log::LogFocus;
use crate::core::colors::status_color;
use crate::core::panel::{Panel, TablePanel};
use crate::core::svn_status::SvnStatus;
use crate::tui::app::{App, Mode, Severity};

const ACCENT: Color = Color::Cyan;
const MUTED: Color = Color::DarkGray;

/// Render the full TUI frame.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // main area
            Constraint::Length(1), // key hints
        ])
        .split(f.area());

    match app.mode {
        Mode::Status => render_status(f, app, chunks[0]),
        Mode::Log => render_log(f, app, chunks[0]),
        Mode::Commit => {
            render_status(f, app, chunks[0]);
            render_commit(f, app, chunks[0]);
        }
    }
    render_footer(f, app, chunks[1]);
    render_notifications(f, app, chunks[0]);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    }
}

fn block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(focused))
}

/// Draw a panel as a table; the status column, if present, is colored by status
fn render_table(f: &mut Frame, panel: &TablePanel, widths: &[Constraint], area: Rect) {
    let status_column = panel.columns().iter().position(|c| c == "Status");
    let header = Row::new(
        panel
            .columns()
            .iter()
            .map(|c| Cell::from(c.clone()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(MUTED).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = panel
        .rows()
        .iter()
        .map(|row| {
            let color = status_column
                .and_then(|i| row.get(i))
                .and_then(|code| SvnStatus::from_code(code).ok())
                .map(status_color);
            let style = color.map_or_else(Style::default, |c| Style::default().fg(c));
            Row::new(row.iter().map(|v| Cell::from(v.clone())).collect::<Vec<_>>()).style(style)
        })
        .collect();

    let title = format!(" {} ({}) ", panel.title(), panel.len());
    let table = Table::new(rows, widths.to_vec())
        .header(header)
        .block(block(title, panel.has_focus()))
        .row_highlight_style(if panel.has_focus() {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        });

    let mut state = TableState::default();
    if !panel.is_empty() {
        state.select(Some(panel.cursor()));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let lists = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[0]);
    let output = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(columns[1]);

    let widths = [Constraint::Length(8), Constraint::Min(10)];
    render_table(f, app.status.unstaged_panel(), &widths, lists[0]);
    render_table(f, app.status.staged_panel(), &widths, lists[1]);

    let diff_lines: Vec<Line> = app.status.diff_text().lines().map(diff_line).collect();
    let diff = Paragraph::new(diff_lines).block(block(" Diff ".to_string(), false));
    f.render_widget(diff, output[0]);

    // newest commands at the bottom
    let visible = output[1].height.saturating_sub(2) as usize;
    let log = app.status.command_log();
    let lines: Vec<Line> = log
        .iter()
        .skip(log.len().saturating_sub(visible))
        .map(|command| Line::from(Span::styled(command.clone(), Style::default().fg(MUTED))))
        .collect();
    let commands = Paragraph::new(lines).block(block(" Command log ".to_string(), false));
    f.render_widget(commands, output[1]);
}

fn diff_line(line: &str) -> Line<'static> {
    let style = if line.starts_with("+++") || line.starts_with("---") {
        Style::default().add_modifier(Modifier::BOLD)
    } else if line.starts_with('+') {
        Style::default().fg(Color::Green)
    } else if line.starts_with('-') {
        Style::default().fg(Color::Red)
    } else if line.starts_with("@@") {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    Line::from(Span::styled(line.to_string(), style))
}

fn render_log(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let details = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Min(3),
        ])
        .split(columns[1]);

    let log_widths = [
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(11),
        Constraint::Min(10),
    ];
    if app.log.is_loading() && app.log.log_panel().table().is_empty() {
        let loading = Paragraph::new("Loading...")
            .block(block(" Log ".to_string(), app.log.focus() == LogFocus::Log));
        f.render_widget(loading, columns[0]);
    } else {
        render_table(f, app.log.log_panel().table(), &log_widths, columns[0]);
    }

    let info_title = if app.log.is_loading() {
        " Info (loading...) "
    } else {
        " Info "
    };
    let info = Paragraph::new(app.log.info().to_string())
        .block(block(info_title.to_string(), false))
        .wrap(Wrap { trim: true });
    f.render_widget(info, details[0]);

    render_table(
        f,
        app.log.message_panel(),
        &[Constraint::Min(10)],
        details[1],
    );
    render_table(
        f,
        app.log.changelist_panel(),
        &[Constraint::Length(8), Constraint::Min(10)],
        details[2],
    );
}

fn centered(area: Rect, width_percent: u16, height: u16) -> Rect {
    let width = area.width * width_percent / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_commit(f: &mut Frame, app: &App, area: Rect) {
    let popup = centered(area, 60, 12);
    f.render_widget(Clear, popup);
    let editor = Paragraph::new(format!("{}▏", app.commit.message()))
        .block(block(" Commit message ".to_string(), true))
        .wrap(Wrap { trim: false });
    f.render_widget(editor, popup);
}

fn render_notifications(f: &mut Frame, app: &App, area: Rect) {
    let width = (area.width / 3).max(30).min(area.width);
    let mut y = area.y;
    for notification in app.notifications.iter().rev() {
        let lines = notification.message.lines().count().max(1) as u16;
        let height = (lines + 2).min(6);
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width - width,
            y,
            width,
            height,
        };
        let color = match notification.severity {
            Severity::Info => ACCENT,
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
        };
        f.render_widget(Clear, rect);
        let popup = Paragraph::new(notification.message.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!(" {} ", notification.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(popup, rect);
        y += height;
    }
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints = match app.mode {
        Mode::Status => {
            " status | j/k:move  h/l:panel  space:stage  c:commit  t:unversioned  r:refresh  2:log  x:dismiss  q:quit"
        }
        Mode::Log => {
            " log | j/k:move  h/l:panel  y:copy message  m:more  1:status  x:dismiss  q:quit"
        }
        Mode::Commit => " commit | ctrl+s:submit  ctrl+y:saved message  esc:cancel",
    };
    let bar = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(Color::White).bg(MUTED),
    )));
    f.render_widget(bar, area);
}
