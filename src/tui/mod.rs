//! Interactive terminal client.
//!
//! [`App`] owns the model and the views and turns key presses into view actions;
//! [`ui::render`] draws it. Background work is polled once per loop iteration, so
//! results are always applied on this thread.

pub mod app;
pub mod ui;

pub use app::{App, Mode, Notification, Severity};

use crate::core::error::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Take over the terminal and run until the user quits
pub fn run_app(mut app: App) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    app.mount();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                _ => {}
            }
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
