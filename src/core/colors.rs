//! One color per svn status, for both the console and the terminal UI.
//!
//! # Public API
//! - [`get_status_color_style`]: `colored` styling for console output
//! - [`get_colored_status_line`]: A formatted `<code>  <path>` console line
//! - [`status_color`]: The `ratatui` color used by the interactive views
//!
//! # Color Scheme
//! - **Modified / Replaced**: Yellow
//! - **Added**: Green
//! - **Deleted / Missing**: Red
//! - **Conflicted / Obstructed**: Red bold
//! - **Everything else**: Muted grey

use crate::core::svn_status::SvnStatus;
use colored::*;
use ratatui::style::Color;

pub fn get_status_color_style(status: SvnStatus) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        SvnStatus::Modified | SvnStatus::Replaced => Box::new(|text: &str| text.yellow()),
        SvnStatus::Added => Box::new(|text: &str| text.green()),
        SvnStatus::Deleted | SvnStatus::Missing => Box::new(|text: &str| text.red()),
        SvnStatus::Conflicted | SvnStatus::Obstructed => {
            Box::new(|text: &str| text.red().bold())
        }
        SvnStatus::Unversioned
        | SvnStatus::Ignored
        | SvnStatus::External
        | SvnStatus::Normal => Box::new(|text: &str| text.bright_black()),
    }
}

/// `M  src/lib.c`, both halves in the status color
pub fn get_colored_status_line(status: SvnStatus, path: &str) -> String {
    let color_fn = get_status_color_style(status);
    format!("{}  {}", color_fn(&status.code().to_string()), color_fn(path))
}

pub fn status_color(status: SvnStatus) -> Color {
    match status {
        SvnStatus::Modified | SvnStatus::Replaced => Color::Rgb(0xf6, 0xc1, 0x77),
        SvnStatus::Added => Color::Rgb(0x8e, 0xc0, 0x7c),
        SvnStatus::Deleted
        | SvnStatus::Missing
        | SvnStatus::Conflicted
        | SvnStatus::Obstructed => Color::Rgb(0xeb, 0x6f, 0x92),
        _ => Color::Rgb(0x6e, 0x6a, 0x86),
    }
}
