//! Console output helpers for the non-interactive commands.
//!
//! Errors, confirmations and section headers share one layout: a blank line before,
//! a colored marker, then the message.

use colored::*;

/// Prints `✕ Error: <message>` in red and white, padded by blank lines
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Prints `! <message>` in yellow, for problems that do not stop the command
pub fn print_warning(message: &str) {
    println!("\n{} {}", "!".yellow().bold(), message.white());
}

pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Prints `<header>:` followed by an empty line
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}
