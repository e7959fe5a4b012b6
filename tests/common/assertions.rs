//! Common assertion helpers for test output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// Error banner printed by the binary
pub fn has_error() -> impl Predicate<str> {
    predicates::str::contains("✕ Error:")
}

pub fn has_section(header: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("{header}:"))
}

/// The password must never reach the terminal; only its mask may
pub fn password_hidden(password: &str) -> impl Predicate<str> {
    predicates::str::contains(password.to_string()).not()
}

pub fn path_mismatch() -> impl Predicate<str> {
    predicates::str::contains("does not start with the expected local path")
}
