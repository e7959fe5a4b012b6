//! Temporary working copies backed by a fake `svn` executable
//!
//! The fake script appends every argument vector to `calls.log`, then looks up the
//! subcommand (the first argument not starting with `--`) and prints
//! `<subcommand>.out`, or `status_u.out` for `status -u`. A `fail_<subcommand>`
//! file makes it print that file to stderr and exit 1.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use svn_navigator::core::error::Result;
use tempfile::TempDir;

const FAKE_SVN: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
echo "$@" >> "$dir/calls.log"
suffix=""
for arg in "$@"; do
    if [ "$arg" = "-u" ]; then
        suffix="_u"
    fi
done
sub=""
for arg in "$@"; do
    case "$arg" in
        --*) ;;
        *) sub="$arg"; break ;;
    esac
done
if [ -f "$dir/fail_$sub" ]; then
    cat "$dir/fail_$sub" >&2
    exit 1
fi
if [ -f "$dir/$sub$suffix.out" ]; then
    cat "$dir/$sub$suffix.out"
fi
exit 0
"#;

/// A working-copy directory plus the fake svn that serves it. The TempDir must be
/// kept alive for the duration of the test.
pub struct TestWorkingCopy {
    pub temp_dir: TempDir,
    /// Canonical path of the working copy
    pub path: PathBuf,
    bin_dir: PathBuf,
}

impl TestWorkingCopy {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Working-copy root as svn would print it
    pub fn root(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn svn_binary(&self) -> PathBuf {
        self.bin_dir.join("svn")
    }

    /// Canned stdout for a subcommand; `status_u` serves `status -u`
    pub fn respond(&self, subcommand: &str, output: &str) -> Result<()> {
        fs::write(self.bin_dir.join(format!("{subcommand}.out")), output)?;
        Ok(())
    }

    /// Make a subcommand exit 1 with `stderr`
    pub fn fail(&self, subcommand: &str, stderr: &str) -> Result<()> {
        fs::write(self.bin_dir.join(format!("fail_{subcommand}")), stderr)?;
        Ok(())
    }

    /// Every command line the fake svn received, one per entry
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.bin_dir.join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn create_dir(&self, name: &str) -> Result<()> {
        fs::create_dir_all(self.path.join(name))?;
        Ok(())
    }

    /// The svn-navigator binary, pointed at the fake svn
    pub fn command(&self) -> Command {
        let mut cmd = self.command_without_svn();
        cmd.arg("--svn-binary").arg(self.svn_binary());
        cmd
    }

    /// The svn-navigator binary, isolated from the user's config, cache and
    /// terminal colors, with no svn executable chosen
    pub fn command_without_svn(&self) -> Command {
        let mut cmd = Command::cargo_bin("svn-navigator").expect("binary is built");
        let home = self.temp_dir.path().join("home");
        cmd.current_dir(&self.path)
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join("config"))
            .env("XDG_CACHE_HOME", home.join("cache"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Where the binary writes its config inside the isolated home
    pub fn config_file(&self) -> PathBuf {
        self.temp_dir
            .path()
            .join("home")
            .join("config")
            .join("svn-navigator")
            .join("config.json")
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Sets up an empty working copy and its fake svn
pub fn setup_working_copy() -> Result<TestWorkingCopy> {
    let temp_dir = TempDir::new()?;
    let wc = temp_dir.path().join("wc");
    let bin_dir = temp_dir.path().join("bin");
    fs::create_dir_all(&wc)?;
    fs::create_dir_all(&bin_dir)?;

    let script = bin_dir.join("svn");
    fs::write(&script, FAKE_SVN)?;
    make_executable(&script)?;

    Ok(TestWorkingCopy {
        path: fs::canonicalize(&wc)?,
        bin_dir: fs::canonicalize(&bin_dir)?,
        temp_dir,
    })
}
