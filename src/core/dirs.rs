use crate::core::error::Result;
use std::path::PathBuf;

const APP_DIR: &str = "svn-navigator";

fn is_xdg_platform() -> bool {
    matches!(
        std::env::consts::OS,
        "linux" | "freebsd" | "netbsd" | "openbsd"
    )
}

/// Where `config.json` lives
pub fn get_config_directory() -> Result<PathBuf> {
    let base = if is_xdg_platform() {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config"))
    } else {
        dirs::config_dir().unwrap_or_default()
    };

    Ok(base.join(APP_DIR))
}

/// Where the log file is written
pub fn get_cache_directory() -> Result<PathBuf> {
    let base = if is_xdg_platform() {
        std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".cache"))
    } else {
        dirs::cache_dir().unwrap_or_default()
    };

    Ok(base.join(APP_DIR))
}

pub fn get_log_file() -> Result<PathBuf> {
    Ok(get_cache_directory()?.join("svn-navigator.log"))
}
