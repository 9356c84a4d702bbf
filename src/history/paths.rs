//! Per-user data directory resolution.

use std::path::PathBuf;

const APP_DIR: &str = "quakeboard";
const HISTORY_FILE: &str = "earthquake_history.json";
const LOG_FILE: &str = "quakeboard.log";

/// Get the per-user data directory (e.g. `~/.local/share/quakeboard`).
///
/// Falls back to the current directory when the platform has no data dir.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Get the default history file path.
pub fn default_history_path() -> PathBuf {
    data_dir().join(HISTORY_FILE)
}

/// Get the log file used while the dashboard owns the terminal.
pub fn default_log_path() -> PathBuf {
    data_dir().join(LOG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_history_path() {
        let path = default_history_path();
        assert!(path.ends_with("quakeboard/earthquake_history.json"));
    }

    #[test]
    fn test_log_path_shares_data_dir() {
        assert_eq!(default_log_path().parent(), default_history_path().parent());
    }
}
