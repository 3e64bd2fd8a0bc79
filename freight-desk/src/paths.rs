//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "by";
const ORGANIZATION: &str = "freight";
const APPLICATION: &str = "freightdesk";

/// Log files kept besides `latest.log`.
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory for persistent data.
///
/// - Linux: `~/.local/share/freightdesk`
/// - macOS: `~/Library/Application Support/by.freight.freightdesk`
/// - Windows: `%APPDATA%\freight\freightdesk\data`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Directory for logs and other regenerable files.
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// The local storage database.
pub fn storage_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("storage.db"))
}

/// The log file of the running process.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Archives `latest.log` under a timestamp and prunes old logs.
///
/// Call once at startup, before the logger opens `latest.log`.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_logs_in(&cache, chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
}

fn rotate_logs_in(dir: &Path, stamp: String) {
    let latest = dir.join("latest.log");
    if latest.exists() {
        let _ = fs::rename(&latest, dir.join(format!("{stamp}.log")));
    }

    let Ok(entries) = fs::read_dir(dir) else { return };
    let mut archived: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();

    if archived.len() <= MAX_OLD_LOGS {
        return;
    }
    // Oldest first; names are timestamps so they sort chronologically.
    archived.sort_by_key(|e| e.file_name());
    let excess = archived.len() - MAX_OLD_LOGS;
    for entry in archived.iter().take(excess) {
        let _ = fs::remove_file(entry.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..MAX_OLD_LOGS + 2 {
            fs::write(dir.path().join(format!("20260101_0000{i:02}.log")), "").unwrap();
        }
        fs::write(dir.path().join("latest.log"), "previous run").unwrap();

        rotate_logs_in(dir.path(), "20991231_235959".to_string());

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names.len(), MAX_OLD_LOGS);
        assert!(!names.contains(&"latest.log".to_string()));
        assert_eq!(names.last().map(String::as_str), Some("20991231_235959.log"));
        assert!(!names.contains(&"20260101_000000.log".to_string()));
    }
}
