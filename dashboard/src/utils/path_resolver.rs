use anyhow::Result;
use std::path::{Path, PathBuf};

/// Folder the binary runs from (falls back to the working directory).
pub fn resolve_deployment_folder() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(dir) = exe_path.parent() {
            return dir.to_path_buf();
        }
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolve and create the log folder.
///
/// Order: explicit override, `<data_local_dir>/finetun/logs`, then
/// `<deployment folder>/logs`.
pub fn resolve_log_folder(override_dir: Option<&Path>) -> Result<PathBuf> {
    let log_dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => match dirs::data_local_dir() {
            Some(base) => base.join("finetun").join("logs"),
            None => resolve_deployment_folder().join("logs"),
        },
    };

    std::fs::create_dir_all(&log_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create log folder {:?}: {}", log_dir, e))?;
    Ok(log_dir)
}

/// Timestamped pair of log files (JSON lines, human-readable) inside `log_dir`.
pub fn log_file_paths(log_dir: &Path, timestamp: &str) -> (PathBuf, PathBuf) {
    (
        log_dir.join(format!("dashboard-{}.log", timestamp)),
        log_dir.join(format!("dashboard-{}.txt", timestamp)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_is_created_and_used() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("logs");

        let resolved = resolve_log_folder(Some(&target)).unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn log_files_share_timestamp() {
        let (json, txt) = log_file_paths(Path::new("/tmp/logs"), "2026-01-01-120000");
        assert_eq!(json, PathBuf::from("/tmp/logs/dashboard-2026-01-01-120000.log"));
        assert_eq!(txt, PathBuf::from("/tmp/logs/dashboard-2026-01-01-120000.txt"));
    }
}
