use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the binary writes its log file.
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("skilltest");
            Some(state_dir.join("skilltest.log"))
        } else {
            ProjectDirs::from("", "", "skilltest")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("skilltest.log"))
        }
    }
}
