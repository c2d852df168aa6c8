use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".reading-club";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "club.sqlite";
/// Log file written next to the database; stdout belongs to the terminal UI.
const LOG_FILE_NAME: &str = "club.log";

/// Where the application keeps its files. Resolved once in `main` and handed
/// down explicitly, so nothing else needs to know about the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Default layout under `~/.reading-club/`.
    pub fn from_home() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::in_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Same layout rooted at an arbitrary directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let data_dir = dir.as_ref().to_path_buf();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_places_files_side_by_side() {
        let config = Config::in_dir("/tmp/club");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/club"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/club/club.sqlite"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/club/club.log"));
    }
}
