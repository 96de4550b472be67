//! Shell configuration

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Path to the settings database file.
    pub database_path: PathBuf,
}

impl ShellConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("lunar.db"),
        }
    }
}
