//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] lunar_storage::StorageError),

    #[error("Settings error: {0}")]
    Settings(#[from] lunar_settings::SettingsError),
}
