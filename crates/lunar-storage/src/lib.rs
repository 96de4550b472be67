//! Lunar Shell storage layer
//!
//! SQLite-backed persistence for the settings collaborator. The shell keeps
//! all runtime state (tabs, histories, caches) in memory; only key/value
//! configuration survives a restart.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
