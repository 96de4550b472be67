//! Lunar Shell settings
//!
//! Key/value configuration consumed by the rest of the shell: proxy backend
//! selector, tunnel relay endpoint, search engine, panic key, cloaking and
//! the bookmark list. Every key has a seeded default so reads after init
//! always produce a value.

mod bookmark;
mod error;
pub mod keys;
mod store;

pub use bookmark::Bookmark;
pub use error::SettingsError;
pub use store::SettingsStore;

pub type Result<T> = std::result::Result<T, SettingsError>;
