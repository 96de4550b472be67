//! Lunar Shell core
//!
//! Central coordination layer for the virtual browser shell: one owned
//! [`Shell`] instance ties the settings store, proxy codec, tunnel
//! transport, tab manager and request router together and drives the
//! address bar.

pub mod bookmarks;
mod config;
mod error;
mod shell;

pub use config::ShellConfig;
pub use error::CoreError;
pub use shell::Shell;

// Re-export core components
pub use lunar_navigation::{routes, Classified, InputResolver, TabHistory, VirtualRoute};
pub use lunar_privacy::{AdBlock, Destination, Disposition, RequestRouter};
pub use lunar_proxy::{Backend, ProxyBackend, ProxyCodec};
pub use lunar_settings::{keys, Bookmark, SettingsError, SettingsStore};
pub use lunar_storage::{Database, StorageError};
pub use lunar_tabs::{
    Frame, FrameHost, TabError, TabId, TabManager, TabStrip, TabSummary, UrlBar,
};
pub use lunar_transport::{TransportError, TunnelClient, TunnelConnection};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
