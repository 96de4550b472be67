//! Tab error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    /// The hosted document is mid-navigation or torn down; callers retry on
    /// the next poll tick.
    #[error("Browsing context unavailable")]
    FrameUnavailable,

    #[error("Settings error: {0}")]
    Settings(#[from] lunar_settings::SettingsError),

    #[error("Transport error: {0}")]
    Transport(#[from] lunar_transport::TransportError),
}
