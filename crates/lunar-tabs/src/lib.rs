//! Lunar Shell tab management
//!
//! The in-page session manager: owns the collection of isolated browsing
//! contexts, the active-tab pointer, title and URL polling, and the
//! reconciliation of the tab strip and address bar. Hosted documents live
//! across an isolation boundary whose navigation events cannot be observed
//! reliably, so the manager polls with de-duplication and treats every read
//! failure as a retry on the next tick.

mod error;
mod favicon;
mod frame;
pub mod headless;
mod manager;
mod tab;

pub use error::TabError;
pub use favicon::{FaviconResolver, DEFAULT_ICON};
pub use frame::{Frame, FrameHost, PopupHook, TabStrip, UrlBar, SANDBOX_CAPABILITIES};
pub use manager::{TabManager, UrlChangeHook};
pub use tab::{Tab, TabSummary, DEFAULT_TITLE};

/// Monotonic tab identifier, never reused while the process runs.
pub type TabId = u64;

pub type Result<T> = std::result::Result<T, TabError>;
