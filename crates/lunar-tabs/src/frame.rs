//! Browsing-context and view seams
//!
//! The shell runs against traits at the embedder boundary: the frame host
//! owns the real rendering surfaces (sandboxed embedded frames), the view
//! traits receive tab-strip and address-bar reconciliation. Everything the
//! manager knows about a hosted page goes through [`Frame`].

use std::sync::Arc;

use crate::{Result, TabId};

/// Capabilities granted to a hosted frame. Anything not listed is denied by
/// the sandbox.
pub const SANDBOX_CAPABILITIES: &[&str] = &[
    "allow-scripts",
    "allow-popups",
    "allow-modals",
    "allow-top-navigation",
    "allow-pointer-lock",
    "allow-same-origin",
    "allow-forms",
];

/// Invoked when a hosted page asks for a new browsing surface. The manager
/// installs one on every frame so the request lands in a tab instead of a
/// native popup.
pub type PopupHook = Arc<dyn Fn(&str) + Send + Sync>;

/// One isolated browsing context, exclusively owned by its tab.
pub trait Frame: Send + Sync {
    /// Assign a new source, triggering a load.
    fn navigate(&self, src: &str);

    /// The last assigned source.
    fn src(&self) -> String;

    /// Current location of the hosted document. Fails while the document is
    /// unavailable (before first load, mid-navigation, torn down).
    fn location(&self) -> Result<String>;

    /// Current title of the hosted document. Same failure window as
    /// [`Frame::location`].
    fn document_title(&self) -> Result<String>;

    fn set_visible(&self, visible: bool);

    fn install_popup_hook(&self, hook: PopupHook);
}

/// The container the frames live in.
pub trait FrameHost: Send + Sync {
    /// Whether the container exists yet. Tab opens before mount are queued.
    fn is_mounted(&self) -> bool;

    fn create_frame(&self, id: TabId, src: &str, sandbox: &[&str]) -> Arc<dyn Frame>;

    fn remove_frame(&self, id: TabId);
}

/// Receives tab-strip reconciliation.
pub trait TabStrip: Send + Sync {
    fn render(&self, tabs: &[crate::TabSummary], active: Option<TabId>);

    fn set_title(&self, id: TabId, title: &str);

    fn set_favicon(&self, id: TabId, icon: &str);
}

/// Receives address-bar synchronization.
pub trait UrlBar: Send + Sync {
    fn set_value(&self, value: &str);
}
