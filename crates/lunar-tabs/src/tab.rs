//! Tab record

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::favicon::DEFAULT_ICON;
use crate::frame::Frame;
use crate::TabId;

pub const DEFAULT_TITLE: &str = "New Tab";

/// Display cap for the tab strip; storage always keeps the full title.
const TITLE_DISPLAY_LEN: usize = 12;

pub struct Tab {
    pub id: TabId,
    /// Full page title; the strip shows [`Tab::display_title`].
    pub title: String,
    /// Default placeholder or a data-URI fetched through the tunnel.
    pub favicon: String,
    /// True once the first load has completed. Location reads before that
    /// would see a not-yet-valid document and must no-op.
    pub is_ready: bool,
    pub(crate) frame: Arc<dyn Frame>,
    pub(crate) title_poller: Option<JoinHandle<()>>,
}

impl Tab {
    pub(crate) fn new(id: TabId, frame: Arc<dyn Frame>) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            favicon: DEFAULT_ICON.to_string(),
            is_ready: false,
            frame,
            title_poller: None,
        }
    }

    pub fn display_title(&self) -> String {
        truncate_title(&self.title)
    }

    pub fn summary(&self) -> TabSummary {
        TabSummary {
            id: self.id,
            title: self.display_title(),
            favicon: self.favicon.clone(),
        }
    }
}

/// Snapshot handed to the tab strip for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSummary {
    pub id: TabId,
    pub title: String,
    pub favicon: String,
}

pub(crate) fn truncate_title(title: &str) -> String {
    let mut chars = title.chars();
    let prefix: String = chars.by_ref().take(TITLE_DISPLAY_LEN).collect();
    if chars.next().is_some() {
        format!("{}…", prefix)
    } else {
        prefix
    }
}

/// Titles arrive percent-encoded from rewritten documents; decode when the
/// encoding is valid, keep the raw text otherwise.
pub(crate) fn decode_title(raw: &str) -> String {
    let decoded = urlencoding::decode(raw)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    decoded.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Short"), "Short");
        assert_eq!(truncate_title("Exactly 12 c"), "Exactly 12 c");
        assert_eq!(truncate_title("A rather long page title"), "A rather lon…");
    }

    #[test]
    fn test_decode_title() {
        assert_eq!(decode_title("Hello%20World"), "Hello World");
        assert_eq!(decode_title("  plain title  "), "plain title");
        // Invalid escapes keep the raw text
        assert_eq!(decode_title("100% title"), "100% title");
    }
}
