//! In-memory frame host
//!
//! Stands in for the real frame container when there is no document to
//! mount into: unit tests and headless embedders drive load completion,
//! location changes and popup requests by hand. State mirrors what the
//! manager can observe through the [`Frame`] trait and nothing more.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::TabError;
use crate::frame::{Frame, FrameHost, PopupHook};
use crate::{Result, TabId};

struct DocumentState {
    location: String,
    title: String,
}

pub struct HeadlessFrame {
    id: TabId,
    src: Mutex<String>,
    visible: Mutex<bool>,
    sandbox: Vec<String>,
    document: Mutex<Option<DocumentState>>,
    popup_hook: Mutex<Option<PopupHook>>,
}

impl HeadlessFrame {
    fn new(id: TabId, src: &str, sandbox: &[&str]) -> Self {
        Self {
            id,
            src: Mutex::new(src.to_string()),
            visible: Mutex::new(false),
            sandbox: sandbox.iter().map(|s| s.to_string()).collect(),
            document: Mutex::new(None),
            popup_hook: Mutex::new(None),
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.lock()
    }

    pub fn sandbox(&self) -> &[String] {
        &self.sandbox
    }

    /// Simulate the first load completing. The embedder still has to report
    /// it through `TabManager::notify_frame_loaded`.
    pub fn complete_load(&self, location: &str, title: &str) {
        *self.document.lock() = Some(DocumentState {
            location: location.to_string(),
            title: title.to_string(),
        });
    }

    /// Simulate an in-page navigation.
    pub fn set_location(&self, location: &str) {
        if let Some(doc) = self.document.lock().as_mut() {
            doc.location = location.to_string();
        }
    }

    /// Simulate a script changing the document title without navigating.
    pub fn set_document_title(&self, title: &str) {
        if let Some(doc) = self.document.lock().as_mut() {
            doc.title = title.to_string();
        }
    }

    /// Simulate the hosted page requesting a new browsing surface.
    pub fn request_popup(&self, url: &str) {
        let hook = self.popup_hook.lock().clone();
        if let Some(hook) = hook {
            hook(url);
        }
    }
}

impl Frame for HeadlessFrame {
    fn navigate(&self, src: &str) {
        *self.src.lock() = src.to_string();
    }

    fn src(&self) -> String {
        self.src.lock().clone()
    }

    fn location(&self) -> Result<String> {
        self.document
            .lock()
            .as_ref()
            .map(|d| d.location.clone())
            .ok_or(TabError::FrameUnavailable)
    }

    fn document_title(&self) -> Result<String> {
        self.document
            .lock()
            .as_ref()
            .map(|d| d.title.clone())
            .ok_or(TabError::FrameUnavailable)
    }

    fn set_visible(&self, visible: bool) {
        *self.visible.lock() = visible;
    }

    fn install_popup_hook(&self, hook: PopupHook) {
        *self.popup_hook.lock() = Some(hook);
    }
}

pub struct HeadlessHost {
    mounted: AtomicBool,
    frames: Mutex<HashMap<TabId, Arc<HeadlessFrame>>>,
}

impl HeadlessHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            mounted: AtomicBool::new(true),
            frames: Mutex::new(HashMap::new()),
        })
    }

    /// A host whose container has not mounted yet; tab opens queue until
    /// [`HeadlessHost::mount`] is called.
    pub fn unmounted() -> Arc<Self> {
        Arc::new(Self {
            mounted: AtomicBool::new(false),
            frames: Mutex::new(HashMap::new()),
        })
    }

    pub fn mount(&self) {
        self.mounted.store(true, Ordering::SeqCst);
    }

    pub fn frame(&self, id: TabId) -> Option<Arc<HeadlessFrame>> {
        self.frames.lock().get(&id).cloned()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().len()
    }
}

impl FrameHost for HeadlessHost {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn create_frame(&self, id: TabId, src: &str, sandbox: &[&str]) -> Arc<dyn Frame> {
        let frame = Arc::new(HeadlessFrame::new(id, src, sandbox));
        self.frames.lock().insert(id, Arc::clone(&frame));
        frame
    }

    fn remove_frame(&self, id: TabId) {
        self.frames.lock().remove(&id);
    }
}
