//! Tab manager
//!
//! One owned instance with explicit lifecycle. Recurring work (URL watch,
//! title poll) runs as tokio tasks holding weak references back into the
//! manager; every task is aborted the moment its tab stops being active or
//! is destroyed, so nothing stale ever writes into a reused id.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use url::Url;

use lunar_navigation::routes;
use lunar_proxy::ProxyCodec;
use lunar_settings::{keys, SettingsStore};
use lunar_transport::TunnelConnection;

use crate::favicon::{FaviconResolver, DEFAULT_ICON};
use crate::frame::{Frame, FrameHost, PopupHook, TabStrip, UrlBar, SANDBOX_CAPABILITIES};
use crate::tab::{decode_title, Tab, TabSummary, DEFAULT_TITLE};
use crate::TabId;

const URL_WATCH_INTERVAL: Duration = Duration::from_millis(200);
const TITLE_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Called with the raw frame location whenever the active tab's URL
/// changes; the shell hangs bookmark-state reconciliation off this.
pub type UrlChangeHook = Arc<dyn Fn(&str) + Send + Sync>;

pub struct TabManager {
    inner: Arc<Inner>,
}

struct Inner {
    host: Arc<dyn FrameHost>,
    settings: SettingsStore,
    favicons: FaviconResolver,
    /// Tabs in strip order.
    tabs: RwLock<Vec<Tab>>,
    active_id: RwLock<Option<TabId>>,
    next_id: AtomicU64,
    /// Watcher for the active tab; replaced on every switch.
    url_watcher: Mutex<Option<JoinHandle<()>>>,
    /// Open requests received before the frame container mounted.
    pending_opens: Mutex<Vec<Option<String>>>,
    on_url_change: RwLock<Option<UrlChangeHook>>,
    strip: RwLock<Option<Arc<dyn TabStrip>>>,
    url_bar: RwLock<Option<Arc<dyn UrlBar>>>,
}

impl TabManager {
    pub fn new(
        host: Arc<dyn FrameHost>,
        settings: SettingsStore,
        transport: Arc<TunnelConnection>,
    ) -> Self {
        let favicons = FaviconResolver::new(transport, settings.clone());
        Self {
            inner: Arc::new(Inner {
                host,
                settings,
                favicons,
                tabs: RwLock::new(Vec::new()),
                active_id: RwLock::new(None),
                next_id: AtomicU64::new(1),
                url_watcher: Mutex::new(None),
                pending_opens: Mutex::new(Vec::new()),
                on_url_change: RwLock::new(None),
                strip: RwLock::new(None),
                url_bar: RwLock::new(None),
            }),
        }
    }

    pub fn set_tab_strip(&self, strip: Arc<dyn TabStrip>) {
        *self.inner.strip.write() = Some(strip);
        Inner::render_strip(&self.inner);
    }

    pub fn set_url_bar(&self, bar: Arc<dyn UrlBar>) {
        *self.inner.url_bar.write() = Some(bar);
    }

    pub fn on_url_change(&self, hook: UrlChangeHook) {
        *self.inner.on_url_change.write() = Some(hook);
    }

    /// Open a tab, activate it, and return its id. Before the container
    /// mounts the request is queued and `None` returned; `notify_mounted`
    /// drains the queue.
    pub fn open_tab(&self, src: Option<&str>) -> Option<TabId> {
        Inner::open(&self.inner, src.map(|s| s.to_string()))
    }

    /// The frame container exists now; replay queued opens in order.
    pub fn notify_mounted(&self) {
        let pending: Vec<Option<String>> = {
            let mut queue = self.inner.pending_opens.lock();
            queue.drain(..).collect()
        };
        for src in pending {
            Inner::open(&self.inner, src);
        }
    }

    /// Close a tab; unknown ids are ignored. Closing the last tab opens a
    /// fresh replacement first, so the collection never runs empty.
    pub fn close_tab(&self, id: TabId) {
        Inner::close(&self.inner, id);
    }

    /// Activate a tab. Idempotent; switching to the already-active tab is
    /// safe.
    pub fn switch_tab(&self, id: TabId) {
        Inner::switch(&self.inner, id);
    }

    /// Report that a frame finished its first load.
    pub fn notify_frame_loaded(&self, id: TabId) {
        Inner::handle_frame_load(&self.inner, id);
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        *self.inner.active_id.read()
    }

    pub fn tab_count(&self) -> usize {
        self.inner.tabs.read().len()
    }

    pub fn tabs(&self) -> Vec<TabSummary> {
        self.inner.tabs.read().iter().map(Tab::summary).collect()
    }

    pub fn tab(&self, id: TabId) -> Option<TabSummary> {
        self.inner
            .tabs
            .read()
            .iter()
            .find(|t| t.id == id)
            .map(Tab::summary)
    }

    pub fn active_frame(&self) -> Option<Arc<dyn Frame>> {
        let id = self.active_tab_id()?;
        self.inner.frame_of(id)
    }

    /// Assign a source to the active tab's frame.
    pub fn navigate_active(&self, src: &str) {
        if let Some(frame) = self.active_frame() {
            frame.navigate(src);
        }
    }

    pub fn active_frame_src(&self) -> Option<String> {
        self.active_frame().map(|f| f.src())
    }

    /// Decoded, trimmed title of the active document, if readable and
    /// non-empty.
    pub fn active_document_title(&self) -> Option<String> {
        let frame = self.active_frame()?;
        frame
            .document_title()
            .ok()
            .map(|t| decode_title(&t))
            .filter(|t| !t.is_empty())
    }

    /// Cancel every recurring task. Called once when the shell goes away.
    pub fn shutdown(&self) {
        if let Some(watcher) = self.inner.url_watcher.lock().take() {
            watcher.abort();
        }
        let mut tabs = self.inner.tabs.write();
        for tab in tabs.iter_mut() {
            if let Some(poller) = tab.title_poller.take() {
                poller.abort();
            }
        }
        tracing::info!("Tab manager shut down");
    }
}

impl Clone for TabManager {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Inner {
    fn frame_of(&self, id: TabId) -> Option<Arc<dyn Frame>> {
        self.tabs
            .read()
            .iter()
            .find(|t| t.id == id)
            .map(|t| Arc::clone(&t.frame))
    }

    fn open(inner: &Arc<Inner>, src: Option<String>) -> Option<TabId> {
        if !inner.host.is_mounted() {
            tracing::debug!("Frame container not mounted, queueing tab open");
            inner.pending_opens.lock().push(src);
            return None;
        }

        let id = inner.next_id.fetch_add(1, Ordering::Relaxed);
        let initial = src.as_deref().unwrap_or(routes::NEW_TAB_PATH);
        let frame = inner.host.create_frame(id, initial, SANDBOX_CAPABILITIES);

        // A hosted page asking for a new browsing surface gets a tab, with
        // the target re-encoded through the active backend.
        let weak = Arc::downgrade(inner);
        let hook: PopupHook = Arc::new(move |target: &str| {
            let Some(inner) = weak.upgrade() else { return };
            let backend = inner
                .settings
                .get_or_default(keys::BACKEND)
                .unwrap_or_else(|_| "sc".to_string());
            let proxied = ProxyCodec::encode(&backend, target);
            tracing::debug!(url = %target, "Opening popup target in new tab");
            Inner::open(&inner, Some(proxied));
        });
        frame.install_popup_hook(hook);

        inner.tabs.write().push(Tab::new(id, frame));
        tracing::info!(tab_id = id, "Opened tab");

        Inner::render_strip(inner);
        Inner::switch(inner, id);

        Some(id)
    }

    fn close(inner: &Arc<Inner>, id: TabId) {
        let Some(idx) = inner.tabs.read().iter().position(|t| t.id == id) else {
            return;
        };

        // Closing the last tab first opens its replacement; the replacement
        // becomes active, so no re-activation happens below.
        if inner.tabs.read().len() <= 1 {
            Inner::open(inner, None);
        }

        let mut removed = inner.tabs.write().remove(idx);
        if let Some(poller) = removed.title_poller.take() {
            poller.abort();
        }
        inner.host.remove_frame(id);

        if *inner.active_id.read() == Some(id) {
            // Activation moves to the neighbor on the left, or the new
            // leftmost.
            let next = {
                let tabs = inner.tabs.read();
                tabs.get(idx.saturating_sub(1))
                    .or_else(|| tabs.last())
                    .map(|t| t.id)
            };
            if let Some(next) = next {
                Inner::switch(inner, next);
            }
        }

        Inner::render_strip(inner);
        tracing::info!(tab_id = id, "Closed tab");
    }

    fn switch(inner: &Arc<Inner>, id: TabId) {
        if !inner.tabs.read().iter().any(|t| t.id == id) {
            return;
        }

        let prev = inner.active_id.write().replace(id);
        if let Some(prev_id) = prev {
            if prev_id != id {
                Inner::stop_title_poller(inner, prev_id);
            }
        }

        if let Some(watcher) = inner.url_watcher.lock().take() {
            watcher.abort();
        }

        {
            let tabs = inner.tabs.read();
            for tab in tabs.iter() {
                tab.frame.set_visible(tab.id == id);
            }
        }

        Inner::render_strip(inner);

        let ready = inner
            .tabs
            .read()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.is_ready)
            .unwrap_or(false);
        if ready {
            Inner::refresh_title(inner, id, true);
            if let Some(href) = inner.frame_of(id).and_then(|f| f.location().ok()) {
                let path = pathname(&href);
                Inner::set_url_bar_value(inner, &display_url(&path));
                Inner::refresh_favicon_from_path(inner, id, &path);
            }
            Inner::spawn_title_poller(inner, id);
        }

        Inner::spawn_url_watcher(inner, id);
    }

    fn handle_frame_load(inner: &Arc<Inner>, id: TabId) {
        {
            let mut tabs = inner.tabs.write();
            let Some(tab) = tabs.iter_mut().find(|t| t.id == id) else {
                return;
            };
            tab.is_ready = true;
        }

        Inner::refresh_title(inner, id, true);

        if *inner.active_id.read() == Some(id) {
            Inner::spawn_title_poller(inner, id);
        }

        match inner.frame_of(id).and_then(|f| f.location().ok()) {
            Some(href) => {
                let path = pathname(&href);
                Inner::refresh_favicon_from_path(inner, id, &path);
            }
            None => Inner::apply_favicon(inner, id, DEFAULT_ICON.to_string()),
        }
    }

    fn spawn_url_watcher(inner: &Arc<Inner>, id: TabId) {
        let weak = Arc::downgrade(inner);
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(URL_WATCH_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut prev_href = String::new();
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else { break };
                if *inner.active_id.read() != Some(id) {
                    continue;
                }
                Inner::watch_tick(&inner, id, &mut prev_href);
            }
        });
        if let Some(old) = inner.url_watcher.lock().replace(handle) {
            old.abort();
        }
    }

    /// One poll of the active frame's location. Only acts when the location
    /// differs from the last observed value; every read failure is silently
    /// retried next tick.
    fn watch_tick(inner: &Arc<Inner>, id: TabId, prev_href: &mut String) {
        let Some(frame) = inner.frame_of(id) else {
            return;
        };
        let Ok(href) = frame.location() else {
            return;
        };
        if href.is_empty() || href == *prev_href {
            return;
        }
        *prev_href = href.clone();

        let path = pathname(&href);
        Inner::set_url_bar_value(inner, &display_url(&path));
        Inner::refresh_title(inner, id, false);
        Inner::refresh_favicon_from_path(inner, id, &path);

        let hook = inner.on_url_change.read().clone();
        if let Some(hook) = hook {
            hook(&href);
        }
    }

    fn spawn_title_poller(inner: &Arc<Inner>, id: TabId) {
        let weak = Arc::downgrade(inner);
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(TITLE_POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else { break };
                Inner::refresh_title(&inner, id, false);
            }
        });

        let mut tabs = inner.tabs.write();
        match tabs.iter_mut().find(|t| t.id == id) {
            Some(tab) => {
                if let Some(old) = tab.title_poller.replace(handle) {
                    old.abort();
                }
            }
            // Closed while spawning
            None => handle.abort(),
        }
    }

    fn stop_title_poller(inner: &Arc<Inner>, id: TabId) {
        let mut tabs = inner.tabs.write();
        if let Some(tab) = tabs.iter_mut().find(|t| t.id == id) {
            if let Some(poller) = tab.title_poller.take() {
                poller.abort();
            }
        }
    }

    /// Re-read a document title. Overwrites only when the decoded title is
    /// non-empty and changed; with `allow_default`, an unreadable or empty
    /// title falls back to "New Tab" (first load and tab switches).
    fn refresh_title(inner: &Arc<Inner>, id: TabId, allow_default: bool) {
        let Some(frame) = inner.frame_of(id) else {
            return;
        };
        let raw = frame.document_title().unwrap_or_default();
        let mut title = decode_title(&raw);
        if title.is_empty() {
            if !allow_default {
                return;
            }
            title = DEFAULT_TITLE.to_string();
        }

        let display = {
            let mut tabs = inner.tabs.write();
            let Some(tab) = tabs.iter_mut().find(|t| t.id == id) else {
                return;
            };
            if tab.title == title {
                return;
            }
            tab.title = title;
            tab.display_title()
        };

        let strip = inner.strip.read().clone();
        if let Some(strip) = strip {
            strip.set_title(id, &display);
        }
    }

    fn refresh_favicon_from_path(inner: &Arc<Inner>, id: TabId, path: &str) {
        match ProxyCodec::decode_proxy_url(path) {
            Some(decoded) => {
                let inner = Arc::clone(inner);
                tokio::spawn(async move {
                    let icon = inner.favicons.resolve(&decoded).await;
                    Inner::apply_favicon(&inner, id, icon);
                });
            }
            None => Inner::apply_favicon(inner, id, DEFAULT_ICON.to_string()),
        }
    }

    fn apply_favicon(inner: &Arc<Inner>, id: TabId, icon: String) {
        // The tab may have been closed while a fetch was in flight.
        let changed = {
            let mut tabs = inner.tabs.write();
            let Some(tab) = tabs.iter_mut().find(|t| t.id == id) else {
                return;
            };
            if tab.favicon == icon {
                false
            } else {
                tab.favicon = icon.clone();
                true
            }
        };

        if changed {
            let strip = inner.strip.read().clone();
            if let Some(strip) = strip {
                strip.set_favicon(id, &icon);
            }
        }
    }

    fn render_strip(inner: &Arc<Inner>) {
        let strip = inner.strip.read().clone();
        let Some(strip) = strip else { return };
        let summaries: Vec<TabSummary> = inner.tabs.read().iter().map(Tab::summary).collect();
        strip.render(&summaries, *inner.active_id.read());
    }

    fn set_url_bar_value(inner: &Arc<Inner>, value: &str) {
        let bar = inner.url_bar.read().clone();
        if let Some(bar) = bar {
            bar.set_value(value);
        }
    }
}

/// Path component of a frame location, tolerant of bare paths.
fn pathname(href: &str) -> String {
    if let Ok(url) = Url::parse(href) {
        return url.path().to_string();
    }
    href.split(['?', '#']).next().unwrap_or(href).to_string()
}

/// What the address bar shows for a frame path: the virtual address for an
/// internal route, the decoded target for proxied traffic, empty otherwise.
fn display_url(path: &str) -> String {
    if let Some(route) = routes::route_for_path(path) {
        return route.address.to_string();
    }
    ProxyCodec::decode_proxy_url(path).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use async_trait::async_trait;
    use lunar_storage::Database;
    use lunar_transport::{TransportError, TunnelClient, TunnelResponse};

    struct OfflineClient;

    #[async_trait]
    impl TunnelClient for OfflineClient {
        async fn fetch(&self, _url: &str) -> lunar_transport::Result<TunnelResponse> {
            Err(TransportError::Unavailable("offline".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingUrlBar {
        values: Mutex<Vec<String>>,
    }

    impl RecordingUrlBar {
        fn last(&self) -> Option<String> {
            self.values.lock().last().cloned()
        }
    }

    impl UrlBar for RecordingUrlBar {
        fn set_value(&self, value: &str) {
            self.values.lock().push(value.to_string());
        }
    }

    fn manager_with(host: Arc<HeadlessHost>) -> TabManager {
        let settings = SettingsStore::new(Database::open_in_memory().unwrap()).unwrap();
        let transport = Arc::new(TunnelConnection::new(Arc::new(OfflineClient)));
        TabManager::new(host, settings, transport)
    }

    /// Let spawned pollers run between manual clock advances.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_collection_never_empty() {
        let host = HeadlessHost::new();
        let manager = manager_with(host.clone());

        let first = manager.open_tab(None).unwrap();
        assert_eq!(manager.tab_count(), 1);

        manager.close_tab(first);
        assert_eq!(manager.tab_count(), 1);

        // The replacement is a fresh default tab
        let fresh = manager.tabs()[0].clone();
        assert_ne!(fresh.id, first);
        assert_eq!(fresh.title, DEFAULT_TITLE);
        assert_eq!(fresh.favicon, DEFAULT_ICON);
        assert_eq!(manager.active_tab_id(), Some(fresh.id));
        assert!(host.frame(first).is_none());

        manager.shutdown();
    }

    #[tokio::test]
    async fn test_close_unknown_id_is_noop() {
        let host = HeadlessHost::new();
        let manager = manager_with(host.clone());

        manager.open_tab(None);
        manager.close_tab(999);
        assert_eq!(manager.tab_count(), 1);

        manager.shutdown();
    }

    #[tokio::test]
    async fn test_close_activates_left_neighbor() {
        let host = HeadlessHost::new();
        let manager = manager_with(host.clone());

        let a = manager.open_tab(None).unwrap();
        let b = manager.open_tab(None).unwrap();
        let c = manager.open_tab(None).unwrap();
        assert_eq!(manager.active_tab_id(), Some(c));

        manager.close_tab(c);
        assert_eq!(manager.active_tab_id(), Some(b));

        // Closing an inactive tab leaves activation alone
        manager.close_tab(a);
        assert_eq!(manager.active_tab_id(), Some(b));
        assert_eq!(manager.tab_count(), 1);

        manager.shutdown();
    }

    #[tokio::test]
    async fn test_switch_toggles_visibility() {
        let host = HeadlessHost::new();
        let manager = manager_with(host.clone());

        let a = manager.open_tab(None).unwrap();
        let b = manager.open_tab(None).unwrap();
        assert!(!host.frame(a).unwrap().is_visible());
        assert!(host.frame(b).unwrap().is_visible());

        manager.switch_tab(a);
        assert!(host.frame(a).unwrap().is_visible());
        assert!(!host.frame(b).unwrap().is_visible());

        // Re-entrant switch to the active tab is safe
        manager.switch_tab(a);
        assert_eq!(manager.active_tab_id(), Some(a));

        manager.shutdown();
    }

    #[tokio::test]
    async fn test_open_queued_until_mount() {
        let host = HeadlessHost::unmounted();
        let manager = manager_with(host.clone());

        assert!(manager.open_tab(Some("/st")).is_none());
        assert!(manager.open_tab(None).is_none());
        assert_eq!(manager.tab_count(), 0);

        host.mount();
        manager.notify_mounted();

        assert_eq!(manager.tab_count(), 2);
        let tabs = manager.tabs();
        assert_eq!(host.frame(tabs[0].id).unwrap().src(), "/st");
        assert_eq!(host.frame(tabs[1].id).unwrap().src(), routes::NEW_TAB_PATH);

        manager.shutdown();
    }

    #[tokio::test]
    async fn test_frames_are_sandboxed() {
        let host = HeadlessHost::new();
        let manager = manager_with(host.clone());

        let id = manager.open_tab(None).unwrap();
        let sandbox = host.frame(id).unwrap().sandbox().to_vec();
        assert_eq!(sandbox, SANDBOX_CAPABILITIES);

        manager.shutdown();
    }

    #[tokio::test]
    async fn test_popup_opens_encoded_tab() {
        let host = HeadlessHost::new();
        let manager = manager_with(host.clone());

        let a = manager.open_tab(None).unwrap();
        host.frame(a).unwrap().request_popup("https://example.com/");

        assert_eq!(manager.tab_count(), 2);
        let opened = manager.active_tab_id().unwrap();
        assert_ne!(opened, a);

        let src = host.frame(opened).unwrap().src();
        assert!(src.starts_with("/v1/data/"));
        assert_eq!(
            ProxyCodec::decode_proxy_url(&src).as_deref(),
            Some("https://example.com/")
        );

        manager.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_reconciles_title_and_poller_tracks_changes() {
        let host = HeadlessHost::new();
        let manager = manager_with(host.clone());

        let id = manager.open_tab(None).unwrap();
        host.frame(id).unwrap().complete_load("/new", "");
        manager.notify_frame_loaded(id);

        // Empty title falls back to the default on first load
        assert_eq!(manager.tabs()[0].title, DEFAULT_TITLE);

        // A script changing the title is picked up by the poller
        host.frame(id)
            .unwrap()
            .set_document_title("Changed%20Page%20Title");
        time::advance(Duration::from_millis(1100)).await;
        settle().await;
        assert_eq!(manager.tabs()[0].title, "Changed Page…");

        manager.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_url_watch_updates_address_bar() {
        let host = HeadlessHost::new();
        let manager = manager_with(host.clone());
        let bar = Arc::new(RecordingUrlBar::default());
        manager.set_url_bar(bar.clone());

        let id = manager.open_tab(None).unwrap();
        host.frame(id).unwrap().complete_load("/new", "New Page");
        manager.notify_frame_loaded(id);

        time::advance(Duration::from_millis(250)).await;
        settle().await;
        assert_eq!(bar.last().as_deref(), Some("lunar://new"));

        // Proxied locations are decoded for display
        let encoded = ProxyCodec::encode("sc", "https://example.com/");
        host.frame(id).unwrap().set_location(&encoded);
        time::advance(Duration::from_millis(250)).await;
        settle().await;
        assert_eq!(bar.last().as_deref(), Some("https://example.com/"));

        manager.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_cancels_url_watch() {
        let host = HeadlessHost::new();
        let manager = manager_with(host.clone());
        let bar = Arc::new(RecordingUrlBar::default());
        manager.set_url_bar(bar.clone());

        let a = manager.open_tab(None).unwrap();
        let b = manager.open_tab(None).unwrap();

        host.frame(a).unwrap().complete_load("/st", "Settings");
        manager.notify_frame_loaded(a);
        host.frame(b).unwrap().complete_load("/new", "New Page");
        manager.notify_frame_loaded(b);

        manager.switch_tab(a);
        settle().await;
        let settled = bar.last();
        assert_eq!(settled.as_deref(), Some("lunar://settings"));

        // Location changes in the now-inactive tab must not reach the bar
        host.frame(b).unwrap().set_location("/math");
        time::advance(Duration::from_millis(600)).await;
        settle().await;
        assert_eq!(bar.last(), settled);

        // While the active tab is still watched
        host.frame(a).unwrap().set_location("/sci");
        time::advance(Duration::from_millis(600)).await;
        settle().await;
        assert_eq!(bar.last().as_deref(), Some("lunar://apps"));

        manager.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_url_change_hook_fires_once_per_location() {
        let host = HeadlessHost::new();
        let manager = manager_with(host.clone());

        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&seen);
        manager.on_url_change(Arc::new(move |href| sink.lock().push(href.to_string())));

        let id = manager.open_tab(None).unwrap();
        host.frame(id).unwrap().complete_load("/new", "New Page");
        manager.notify_frame_loaded(id);

        // Several ticks over an unchanged location fire the hook once
        time::advance(Duration::from_millis(1000)).await;
        settle().await;
        assert_eq!(seen.lock().as_slice(), ["/new"]);

        host.frame(id).unwrap().set_location("/math");
        time::advance(Duration::from_millis(250)).await;
        settle().await;
        assert_eq!(seen.lock().as_slice(), ["/new", "/math"]);

        manager.shutdown();
    }
}
