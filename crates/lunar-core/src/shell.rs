//! Shell coordinator
//!
//! Owns the whole shell state with an explicit lifecycle: `new` wires the
//! collaborators, `init` registers callbacks and opens the first tab,
//! `shutdown` cancels every recurring task. Address-bar traffic flows
//! through here: classify, encode, assign, record.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

use lunar_navigation::{routes, InputResolver, TabHistory};
use lunar_privacy::RequestRouter;
use lunar_proxy::ProxyCodec;
use lunar_settings::{keys, Bookmark, SettingsStore};
use lunar_storage::Database;
use lunar_tabs::{FrameHost, TabId, TabManager};
use lunar_transport::{HttpTunnelClient, TunnelClient, TunnelConnection};

use crate::bookmarks;
use crate::config::ShellConfig;
use crate::Result;

pub struct Shell {
    inner: Arc<ShellInner>,
}

struct ShellInner {
    settings: SettingsStore,
    transport: Arc<TunnelConnection>,
    tabs: TabManager,
    router: RequestRouter,
    /// Per-tab back/forward stacks of logical URLs.
    histories: RwLock<HashMap<TabId, TabHistory>>,
    /// Whether the current location is bookmarked; mirrored by the
    /// address-bar star.
    bookmark_active: AtomicBool,
}

impl Shell {
    pub fn new(config: ShellConfig, host: Arc<dyn FrameHost>) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::open(&config.database_path)?;
        Self::with_database(db, host, Arc::new(HttpTunnelClient::new()))
    }

    /// Wiring seam used by tests and embedders with their own tunnel
    /// client.
    pub fn with_database(
        db: Database,
        host: Arc<dyn FrameHost>,
        client: Arc<dyn TunnelClient>,
    ) -> Result<Self> {
        let settings = SettingsStore::new(db)?;
        let transport = Arc::new(TunnelConnection::new(client));
        let tabs = TabManager::new(host, settings.clone(), Arc::clone(&transport));
        let router = RequestRouter::new(settings.is_enabled(keys::AD_BLOCK)?);

        Ok(Self {
            inner: Arc::new(ShellInner {
                settings,
                transport,
                tabs,
                router,
                histories: RwLock::new(HashMap::new()),
                bookmark_active: AtomicBool::new(false),
            }),
        })
    }

    /// Register callbacks and open the first tab. Must run inside a tokio
    /// runtime, since activating a tab starts its URL watcher.
    pub fn init(&self) -> Result<()> {
        let weak = Arc::downgrade(&self.inner);
        self.inner.tabs.on_url_change(Arc::new(move |_href| {
            let Some(inner) = weak.upgrade() else { return };
            if let Err(error) = ShellInner::refresh_bookmark_indicator(&inner) {
                tracing::debug!(%error, "Bookmark indicator refresh failed");
            }
        }));

        self.inner.tabs.open_tab(None);
        tracing::info!("Shell initialized");
        Ok(())
    }

    pub fn shutdown(&self) {
        self.inner.tabs.shutdown();
        tracing::info!("Shell shut down");
    }

    pub fn tabs(&self) -> &TabManager {
        &self.inner.tabs
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }

    pub fn transport(&self) -> &TunnelConnection {
        &self.inner.transport
    }

    pub fn router(&self) -> &RequestRouter {
        &self.inner.router
    }

    /// Address-bar submission: classify the input, resolve it to a final
    /// URL, encode through the active backend unless it is a virtual route,
    /// assign it to the active frame and record it.
    pub fn submit(&self, input: &str) -> Result<()> {
        let engine = self.inner.settings.get_or_default(keys::ENGINE)?;
        let resolver = InputResolver::new(engine);

        match resolver.classify(input) {
            lunar_navigation::Classified::VirtualRoute(route) => {
                self.record(route.path);
                self.inner.tabs.navigate_active(route.path);
            }
            classified => {
                let relay = self.inner.settings.get_or_default(keys::WISP_URL)?;
                self.inner.transport.ensure(&relay);

                let target = classified.target().to_string();
                let backend = self.inner.settings.get_or_default(keys::BACKEND)?;
                let proxied = ProxyCodec::encode(&backend, &target);

                self.record(&target);
                self.inner.tabs.navigate_active(&proxied);
            }
        }

        Ok(())
    }

    pub fn back(&self) -> Result<()> {
        let Some(id) = self.inner.tabs.active_tab_id() else {
            return Ok(());
        };
        let target = {
            let mut histories = self.inner.histories.write();
            histories
                .get_mut(&id)
                .and_then(|h| h.back().map(|s| s.to_string()))
        };
        if let Some(url) = target {
            self.assign_logical(&url)?;
        }
        Ok(())
    }

    pub fn forward(&self) -> Result<()> {
        let Some(id) = self.inner.tabs.active_tab_id() else {
            return Ok(());
        };
        let target = {
            let mut histories = self.inner.histories.write();
            histories
                .get_mut(&id)
                .and_then(|h| h.forward().map(|s| s.to_string()))
        };
        if let Some(url) = target {
            self.assign_logical(&url)?;
        }
        Ok(())
    }

    /// Re-assign the current history entry without recording.
    pub fn reload(&self) -> Result<()> {
        let Some(id) = self.inner.tabs.active_tab_id() else {
            return Ok(());
        };
        let current = {
            let histories = self.inner.histories.read();
            histories
                .get(&id)
                .and_then(|h| h.current().map(|s| s.to_string()))
        };
        if let Some(url) = current {
            self.assign_logical(&url)?;
        }
        Ok(())
    }

    pub fn home(&self) -> Result<()> {
        self.record(routes::NEW_TAB_PATH);
        self.inner.tabs.navigate_active(routes::NEW_TAB_PATH);
        Ok(())
    }

    /// Toggle the current page in the bookmark list. Virtual routes and
    /// unproxied paths are not bookmarkable; returns whether the entry was
    /// added.
    pub fn toggle_bookmark(&self) -> Result<bool> {
        let Some(src) = self.inner.tabs.active_frame_src() else {
            return Ok(false);
        };
        let path = path_and_query(&src);
        if routes::route_for_path(&path).is_some() {
            return Ok(false);
        }
        let Some(url) = ProxyCodec::decode_proxy_url(&path) else {
            return Ok(false);
        };

        let mut list = self.inner.settings.bookmarks()?;
        let name = self
            .inner
            .tabs
            .active_document_title()
            .unwrap_or_else(|| url.clone());
        let domain = Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| url.clone());

        let added = bookmarks::toggle(
            &mut list,
            Bookmark {
                name,
                logo: format!("/api/icon/?url=https://{}", domain),
                redir: url,
            },
        );
        self.inner.settings.set_bookmarks(&list)?;
        ShellInner::refresh_bookmark_indicator(&self.inner)?;

        Ok(added)
    }

    /// Recompute the address-bar star from the current location.
    pub fn update_bookmark_indicator(&self) -> Result<bool> {
        ShellInner::refresh_bookmark_indicator(&self.inner)
    }

    pub fn is_bookmark_active(&self) -> bool {
        self.inner.bookmark_active.load(Ordering::SeqCst)
    }

    pub fn set_ad_block_enabled(&self, enabled: bool) -> Result<()> {
        if enabled {
            self.inner.settings.enable(keys::AD_BLOCK)?;
        } else {
            self.inner.settings.disable(keys::AD_BLOCK)?;
        }
        self.inner.router.set_adblock_enabled(enabled);
        Ok(())
    }

    pub fn history_of(&self, id: TabId) -> Option<TabHistory> {
        self.inner.histories.read().get(&id).cloned()
    }

    fn record(&self, url: &str) {
        let Some(id) = self.inner.tabs.active_tab_id() else {
            return;
        };
        self.inner
            .histories
            .write()
            .entry(id)
            .or_default()
            .record(url);
    }

    /// Assign a logical URL to the active frame, re-encoding it unless it
    /// is a recognized internal path.
    fn assign_logical(&self, url: &str) -> Result<()> {
        if routes::route_for_path(url).is_some() {
            self.inner.tabs.navigate_active(url);
            return Ok(());
        }
        let backend = self.inner.settings.get_or_default(keys::BACKEND)?;
        let proxied = ProxyCodec::encode(&backend, url);
        self.inner.tabs.navigate_active(&proxied);
        Ok(())
    }
}

impl Clone for Shell {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ShellInner {
    /// Runs on every observed URL change: records the location in the tab's
    /// history and syncs the bookmark star against the normalized list.
    fn refresh_bookmark_indicator(inner: &Arc<ShellInner>) -> Result<bool> {
        let current = inner
            .tabs
            .active_tab_id()
            .zip(inner.tabs.active_frame().map(|frame| {
                frame.location().ok().unwrap_or_else(|| frame.src())
            }));
        let Some((id, href)) = current else {
            inner.bookmark_active.store(false, Ordering::SeqCst);
            return Ok(false);
        };

        let path = path_and_query(&href);
        let logical = if routes::route_for_path(&path).is_some() {
            Some(path.clone())
        } else {
            ProxyCodec::decode_proxy_url(&path)
        };

        let mut active = false;
        if let Some(logical) = logical {
            inner
                .histories
                .write()
                .entry(id)
                .or_default()
                .record(&logical);

            if routes::route_for_path(&logical).is_none() {
                let list = inner.settings.bookmarks()?;
                active = bookmarks::contains(&list, &logical);
            }
        }

        inner.bookmark_active.store(active, Ordering::SeqCst);
        Ok(active)
    }
}

/// Path plus query of a frame location, tolerant of bare paths.
fn path_and_query(href: &str) -> String {
    if let Ok(url) = Url::parse(href) {
        let mut out = url.path().to_string();
        if let Some(query) = url.query() {
            out.push('?');
            out.push_str(query);
        }
        return out;
    }
    href.split('#').next().unwrap_or(href).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lunar_tabs::headless::HeadlessHost;
    use lunar_tabs::Frame;
    use lunar_transport::{TransportError, TunnelResponse, CLIENT_PATH};

    struct OfflineClient;

    #[async_trait]
    impl TunnelClient for OfflineClient {
        async fn fetch(&self, _url: &str) -> lunar_transport::Result<TunnelResponse> {
            Err(TransportError::Unavailable("offline".to_string()))
        }
    }

    fn shell_with_host() -> (Shell, Arc<HeadlessHost>) {
        let host = HeadlessHost::new();
        let shell = Shell::with_database(
            Database::open_in_memory().unwrap(),
            host.clone(),
            Arc::new(OfflineClient),
        )
        .unwrap();
        (shell, host)
    }

    #[tokio::test]
    async fn test_submit_encodes_and_records() {
        let (shell, host) = shell_with_host();
        shell.init().unwrap();
        let id = shell.tabs().active_tab_id().unwrap();

        shell.submit("example.com").unwrap();

        let src = host.frame(id).unwrap().src();
        assert!(src.starts_with("/v1/data/"));
        assert_eq!(
            ProxyCodec::decode_proxy_url(&src).as_deref(),
            Some("https://example.com")
        );

        let history = shell.history_of(id).unwrap();
        assert_eq!(history.current(), Some("https://example.com"));

        // The transport was configured before navigating
        assert_eq!(shell.transport().transport().as_deref(), Some(CLIENT_PATH));

        shell.shutdown();
    }

    #[tokio::test]
    async fn test_submit_virtual_route_bypasses_proxy() {
        let (shell, host) = shell_with_host();
        shell.init().unwrap();
        let id = shell.tabs().active_tab_id().unwrap();

        shell.submit("lunar://settings").unwrap();

        assert_eq!(host.frame(id).unwrap().src(), "/st");
        assert_eq!(shell.history_of(id).unwrap().current(), Some("/st"));
        // No transport setup is needed for internal routes
        assert!(shell.transport().transport().is_none());

        shell.shutdown();
    }

    #[tokio::test]
    async fn test_search_query_goes_through_engine() {
        let (shell, host) = shell_with_host();
        shell.init().unwrap();
        let id = shell.tabs().active_tab_id().unwrap();

        shell.submit("hello world").unwrap();

        let src = host.frame(id).unwrap().src();
        assert_eq!(
            ProxyCodec::decode_proxy_url(&src).as_deref(),
            Some("https://duckduckgo.com/?q=hello%20world")
        );

        shell.shutdown();
    }

    #[tokio::test]
    async fn test_back_and_forward_reassign_frames() {
        let (shell, host) = shell_with_host();
        shell.init().unwrap();
        let id = shell.tabs().active_tab_id().unwrap();

        shell.submit("https://a.example/").unwrap();
        shell.submit("https://b.example/").unwrap();

        shell.back().unwrap();
        let src = host.frame(id).unwrap().src();
        assert_eq!(
            ProxyCodec::decode_proxy_url(&src).as_deref(),
            Some("https://a.example/")
        );

        shell.forward().unwrap();
        let src = host.frame(id).unwrap().src();
        assert_eq!(
            ProxyCodec::decode_proxy_url(&src).as_deref(),
            Some("https://b.example/")
        );

        // Boundaries are no-ops
        shell.forward().unwrap();
        assert_eq!(shell.history_of(id).unwrap().index(), Some(1));

        shell.shutdown();
    }

    #[tokio::test]
    async fn test_toggle_bookmark_is_symmetric() {
        let (shell, _host) = shell_with_host();
        shell.init().unwrap();

        shell.submit("https://example.com/").unwrap();

        assert!(shell.toggle_bookmark().unwrap());
        let list = shell.settings().bookmarks().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].redir, "https://example.com/");
        assert_eq!(list[0].logo, "/api/icon/?url=https://example.com");
        assert!(shell.is_bookmark_active());

        assert!(!shell.toggle_bookmark().unwrap());
        assert!(shell.settings().bookmarks().unwrap().is_empty());
        assert!(!shell.is_bookmark_active());

        shell.shutdown();
    }

    #[tokio::test]
    async fn test_bookmark_not_toggled_on_virtual_route() {
        let (shell, _host) = shell_with_host();
        shell.init().unwrap();

        shell.submit("lunar://settings").unwrap();
        assert!(!shell.toggle_bookmark().unwrap());
        assert!(shell.settings().bookmarks().unwrap().is_empty());

        shell.shutdown();
    }

    #[tokio::test]
    async fn test_indicator_follows_current_location() {
        let (shell, _host) = shell_with_host();
        shell.init().unwrap();

        shell.submit("https://example.com/").unwrap();
        shell.toggle_bookmark().unwrap();
        assert!(shell.update_bookmark_indicator().unwrap());

        shell.submit("https://other.example/").unwrap();
        assert!(!shell.update_bookmark_indicator().unwrap());

        // Back to the bookmarked page, spelled without the slash
        shell.submit("example.com").unwrap();
        assert!(shell.update_bookmark_indicator().unwrap());

        shell.shutdown();
    }

    #[tokio::test]
    async fn test_ad_block_setting_drives_router() {
        let (shell, _host) = shell_with_host();
        shell.init().unwrap();

        assert!(shell.router().adblock_enabled());
        shell.set_ad_block_enabled(false).unwrap();
        assert!(!shell.router().adblock_enabled());
        assert!(!shell.settings().is_enabled(keys::AD_BLOCK).unwrap());

        shell.shutdown();
    }
}
