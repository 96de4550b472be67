//! Favicon resolution through the tunnel

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use lunar_settings::{keys, SettingsStore};
use lunar_transport::TunnelConnection;

use crate::Result;

/// Placeholder icon every tab starts with and every failed lookup falls
/// back to.
pub const DEFAULT_ICON: &str = "/a/moon.svg";

const FAVICON_API: &str =
    "https://t2.gstatic.com/faviconV2?client=SOCIAL&type=FAVICON&fallback_opts=TYPE,SIZE,URL&size=64&url=";

/// Fetches site icons through the tunneling transport and memoizes them per
/// decoded target URL for the life of the process. Failures are cached too,
/// so one unreachable site costs one lookup, not one per poll tick.
pub struct FaviconResolver {
    cache: Mutex<HashMap<String, String>>,
    connection: Arc<TunnelConnection>,
    settings: SettingsStore,
}

impl FaviconResolver {
    pub fn new(connection: Arc<TunnelConnection>, settings: SettingsStore) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            connection,
            settings,
        }
    }

    /// Icon reference for a decoded target URL: a data URI on success, the
    /// default placeholder otherwise.
    pub async fn resolve(&self, url: &str) -> String {
        if let Some(icon) = self.cache.lock().get(url) {
            return icon.clone();
        }

        let icon = self
            .fetch(url)
            .await
            .unwrap_or_else(|_| DEFAULT_ICON.to_string());
        self.cache.lock().insert(url.to_string(), icon.clone());
        icon
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let relay = self.settings.get_or_default(keys::WISP_URL)?;
        self.connection.ensure(&relay);

        let clean = urlencoding::decode(url)
            .map(|c| c.into_owned())
            .unwrap_or_else(|_| url.to_string());
        let request = format!("{}{}", FAVICON_API, urlencoding::encode(&clean));

        let response = self.connection.fetch(&request).await?;
        if !response.ok() {
            return Ok(DEFAULT_ICON.to_string());
        }

        let mime = response.content_type().unwrap_or("image/png").to_string();
        Ok(format!(
            "data:{};base64,{}",
            mime,
            BASE64.encode(response.bytes())
        ))
    }

    #[cfg(test)]
    fn cached(&self, url: &str) -> Option<String> {
        self.cache.lock().get(url).cloned()
    }
}
