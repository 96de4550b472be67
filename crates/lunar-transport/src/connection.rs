//! Tunnel connection and client seam

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::Result;

/// Path of the wisp client module every caller configures before a tunneled
/// fetch.
pub const CLIENT_PATH: &str = "/lc/index.mjs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Wisp relay endpoint the client connects to.
    pub relay: String,
}

/// Response surfaced from a tunneled fetch.
#[derive(Debug, Clone)]
pub struct TunnelResponse {
    status: u16,
    content_type: Option<String>,
    body: Bytes,
}

impl TunnelResponse {
    pub fn new(status: u16, content_type: Option<String>, body: Bytes) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }
}

/// Carries a single request through the tunnel.
#[async_trait]
pub trait TunnelClient: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<TunnelResponse>;
}

/// Direct HTTP client standing at the relay boundary.
pub struct HttpTunnelClient {
    client: reqwest::Client,
}

impl HttpTunnelClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTunnelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TunnelClient for HttpTunnelClient {
    async fn fetch(&self, url: &str) -> Result<TunnelResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response.bytes().await?;
        Ok(TunnelResponse::new(status, content_type, body))
    }
}

/// Tracks which client module is active and where it relays to.
///
/// Mirrors the connection object the page scripts share: callers check the
/// current transport id before setting it, so re-configuration is cheap and
/// idempotent.
pub struct TunnelConnection {
    current: RwLock<Option<(String, Option<TransportOptions>)>>,
    client: Arc<dyn TunnelClient>,
}

impl TunnelConnection {
    pub fn new(client: Arc<dyn TunnelClient>) -> Self {
        Self {
            current: RwLock::new(None),
            client,
        }
    }

    pub fn http() -> Self {
        Self::new(Arc::new(HttpTunnelClient::new()))
    }

    /// Id of the active client module, if one has been configured.
    pub fn transport(&self) -> Option<String> {
        self.current.read().as_ref().map(|(id, _)| id.clone())
    }

    pub fn set_transport(&self, id: &str, options: Option<TransportOptions>) {
        let mut current = self.current.write();
        let next = (id.to_string(), options);
        if current.as_ref() == Some(&next) {
            return;
        }
        tracing::info!(transport = %id, "Configured tunnel transport");
        *current = Some(next);
    }

    /// Idempotent setup callers run before any tunneled fetch.
    pub fn ensure(&self, relay: &str) {
        if self.transport().as_deref() == Some(CLIENT_PATH) {
            return;
        }
        self.set_transport(
            CLIENT_PATH,
            Some(TransportOptions {
                relay: relay.to_string(),
            }),
        );
    }

    pub async fn fetch(&self, url: &str) -> Result<TunnelResponse> {
        self.client.fetch(url).await
    }
}
