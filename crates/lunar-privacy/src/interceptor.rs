//! Service-worker-style request routing

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use url::Url;

use lunar_proxy::Backend;

use crate::adblock::{AdBlock, Destination};

static CDN_CGI: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)/cdn-cgi/").expect("cdn-cgi pattern"));

/// What to do with an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Answer with an empty 204-style response.
    Blocked,
    /// Hand to the rewriting-proxy backend that owns the path prefix.
    Proxied(Backend),
    /// Fetch untouched (app assets, virtual routes).
    Passthrough,
}

/// Decides the fate of every request leaving a hosted page. Ad blocking is
/// a pre-filter applied before proxy dispatch.
pub struct RequestRouter {
    adblock: RwLock<AdBlock>,
}

impl RequestRouter {
    pub fn new(adblock_enabled: bool) -> Self {
        Self {
            adblock: RwLock::new(AdBlock::new(adblock_enabled)),
        }
    }

    pub fn set_adblock_enabled(&self, enabled: bool) {
        self.adblock.write().set_enabled(enabled);
    }

    pub fn adblock_enabled(&self) -> bool {
        self.adblock.read().is_enabled()
    }

    pub fn route(&self, request_url: &str, destination: Destination) -> Disposition {
        // cdn-cgi challenges break under rewriting, so they are dropped even
        // with ad blocking off.
        if self.adblock.read().should_block(request_url, destination)
            || CDN_CGI.is_match(request_url)
        {
            tracing::debug!(url = %request_url, "blocked request");
            return Disposition::Blocked;
        }

        let path = match Url::parse(request_url) {
            Ok(url) => url.path().to_string(),
            Err(_) => request_url.to_string(),
        };

        match Backend::for_path(&path) {
            Some(backend) => Disposition::Proxied(backend),
            None => Disposition::Passthrough,
        }
    }
}
