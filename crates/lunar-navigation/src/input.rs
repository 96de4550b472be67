//! Input resolution for the address bar

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::routes::{self, VirtualRoute};

pub const DEFAULT_ENGINE: &str = "https://duckduckgo.com/?q=";

/// Dot-separated label sequence without a scheme, e.g. `example.com/path`.
static DOMAIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w-]+(\.[\w-]+)+").expect("domain pattern"));

/// Result of classifying address-bar input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// Internal pseudo-URL, resolved without the proxy.
    VirtualRoute(&'static VirtualRoute),
    /// Absolute http/https URL, used as-is.
    AbsoluteUrl(String),
    /// Bare domain, promoted to https.
    BareDomain(String),
    /// Search query against the configured engine.
    SearchQuery(String),
}

impl Classified {
    /// The final navigable URL (virtual routes resolve to their internal
    /// path).
    pub fn target(&self) -> &str {
        match self {
            Classified::VirtualRoute(route) => route.path,
            Classified::AbsoluteUrl(url)
            | Classified::BareDomain(url)
            | Classified::SearchQuery(url) => url,
        }
    }
}

pub struct InputResolver {
    /// Search engine URL the encoded query is appended to.
    engine: String,
}

impl InputResolver {
    pub fn new(engine: String) -> Self {
        let engine = if engine.trim().is_empty() {
            DEFAULT_ENGINE.to_string()
        } else {
            engine
        };
        Self { engine }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn classify(&self, input: &str) -> Classified {
        let value = input.trim();

        if let Some(route) = routes::route_for_address(value) {
            return Classified::VirtualRoute(route);
        }

        if let Ok(parsed) = Url::parse(value) {
            if matches!(parsed.scheme(), "http" | "https") {
                return Classified::AbsoluteUrl(parsed.to_string());
            }
        }

        if !value.is_empty() && DOMAIN_PATTERN.is_match(value) {
            return Classified::BareDomain(format!("https://{}", value));
        }

        Classified::SearchQuery(format!("{}{}", self.engine, urlencoding::encode(value)))
    }

    /// Classify and return the final URL in one step.
    pub fn resolve(&self, input: &str) -> String {
        self.classify(input).target().to_string()
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_route() {
        let resolver = InputResolver::default();

        match resolver.classify("lunar://settings") {
            Classified::VirtualRoute(route) => assert_eq!(route.path, "/st"),
            other => panic!("Expected VirtualRoute, got {:?}", other),
        }
        assert_eq!(resolver.resolve("lunar://new"), "/new");
    }

    #[test]
    fn test_absolute_url_unchanged() {
        let resolver = InputResolver::default();

        match resolver.classify("https://a.b/c") {
            Classified::AbsoluteUrl(url) => assert_eq!(url, "https://a.b/c"),
            other => panic!("Expected AbsoluteUrl, got {:?}", other),
        }

        // Non-web schemes are not navigable targets
        assert!(matches!(
            resolver.classify("ftp://example.com"),
            Classified::SearchQuery(_)
        ));
    }

    #[test]
    fn test_bare_domain() {
        let resolver = InputResolver::default();

        match resolver.classify("example.com") {
            Classified::BareDomain(url) => assert_eq!(url, "https://example.com"),
            other => panic!("Expected BareDomain, got {:?}", other),
        }
        assert_eq!(
            resolver.resolve("sub.example.co.uk/path"),
            "https://sub.example.co.uk/path"
        );
    }

    #[test]
    fn test_search_query() {
        let resolver = InputResolver::default();

        match resolver.classify("hello world") {
            Classified::SearchQuery(url) => {
                assert_eq!(url, "https://duckduckgo.com/?q=hello%20world");
            }
            other => panic!("Expected SearchQuery, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_resolves_to_engine() {
        let resolver = InputResolver::default();
        assert_eq!(resolver.resolve("   "), DEFAULT_ENGINE);
    }

    #[test]
    fn test_custom_engine() {
        let resolver = InputResolver::new("https://www.bing.com/search?q=".to_string());
        assert_eq!(
            resolver.resolve("rust"),
            "https://www.bing.com/search?q=rust"
        );
    }
}
