//! Ad request detection
//!
//! Wildcard host/path patterns compiled once into a single regex set, plus
//! the request-shape heuristics that catch what the list misses.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet, RegexSetBuilder};
use url::Url;

const BLOCK_RULES: &[&str] = &[
    "**://pagead2.googlesyndication.com/**",
    "**://pagead2.googleadservices.com/**",
    "**://afs.googlesyndication.com/**",
    "**://stats.g.doubleclick.net/**",
    "**://*.doubleclick.net/**",
    "**://*.googlesyndication.com/**",
    "**://adservice.google.com/**",
    "**://*.media.net/**",
    "**://adservetx.media.net/**",
    "**://*.amazon-adsystem.com/**",
    "**://*.adcolony.com/**",
    "**://*.unityads.unity3d.com/**",
    "**://*.facebook.com/**",
    "**://*.facebook.net/**",
    "**://*.ads-twitter.com/**",
    "**://ads-api.twitter.com/**",
    "**://*.linkedin.com/**",
    "**://*.pinterest.com/**",
    "**://*.reddit.com/**",
    "**://*.redditmedia.com/**",
    "**://*.tiktok.com/**",
    "**://*.byteoversea.com/**",
    "**://*.yahoo.com/**",
    "**://*.yahooinc.com/**",
    "**://*.yandex.ru/**",
    "**://*.yandex.net/**",
    "**://*.hotjar.com/**",
    "**://*.hotjar.io/**",
    "**://*.mouseflow.com/**",
    "**://*.freshmarketer.com/**",
    "**://*.luckyorange.com/**",
    "**://stats.wp.com/**",
    "**://*.bugsnag.com/**",
    "**://*.sentry.io/**",
    "**://*.sentry-cdn.com/**",
    "**://*.realme.com/**",
    "**://*.realmemobile.com/**",
    "**://*.xiaomi.com/**",
    "**://*.miui.com/**",
    "**://*.oppomobile.com/**",
    "**://*.hicloud.com/**",
    "**://*.oneplus.net/**",
    "**://*.oneplus.cn/**",
    "**://*.samsung.com/**",
    "**://*.2o7.net/**",
    "**://*.apple.com/**",
    "**://*.icloud.com/**",
    "**/cdn-cgi/**",
    "**://*.mzstatic.com/**",
    "**://*.google-analytics.com/**",
    "**://analytics.google.com/**",
    "**://ssl.google-analytics.com/**",
    "**://click.googleanalytics.com/**",
    "**/ads.js",
    "**/ad.js",
    "**/analytics.js",
    "**/ga.js",
    "**/gtag.js",
    "**/gtm.js",
    "**/fbevents.js",
    "**/pixel.js",
];

/// `**` spans path separators, `*` stops at them.
fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    out.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    out.push_str(".*");
                } else {
                    out.push_str("[^/]*");
                }
            }
            '.' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('$');
    out
}

static BLOCK_SET: Lazy<RegexSet> = Lazy::new(|| {
    let patterns: Vec<String> = BLOCK_RULES.iter().map(|r| wildcard_to_regex(r)).collect();
    RegexSetBuilder::new(&patterns)
        .case_insensitive(true)
        .build()
        .expect("static block rules compile")
});

static AD_SCRIPT_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)ads|adservice|pagead|doubleclick|googlesyndication|analytics")
        .expect("ad script pattern")
});

static TRACKING_QUERY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)utm_|gclid|fbclid|ad|ads|tracking|pixel").expect("query pattern"));

/// What kind of resource a request is for, as reported by the interception
/// hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Document,
    Script,
    Ping,
    Other,
}

pub struct AdBlock {
    enabled: bool,
}

impl AdBlock {
    pub fn new(enabled: bool) -> Self {
        // Force-compile the rule set up front so a bad pattern surfaces at
        // startup, not on the first request.
        Lazy::force(&BLOCK_SET);
        Self { enabled }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn should_block(&self, request_url: &str, destination: Destination) -> bool {
        self.enabled && is_ad_request(request_url, destination)
    }
}

pub(crate) fn is_ad_request(request_url: &str, destination: Destination) -> bool {
    if BLOCK_SET.is_match(request_url) {
        return true;
    }

    let Ok(parsed) = Url::parse(request_url) else {
        return false;
    };

    if let Some(host) = parsed.host_str() {
        if host == "pagead2.googlesyndication.com"
            || host.ends_with(".googlesyndication.com")
            || host.ends_with(".doubleclick.net")
            || host.ends_with(".media.net")
        {
            return true;
        }
    }

    if destination == Destination::Script && AD_SCRIPT_PATH.is_match(parsed.path()) {
        return true;
    }

    if destination == Destination::Ping {
        return true;
    }

    if let Some(query) = parsed.query() {
        if TRACKING_QUERY.is_match(query) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocklist_hosts() {
        let adblock = AdBlock::new(true);

        assert!(adblock.should_block(
            "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js",
            Destination::Script
        ));
        assert!(adblock.should_block(
            "https://stats.g.doubleclick.net/collect",
            Destination::Other
        ));
        assert!(adblock.should_block("https://cdn.site.example/gtag.js", Destination::Script));
        assert!(!adblock.should_block("https://example.com/app.js", Destination::Script));
    }

    #[test]
    fn test_script_file_rules() {
        // "**/ads.js" matches any path ending in ads.js, nothing looser.
        assert!(is_ad_request(
            "https://example.com/static/ads.js",
            Destination::Other
        ));
        assert!(!is_ad_request(
            "https://example.com/static/loads.json",
            Destination::Other
        ));
    }

    #[test]
    fn test_destination_heuristics() {
        assert!(is_ad_request(
            "https://cdn.example.com/lib/analytics-loader.js",
            Destination::Script
        ));
        assert!(!is_ad_request(
            "https://cdn.example.com/lib/analytics-loader.js",
            Destination::Other
        ));
        assert!(is_ad_request("https://example.com/beacon", Destination::Ping));
    }

    #[test]
    fn test_tracking_query_params() {
        assert!(is_ad_request(
            "https://example.com/page?utm_source=mail",
            Destination::Document
        ));
        assert!(is_ad_request(
            "https://example.com/page?gclid=abc",
            Destination::Document
        ));
        assert!(!is_ad_request(
            "https://example.com/page?section=news",
            Destination::Document
        ));
    }

    #[test]
    fn test_disabled_blocks_nothing() {
        let adblock = AdBlock::new(false);
        assert!(!adblock.should_block(
            "https://pagead2.googlesyndication.com/x",
            Destination::Script
        ));
    }
}
