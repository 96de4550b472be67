//! Well-known settings keys and their defaults

/// Search engine URL the encoded query is appended to.
pub const ENGINE: &str = "engine";
/// Tab cloaking on/off.
pub const CLOAK: &str = "cloak";
/// Ad blocking on/off.
pub const AD_BLOCK: &str = "adBlock";
/// Title shown while cloaked.
pub const CLOAK_TITLE: &str = "cloakTitle";
/// Favicon shown while cloaked.
pub const CLOAK_FAVICON: &str = "cloakFavicon";
/// Cloak automatically when the window loses focus.
pub const AUTO_CLOAK: &str = "autoCloak";
/// Confirm before leaving the page.
pub const BEFORE_UNLOAD: &str = "beforeUnload";
/// Active rewriting-proxy backend id ("sc" or "u").
pub const BACKEND: &str = "backend";
/// Where the panic key redirects to.
pub const PANIC_LOC: &str = "panicLoc";
/// Key combination that triggers the panic redirect.
pub const PANIC_KEY: &str = "panicKey";
/// Wisp relay endpoint for the tunneling transport.
pub const WISP_URL: &str = "wispUrl";
/// Bookmark list, stored as a JSON array.
pub const BOOKMARKS: &str = "bm";

/// Seeded on first open; reads through [`SettingsStore::get_or_default`]
/// fall back here for keys that were cleared out-of-band.
///
/// [`SettingsStore::get_or_default`]: crate::SettingsStore::get_or_default
pub fn defaults() -> &'static [(&'static str, &'static str)] {
    &[
        (ENGINE, "https://duckduckgo.com/?q="),
        (CLOAK, "off"),
        (AD_BLOCK, "on"),
        (CLOAK_TITLE, "Google"),
        (CLOAK_FAVICON, "https://www.google.com/favicon.ico"),
        (AUTO_CLOAK, "off"),
        (BEFORE_UNLOAD, "off"),
        (BACKEND, "sc"),
        (PANIC_LOC, "https://google.com"),
        (PANIC_KEY, "`"),
        (WISP_URL, "ws://localhost:6060/w/"),
        (BOOKMARKS, "[]"),
    ]
}

pub fn default_for(key: &str) -> Option<&'static str> {
    defaults()
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}
