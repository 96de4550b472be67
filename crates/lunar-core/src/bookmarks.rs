//! Bookmark operations
//!
//! The list itself lives in the settings store; membership is keyed by the
//! normalized logical URL, so toggling is a set-symmetric-difference no
//! matter how the current location happens to be spelled.

use lunar_settings::Bookmark;

/// Percent-decode when valid and strip one trailing slash.
pub fn normalize_redir(url: &str) -> String {
    let decoded = urlencoding::decode(url)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| url.to_string());
    decoded
        .strip_suffix('/')
        .map(|s| s.to_string())
        .unwrap_or(decoded)
}

pub fn contains(list: &[Bookmark], url: &str) -> bool {
    let needle = normalize_redir(url);
    list.iter().any(|b| normalize_redir(&b.redir) == needle)
}

/// Remove the entry matching `entry.redir` if present, insert `entry`
/// otherwise. Returns true when the entry was added.
pub fn toggle(list: &mut Vec<Bookmark>, entry: Bookmark) -> bool {
    let needle = normalize_redir(&entry.redir);
    if let Some(idx) = list
        .iter()
        .position(|b| normalize_redir(&b.redir) == needle)
    {
        list.remove(idx);
        false
    } else {
        list.push(entry);
        true
    }
}
