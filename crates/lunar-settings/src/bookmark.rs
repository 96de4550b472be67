//! Bookmark entry

use serde::{Deserialize, Serialize};

/// One bookmark as stored in the settings list.
///
/// `redir` is the logical, decoded target URL; membership checks normalize
/// it before comparing, so two entries never differ only by a trailing slash
/// or percent-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub name: String,
    /// Favicon-service URL keyed by hostname, e.g. `/api/icon/?url=https://a.b`.
    pub logo: String,
    pub redir: String,
}
