//! Wire codec and the backend-dispatching adapter

use std::str::FromStr;

use crate::backend::{Backend, ProxyBackend};

/// XOR every odd-indexed char with 7. Involution: applying it twice yields
/// the input back.
fn scramble(input: &str) -> String {
    input
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i % 2 == 1 {
                char::from_u32(c as u32 ^ 7).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Target URL -> percent-encoded wire form.
pub(crate) fn encode_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    urlencoding::encode(&scramble(url)).into_owned()
}

/// Wire form -> target URL. Anything after the first `?` is a live query
/// string appended by the hosted page and is carried through verbatim.
pub(crate) fn decode_url(encoded: &str) -> Option<String> {
    if encoded.is_empty() {
        return None;
    }

    let (input, query) = match encoded.split_once('?') {
        Some((input, query)) => (input, Some(query)),
        None => (encoded, None),
    };

    let decoded = urlencoding::decode(input).ok()?;
    let mut url = scramble(&decoded);
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    Some(url)
}

/// Dispatches encode/decode over the two backends.
pub struct ProxyCodec;

impl ProxyCodec {
    /// Encode a target URL for the backend selected by `backend_id`.
    /// An unknown id is configuration drift, not a failure: the input is
    /// passed through unchanged.
    pub fn encode(backend_id: &str, url: &str) -> String {
        match Backend::from_str(backend_id) {
            Ok(backend) => {
                let b = backend.backend();
                format!("{}{}", b.prefix(), b.encode(url))
            }
            Err(_) => {
                tracing::debug!(backend = %backend_id, "unknown backend, passing URL through");
                url.to_string()
            }
        }
    }

    /// Try each backend's prefix in turn and return the first successful
    /// decode. `None` means the path is not proxied traffic; internal
    /// virtual routes must be handled before calling this.
    pub fn decode_proxy_url(path: &str) -> Option<String> {
        for backend in Backend::ALL {
            let b = backend.backend();
            if let Some(encoded) = path.strip_prefix(b.prefix()) {
                return b.decode(encoded);
            }
        }
        None
    }
}
