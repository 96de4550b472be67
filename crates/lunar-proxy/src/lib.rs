//! Lunar Shell proxy codec
//!
//! Two interchangeable rewriting-proxy backends sit behind one
//! encode/decode surface. A backend owns a path prefix that marks traffic
//! routed through it and a codec that obfuscates the real target URL into
//! the path remainder. The engines that rewrite the fetched documents are
//! external; this crate only translates URLs into and out of their wire
//! form.

mod backend;
mod codec;

pub use backend::{
    Backend, ProxyBackend, ScramjetBackend, UltravioletBackend, SCRAMJET_PREFIX,
    ULTRAVIOLET_PREFIX,
};
pub use codec::ProxyCodec;
