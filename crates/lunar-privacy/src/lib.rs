//! Lunar Shell privacy layer
//!
//! The fetch-interception side of the shell: a static wildcard blocklist
//! compiled once at startup, and the router that decides whether a request
//! is blocked, handed to a rewriting-proxy backend, or fetched untouched.

mod adblock;
mod interceptor;

pub use adblock::{AdBlock, Destination};
pub use interceptor::{Disposition, RequestRouter};
