//! Lunar Shell navigation
//!
//! Address-bar input resolution:
//! 1. Virtual `lunar://` route → internal application path, never proxied
//! 2. Absolute http/https URL → used as-is
//! 3. Bare domain → `https://` prepended
//! 4. Anything else → query against the configured search engine
//!
//! Plus the per-tab back/forward history stacks the address bar controller
//! drives.

mod history;
mod input;
pub mod routes;

pub use history::TabHistory;
pub use input::{Classified, InputResolver};
pub use routes::VirtualRoute;
