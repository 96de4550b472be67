//! Lunar Shell tunneling transport
//!
//! Boundary to the external client/relay pair that carries outbound traffic
//! on behalf of the hosted pages. The shell only needs to pick a client
//! module, point it at a wisp relay, and fetch through it; the relay itself
//! and the in-page client are external collaborators.

mod connection;
mod error;

pub use connection::{
    HttpTunnelClient, TransportOptions, TunnelClient, TunnelConnection, TunnelResponse,
    CLIENT_PATH,
};
pub use error::TransportError;

pub type Result<T> = std::result::Result<T, TransportError>;
