//! The server push channel.
//!
//! One [`StreamClient`] per process keeps a websocket open to
//! `ws://host[:port]/websocket`, turns each text frame into actions and
//! sends them to the bound [`Dispatcher`](crate::state::Dispatcher).
//!
//! ## Lifecycle
//!
//! ```text
//!              init()
//! Disconnected ──────▶ Connecting ──ok──▶ Connected
//!      ▲                   │                  │
//!      │                 error          close / error
//!      │                   ▼                  ▼
//!      └──── sleep(reconnect_delay) ◀── Disconnected
//! ```
//!
//! The delay is fixed and retries never stop. Malformed frames are logged and
//! skipped without touching the connection.

mod client;
mod decode;
mod transport;

pub use client::StreamClient;
pub use decode::{decode, PushPayload};
pub use transport::{Connection, Connector, Frame, WsConnector};

use std::fmt;

/// Connection state shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "offline",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "live",
        };
        f.write_str(label)
    }
}
