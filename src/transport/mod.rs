//! Bidirectional message channels between a session and the bridge.
//!
//! A transport never blocks the UI thread: connection and socket I/O happen
//! elsewhere and surface as [`TransportEvent`]s collected by [`Transport::poll`].

pub mod loopback;
pub mod ws;

use crate::error::TransportError;
use crate::protocol::{ClientMessage, ServerMessage};

pub use loopback::{LoopbackConnector, LoopbackHandle};
pub use ws::{WsConnector, WsTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The channel is ready for traffic.
    Opened,
    Message(ServerMessage),
    /// Connection-level failure. Always followed by [`TransportEvent::Closed`].
    Failed(String),
    Closed,
}

pub trait Transport: std::fmt::Debug {
    /// Queue a message. Messages are delivered in call order.
    fn send(&mut self, message: ClientMessage) -> Result<(), TransportError>;

    /// Drain events that arrived since the last call.
    fn poll(&mut self) -> Vec<TransportEvent>;

    /// Request shutdown. Safe to call more than once.
    fn close(&mut self);
}

/// Opens transports addressed at one endpoint.
pub trait Connector: std::fmt::Debug {
    fn connect(&mut self) -> Box<dyn Transport>;

    fn endpoint(&self) -> &str;
}
