//! In-process transport for headless runs and tests.
//!
//! Each connection hands back a [`LoopbackHandle`] that records what the
//! session sent and lets the caller inject events as if they came from the
//! bridge.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Connector, Transport, TransportEvent};
use crate::error::TransportError;
use crate::protocol::{ClientMessage, ServerMessage};

#[derive(Debug, Default)]
struct Shared {
    sent: Vec<ClientMessage>,
    pending: VecDeque<TransportEvent>,
    close_requested: bool,
}

/// Test-side view of one loopback connection.
#[derive(Debug, Clone, Default)]
pub struct LoopbackHandle {
    shared: Arc<Mutex<Shared>>,
}

impl LoopbackHandle {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn push(&self, event: TransportEvent) {
        self.lock().pending.push_back(event);
    }

    pub fn open(&self) {
        self.push(TransportEvent::Opened);
    }

    pub fn output(&self, content: impl Into<String>) {
        self.push(TransportEvent::Message(ServerMessage::Output {
            content: content.into(),
        }));
    }

    pub fn error(&self, content: impl Into<String>) {
        self.push(TransportEvent::Message(ServerMessage::Error {
            content: content.into(),
        }));
    }

    pub fn close(&self) {
        self.push(TransportEvent::Closed);
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<ClientMessage> {
        self.lock().sent.clone()
    }

    pub fn take_sent(&self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.lock().sent)
    }

    pub fn resizes(&self) -> Vec<(u16, u16)> {
        self.lock()
            .sent
            .iter()
            .filter_map(|message| match message {
                ClientMessage::Resize { rows, cols } => Some((*rows, *cols)),
                _ => None,
            })
            .collect()
    }

    pub fn close_requested(&self) -> bool {
        self.lock().close_requested
    }
}

#[derive(Debug)]
pub struct LoopbackTransport {
    handle: LoopbackHandle,
}

impl Transport for LoopbackTransport {
    fn send(&mut self, message: ClientMessage) -> Result<(), TransportError> {
        let mut shared = self.handle.lock();
        if shared.close_requested {
            return Err(TransportError::Closed);
        }
        shared.sent.push(message);
        Ok(())
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        self.handle.lock().pending.drain(..).collect()
    }

    fn close(&mut self) {
        self.handle.lock().close_requested = true;
    }
}

/// Hands out loopback transports and keeps a handle to each, in connection
/// order.
#[derive(Debug, Clone, Default)]
pub struct LoopbackConnector {
    handles: Arc<Mutex<Vec<LoopbackHandle>>>,
    auto_open: bool,
}

impl LoopbackConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an `Opened` event on every new connection.
    pub fn auto_open(mut self) -> Self {
        self.auto_open = true;
        self
    }

    /// Handle of the `index`-th connection.
    pub fn handle(&self, index: usize) -> Option<LoopbackHandle> {
        self.handles
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .get(index)
            .cloned()
    }

    pub fn last(&self) -> Option<LoopbackHandle> {
        self.handles
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .last()
            .cloned()
    }

    pub fn connections(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .len()
    }
}

impl Connector for LoopbackConnector {
    fn connect(&mut self) -> Box<dyn Transport> {
        let handle = LoopbackHandle::default();
        if self.auto_open {
            handle.open();
        }
        self.handles
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push(handle.clone());
        Box::new(LoopbackTransport { handle })
    }

    fn endpoint(&self) -> &str {
        "loopback"
    }
}
