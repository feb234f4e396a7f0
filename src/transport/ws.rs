use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Error as WsError, Message, WebSocket};

use super::{Connector, Transport, TransportEvent};
use crate::error::TransportError;
use crate::protocol::{ClientMessage, ServerMessage};

const IDLE_SLEEP: Duration = Duration::from_millis(5);

enum Command {
    Send(String),
    Close,
}

/// WebSocket transport driven by a dedicated I/O thread.
#[derive(Debug)]
pub struct WsTransport {
    commands: Sender<Command>,
    events: Receiver<TransportEvent>,
    closed: bool,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Send(_) => f.write_str("Send(..)"),
            Command::Close => f.write_str("Close"),
        }
    }
}

impl WsTransport {
    /// Start connecting to `endpoint` in the background.
    pub fn connect(endpoint: &str) -> Self {
        let (commands, command_rx) = mpsc::channel();
        let (event_tx, events) = mpsc::channel();
        let endpoint = endpoint.to_string();
        let spawned = thread::Builder::new()
            .name("ssh-wm-transport".into())
            .spawn({
                let event_tx = event_tx.clone();
                move || run_socket(&endpoint, command_rx, event_tx)
            });
        if let Err(err) = spawned {
            let _ = event_tx.send(TransportEvent::Failed(err.to_string()));
            let _ = event_tx.send(TransportEvent::Closed);
        }
        Self {
            commands,
            events,
            closed: false,
        }
    }
}

impl Transport for WsTransport {
    fn send(&mut self, message: ClientMessage) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        let text = message.to_json()?;
        self.commands
            .send(Command::Send(text))
            .map_err(|_| TransportError::Closed)
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        self.events.try_iter().collect()
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.commands.send(Command::Close);
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens a [`WsTransport`] per session.
#[derive(Debug, Clone)]
pub struct WsConnector {
    endpoint: String,
}

impl WsConnector {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Connector for WsConnector {
    fn connect(&mut self) -> Box<dyn Transport> {
        Box::new(WsTransport::connect(&self.endpoint))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

fn run_socket(endpoint: &str, commands: Receiver<Command>, events: Sender<TransportEvent>) {
    let mut socket = match open_socket(endpoint) {
        Ok(socket) => socket,
        Err(err) => {
            tracing::warn!(endpoint, error = %err, "transport connect failed");
            let _ = events.send(TransportEvent::Failed(err.to_string()));
            let _ = events.send(TransportEvent::Closed);
            return;
        }
    };
    tracing::debug!(endpoint, "transport connected");
    let _ = events.send(TransportEvent::Opened);

    if let Err(err) = pump(&mut socket, &commands, &events) {
        tracing::warn!(endpoint, error = %err, "transport failed");
        let _ = events.send(TransportEvent::Failed(err.to_string()));
    }
    let _ = events.send(TransportEvent::Closed);
}

fn open_socket(endpoint: &str) -> Result<Socket, TransportError> {
    let (mut socket, _response) =
        tungstenite::connect(endpoint).map_err(|err| TransportError::Connect {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        })?;
    match socket.get_mut() {
        MaybeTlsStream::Plain(stream) => {
            stream.set_nodelay(true)?;
            stream.set_nonblocking(true)?;
        }
        _ => {
            return Err(TransportError::Connect {
                endpoint: endpoint.to_string(),
                reason: "unsupported stream type".into(),
            });
        }
    }
    Ok(socket)
}

/// Shuttle traffic until either side closes. `Ok` means an orderly close.
fn pump(
    socket: &mut Socket,
    commands: &Receiver<Command>,
    events: &Sender<TransportEvent>,
) -> Result<(), TransportError> {
    loop {
        let mut progressed = false;

        loop {
            match commands.try_recv() {
                Ok(Command::Send(text)) => {
                    progressed = true;
                    send_message(socket, Message::text(text))?;
                }
                Ok(Command::Close) | Err(TryRecvError::Disconnected) => {
                    let _ = socket.close(None);
                    let _ = socket.flush();
                    return Ok(());
                }
                Err(TryRecvError::Empty) => break,
            }
        }
        flush_pending(socket)?;

        loop {
            match socket.read() {
                Ok(Message::Text(text)) => {
                    progressed = true;
                    match ServerMessage::from_json(text.as_str()) {
                        Ok(message) => {
                            if events.send(TransportEvent::Message(message)).is_err() {
                                return Ok(());
                            }
                        }
                        Err(err) => tracing::warn!(error = %err, "dropping malformed frame"),
                    }
                }
                Ok(Message::Close(_)) => return Ok(()),
                Ok(_) => progressed = true,
                Err(WsError::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => return Ok(()),
                Err(err) => return Err(TransportError::WebSocket(err.to_string())),
            }
        }

        if !progressed {
            thread::sleep(IDLE_SLEEP);
        }
    }
}

/// Queue one frame. A full socket is not an error: tungstenite keeps the
/// frame in its write buffer and a later flush (or read) finishes the write.
fn send_message<S: Read + Write>(
    socket: &mut WebSocket<S>,
    message: Message,
) -> Result<(), TransportError> {
    match socket.write(message) {
        Ok(()) => {}
        Err(WsError::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => {}
        Err(err) => return Err(TransportError::WebSocket(err.to_string())),
    }
    flush_pending(socket)
}

fn flush_pending<S: Read + Write>(socket: &mut WebSocket<S>) -> Result<(), TransportError> {
    match socket.flush() {
        Ok(()) => Ok(()),
        Err(WsError::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => Ok(()),
        // Surfaced by the next read as an orderly close.
        Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
        Err(err) => Err(TransportError::WebSocket(err.to_string())),
    }
}
