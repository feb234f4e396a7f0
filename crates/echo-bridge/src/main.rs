//! Development bridge speaking the session protocol. Accepts any number of
//! WebSocket clients, one thread each, and echoes their keystrokes back.

mod echo;

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

use clap::Parser;
use ssh_wm::protocol::{ClientMessage, ServerMessage};
use tracing::Level;
use tungstenite::{Error as WsError, Message, WebSocket};

use echo::EchoSession;

#[derive(Parser, Debug)]
#[command(
    name = "echo-bridge",
    version = env!("CARGO_PKG_VERSION"),
    about = "WebSocket bridge that echoes session input back as output"
)]
struct BridgeCli {
    /// Address to listen on.
    #[arg(short = 'b', long = "bind", value_name = "ADDR", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Log verbosity (error, warn, info, debug, trace).
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: Level,

    /// Exit after the first client disconnects.
    #[arg(long = "once")]
    once: bool,
}

fn main() -> io::Result<()> {
    let cli = BridgeCli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    let listener = TcpListener::bind(cli.bind)?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(error = %err, "accept failed");
                continue;
            }
        };
        if cli.once {
            serve(stream);
            break;
        }
        thread::spawn(move || serve(stream));
    }
    Ok(())
}

fn serve(stream: TcpStream) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let mut socket = match tungstenite::accept(stream) {
        Ok(socket) => socket,
        Err(err) => {
            tracing::warn!(%peer, error = %err, "handshake failed");
            return;
        }
    };
    tracing::info!(%peer, "client connected");

    let mut session = EchoSession::new();
    loop {
        let frame = match socket.read() {
            Ok(frame) => frame,
            Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => break,
            Err(err) => {
                tracing::warn!(%peer, error = %err, "read failed");
                break;
            }
        };
        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let message = match ClientMessage::from_json(text.as_str()) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(%peer, error = %err, "dropping malformed frame");
                continue;
            }
        };
        for reply in session.handle(message) {
            if let Err(err) = send(&mut socket, &reply) {
                tracing::warn!(%peer, error = %err, "write failed");
                return;
            }
        }
    }
    tracing::info!(%peer, "client disconnected");
}

fn send(socket: &mut WebSocket<TcpStream>, reply: &ServerMessage) -> Result<(), WsError> {
    let text = reply.to_json().map_err(|err| WsError::Io(io::Error::other(err)))?;
    socket.send(Message::text(text))
}
