use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use ssh_wm::protocol::{ClientMessage, ServerMessage};
use ssh_wm::transport::{Transport, TransportEvent, WsTransport};
use tungstenite::Message;

/// One-shot bridge: records two client frames, answers with an `output`
/// frame and a frame of unknown type, then closes.
fn spawn_bridge() -> (String, thread::JoinHandle<Vec<ClientMessage>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut socket = tungstenite::accept(stream).unwrap();
        let mut received = Vec::new();
        while received.len() < 2 {
            match socket.read().unwrap() {
                Message::Text(text) => {
                    received.push(ClientMessage::from_json(text.as_str()).unwrap());
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        let reply = ServerMessage::Output {
            content: "hello\r\n".into(),
        };
        socket
            .send(Message::text(reply.to_json().unwrap()))
            .unwrap();
        socket
            .send(Message::text(r#"{"type":"telemetry","load":1}"#))
            .unwrap();
        let _ = socket.close(None);
        // Drain until the client acknowledges the close.
        while socket.read().is_ok() {}
        received
    });
    (format!("ws://{addr}/ws"), handle)
}

fn collect_until(
    transport: &mut WsTransport,
    done: impl Fn(&[TransportEvent]) -> bool,
) -> Vec<TransportEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while Instant::now() < deadline && !done(events.as_slice()) {
        events.extend(transport.poll());
        thread::sleep(Duration::from_millis(5));
    }
    events
}

#[test]
fn exchanges_frames_with_a_bridge() {
    let (endpoint, bridge) = spawn_bridge();
    let mut transport = WsTransport::connect(&endpoint);

    let opened = collect_until(&mut transport, |events| {
        events.contains(&TransportEvent::Opened)
    });
    assert_eq!(opened.first(), Some(&TransportEvent::Opened));

    transport
        .send(ClientMessage::Resize { rows: 28, cols: 98 })
        .unwrap();
    transport.send(ClientMessage::input(b"ls\r")).unwrap();

    let events = collect_until(&mut transport, |events| {
        events.contains(&TransportEvent::Closed)
    });
    assert!(events.contains(&TransportEvent::Message(ServerMessage::Output {
        content: "hello\r\n".into()
    })));
    assert!(events.contains(&TransportEvent::Message(ServerMessage::Unknown)));
    assert_eq!(events.last(), Some(&TransportEvent::Closed));
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, TransportEvent::Failed(_)))
    );

    let received = bridge.join().unwrap();
    assert_eq!(
        received,
        vec![
            ClientMessage::Resize { rows: 28, cols: 98 },
            ClientMessage::Input {
                content: "ls\r".into()
            },
        ]
    );
}
