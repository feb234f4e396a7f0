//! Per-connection protocol handling, kept apart from the socket so it can be
//! tested without a network.

use ssh_wm::protocol::{ClientMessage, ConnectionConfig, ServerMessage};

const PROMPT: &str = "$ ";

#[derive(Debug, Default)]
pub struct EchoSession {
    config: Option<ConnectionConfig>,
    size: Option<(u16, u16)>,
}

impl EchoSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Last size reported by the client as `(rows, cols)`.
    pub fn size(&self) -> Option<(u16, u16)> {
        self.size
    }

    /// Replies for one inbound message, in send order.
    pub fn handle(&mut self, message: ClientMessage) -> Vec<ServerMessage> {
        match message {
            ClientMessage::Config { content } => self.configure(&content),
            ClientMessage::Input { content } => self.echo(&content),
            ClientMessage::Resize { rows, cols } => {
                tracing::info!(rows, cols, "resize");
                self.size = Some((rows, cols));
                Vec::new()
            }
        }
    }

    fn configure(&mut self, content: &str) -> Vec<ServerMessage> {
        let config: ConnectionConfig = match serde_json::from_str(content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "malformed config");
                return vec![error(format!("Invalid connection config: {err}"))];
            }
        };
        if config.host.trim().is_empty() {
            return vec![error("Host is required".to_string())];
        }
        let auth = match (&config.private_key, &config.password) {
            (Some(_), _) => "private key",
            (None, Some(_)) => "password",
            (None, None) => "no credential",
        };
        tracing::info!(
            host = %config.host,
            port = config.port,
            user = %config.user,
            auth,
            "session configured"
        );
        let greeting = format!(
            "Connected to {}@{}:{} (echo bridge, {auth})\r\n{PROMPT}",
            config.user, config.host, config.port
        );
        self.config = Some(config);
        vec![output(greeting)]
    }

    fn echo(&mut self, content: &str) -> Vec<ServerMessage> {
        if self.config.is_none() {
            return vec![error("Not connected: send a config message first".to_string())];
        }
        let mut echoed = String::with_capacity(content.len());
        for ch in content.chars() {
            match ch {
                '\r' => {
                    echoed.push_str("\r\n");
                    echoed.push_str(PROMPT);
                }
                '\x7f' => echoed.push_str("\x08 \x08"),
                other => echoed.push(other),
            }
        }
        vec![output(echoed)]
    }
}

fn output(content: String) -> ServerMessage {
    ServerMessage::Output { content }
}

fn error(content: String) -> ServerMessage {
    ServerMessage::Error { content }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str) -> ClientMessage {
        ClientMessage::Config {
            content: format!(r#"{{"host":"{host}","port":22,"user":"alice","password":"pw"}}"#),
        }
    }

    fn input(content: &str) -> ClientMessage {
        ClientMessage::Input {
            content: content.to_string(),
        }
    }

    #[test]
    fn config_gets_greeting() {
        let mut session = EchoSession::new();
        let replies = session.handle(config("example.com"));
        assert_eq!(
            replies,
            vec![output(
                "Connected to alice@example.com:22 (echo bridge, password)\r\n$ ".into()
            )]
        );
        assert!(session.is_configured());
    }

    #[test]
    fn empty_host_is_an_error() {
        let mut session = EchoSession::new();
        let replies = session.handle(config(""));
        assert_eq!(replies, vec![error("Host is required".into())]);
        assert!(!session.is_configured());
    }

    #[test]
    fn input_before_config_is_rejected() {
        let mut session = EchoSession::new();
        assert!(matches!(
            session.handle(input("ls")).as_slice(),
            [ServerMessage::Error { .. }]
        ));
    }

    #[test]
    fn input_is_echoed_with_prompt_on_enter() {
        let mut session = EchoSession::new();
        session.handle(config("h"));
        assert_eq!(session.handle(input("ls\r")), vec![output("ls\r\n$ ".into())]);
        assert_eq!(session.handle(input("\x7f")), vec![output("\x08 \x08".into())]);
    }

    #[test]
    fn resize_is_recorded_without_reply() {
        let mut session = EchoSession::new();
        assert!(session.handle(ClientMessage::Resize { rows: 28, cols: 98 }).is_empty());
        assert_eq!(session.size(), Some((28, 98)));
    }
}
