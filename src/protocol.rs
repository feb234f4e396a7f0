//! JSON messages exchanged with the bridge over the transport.
//!
//! Every frame is a text frame holding one object tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::session::{Credential, SessionTarget};

/// Messages sent to the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Connection parameters. `content` is itself a JSON document.
    Config { content: String },
    /// Keystrokes, forwarded verbatim.
    Input { content: String },
    Resize { rows: u16, cols: u16 },
}

/// Messages received from the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Output {
        content: String,
    },
    Error {
        content: String,
    },
    /// Any other `type`. Ignored by the client.
    #[serde(other)]
    Unknown,
}

/// Payload of a `config` message before it is stringified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

impl ConnectionConfig {
    pub fn new(target: &SessionTarget, credential: &Credential) -> Self {
        let (password, private_key) = match credential {
            Credential::None => (None, None),
            Credential::Password(password) => (Some(password.clone()), None),
            Credential::PrivateKey(key) => (None, Some(key.clone())),
        };
        Self {
            host: target.host.clone(),
            port: target.port,
            user: target.user.clone(),
            password,
            private_key,
        }
    }
}

impl ClientMessage {
    pub fn config(config: &ConnectionConfig) -> serde_json::Result<Self> {
        Ok(Self::Config {
            content: serde_json::to_string(config)?,
        })
    }

    pub fn input(bytes: &[u8]) -> Self {
        Self::Input {
            content: String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl ServerMessage {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
