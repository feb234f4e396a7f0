use std::path::PathBuf;

use crate::error::ValidationError;

/// Which credential field the connection dialog collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMethod {
    #[default]
    Password,
    PrivateKey,
}

impl AuthMethod {
    pub fn toggle(self) -> Self {
        match self {
            AuthMethod::Password => AuthMethod::PrivateKey,
            AuthMethod::PrivateKey => AuthMethod::Password,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AuthMethod::Password => "Password",
            AuthMethod::PrivateKey => "Private key",
        }
    }
}

/// Raw contents of the connection dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub host: String,
    /// Kept as typed; parsed during validation.
    pub port: String,
    pub user: String,
    pub auth_method: AuthMethod,
    pub password: Option<String>,
    pub private_key: Option<String>,
    /// Read as text into `private_key` during validation.
    pub private_key_file: Option<PathBuf>,
}

/// Immutable remote endpoint of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
}

impl std::fmt::Display for SessionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}", self.user, self.host, self.port)
    }
}

#[derive(Clone, PartialEq, Eq, Default)]
pub enum Credential {
    #[default]
    None,
    Password(String),
    PrivateKey(String),
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::None => f.write_str("None"),
            Credential::Password(_) => f.write_str("Password(..)"),
            Credential::PrivateKey(_) => f.write_str("PrivateKey(..)"),
        }
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub target: SessionTarget,
    pub credential: Credential,
}

impl ConnectionRequest {
    pub fn new(host: impl Into<String>, port: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            user: user.into(),
            ..Self::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.auth_method = AuthMethod::Password;
        self.password = Some(password.into());
        self
    }

    pub fn with_private_key(mut self, key: impl Into<String>) -> Self {
        self.auth_method = AuthMethod::PrivateKey;
        self.private_key = Some(key.into());
        self
    }

    pub fn with_private_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth_method = AuthMethod::PrivateKey;
        self.private_key_file = Some(path.into());
        self
    }

    /// Check required fields and resolve the credential.
    ///
    /// A non-empty private key (typed or loaded from file) wins over a
    /// password, which is then not sent at all.
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let host = self.host.trim();
        let port = self.port.trim();
        let user = self.user.trim();
        if host.is_empty() || port.is_empty() || user.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        let port = match port.parse::<u16>() {
            Ok(port) if port > 0 => port,
            _ => return Err(ValidationError::InvalidPort(port.to_string())),
        };

        let private_key = match &self.private_key_file {
            Some(path) if !path.as_os_str().is_empty() => Some(
                std::fs::read_to_string(path).map_err(|err| ValidationError::PrivateKeyFile {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                })?,
            ),
            _ => self.private_key.clone(),
        };

        let credential = match (private_key, &self.password) {
            (Some(key), _) if !key.trim().is_empty() => Credential::PrivateKey(key),
            (_, Some(password)) if !password.is_empty() => Credential::Password(password.clone()),
            _ => Credential::None,
        };

        Ok(ValidatedRequest {
            target: SessionTarget {
                host: host.to_string(),
                port,
                user: user.to_string(),
            },
            credential,
        })
    }
}
