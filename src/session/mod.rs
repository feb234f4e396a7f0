//! Session identity, lifecycle state, and connection requests.

pub mod request;
pub mod state;

pub use request::{AuthMethod, ConnectionRequest, Credential, SessionTarget, ValidatedRequest};
pub use state::{ConnectionState, StateEvent};

use crate::terminal::{TermSize, TerminalEmulator};
use crate::transport::Transport;

/// Process-unique session identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mints [`SessionId`]s in increasing order.
#[derive(Debug, Default)]
pub struct SessionIds {
    next: u64,
}

impl SessionIds {
    pub fn allocate(&mut self) -> SessionId {
        self.next += 1;
        SessionId(self.next)
    }
}

/// One live remote shell: its endpoint, lifecycle, emulator and transport.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub target: SessionTarget,
    pub(crate) credential: Credential,
    pub(crate) state: ConnectionState,
    pub(crate) emulator: Box<dyn TerminalEmulator>,
    pub(crate) transport: Box<dyn Transport>,
    /// Grid size most recently announced to the remote side.
    pub(crate) last_synced: Option<TermSize>,
}

impl Session {
    pub fn new(
        id: SessionId,
        request: ValidatedRequest,
        emulator: Box<dyn TerminalEmulator>,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            id,
            target: request.target,
            credential: request.credential,
            state: ConnectionState::Connecting,
            emulator,
            transport,
            last_synced: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn emulator(&self) -> &dyn TerminalEmulator {
        self.emulator.as_ref()
    }

    pub fn last_synced(&self) -> Option<TermSize> {
        self.last_synced
    }

    pub fn title(&self) -> String {
        format!("{}@{}", self.target.user, self.target.host)
    }

    /// Apply `event` to the lifecycle state. Returns whether it changed.
    pub(crate) fn advance(&mut self, event: StateEvent) -> bool {
        match self.state.transition(event) {
            Some(next) => {
                if next != self.state {
                    tracing::debug!(
                        session_id = self.id.get(),
                        from = %self.state,
                        to = %next,
                        "session state changed"
                    );
                }
                self.state = next;
                true
            }
            None => false,
        }
    }
}
