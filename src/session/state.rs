/// Lifecycle of a session's transport.
///
/// ```text
/// Connecting --open--> Open --error--> Errored --output--> Open
///      \                 \                \
///       +-----close------+-------close-----+--> Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Open,
    Errored,
    Closed,
}

/// Inputs that drive [`ConnectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    Opened,
    Output,
    Error,
    Closed,
}

impl ConnectionState {
    /// Next state for `event`, or `None` when the event does not apply in
    /// the current state.
    pub fn transition(self, event: StateEvent) -> Option<Self> {
        use ConnectionState::*;
        match (self, event) {
            (Connecting, StateEvent::Opened) => Some(Open),
            (Open | Errored, StateEvent::Output) => Some(Open),
            (Open | Errored, StateEvent::Error) => Some(Errored),
            (Closed, StateEvent::Closed) => None,
            (_, StateEvent::Closed) => Some(Closed),
            _ => None,
        }
    }

    /// Whether outbound messages may be sent.
    pub fn is_transport_open(self) -> bool {
        matches!(self, ConnectionState::Open | ConnectionState::Errored)
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Errored => "error",
            ConnectionState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
