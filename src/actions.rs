use std::fmt;

/// Everything a shortcut can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    FocusNext,
    FocusPrev,
    ToggleMinimize,
    ToggleMaximize,
    CloseSession,
    ToggleConnectionDialog,
    ToggleHelp,
    Quit,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::FocusNext,
        Action::FocusPrev,
        Action::ToggleMinimize,
        Action::ToggleMaximize,
        Action::CloseSession,
        Action::ToggleConnectionDialog,
        Action::ToggleHelp,
        Action::Quit,
    ];

    /// Whether the action operates on the focused session.
    pub fn targets_session(self) -> bool {
        matches!(
            self,
            Action::ToggleMinimize | Action::ToggleMaximize | Action::CloseSession
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::FocusNext => "Focus next session",
            Action::FocusPrev => "Focus previous session",
            Action::ToggleMinimize => "Minimize / restore session",
            Action::ToggleMaximize => "Maximize / restore session",
            Action::CloseSession => "Close session",
            Action::ToggleConnectionDialog => "Open connection dialog",
            Action::ToggleHelp => "Show shortcuts",
            Action::Quit => "Quit",
        };
        write!(f, "{}", s)
    }
}
