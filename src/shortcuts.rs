//! Global key-combination registry.
//!
//! Combos are normalized to a canonical form, `Ctrl+Meta+Alt+Shift+KEY` with
//! the key upper-cased, before lookup. The registry maps combos to
//! [`Action`] values rather than closures; the caller resolves the focused
//! session when it executes the action, never at registration time.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::actions::Action;

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::META)
    .union(KeyModifiers::SUPER)
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        let mut mods = mods & MODIFIER_MASK;
        // Meta and Super are the same key for matching purposes.
        if mods.intersects(KeyModifiers::SUPER) {
            mods.remove(KeyModifiers::SUPER);
            mods.insert(KeyModifiers::META);
        }
        let code = match code {
            KeyCode::BackTab => {
                mods.insert(KeyModifiers::SHIFT);
                KeyCode::Tab
            }
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_uppercase()),
            other => other,
        };
        Self { code, mods }
    }

    pub fn from_event(key: &KeyEvent) -> Self {
        Self::new(key.code, key.modifiers)
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl"),
            (KeyModifiers::META, "Meta"),
            (KeyModifiers::ALT, "Alt"),
            (KeyModifiers::SHIFT, "Shift"),
        ] {
            if self.mods.contains(flag) {
                parts.push(name.to_string());
            }
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Insert => "Insert".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized key combination: {0:?}")]
pub struct ParseComboError(String);

impl FromStr for KeyCombo {
    type Err = ParseComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseComboError(s.to_string());
        let mut mods = KeyModifiers::NONE;
        let mut parts: Vec<&str> = s.split('+').collect();
        // A trailing empty part means the key itself was '+'.
        let key = match parts.pop() {
            Some("") if s.ends_with("++") || s == "+" => {
                parts.pop();
                "+"
            }
            Some(key) if !key.is_empty() => key,
            _ => return Err(err()),
        };
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => mods.insert(KeyModifiers::CONTROL),
                "meta" | "cmd" | "super" => mods.insert(KeyModifiers::META),
                "alt" | "option" => mods.insert(KeyModifiers::ALT),
                "shift" => mods.insert(KeyModifiers::SHIFT),
                _ => return Err(err()),
            }
        }
        let code = match key.to_ascii_lowercase().as_str() {
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            "enter" | "return" => KeyCode::Enter,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            "left" | "arrowleft" => KeyCode::Left,
            "right" | "arrowright" => KeyCode::Right,
            "up" | "arrowup" => KeyCode::Up,
            "down" | "arrowdown" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "delete" => KeyCode::Delete,
            "insert" => KeyCode::Insert,
            lower => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => match lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                        Some(n) if (1..=24).contains(&n) => KeyCode::F(n),
                        _ => return Err(err()),
                    },
                }
            }
        };
        Ok(KeyCombo::new(code, mods))
    }
}

/// Combo → action table. One action per combo; the first registration wins.
#[derive(Debug, Clone)]
pub struct Shortcuts {
    map: HashMap<KeyCombo, Action>,
    order: Vec<KeyCombo>,
}

impl Shortcuts {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register `combo`. Returns `false` if the combo was already bound.
    pub fn register(&mut self, combo: KeyCombo, action: Action) -> bool {
        if self.map.contains_key(&combo) {
            return false;
        }
        self.map.insert(combo, action);
        self.order.push(combo);
        true
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<Action> {
        self.map.get(&KeyCombo::from_event(key)).copied()
    }

    /// Bindings for `action`, in registration order.
    pub fn combos_for(&self, action: Action) -> Vec<KeyCombo> {
        self.order
            .iter()
            .filter(|combo| self.map.get(combo) == Some(&action))
            .copied()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for Shortcuts {
    fn default() -> Self {
        use Action::*;
        let mut shortcuts = Self::new();
        for (combo, action) in [
            ("Ctrl+Tab", FocusNext),
            ("Ctrl+Right", FocusNext),
            ("Ctrl+Shift+Tab", FocusPrev),
            ("Ctrl+Left", FocusPrev),
            ("Ctrl+Shift+M", ToggleMinimize),
            ("Ctrl+Shift+Down", ToggleMinimize),
            ("Ctrl+Alt+Up", ToggleMaximize),
            ("Ctrl+Shift+Q", CloseSession),
            ("Ctrl+Shift+O", ToggleConnectionDialog),
            ("Shift+?", ToggleHelp),
            ("F1", ToggleHelp),
            ("Ctrl+Alt+Q", Quit),
        ] {
            if let Ok(combo) = combo.parse() {
                shortcuts.register(combo, action);
            }
        }
        shortcuts
    }
}
