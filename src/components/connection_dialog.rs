//! The "new connection" form.
//!
//! Collects host, port, user and one credential. Submitting yields a
//! [`ConnectionRequest`]; validation happens in the session manager and any
//! error is handed back through [`ConnectionDialog::set_error`] so it shows
//! inline while the form stays open.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::{Component, DialogFrame};
use crate::session::{AuthMethod, ConnectionRequest};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

const DIALOG_WIDTH: u16 = 60;
const DIALOG_HEIGHT: u16 = 12;
const LABEL_WIDTH: u16 = 13;
const DEFAULT_PORT: &str = "22";
const HINT: &str = "Tab next  Enter connect  Esc close";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Host,
    Port,
    User,
    Auth,
    Secret,
    Connect,
}

impl DialogField {
    const ORDER: [DialogField; 6] = [
        DialogField::Host,
        DialogField::Port,
        DialogField::User,
        DialogField::Auth,
        DialogField::Secret,
        DialogField::Connect,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Row inside the dialog body.
    fn row(self) -> u16 {
        match self {
            DialogField::Host => 0,
            DialogField::Port => 1,
            DialogField::User => 2,
            DialogField::Auth => 3,
            DialogField::Secret => 4,
            DialogField::Connect => 7,
        }
    }

    fn at_row(row: u16) -> Option<Self> {
        Self::ORDER.into_iter().find(|f| f.row() == row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// The dialog did not want the input.
    Ignored,
    Consumed,
    Submit(ConnectionRequest),
    Cancel,
}

#[derive(Debug)]
pub struct ConnectionDialog {
    frame: DialogFrame,
    host: String,
    port: String,
    user: String,
    auth_method: AuthMethod,
    password: String,
    key_path: String,
    pasted_key: Option<String>,
    focus: DialogField,
    error: Option<String>,
    body: Rect,
}

impl Default for ConnectionDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionDialog {
    pub fn new() -> Self {
        let mut frame = DialogFrame::new(" Open Connection SSH ", DIALOG_WIDTH, DIALOG_HEIGHT);
        frame.set_bg(theme::dialog_bg());
        Self {
            frame,
            host: String::new(),
            port: DEFAULT_PORT.to_string(),
            user: String::new(),
            auth_method: AuthMethod::default(),
            password: String::new(),
            key_path: String::new(),
            pasted_key: None,
            focus: DialogField::Host,
            error: None,
            body: Rect::default(),
        }
    }

    pub fn focus(&self) -> DialogField {
        self.focus
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Forget everything secret. Called after a submission was accepted.
    pub fn clear_secrets(&mut self) {
        self.password.clear();
        self.pasted_key = None;
        self.error = None;
    }

    /// Snapshot the form as a request.
    pub fn request(&self) -> ConnectionRequest {
        let request = ConnectionRequest::new(&self.host, &self.port, &self.user);
        match self.auth_method {
            AuthMethod::Password => request.with_password(&self.password),
            AuthMethod::PrivateKey => {
                let mut request = request.with_private_key(self.pasted_key.clone().unwrap_or_default());
                if !self.key_path.trim().is_empty() {
                    request = request.with_private_key_file(self.key_path.trim());
                }
                request
            }
        }
    }

    fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            DialogField::Host => Some(&mut self.host),
            DialogField::Port => Some(&mut self.port),
            DialogField::User => Some(&mut self.user),
            DialogField::Secret => match self.auth_method {
                AuthMethod::Password => Some(&mut self.password),
                AuthMethod::PrivateKey => Some(&mut self.key_path),
            },
            DialogField::Auth | DialogField::Connect => None,
        }
    }

    fn submit(&mut self) -> DialogOutcome {
        self.error = None;
        DialogOutcome::Submit(self.request())
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> DialogOutcome {
        match key.code {
            KeyCode::Esc => return DialogOutcome::Cancel,
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.focus == DialogField::Auth =>
            {
                self.auth_method = self.auth_method.toggle();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.text_field_mut() {
                    field.clear();
                }
                if self.focus == DialogField::Secret {
                    self.pasted_key = None;
                }
            }
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if let Some(field) = self.text_field_mut() {
                    field.push(ch);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.text_field_mut() {
                    field.pop();
                }
            }
            _ => {}
        }
        DialogOutcome::Consumed
    }

    /// Bracketed paste. A multi-line paste into the key field is taken as
    /// the key itself; anything else goes into the focused field on one line.
    pub fn paste(&mut self, text: &str) -> DialogOutcome {
        if self.focus == DialogField::Secret
            && self.auth_method == AuthMethod::PrivateKey
            && text.contains('\n')
        {
            self.pasted_key = Some(text.to_string());
            return DialogOutcome::Consumed;
        }
        if let Some(field) = self.text_field_mut() {
            field.extend(text.chars().filter(|c| !c.is_control()));
        }
        DialogOutcome::Consumed
    }

    /// Mouse-down at a screen cell. Uses the body area of the last render.
    pub fn click(&mut self, col: u16, row: u16) -> DialogOutcome {
        if !self.body.contains((col, row).into()) {
            return DialogOutcome::Ignored;
        }
        let Some(field) = DialogField::at_row(row - self.body.y) else {
            return DialogOutcome::Consumed;
        };
        self.focus = field;
        match field {
            DialogField::Auth => self.auth_method = self.auth_method.toggle(),
            DialogField::Connect => return self.submit(),
            _ => {}
        }
        DialogOutcome::Consumed
    }

    /// Screen area of the whole dialog for `area`.
    pub fn rect_for(&self, area: Rect) -> Rect {
        self.frame.rect_for(area)
    }

    fn secret_label(&self) -> &'static str {
        match self.auth_method {
            AuthMethod::Password => "Password",
            AuthMethod::PrivateKey => "Key file",
        }
    }

    fn secret_display(&self) -> String {
        match self.auth_method {
            AuthMethod::Password => "*".repeat(self.password.chars().count()),
            AuthMethod::PrivateKey => self.key_path.clone(),
        }
    }

    fn field_style(&self, field: DialogField) -> Style {
        if self.focus == field {
            Style::default()
                .bg(theme::dialog_focus_bg())
                .fg(Color::White)
        } else {
            Style::default().bg(theme::dialog_field_bg()).fg(Color::White)
        }
    }

    fn render_field(&self, frame: &mut UiFrame<'_>, field: DialogField, label: &str, value: &str) {
        let body = self.body;
        let y = body.y + field.row();
        let label_style = Style::default().bg(theme::dialog_bg()).fg(Color::White);
        let buffer = frame.buffer_mut();
        safe_set_string(buffer, body, body.x + 1, y, label, label_style);

        let box_x = body.x + LABEL_WIDTH;
        let box_width = body.width.saturating_sub(LABEL_WIDTH + 1) as usize;
        if box_width == 0 {
            return;
        }
        let style = self.field_style(field);
        safe_set_string(buffer, body, box_x, y, &" ".repeat(box_width), style);
        // Keep the tail visible while typing past the box.
        let mut shown: Vec<char> = value.chars().collect();
        if self.focus == field {
            shown.push('_');
        }
        let skip = shown.len().saturating_sub(box_width);
        let shown: String = shown[skip..].iter().collect();
        safe_set_string(buffer, body, box_x, y, &shown, style);
    }
}

impl Component for ConnectionDialog {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.body = self.frame.render(frame, area);
        if self.body.width == 0 || self.body.height == 0 {
            return;
        }

        self.render_field(frame, DialogField::Host, "Host", &self.host);
        self.render_field(frame, DialogField::Port, "Port", &self.port);
        self.render_field(frame, DialogField::User, "User", &self.user);
        let auth = format!("< {} >", self.auth_method.label());
        self.render_field(frame, DialogField::Auth, "Auth", &auth);
        let secret = self.secret_display();
        self.render_field(frame, DialogField::Secret, self.secret_label(), &secret);

        let body = self.body;
        let plain = Style::default().bg(theme::dialog_bg());
        let hint_style = plain.fg(theme::dialog_hint_fg());
        let buffer = frame.buffer_mut();
        if self.auth_method == AuthMethod::PrivateKey {
            let status = match &self.pasted_key {
                Some(key) => format!("pasted key ({} bytes)", key.len()),
                None => "paste a key here or give a file".to_string(),
            };
            safe_set_string(buffer, body, body.x + LABEL_WIDTH, body.y + 5, &status, hint_style);
        }

        let connect_style = if self.focus == DialogField::Connect {
            Style::default()
                .bg(theme::dialog_focus_bg())
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            plain.fg(Color::White).add_modifier(Modifier::BOLD)
        };
        safe_set_string(
            buffer,
            body,
            body.x + LABEL_WIDTH,
            body.y + DialogField::Connect.row(),
            "[ Connect ]",
            connect_style,
        );

        if let Some(error) = &self.error {
            safe_set_string(
                buffer,
                body,
                body.x + 1,
                body.y + 8,
                error,
                plain.fg(Color::LightRed),
            );
        }
        safe_set_string(buffer, body, body.x + 1, body.y + 9, HINT, hint_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Credential;
    use ratatui::buffer::Buffer;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(dialog: &mut ConnectionDialog, text: &str) {
        for ch in text.chars() {
            dialog.handle_key(&key(KeyCode::Char(ch)));
        }
    }

    fn rendered(dialog: &mut ConnectionDialog) -> Buffer {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        dialog.render(&mut frame, area);
        buffer
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn typing_fills_fields_in_tab_order() {
        let mut dialog = ConnectionDialog::new();
        type_text(&mut dialog, "example.com");
        dialog.handle_key(&key(KeyCode::Tab));
        dialog.handle_key(&key(KeyCode::Backspace));
        dialog.handle_key(&key(KeyCode::Backspace));
        type_text(&mut dialog, "2222");
        dialog.handle_key(&key(KeyCode::Tab));
        type_text(&mut dialog, "alice");
        dialog.handle_key(&key(KeyCode::Tab));
        dialog.handle_key(&key(KeyCode::Tab));
        type_text(&mut dialog, "pw");

        let request = dialog.request();
        assert_eq!(request.host, "example.com");
        assert_eq!(request.port, "2222");
        assert_eq!(request.user, "alice");
        assert_eq!(request.password.as_deref(), Some("pw"));
        assert_eq!(dialog.focus(), DialogField::Secret);
    }

    #[test]
    fn enter_submits_and_escape_cancels() {
        let mut dialog = ConnectionDialog::new();
        type_text(&mut dialog, "h");
        dialog.set_error(Some("old".into()));
        let outcome = dialog.handle_key(&key(KeyCode::Enter));
        assert!(matches!(outcome, DialogOutcome::Submit(ref r) if r.host == "h"));
        assert_eq!(dialog.error(), None);
        assert_eq!(dialog.handle_key(&key(KeyCode::Esc)), DialogOutcome::Cancel);
    }

    #[test]
    fn back_tab_wraps_to_connect() {
        let mut dialog = ConnectionDialog::new();
        dialog.handle_key(&key(KeyCode::BackTab));
        assert_eq!(dialog.focus(), DialogField::Connect);
        dialog.handle_key(&key(KeyCode::Down));
        assert_eq!(dialog.focus(), DialogField::Host);
    }

    #[test]
    fn auth_toggle_switches_secret_field() {
        let mut dialog = ConnectionDialog::new();
        for _ in 0..3 {
            dialog.handle_key(&key(KeyCode::Tab));
        }
        assert_eq!(dialog.focus(), DialogField::Auth);
        dialog.handle_key(&key(KeyCode::Right));
        assert_eq!(dialog.auth_method(), AuthMethod::PrivateKey);

        dialog.handle_key(&key(KeyCode::Tab));
        dialog.paste("-----BEGIN KEY-----\nabc\n-----END KEY-----\n");
        let validated = ConnectionRequest {
            host: "h".into(),
            user: "u".into(),
            ..dialog.request()
        }
        .validate()
        .unwrap();
        assert!(matches!(validated.credential, Credential::PrivateKey(ref k) if k.contains("abc")));
    }

    #[test]
    fn ctrl_chords_do_not_type() {
        let mut dialog = ConnectionDialog::new();
        dialog.handle_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert_eq!(dialog.request().host, "");
        type_text(&mut dialog, "abc");
        dialog.handle_key(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(dialog.request().host, "");
    }

    #[test]
    fn render_shows_masked_password_and_error() {
        let mut dialog = ConnectionDialog::new();
        for _ in 0..4 {
            dialog.handle_key(&key(KeyCode::Tab));
        }
        type_text(&mut dialog, "secret");
        dialog.set_error(Some("Host, port, and user are required fields.".into()));
        let buffer = rendered(&mut dialog);

        let text: String = (0..24).map(|y| row_text(&buffer, y)).collect();
        assert!(text.contains("******"));
        assert!(!text.contains("secret"));
        assert!(text.contains("required fields"));
        assert!(text.contains("[ Connect ]"));
    }

    #[test]
    fn click_focuses_rows_and_connect_submits() {
        let mut dialog = ConnectionDialog::new();
        rendered(&mut dialog);
        let rect = dialog.rect_for(Rect::new(0, 0, 80, 24));
        let body_y = rect.y + 1;

        assert_eq!(dialog.click(rect.x + 20, body_y + 2), DialogOutcome::Consumed);
        assert_eq!(dialog.focus(), DialogField::User);
        assert!(matches!(
            dialog.click(rect.x + 20, body_y + 7),
            DialogOutcome::Submit(_)
        ));
        assert_eq!(dialog.click(0, 0), DialogOutcome::Ignored);
    }
}
