use crossterm::event::{Event, KeyCode, MouseEventKind};
use indoc::formatdoc;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::{Component, DialogFrame};
use crate::actions::Action;
use crate::shortcuts::Shortcuts;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

const COMBO_COLUMN: u16 = 34;

/// Shortcut reference, built from the live registry.
#[derive(Debug)]
pub struct HelpOverlay {
    frame: DialogFrame,
    lines: Vec<(String, String)>,
    scroll: usize,
}

impl HelpOverlay {
    pub fn new(shortcuts: &Shortcuts) -> Self {
        let mut frame = DialogFrame::new(" Shortcuts ", 64, 20);
        frame.set_bg(theme::dialog_bg());
        frame.set_dim_backdrop(true);

        let header = formatdoc! {"
            {name} {version}
            Drag a title bar to move a window, drag its border to resize.
            Double-click a title bar to maximize. Click a tray entry to
            minimize or restore its window.
            ",
            name = env!("CARGO_PKG_NAME"),
            version = env!("CARGO_PKG_VERSION"),
        };
        let mut lines: Vec<(String, String)> = header
            .lines()
            .map(|line| (line.to_string(), String::new()))
            .collect();
        for action in Action::ALL {
            let combos: Vec<String> = shortcuts
                .combos_for(action)
                .iter()
                .map(|combo| combo.display())
                .collect();
            if combos.is_empty() {
                continue;
            }
            lines.push((action.to_string(), combos.join(" / ")));
        }
        lines.push((String::new(), String::new()));
        lines.push(("Esc, Enter or q closes this window".to_string(), String::new()));

        Self {
            frame,
            lines,
            scroll: 0,
        }
    }

    pub fn lines(&self) -> &[(String, String)] {
        &self.lines
    }

    /// Keys that dismiss the overlay.
    pub fn is_close_event(event: &Event) -> bool {
        matches!(
            event,
            Event::Key(key) if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q'))
        )
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }
}

impl Component for HelpOverlay {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let inner = self.frame.render(frame, area);
        let text_style = Style::default().bg(theme::dialog_bg()).fg(Color::White);
        let combo_style = text_style.add_modifier(Modifier::BOLD);
        let buffer = frame.buffer_mut();
        for (row, (left, right)) in self
            .lines
            .iter()
            .skip(self.scroll)
            .take(inner.height as usize)
            .enumerate()
        {
            let y = inner.y + row as u16;
            safe_set_string(buffer, inner, inner.x + 1, y, left, text_style);
            if !right.is_empty() {
                safe_set_string(buffer, inner, inner.x + COMBO_COLUMN, y, right, combo_style);
            }
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => match key.code {
                KeyCode::Up => self.scroll_by(-1),
                KeyCode::Down => self.scroll_by(1),
                KeyCode::PageUp => self.scroll_by(-10),
                KeyCode::PageDown => self.scroll_by(10),
                KeyCode::Home => self.scroll = 0,
                _ => return false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll_by(-1),
                MouseEventKind::ScrollDown => self.scroll_by(1),
                _ => return false,
            },
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;

    #[test]
    fn lists_every_bound_action() {
        let overlay = HelpOverlay::new(&Shortcuts::default());
        let quit = overlay
            .lines()
            .iter()
            .find(|(left, _)| left == "Quit")
            .unwrap();
        assert_eq!(quit.1, "Ctrl+Alt+Q");
        let next = overlay
            .lines()
            .iter()
            .find(|(left, _)| left == "Focus next session")
            .unwrap();
        assert_eq!(next.1, "Ctrl+Tab / Ctrl+Right");
    }

    #[test]
    fn close_keys_are_recognized() {
        let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        let x = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(HelpOverlay::is_close_event(&esc));
        assert!(!HelpOverlay::is_close_event(&x));
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut overlay = HelpOverlay::new(&Shortcuts::default());
        let up = Event::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        assert!(overlay.handle_event(&up));
        assert_eq!(overlay.scroll, 0);
        let page = Event::Key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE));
        for _ in 0..10 {
            overlay.handle_event(&page);
        }
        assert_eq!(overlay.scroll, overlay.lines().len() - 1);
    }

    #[test]
    fn renders_header_and_bindings() {
        let mut overlay = HelpOverlay::new(&Shortcuts::default());
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        overlay.render(&mut frame, area);
        let text: String = (0..24u16)
            .flat_map(|y| (0..80u16).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect();
        assert!(text.contains(env!("CARGO_PKG_NAME")));
        assert!(text.contains("Close session"));
    }
}
