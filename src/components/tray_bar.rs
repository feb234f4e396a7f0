use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::session::SessionId;
use crate::theme;
use crate::tray::{OPEN_BUTTON_LABEL, Span, Tray};
use crate::ui::safe_set_string;

/// Bottom row: the open-connection button followed by one entry per
/// session. Tray columns are relative to the left edge of the area.
#[derive(Debug)]
pub struct TrayBar<'a> {
    tray: &'a Tray,
    focused: Option<SessionId>,
}

impl<'a> TrayBar<'a> {
    pub fn new(tray: &'a Tray, focused: Option<SessionId>) -> Self {
        Self { tray, focused }
    }
}

fn put(buffer: &mut Buffer, area: Rect, span: Span, text: &str, style: Style) {
    let x = area.x.saturating_add(span.start);
    let clipped = Rect::new(x, area.y, span.width, 1).intersection(area);
    safe_set_string(buffer, clipped, x, area.y, text, style);
}

impl Widget for TrayBar<'_> {
    fn render(self, area: Rect, buffer: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let row = Rect { height: 1, ..area };
        buffer.set_style(
            row,
            Style::default().bg(theme::tray_bg()).fg(theme::tray_fg()),
        );

        let layout = self.tray.layout();
        put(
            buffer,
            row,
            layout.open_button,
            OPEN_BUTTON_LABEL,
            Style::default()
                .bg(theme::tray_button_bg())
                .fg(theme::tray_button_fg())
                .add_modifier(Modifier::BOLD),
        );
        let control = Style::default()
            .bg(theme::tray_active_bg())
            .fg(theme::tray_active_fg());
        if let Some(span) = layout.scroll_left {
            put(buffer, row, span, " < ", control);
        }
        if let Some(span) = layout.scroll_right {
            put(buffer, row, span, " > ", control);
        }

        for entry in &layout.entries {
            let Some(record) = self.tray.record(entry.id) else {
                continue;
            };
            let label: String = record.label().chars().skip(entry.clip_left as usize).collect();
            let style = if entry.minimized {
                Style::default()
                    .bg(theme::tray_bg())
                    .fg(theme::tray_minimized_fg())
                    .add_modifier(Modifier::ITALIC)
            } else if self.focused == Some(entry.id) {
                Style::default()
                    .bg(theme::tray_active_bg())
                    .fg(theme::tray_active_fg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().bg(theme::tray_bg()).fg(theme::tray_fg())
            };
            put(buffer, row, entry.span, &label, style);
        }
    }
}
