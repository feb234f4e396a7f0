use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::manager::{Notice, NoticeKind};
use crate::theme;
use crate::ui::safe_set_string;

const DISMISS: &str = " × ";

/// One-line notice across the top of the desktop. Any click on it
/// dismisses it.
#[derive(Debug)]
pub struct Banner<'a> {
    notice: &'a Notice,
}

impl<'a> Banner<'a> {
    pub fn new(notice: &'a Notice) -> Self {
        Self { notice }
    }

    pub fn rect_for(area: Rect) -> Rect {
        Rect {
            height: area.height.min(1),
            ..area
        }
    }
}

impl Widget for Banner<'_> {
    fn render(self, area: Rect, buffer: &mut Buffer) {
        let rect = Self::rect_for(area);
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let style = match self.notice.kind {
            NoticeKind::Error => Style::default()
                .bg(theme::error_bg())
                .fg(theme::error_fg())
                .add_modifier(Modifier::BOLD),
            NoticeKind::Info => Style::default().bg(theme::info_bg()).fg(theme::info_fg()),
        };
        buffer.set_style(rect, style);
        // Terminal output may carry line breaks; the banner is a single row.
        let text: String = self
            .notice
            .text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        let dismiss_width = DISMISS.chars().count() as u16;
        let text_bounds = Rect {
            width: rect.width.saturating_sub(dismiss_width),
            ..rect
        };
        safe_set_string(buffer, text_bounds, rect.x + 1, rect.y, &text, style);
        if rect.width > dismiss_width {
            let x = rect.x + rect.width - dismiss_width;
            safe_set_string(buffer, rect, x, rect.y, DISMISS, style);
        }
    }
}
