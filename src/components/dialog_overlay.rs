use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear};

use crate::ui::UiFrame;

/// Centered, bordered box shared by the modal overlays.
#[derive(Debug, Clone)]
pub struct DialogFrame {
    title: String,
    width: u16,
    height: u16,
    bg: Color,
    dim_backdrop: bool,
}

impl DialogFrame {
    pub fn new(title: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            bg: Color::Black,
            dim_backdrop: false,
        }
    }

    pub fn set_bg(&mut self, bg: Color) {
        self.bg = bg;
    }

    pub fn set_dim_backdrop(&mut self, dim: bool) {
        self.dim_backdrop = dim;
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Clamp dialog size to the available area to avoid drawing outside the buffer
    /// when the terminal is smaller than the preferred minimums.
    pub fn rect_for(&self, area: Rect) -> Rect {
        let mut width = area.width.min(self.width).max(1);
        let mut height = area.height.min(self.height).max(1);
        if area.width >= 24 {
            width = width.max(24);
        }
        if area.height >= 5 {
            height = height.max(5);
        }
        let x = area.x.saturating_add(area.width.saturating_sub(width) / 2);
        let y = area
            .y
            .saturating_add(area.height.saturating_sub(height) / 2);
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Draw backdrop, clear the box and its border. Returns the inner area.
    pub fn render(&self, frame: &mut UiFrame<'_>, area: Rect) -> Rect {
        if self.dim_backdrop {
            frame.restyle(area, Style::default().add_modifier(Modifier::DIM));
        }
        let rect = self.rect_for(area);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .style(Style::default().bg(self.bg));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        inner
    }
}
