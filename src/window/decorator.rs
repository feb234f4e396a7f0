use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::interaction::ResizeEdge;
use crate::constants::{
    CHROME_BOTTOM_CELLS, CHROME_LEFT_CELLS, CHROME_RIGHT_CELLS, CHROME_TOP_CELLS,
};

const MINIMIZE_GLYPH: &str = "_";
const MAXIMIZE_GLYPH: &str = "□";
const RESTORE_GLYPH: &str = "◱";
const CLOSE_GLYPH: &str = "×";

/// Title-bar buttons, right to left: close, maximize, minimize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeButton {
    Minimize,
    Maximize,
    Close,
}

/// What a mouse-down on a window's cells landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeHit {
    Button(ChromeButton),
    TitleBar,
    Resize(ResizeEdge),
    Body,
}

/// Per-window flags that change how the chrome looks and responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeState {
    pub focused: bool,
    pub maximized: bool,
    /// Minimizing needs a tray entry, which only exists once the session is
    /// open. Without one the minimize button is neither drawn nor hit.
    pub minimizable: bool,
}

impl ChromeState {
    fn shows(&self, button: ChromeButton) -> bool {
        button != ChromeButton::Minimize || self.minimizable
    }
}

/// Draws window chrome and answers hit tests against it.
pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(
        &self,
        buffer: &mut Buffer,
        rect: Rect,
        bounds: Rect,
        title: &str,
        state: ChromeState,
    );

    fn hit_test(&self, rect: Rect, state: ChromeState, col: u16, row: u16) -> Option<ChromeHit>;
}

/// Area inside the chrome where the terminal is drawn.
pub fn content_rect(rect: Rect) -> Rect {
    let horizontal = CHROME_LEFT_CELLS + CHROME_RIGHT_CELLS;
    let vertical = CHROME_TOP_CELLS + CHROME_BOTTOM_CELLS;
    Rect {
        x: rect.x.saturating_add(CHROME_LEFT_CELLS),
        y: rect.y.saturating_add(CHROME_TOP_CELLS),
        width: rect.width.saturating_sub(horizontal),
        height: rect.height.saturating_sub(vertical),
    }
}

fn button_column(rect: Rect, button: ChromeButton) -> Option<u16> {
    let right = rect.x.checked_add(rect.width)?.checked_sub(1)?;
    let offset = match button {
        ChromeButton::Close => 2,
        ChromeButton::Maximize => 4,
        ChromeButton::Minimize => 6,
    };
    let col = right.checked_sub(offset)?;
    (col > rect.x).then_some(col)
}

#[derive(Debug, Default)]
pub struct FrameDecorator;

impl FrameDecorator {
    fn put(buffer: &mut Buffer, bounds: Rect, x: u16, y: u16, symbol: &str, style: Style) {
        if !bounds.contains((x, y).into()) {
            return;
        }
        if let Some(cell) = buffer.cell_mut((x, y)) {
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    }
}

impl WindowDecorator for FrameDecorator {
    fn render_window(
        &self,
        buffer: &mut Buffer,
        rect: Rect,
        bounds: Rect,
        title: &str,
        state: ChromeState,
    ) {
        let ChromeState {
            focused, maximized, ..
        } = state;
        if rect.width < 2 || rect.height < 2 {
            return;
        }

        let header_style = if focused {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        let border_style = if focused {
            Style::default().fg(Color::Blue)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let left = rect.x;
        let top = rect.y;
        let right = rect.x + rect.width - 1;
        let bottom = rect.y + rect.height - 1;
        let header_y = top + 1;

        for x in left..=right {
            let (top_symbol, bottom_symbol) = if x == left {
                ("┌", "└")
            } else if x == right {
                ("┐", "┘")
            } else {
                ("─", "─")
            };
            Self::put(buffer, bounds, x, top, top_symbol, border_style);
            Self::put(buffer, bounds, x, bottom, bottom_symbol, border_style);
        }
        for y in top + 1..bottom {
            Self::put(buffer, bounds, left, y, "│", border_style);
            Self::put(buffer, bounds, right, y, "│", border_style);
        }

        if header_y >= bottom {
            return;
        }
        for x in left + 1..right {
            Self::put(buffer, bounds, x, header_y, " ", header_style);
        }

        // Title stops short of the buttons.
        let buttons_start = button_column(rect, ChromeButton::Minimize).unwrap_or(right);
        let available = buttons_start.saturating_sub(left + 2) as usize;
        for (idx, ch) in title.chars().take(available).enumerate() {
            let x = left + 2 + idx as u16;
            Self::put(buffer, bounds, x, header_y, &ch.to_string(), header_style);
        }

        let maximize_glyph = if maximized {
            RESTORE_GLYPH
        } else {
            MAXIMIZE_GLYPH
        };
        for (button, glyph) in [
            (ChromeButton::Minimize, MINIMIZE_GLYPH),
            (ChromeButton::Maximize, maximize_glyph),
            (ChromeButton::Close, CLOSE_GLYPH),
        ] {
            if !state.shows(button) {
                continue;
            }
            if let Some(x) = button_column(rect, button) {
                Self::put(buffer, bounds, x, header_y, glyph, header_style);
            }
        }
    }

    fn hit_test(&self, rect: Rect, state: ChromeState, col: u16, row: u16) -> Option<ChromeHit> {
        if !rect.contains((col, row).into()) {
            return None;
        }
        let right = rect.x + rect.width - 1;
        let bottom = rect.y + rect.height - 1;
        let header_y = rect.y + 1;

        if row == bottom {
            let edge = if col == rect.x {
                ResizeEdge::BottomLeft
            } else if col == right {
                ResizeEdge::BottomRight
            } else {
                ResizeEdge::Bottom
            };
            return Some(ChromeHit::Resize(edge));
        }
        if row == header_y {
            for button in [
                ChromeButton::Minimize,
                ChromeButton::Maximize,
                ChromeButton::Close,
            ] {
                if state.shows(button) && button_column(rect, button) == Some(col) {
                    return Some(ChromeHit::Button(button));
                }
            }
        }
        if row <= header_y && col != rect.x && col != right {
            return Some(ChromeHit::TitleBar);
        }
        if col == rect.x {
            return Some(ChromeHit::Resize(ResizeEdge::Left));
        }
        if col == right {
            return Some(ChromeHit::Resize(ResizeEdge::Right));
        }
        Some(ChromeHit::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(2, 1, 30, 10)
    }

    #[test]
    fn content_rect_strips_chrome() {
        assert_eq!(content_rect(rect()), Rect::new(3, 3, 28, 7));
        assert_eq!(content_rect(Rect::new(0, 0, 1, 1)), Rect::new(1, 2, 0, 0));
    }

    #[test]
    fn hit_test_finds_buttons_grips_and_body() {
        let decorator = FrameDecorator;
        let open = ChromeState {
            minimizable: true,
            ..ChromeState::default()
        };
        let r = rect();
        let right = r.x + r.width - 1;
        let header = r.y + 1;
        assert_eq!(
            decorator.hit_test(r, open, right - 2, header),
            Some(ChromeHit::Button(ChromeButton::Close))
        );
        assert_eq!(
            decorator.hit_test(r, open, right - 4, header),
            Some(ChromeHit::Button(ChromeButton::Maximize))
        );
        assert_eq!(
            decorator.hit_test(r, open, right - 6, header),
            Some(ChromeHit::Button(ChromeButton::Minimize))
        );
        assert_eq!(decorator.hit_test(r, open, 6, header), Some(ChromeHit::TitleBar));
        assert_eq!(decorator.hit_test(r, open, 6, r.y), Some(ChromeHit::TitleBar));
        assert_eq!(
            decorator.hit_test(r, open, right, 10),
            Some(ChromeHit::Resize(ResizeEdge::BottomRight))
        );
        assert_eq!(
            decorator.hit_test(r, open, 10, 10),
            Some(ChromeHit::Resize(ResizeEdge::Bottom))
        );
        assert_eq!(
            decorator.hit_test(r, open, r.x, 5),
            Some(ChromeHit::Resize(ResizeEdge::Left))
        );
        assert_eq!(decorator.hit_test(r, open, 10, 5), Some(ChromeHit::Body));
        assert_eq!(decorator.hit_test(r, open, 0, 0), None);
    }

    #[test]
    fn render_draws_title_and_buttons() {
        let area = Rect::new(0, 0, 40, 12);
        let mut buffer = Buffer::empty(area);
        let state = ChromeState {
            focused: true,
            maximized: false,
            minimizable: true,
        };
        FrameDecorator.render_window(&mut buffer, rect(), area, "user@host", state);

        let header: String = (0..40u16)
            .map(|x| buffer[(x, 2)].symbol().to_string())
            .collect();
        assert!(header.contains("user@host"));
        assert!(header.contains('×'));
        assert!(header.contains('□'));
        assert!(header.contains('_'));
        assert_eq!(buffer[(2, 1)].symbol(), "┌");
        assert_eq!(buffer[(31, 10)].symbol(), "┘");
    }

    #[test]
    fn render_clips_to_bounds() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buffer = Buffer::empty(area);
        let state = ChromeState {
            maximized: true,
            ..ChromeState::default()
        };
        FrameDecorator.render_window(&mut buffer, Rect::new(5, 2, 20, 8), area, "t", state);
        assert_eq!(buffer[(5, 2)].symbol(), "┌");
    }

    #[test]
    fn minimize_button_needs_a_tray_entry() {
        let r = rect();
        let right = r.x + r.width - 1;
        let header = r.y + 1;
        let connecting = ChromeState::default();
        assert_eq!(
            FrameDecorator.hit_test(r, connecting, right - 6, header),
            Some(ChromeHit::TitleBar)
        );

        let area = Rect::new(0, 0, 40, 12);
        let mut buffer = Buffer::empty(area);
        FrameDecorator.render_window(&mut buffer, r, area, "t", connecting);
        assert_eq!(buffer[(right - 6, header)].symbol(), " ");
        assert_eq!(buffer[(right - 2, header)].symbol(), "×");
    }
}
