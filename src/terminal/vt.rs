use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::{CellMetrics, TermSize, TerminalEmulator};
use crate::window::Size;

const SCROLLBACK_LEN: usize = 1000;

// Output is replayed into a fresh parser on resize, so it is kept around
// (bounded).
const MAX_HISTORY_CAP: usize = 2 * 1024 * 1024;
const PRUNE_TARGET: usize = 1024 * 1024;

/// [`TerminalEmulator`] backed by `vt100`.
pub struct Vt100Emulator {
    parser: vt100::Parser,
    size: TermSize,
    history: Vec<u8>,
    disposed: bool,
}

impl std::fmt::Debug for Vt100Emulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vt100Emulator")
            .field("size", &self.size)
            .field("history_len", &self.history.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl Default for Vt100Emulator {
    fn default() -> Self {
        Self::new(TermSize::new(24, 80))
    }
}

impl Vt100Emulator {
    pub fn new(size: TermSize) -> Self {
        Self {
            parser: vt100::Parser::new(size.rows, size.cols, SCROLLBACK_LEN),
            size,
            history: Vec::new(),
            disposed: false,
        }
    }

    pub fn screen(&self) -> &vt100::Screen {
        self.parser.screen()
    }

    fn push_history(&mut self, bytes: &[u8]) {
        self.history.extend_from_slice(bytes);
        if self.history.len() > MAX_HISTORY_CAP {
            let prune_amount = self.history.len() - PRUNE_TARGET;
            // Prefer cutting on a line boundary.
            let search_end = (prune_amount + 1024).min(self.history.len());
            let cut_index = self.history[prune_amount..search_end]
                .iter()
                .position(|&b| b == b'\n')
                .map(|i| prune_amount + i + 1)
                .unwrap_or(prune_amount);
            self.history.drain(0..cut_index);
        }
    }

    fn resize(&mut self, size: TermSize) {
        if size == self.size {
            return;
        }
        self.size = size;
        let mut parser = vt100::Parser::new(size.rows, size.cols, SCROLLBACK_LEN);
        parser.process(&self.history);
        self.parser = parser;
    }
}

impl TerminalEmulator for Vt100Emulator {
    fn write(&mut self, bytes: &[u8]) {
        if self.disposed || bytes.is_empty() {
            return;
        }
        self.push_history(bytes);
        self.parser.process(bytes);
    }

    fn fit(&mut self, content: Size, metrics: CellMetrics) -> TermSize {
        let size = metrics.grid_for(content);
        if !self.disposed {
            self.resize(size);
        }
        self.size
    }

    fn size(&self) -> TermSize {
        self.size
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.history = Vec::new();
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn render(&self, buffer: &mut Buffer, area: Rect, focused: bool) {
        let visible = area.intersection(buffer.area);
        if visible.width == 0 || visible.height == 0 {
            return;
        }
        let start_col = visible.x - area.x;
        let start_row = visible.y - area.y;
        let screen = self.parser.screen();

        for row in start_row..start_row + visible.height {
            for col in start_col..start_col + visible.width {
                let Some(buf_cell) = buffer.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                buf_cell.reset();
                let Some(cell) = screen.cell(row, col) else {
                    buf_cell.set_symbol(" ");
                    continue;
                };
                let symbol = if cell.is_wide_continuation() {
                    ' '
                } else {
                    cell.contents().chars().next().unwrap_or(' ')
                };
                let mut buf = [0u8; 4];
                buf_cell
                    .set_symbol(symbol.encode_utf8(&mut buf))
                    .set_style(cell_style(cell));
            }
        }

        if focused && !screen.hide_cursor() {
            let (row, col) = screen.cursor_position();
            if row < area.height
                && col < area.width
                && let Some(cell) = buffer.cell_mut((area.x + col, area.y + row))
            {
                cell.set_style(cell.style().add_modifier(Modifier::REVERSED));
            }
        }
    }

    fn contents(&self) -> String {
        self.parser.screen().contents()
    }
}

fn cell_style(cell: &vt100::Cell) -> Style {
    let mut style = Style::default();
    let mut fg = vt_color(cell.fgcolor());
    if cell.bold() {
        fg = brighten_indexed(fg);
        style = style.add_modifier(Modifier::BOLD);
    }
    if let Some(fg) = fg {
        style = style.fg(fg);
    }
    if let Some(bg) = vt_color(cell.bgcolor()) {
        style = style.bg(bg);
    }
    if cell.dim() {
        style = style.add_modifier(Modifier::DIM);
    }
    if cell.italic() {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if cell.underline() {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if cell.inverse() {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn vt_color(color: vt100::Color) -> Option<Color> {
    match color {
        vt100::Color::Default => None,
        vt100::Color::Idx(idx) => Some(Color::Indexed(idx)),
        vt100::Color::Rgb(r, g, b) => Some(Color::Rgb(r, g, b)),
    }
}

fn brighten_indexed(color: Option<Color>) -> Option<Color> {
    match color {
        Some(Color::Indexed(idx)) if idx < 8 => Some(Color::Indexed(idx + 8)),
        _ => color,
    }
}
