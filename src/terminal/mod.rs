//! Terminal emulation behind a narrow trait, plus the cell/pixel arithmetic
//! that ties a window's pixel box to the emulator's grid.

pub mod keys;
pub mod vt;

use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;

use crate::constants::{
    CHROME_BOTTOM_CELLS, CHROME_LEFT_CELLS, CHROME_RIGHT_CELLS, CHROME_TOP_CELLS,
    FALLBACK_CELL_HEIGHT, FALLBACK_CELL_WIDTH,
};
use crate::window::{Point, Size, WindowGeometry};

pub use keys::key_to_bytes;
pub use vt::Vt100Emulator;

/// Character grid dimensions of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermSize {
    pub rows: u16,
    pub cols: u16,
}

impl TermSize {
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }
}

/// Pixel size of one glyph cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub width: u16,
    pub height: u16,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: FALLBACK_CELL_WIDTH,
            height: FALLBACK_CELL_HEIGHT,
        }
    }
}

impl CellMetrics {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Derive metrics from the terminal's reported pixel size, if it reports
    /// one.
    pub fn from_window_size(size: &crossterm::terminal::WindowSize) -> Option<Self> {
        if size.width == 0 || size.height == 0 || size.columns == 0 || size.rows == 0 {
            return None;
        }
        Some(Self::new(size.width / size.columns, size.height / size.rows))
    }

    /// Viewport in pixels for a screen area measured in cells.
    pub fn viewport_for(&self, area: Rect) -> Size {
        Size::new(
            area.width as u32 * self.width as u32,
            area.height as u32 * self.height as u32,
        )
    }

    /// Pixel coordinate of the top-left corner of a cell, relative to the
    /// desktop origin.
    pub fn cell_to_point(&self, origin: Rect, col: u16, row: u16) -> Point {
        let dx = col as i32 - origin.x as i32;
        let dy = row as i32 - origin.y as i32;
        Point::new(dx * self.width as i32, dy * self.height as i32)
    }

    /// Cell rectangle a window occupies on the desktop.
    pub fn window_rect(&self, origin: Rect, geometry: &WindowGeometry) -> Rect {
        let cw = self.width as i64;
        let ch = self.height as i64;
        let x = origin.x as i64 + geometry.position.x as i64 / cw;
        let y = origin.y as i64 + geometry.position.y as i64 / ch;
        let width = geometry.size.width as i64 / cw;
        let height = geometry.size.height as i64 / ch;
        Rect {
            x: x.clamp(0, u16::MAX as i64) as u16,
            y: y.clamp(0, u16::MAX as i64) as u16,
            width: width.clamp(0, u16::MAX as i64) as u16,
            height: height.clamp(0, u16::MAX as i64) as u16,
        }
    }

    /// Content box (window minus chrome) in pixels.
    pub fn content_box(&self, size: Size) -> Size {
        let chrome_w = (CHROME_LEFT_CELLS + CHROME_RIGHT_CELLS) as u32 * self.width as u32;
        let chrome_h = (CHROME_TOP_CELLS + CHROME_BOTTOM_CELLS) as u32 * self.height as u32;
        Size::new(
            size.width.saturating_sub(chrome_w),
            size.height.saturating_sub(chrome_h),
        )
    }

    /// Grid that fits a content box. Never smaller than 1×1.
    pub fn grid_for(&self, content: Size) -> TermSize {
        let cols = (content.width / self.width as u32).clamp(1, u16::MAX as u32) as u16;
        let rows = (content.height / self.height as u32).clamp(1, u16::MAX as u32) as u16;
        TermSize::new(rows, cols)
    }
}

/// A terminal emulation instance attached to one session.
pub trait TerminalEmulator: std::fmt::Debug + Send {
    /// Feed output bytes from the remote shell.
    fn write(&mut self, bytes: &[u8]);

    /// Resize the grid to fill `content` (pixels) and return the new size.
    fn fit(&mut self, content: Size, metrics: CellMetrics) -> TermSize;

    fn size(&self) -> TermSize;

    /// Release resources. Further writes are ignored.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;

    /// Draw the visible screen into `area`.
    fn render(&self, buffer: &mut Buffer, area: Rect, focused: bool);

    /// Plain-text contents of the visible screen.
    fn contents(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::default_geometry;

    #[test]
    fn default_window_fits_expected_grid() {
        let metrics = CellMetrics::default();
        let content = metrics.content_box(Size::new(800, 500));
        assert_eq!(content, Size::new(784, 452));
        assert_eq!(metrics.grid_for(content), TermSize::new(28, 98));
    }

    #[test]
    fn grid_never_collapses_to_zero() {
        let metrics = CellMetrics::default();
        assert_eq!(metrics.grid_for(Size::new(0, 0)), TermSize::new(1, 1));
    }

    #[test]
    fn window_rect_maps_pixels_to_cells() {
        let metrics = CellMetrics::default();
        let rect = metrics.window_rect(Rect::new(0, 0, 200, 60), &default_geometry(51));
        assert_eq!(rect, Rect::new(12, 6, 100, 31));
    }

    #[test]
    fn cell_to_point_is_relative_to_desktop_origin() {
        let metrics = CellMetrics::new(10, 20);
        let origin = Rect::new(0, 1, 80, 24);
        assert_eq!(metrics.cell_to_point(origin, 3, 4), Point::new(30, 60));
        assert_eq!(metrics.cell_to_point(origin, 0, 0), Point::new(0, -20));
    }

    #[test]
    fn metrics_from_reported_pixels() {
        let size = crossterm::terminal::WindowSize {
            rows: 50,
            columns: 200,
            width: 1800,
            height: 1000,
        };
        assert_eq!(
            CellMetrics::from_window_size(&size),
            Some(CellMetrics::new(9, 20))
        );
        let unknown = crossterm::terminal::WindowSize {
            rows: 50,
            columns: 200,
            width: 0,
            height: 0,
        };
        assert_eq!(CellMetrics::from_window_size(&unknown), None);
    }
}
