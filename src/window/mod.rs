pub mod decorator;
pub mod engine;
pub mod interaction;
pub mod zorder;

pub use decorator::{
    ChromeButton, ChromeHit, ChromeState, FrameDecorator, WindowDecorator, content_rect,
};
pub use engine::{MinimumSize, default_geometry};
pub use interaction::{Interaction, InteractionMode, ResizeAxis, ResizeEdge};
pub use zorder::ZOrder;

/// Top-left corner of a window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height in logical pixels. Also used for the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pre-maximize snapshot. Present only while the window is maximized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedGeometry {
    pub position: Point,
    pub size: Size,
}

/// Position, size and stacking state of one session window.
///
/// Values are replaced wholesale by the functions in [`engine`]; nothing
/// edits a geometry in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub position: Point,
    pub size: Size,
    pub z_index: u64,
    pub saved: Option<SavedGeometry>,
}

impl WindowGeometry {
    /// A window counts as maximized when it covers the whole viewport.
    pub fn is_maximized(&self, viewport: Size) -> bool {
        self.size == viewport
    }

    pub fn with_z_index(self, z_index: u64) -> Self {
        Self { z_index, ..self }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i64 {
        self.position.x as i64 + self.size.width as i64
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i64 {
        self.position.y as i64 + self.size.height as i64
    }

    pub fn contains(&self, point: Point) -> bool {
        let (x, y) = (point.x as i64, point.y as i64);
        x >= self.position.x as i64
            && x < self.right()
            && y >= self.position.y as i64
            && y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximized_is_derived_from_viewport_size() {
        let viewport = Size::new(1024, 768);
        let mut geometry = default_geometry(51);
        assert!(!geometry.is_maximized(viewport));
        geometry.size = viewport;
        assert!(geometry.is_maximized(viewport));
    }

    #[test]
    fn contains_uses_exclusive_far_edges() {
        let geometry = default_geometry(51);
        assert!(geometry.contains(Point::new(100, 100)));
        assert!(geometry.contains(Point::new(899, 599)));
        assert!(!geometry.contains(Point::new(900, 300)));
        assert!(!geometry.contains(Point::new(99, 300)));
    }
}
