//! Pure geometry transformations.
//!
//! Every function takes the current [`WindowGeometry`] by value and returns
//! the next one. Callers replace the stored value with the result, so a burst
//! of queued pointer events always builds on the latest committed geometry.
//!
//! Invariants upheld by every function here, for any viewport at least as
//! large as the minimum size:
//! - `position.x ∈ [0, viewport.width - size.width]`
//! - `position.y ∈ [0, viewport.height - size.height]`
//! - `size >= minimum` on both axes

use super::{Point, ResizeEdge, SavedGeometry, Size, WindowGeometry};
use crate::constants::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_X, DEFAULT_WINDOW_Y,
    LARGE_MIN_WINDOW_HEIGHT, LARGE_MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};

/// Smallest size a window may be resized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumSize {
    pub width: u32,
    pub height: u32,
}

impl MinimumSize {
    pub const DEFAULT: Self = Self {
        width: MIN_WINDOW_WIDTH,
        height: MIN_WINDOW_HEIGHT,
    };

    pub const LARGE: Self = Self {
        width: LARGE_MIN_WINDOW_WIDTH,
        height: LARGE_MIN_WINDOW_HEIGHT,
    };
}

impl Default for MinimumSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub fn default_position() -> Point {
    Point::new(DEFAULT_WINDOW_X, DEFAULT_WINDOW_Y)
}

pub fn default_size() -> Size {
    Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)
}

/// Geometry of a freshly opened window (800×500 at (100,100)).
pub fn default_geometry(z_index: u64) -> WindowGeometry {
    WindowGeometry {
        position: default_position(),
        size: default_size(),
        z_index,
        saved: None,
    }
}

// Unlike `i64::clamp`, tolerates `max < min` by letting the minimum win.
fn clamp_span(value: i64, min: i64, max: i64) -> i64 {
    if max < min {
        min
    } else {
        value.clamp(min, max)
    }
}

fn clamp_axis(origin: i64, extent: u32, viewport: u32) -> i32 {
    let max = viewport as i64 - extent as i64;
    clamp_span(origin, 0, max.max(0)) as i32
}

/// Clamp the window's origin so the whole window lies inside the viewport.
pub fn clamp_position(geometry: WindowGeometry, viewport: Size) -> WindowGeometry {
    WindowGeometry {
        position: Point {
            x: clamp_axis(geometry.position.x as i64, geometry.size.width, viewport.width),
            y: clamp_axis(geometry.position.y as i64, geometry.size.height, viewport.height),
        },
        ..geometry
    }
}

/// Move the window so that `pointer - offset` becomes its origin.
pub fn drag_to(
    geometry: WindowGeometry,
    pointer: Point,
    offset: Point,
    viewport: Size,
) -> WindowGeometry {
    let moved = WindowGeometry {
        position: Point {
            x: pointer.x.saturating_sub(offset.x),
            y: pointer.y.saturating_sub(offset.y),
        },
        ..geometry
    };
    clamp_position(moved, viewport)
}

/// Far-edge resize: the origin stays, the far edge follows the pointer.
fn resize_far(origin: i32, pointer: i32, min: u32, viewport: u32) -> u32 {
    let requested = pointer as i64 - origin as i64;
    let max = viewport as i64 - origin as i64;
    clamp_span(requested, min as i64, max) as u32
}

/// Near-edge resize: the far edge stays anchored, the origin follows the
/// pointer. Returns the new origin and extent.
fn resize_near(origin: i32, extent: u32, pointer: i32, min: u32) -> (i32, u32) {
    let far = origin as i64 + extent as i64;
    let new_origin = clamp_span(pointer as i64, 0, far - min as i64);
    (new_origin as i32, (far - new_origin) as u32)
}

/// Move the edges named by `edge` to the pointer.
///
/// Far edges (right, bottom) keep the origin and stop at the viewport. Near
/// edges (left, top) keep the far edge anchored and stop at 0. Both honor the
/// minimum size.
pub fn resize_to(
    geometry: WindowGeometry,
    edge: ResizeEdge,
    pointer: Point,
    viewport: Size,
    minimum: MinimumSize,
) -> WindowGeometry {
    let WindowGeometry {
        mut position,
        mut size,
        ..
    } = geometry;

    if edge.moves_left() {
        (position.x, size.width) = resize_near(position.x, size.width, pointer.x, minimum.width);
    } else if edge.moves_right() {
        size.width = resize_far(position.x, pointer.x, minimum.width, viewport.width);
    }
    if edge.moves_top() {
        (position.y, size.height) =
            resize_near(position.y, size.height, pointer.y, minimum.height);
    } else if edge.moves_bottom() {
        size.height = resize_far(position.y, pointer.y, minimum.height, viewport.height);
    }

    let saved = if size == viewport { geometry.saved } else { None };
    clamp_position(
        WindowGeometry {
            position,
            size,
            saved,
            ..geometry
        },
        viewport,
    )
}

/// Maximize or restore.
///
/// Maximizing snapshots `{position, size}` and fills the viewport. Restoring
/// puts the snapshot back (or the default geometry when there is none) and
/// drops the snapshot.
pub fn toggle_maximize(
    geometry: WindowGeometry,
    viewport: Size,
    minimum: MinimumSize,
) -> WindowGeometry {
    if geometry.is_maximized(viewport) {
        let restored = geometry.saved.unwrap_or(SavedGeometry {
            position: default_position(),
            size: default_size(),
        });
        fit_to_viewport(
            WindowGeometry {
                position: restored.position,
                size: restored.size,
                saved: None,
                ..geometry
            },
            viewport,
            minimum,
        )
    } else {
        WindowGeometry {
            position: Point::default(),
            size: viewport,
            saved: Some(SavedGeometry {
                position: geometry.position,
                size: geometry.size,
            }),
            ..geometry
        }
    }
}

/// Bring a window back inside a (possibly changed) viewport.
///
/// A window holding a maximize snapshot keeps filling the viewport. Any
/// other window is shrunk to fit, never below the minimum, and its origin is
/// clamped.
pub fn fit_to_viewport(
    geometry: WindowGeometry,
    viewport: Size,
    minimum: MinimumSize,
) -> WindowGeometry {
    if geometry.saved.is_some() {
        return WindowGeometry {
            position: Point::default(),
            size: viewport,
            ..geometry
        };
    }
    let size = Size {
        width: clamp_span(
            geometry.size.width as i64,
            minimum.width as i64,
            viewport.width as i64,
        ) as u32,
        height: clamp_span(
            geometry.size.height as i64,
            minimum.height as i64,
            viewport.height as i64,
        ) as u32,
    };
    clamp_position(WindowGeometry { size, ..geometry }, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(1920, 1080);

    fn at(x: i32, y: i32, width: u32, height: u32) -> WindowGeometry {
        WindowGeometry {
            position: Point::new(x, y),
            size: Size::new(width, height),
            z_index: 51,
            saved: None,
        }
    }

    #[test]
    fn drag_past_left_edge_clamps_to_zero() {
        let start = default_geometry(51);
        let offset = Point::new(20, 10);
        // pointer implies newX = -50
        let moved = drag_to(start, Point::new(-30, 200), offset, VIEWPORT);
        assert_eq!(moved.position.x, 0);
        assert_eq!(moved.position.y, 190);
        assert_eq!(moved.size, start.size);
    }

    #[test]
    fn drag_past_far_edges_clamps_to_viewport() {
        let start = default_geometry(51);
        let moved = drag_to(start, Point::new(5000, 5000), Point::new(0, 0), VIEWPORT);
        assert_eq!(moved.position.x, 1920 - 800);
        assert_eq!(moved.position.y, 1080 - 500);
    }

    #[test]
    fn resize_both_respects_minimum() {
        let start = at(100, 100, 800, 500);
        let resized = resize_to(
            start,
            ResizeEdge::BottomRight,
            Point::new(120, 120),
            VIEWPORT,
            MinimumSize::DEFAULT,
        );
        assert_eq!(resized.size, Size::new(200, 150));
        assert_eq!(resized.position, start.position);
    }

    #[test]
    fn resize_both_stops_at_viewport() {
        let start = at(100, 100, 800, 500);
        let resized = resize_to(
            start,
            ResizeEdge::BottomRight,
            Point::new(4000, 4000),
            VIEWPORT,
            MinimumSize::DEFAULT,
        );
        assert_eq!(resized.size, Size::new(1820, 980));
    }

    #[test]
    fn resize_right_edge_leaves_height() {
        let start = at(100, 100, 800, 500);
        let resized = resize_to(
            start,
            ResizeEdge::Right,
            Point::new(1000, 5),
            VIEWPORT,
            MinimumSize::DEFAULT,
        );
        assert_eq!(resized.size, Size::new(900, 500));
        assert_eq!(resized.position, start.position);
    }

    #[test]
    fn resize_left_edge_moves_origin_and_anchors_far_edge() {
        let start = at(100, 100, 800, 500);
        let resized = resize_to(
            start,
            ResizeEdge::Left,
            Point::new(40, 300),
            VIEWPORT,
            MinimumSize::DEFAULT,
        );
        assert_eq!(resized.position.x, 40);
        assert_eq!(resized.size.width, 860);
        assert_eq!(resized.right(), start.right());
    }

    #[test]
    fn resize_near_edge_keeps_minimum() {
        let start = at(100, 100, 800, 500);
        let resized = resize_to(
            start,
            ResizeEdge::Top,
            Point::new(300, 340),
            VIEWPORT,
            MinimumSize::DEFAULT,
        );
        assert_eq!(resized.position.y, 340);
        assert_eq!(resized.size.height, 260);

        let squeezed = resize_to(
            at(100, 100, 800, 160),
            ResizeEdge::Top,
            Point::new(300, 170),
            VIEWPORT,
            MinimumSize::DEFAULT,
        );
        assert_eq!(squeezed.size.height, 150);
        assert_eq!(squeezed.bottom(), 260);
    }

    #[test]
    fn resize_near_edge_does_not_cross_viewport_origin() {
        let resized = resize_to(
            at(10, 10, 400, 400),
            ResizeEdge::Left,
            Point::new(-80, 50),
            VIEWPORT,
            MinimumSize::DEFAULT,
        );
        assert_eq!(resized.position.x, 0);
        assert_eq!(resized.size.width, 410);
    }

    #[test]
    fn bottom_left_grip_moves_left_and_bottom_edges() {
        let start = at(100, 100, 800, 500);
        let resized = resize_to(
            start,
            ResizeEdge::BottomLeft,
            Point::new(92, 640),
            VIEWPORT,
            MinimumSize::DEFAULT,
        );
        assert_eq!(resized.position, Point::new(92, 100));
        assert_eq!(resized.size, Size::new(808, 540));
        assert_eq!(resized.right(), start.right());
    }

    #[test]
    fn left_edge_keeps_moving_past_the_midpoint() {
        let start = at(100, 100, 800, 500);
        let step = |geometry, x| {
            resize_to(
                geometry,
                ResizeEdge::Left,
                Point::new(x, 300),
                VIEWPORT,
                MinimumSize::DEFAULT,
            )
        };
        let first = step(start, 120);
        assert_eq!((first.position.x, first.size.width), (120, 780));
        let crossed = step(first, 560);
        assert_eq!((crossed.position.x, crossed.size.width), (560, 340));
        assert_eq!(crossed.right(), start.right());
        let pinned = step(crossed, 880);
        assert_eq!((pinned.position.x, pinned.size.width), (700, 200));
    }

    #[test]
    fn large_minimum_variant_applies() {
        let resized = resize_to(
            at(0, 0, 800, 500),
            ResizeEdge::BottomRight,
            Point::new(1, 1),
            VIEWPORT,
            MinimumSize::LARGE,
        );
        assert_eq!(resized.size, Size::new(350, 200));
    }

    #[test]
    fn maximize_then_restore_round_trips() {
        let start = at(321, 123, 640, 480);
        let maximized = toggle_maximize(start, VIEWPORT, MinimumSize::DEFAULT);
        assert_eq!(maximized.position, Point::new(0, 0));
        assert_eq!(maximized.size, VIEWPORT);
        assert!(maximized.saved.is_some());

        let restored = toggle_maximize(maximized, VIEWPORT, MinimumSize::DEFAULT);
        assert_eq!(restored.position, start.position);
        assert_eq!(restored.size, start.size);
        assert!(restored.saved.is_none());
    }

    #[test]
    fn restore_without_snapshot_uses_default_geometry() {
        let full = at(0, 0, 1920, 1080);
        let restored = toggle_maximize(full, VIEWPORT, MinimumSize::DEFAULT);
        assert_eq!(restored.position, Point::new(100, 100));
        assert_eq!(restored.size, Size::new(800, 500));
    }

    #[test]
    fn resizing_a_maximized_window_drops_the_snapshot() {
        let maximized = toggle_maximize(at(10, 10, 300, 300), VIEWPORT, MinimumSize::DEFAULT);
        let resized = resize_to(
            maximized,
            ResizeEdge::BottomRight,
            Point::new(1000, 700),
            VIEWPORT,
            MinimumSize::DEFAULT,
        );
        assert!(resized.saved.is_none());
        assert!(!resized.is_maximized(VIEWPORT));
    }

    #[test]
    fn fit_to_viewport_shrinks_and_clamps() {
        let small = Size::new(640, 384);
        let fitted = fit_to_viewport(default_geometry(51), small, MinimumSize::DEFAULT);
        assert_eq!(fitted.size, Size::new(640, 384));
        assert_eq!(fitted.position, Point::new(0, 0));

        let shifted = fit_to_viewport(at(900, 500, 400, 300), Size::new(1000, 700), MinimumSize::DEFAULT);
        assert_eq!(shifted.position, Point::new(600, 400));
        assert_eq!(shifted.size, Size::new(400, 300));
    }

    #[test]
    fn fit_to_viewport_keeps_maximized_windows_full() {
        let maximized = toggle_maximize(at(10, 10, 300, 300), VIEWPORT, MinimumSize::DEFAULT);
        let bigger = Size::new(2560, 1440);
        let fitted = fit_to_viewport(maximized, bigger, MinimumSize::DEFAULT);
        assert_eq!(fitted.size, bigger);
        assert!(fitted.is_maximized(bigger));
        assert_eq!(fitted.saved, maximized.saved);
    }
}
