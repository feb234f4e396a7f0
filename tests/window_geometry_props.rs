use proptest::prelude::*;

use ssh_wm::window::engine::{drag_to, fit_to_viewport, resize_to, toggle_maximize};
use ssh_wm::window::{MinimumSize, Point, ResizeEdge, Size, WindowGeometry};

const MINIMUM: MinimumSize = MinimumSize::DEFAULT;

fn viewport() -> impl Strategy<Value = Size> {
    (MINIMUM.width..4000u32, MINIMUM.height..3000u32).prop_map(|(w, h)| Size::new(w, h))
}

/// A viewport together with a window that already satisfies every invariant.
fn placed() -> impl Strategy<Value = (Size, WindowGeometry)> {
    viewport().prop_flat_map(|viewport| {
        (MINIMUM.width..=viewport.width, MINIMUM.height..=viewport.height).prop_flat_map(
            move |(width, height)| {
                (0..=viewport.width - width, 0..=viewport.height - height).prop_map(
                    move |(x, y)| {
                        (
                            viewport,
                            WindowGeometry {
                                position: Point::new(x as i32, y as i32),
                                size: Size::new(width, height),
                                z_index: 51,
                                saved: None,
                            },
                        )
                    },
                )
            },
        )
    })
}

fn pointer() -> impl Strategy<Value = Point> {
    (-5000i32..8000, -5000i32..8000).prop_map(|(x, y)| Point::new(x, y))
}

fn edge() -> impl Strategy<Value = ResizeEdge> {
    prop_oneof![
        Just(ResizeEdge::Left),
        Just(ResizeEdge::Right),
        Just(ResizeEdge::Top),
        Just(ResizeEdge::Bottom),
        Just(ResizeEdge::TopLeft),
        Just(ResizeEdge::TopRight),
        Just(ResizeEdge::BottomLeft),
        Just(ResizeEdge::BottomRight),
    ]
}

fn assert_inside(geometry: &WindowGeometry, viewport: Size) {
    assert!(geometry.position.x >= 0, "{geometry:?}");
    assert!(geometry.position.y >= 0, "{geometry:?}");
    assert!(geometry.right() <= viewport.width as i64, "{geometry:?} in {viewport:?}");
    assert!(geometry.bottom() <= viewport.height as i64, "{geometry:?} in {viewport:?}");
}

fn assert_at_least_minimum(geometry: &WindowGeometry) {
    assert!(geometry.size.width >= MINIMUM.width, "{geometry:?}");
    assert!(geometry.size.height >= MINIMUM.height, "{geometry:?}");
}

proptest! {
    #[test]
    fn drag_stays_inside((viewport, geometry) in placed(), to in pointer(), grab in pointer()) {
        let offset = Point::new(grab.x.rem_euclid(geometry.size.width as i32), grab.y.rem_euclid(geometry.size.height as i32));
        let next = drag_to(geometry, to, offset, viewport);
        assert_inside(&next, viewport);
        prop_assert_eq!(next.size, geometry.size);
    }

    #[test]
    fn resize_respects_minimum_and_viewport(
        (viewport, geometry) in placed(),
        edge in edge(),
        to in pointer(),
    ) {
        let next = resize_to(geometry, edge, to, viewport, MINIMUM);
        assert_inside(&next, viewport);
        assert_at_least_minimum(&next);
        prop_assert_eq!(next.z_index, geometry.z_index);
        if !edge.moves_left() {
            prop_assert_eq!(next.position.x, geometry.position.x);
        } else {
            prop_assert_eq!(next.right(), geometry.right());
        }
        if !edge.moves_top() {
            prop_assert_eq!(next.position.y, geometry.position.y);
        } else {
            prop_assert_eq!(next.bottom(), geometry.bottom());
        }
    }

    #[test]
    fn maximize_then_restore_round_trips((viewport, geometry) in placed()) {
        prop_assume!(geometry.size != viewport);
        let maximized = toggle_maximize(geometry, viewport, MINIMUM);
        prop_assert!(maximized.is_maximized(viewport));
        let restored = toggle_maximize(maximized, viewport, MINIMUM);
        prop_assert_eq!(restored.position, geometry.position);
        prop_assert_eq!(restored.size, geometry.size);
        prop_assert!(restored.saved.is_none());
    }

    #[test]
    fn shrinking_viewport_refits((_, geometry) in placed(), smaller in viewport()) {
        let next = fit_to_viewport(geometry, smaller, MINIMUM);
        assert_inside(&next, smaller);
        assert_at_least_minimum(&next);
    }
}
