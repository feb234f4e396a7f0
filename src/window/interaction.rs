use super::Point;

/// Which dimensions a resize grip changes: `Both` is the bottom-right grip,
/// `X` the right edge and `Y` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeAxis {
    Both,
    X,
    Y,
}

/// The grip taken hold of at mouse-down. Fixed for the whole gesture: the
/// edges it names follow the pointer, the opposite edges stay anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }
}

impl From<ResizeAxis> for ResizeEdge {
    fn from(axis: ResizeAxis) -> Self {
        match axis {
            ResizeAxis::Both => ResizeEdge::BottomRight,
            ResizeAxis::X => ResizeEdge::Right,
            ResizeAxis::Y => ResizeEdge::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    None,
    Move,
    Resize,
}

/// The single pointer gesture in progress, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction<R: Copy + Eq> {
    #[default]
    Idle,
    Moving {
        id: R,
        /// Pointer minus window origin at mouse-down.
        offset: Point,
    },
    Resizing {
        id: R,
        edge: ResizeEdge,
    },
}

impl<R: Copy + Eq> Interaction<R> {
    pub fn mode(&self) -> InteractionMode {
        match self {
            Interaction::Idle => InteractionMode::None,
            Interaction::Moving { .. } => InteractionMode::Move,
            Interaction::Resizing { .. } => InteractionMode::Resize,
        }
    }

    pub fn target(&self) -> Option<R> {
        match *self {
            Interaction::Idle => None,
            Interaction::Moving { id, .. } | Interaction::Resizing { id, .. } => Some(id),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Interaction::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_name_far_edge_grips() {
        assert_eq!(ResizeEdge::from(ResizeAxis::Both), ResizeEdge::BottomRight);
        assert_eq!(ResizeEdge::from(ResizeAxis::X), ResizeEdge::Right);
        assert_eq!(ResizeEdge::from(ResizeAxis::Y), ResizeEdge::Bottom);
    }

    #[test]
    fn corner_grips_move_both_named_edges() {
        let edge = ResizeEdge::BottomLeft;
        assert!(edge.moves_left() && edge.moves_bottom());
        assert!(!edge.moves_right() && !edge.moves_top());
        assert!(!ResizeEdge::Left.moves_bottom());
    }

    #[test]
    fn mode_and_target_follow_variant() {
        let idle: Interaction<u64> = Interaction::default();
        assert_eq!(idle.mode(), InteractionMode::None);
        assert_eq!(idle.target(), None);

        let moving = Interaction::Moving {
            id: 3u64,
            offset: Point::new(4, 5),
        };
        assert_eq!(moving.mode(), InteractionMode::Move);
        assert_eq!(moving.target(), Some(3));
        assert!(moving.is_active());

        let resizing = Interaction::Resizing {
            id: 7u64,
            edge: ResizeEdge::Bottom,
        };
        assert_eq!(resizing.mode(), InteractionMode::Resize);
        assert_eq!(resizing.target(), Some(7));
    }
}
