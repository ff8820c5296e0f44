//! Panel geometry: room coordinates, panel edges, axis-aligned rectangles.
//!
//! All rectangles live in panel-local pixel space with the origin at the
//! top-left corner and `y` growing downward.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer coordinate of a panel in the infinite grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RoomCoordinate {
    pub x: i32,
    pub y: i32,
}

impl RoomCoordinate {
    /// The starting panel. Its room never has interior features.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_origin(&self) -> bool {
        *self == Self::ORIGIN
    }

    /// The panel on the other side of `edge`.
    pub fn neighbor(&self, edge: Edge) -> Self {
        let (dx, dy) = edge.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Chessboard distance between two panels.
    pub fn chebyshev_distance(&self, other: &Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for RoomCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for RoomCoordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// One of the four panel edges, in transition priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Grid offset to the neighboring panel.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Edge::Left => (-1, 0),
            Edge::Right => (1, 0),
            Edge::Top => (0, -1),
            Edge::Bottom => (0, 1),
        }
    }
}

/// Float axis-aligned rectangle (origin + size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `2 * half_extent` centered on `(cx, cy)`.
    pub fn centered_square(cx: f32, cy: f32, half_extent: f32) -> Self {
        Self::new(
            cx - half_extent,
            cy - half_extent,
            half_extent * 2.0,
            half_extent * 2.0,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Wall rectangle in integer pixels. Generated once and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Wall {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }

    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.rect().overlaps(rect)
    }

    /// True if the wall lies fully inside `[0, width) x [0, height)`.
    pub fn within_panel(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= width && self.bottom() <= height
    }
}

/// True if `rect` overlaps any of `walls`.
pub fn overlaps_any(rect: &Rect, walls: &[Wall]) -> bool {
    walls.iter().any(|w| w.overlaps(rect))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 4.0, 4.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_neighbor_offsets() {
        let c = RoomCoordinate::new(3, -2);
        assert_eq!(c.neighbor(Edge::Left), RoomCoordinate::new(2, -2));
        assert_eq!(c.neighbor(Edge::Right), RoomCoordinate::new(4, -2));
        assert_eq!(c.neighbor(Edge::Top), RoomCoordinate::new(3, -3));
        assert_eq!(c.neighbor(Edge::Bottom), RoomCoordinate::new(3, -1));
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = RoomCoordinate::new(-2, 5);
        let b = RoomCoordinate::new(1, 4);
        assert_eq!(a.chebyshev_distance(&b), 3);
        assert_eq!(a.chebyshev_distance(&a), 0);
    }

    #[test]
    fn test_wall_within_panel() {
        assert!(Wall::new(0, 0, 8, 100).within_panel(200, 100));
        assert!(!Wall::new(195, 0, 8, 100).within_panel(200, 100));
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(RoomCoordinate::new(-1, 7).to_string(), "(-1, 7)");
    }
}
