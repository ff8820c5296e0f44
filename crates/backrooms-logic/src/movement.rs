//! Pure movement logic — edge transitions and wall collision.
//!
//! Algorithm for one movement step:
//! 1. Compute the candidate position `current + delta`
//! 2. If the candidate is within the edge threshold of a panel side, the
//!    step becomes a transition to the neighboring panel (never blocked)
//! 3. Otherwise test the player's square box at the candidate against
//!    every wall; any overlap rejects the whole step (no sliding)

use crate::config::PanelConfig;
use crate::constants::edges::{EDGE_THRESHOLD, REENTRY_OFFSET};
use crate::geometry::{overlaps_any, Edge, Rect, RoomCoordinate, Wall};

/// A panel boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub edge: Edge,
    /// Player position in the new panel.
    pub x: f32,
    pub y: f32,
}

impl Transition {
    pub fn destination(&self, from: RoomCoordinate) -> RoomCoordinate {
        from.neighbor(self.edge)
    }
}

/// Decide whether the candidate `(nx, ny)` crosses a panel edge.
///
/// Edges are checked left, right, top, bottom; the first match wins. The
/// crossed axis is reset to the re-entry offset from the opposite side and
/// the other axis keeps the player's `current` value.
pub fn detect_transition(
    nx: f32,
    ny: f32,
    current: (f32, f32),
    panel: &PanelConfig,
) -> Option<Transition> {
    let w = panel.width_f();
    let h = panel.height_f();
    let (cx, cy) = current;

    let (edge, x, y) = if nx <= EDGE_THRESHOLD {
        (Edge::Left, w - REENTRY_OFFSET, cy)
    } else if nx >= w - EDGE_THRESHOLD {
        (Edge::Right, REENTRY_OFFSET, cy)
    } else if ny <= EDGE_THRESHOLD {
        (Edge::Top, cx, h - REENTRY_OFFSET)
    } else if ny >= h - EDGE_THRESHOLD {
        (Edge::Bottom, cx, REENTRY_OFFSET)
    } else {
        return None;
    };

    Some(Transition { edge, x, y })
}

/// Collision box of a player centered at `(x, y)`.
pub fn player_box(x: f32, y: f32, radius: f32) -> Rect {
    Rect::centered_square(x, y, radius)
}

/// True if a player box centered at `(x, y)` overlaps no wall.
pub fn can_move(x: f32, y: f32, radius: f32, walls: &[Wall]) -> bool {
    !overlaps_any(&player_box(x, y, radius), walls)
}

/// Result of one movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Crossed into a neighboring panel.
    Transition(Transition),
    /// Moved within the panel to `(x, y)`.
    Moved { x: f32, y: f32 },
    /// A wall is in the way; position unchanged.
    Blocked,
}

/// One movement step from `(px, py)` by `(dx, dy)` inside the panel whose
/// walls are `walls`.
pub fn try_step(
    px: f32,
    py: f32,
    dx: f32,
    dy: f32,
    radius: f32,
    walls: &[Wall],
    panel: &PanelConfig,
) -> StepOutcome {
    let nx = px + dx;
    let ny = py + dy;

    if let Some(transition) = detect_transition(nx, ny, (px, py), panel) {
        return StepOutcome::Transition(transition);
    }

    if can_move(nx, ny, radius, walls) {
        StepOutcome::Moved { x: nx, y: ny }
    } else {
        StepOutcome::Blocked
    }
}
