//! Render surface — drawable primitives for one frame.
//!
//! The engine never touches a framebuffer. It emits a [`Frame`]: an ordered
//! list of [`DrawCommand`]s (painted back to front) plus HUD strings, and a
//! front end draws them however it likes.

use backrooms_logic::config::PanelConfig;
use backrooms_logic::constants::carpet::TILE_SIZE;
use backrooms_logic::constants::colors::{self, Rgb};
use backrooms_logic::footsteps::FootstepRipple;
use backrooms_logic::geometry::{Rect, RoomCoordinate};
use backrooms_logic::lighting::IlluminationMask;

pub type Rgba = (u8, u8, u8, u8);

pub const HINT: &str = "Walk to screen edges to enter new rooms | F5: Save | F9: Load";

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole panel.
    Fill { color: Rgb },
    FillRect { rect: Rect, color: Rgb },
    OutlineRect { rect: Rect, color: Rgb, width: f32 },
    /// Filled circle with an outline.
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        fill: Rgb,
        outline: Rgb,
        outline_width: f32,
    },
    /// Unfilled translucent ring.
    Ring {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgba,
        width: f32,
    },
    /// Multiply the frame by the mask's overlay colors.
    Darkness(IlluminationMask),
}

/// Text lines for the heads-up display. Layout is up to the front end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hud {
    pub room: String,
    pub visited: String,
    pub status: Option<String>,
    pub hint: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
    pub hud: Hud,
}

/// Checkerboard of carpet tiles. The pattern shifts with the room so
/// neighboring panels don't look identical.
pub fn carpet_tiles(room: RoomCoordinate, panel: &PanelConfig) -> Vec<DrawCommand> {
    let mut tiles = Vec::new();
    for tx in 0..(panel.width + TILE_SIZE - 1) / TILE_SIZE {
        for ty in 0..(panel.height + TILE_SIZE - 1) / TILE_SIZE {
            if (tx + ty + room.x + room.y).rem_euclid(2) == 1 {
                tiles.push(DrawCommand::FillRect {
                    rect: Rect::new(
                        (tx * TILE_SIZE) as f32,
                        (ty * TILE_SIZE) as f32,
                        TILE_SIZE as f32,
                        TILE_SIZE as f32,
                    ),
                    color: colors::CARPET,
                });
            }
        }
    }
    tiles
}

/// Ring for a live ripple, or `None` once it has faded out.
pub fn ripple_ring(ripple: &FootstepRipple) -> Option<DrawCommand> {
    let alpha = ripple.alpha();
    if alpha == 0 {
        return None;
    }
    let (r, g, b) = colors::RIPPLE;
    Some(DrawCommand::Ring {
        x: ripple.x,
        y: ripple.y,
        radius: ripple.radius(),
        color: (r, g, b, alpha),
        width: 2.0,
    })
}

/// Base wall color shifted by `shade` on every channel.
pub fn wall_color(shade: i32) -> Rgb {
    let shift = |c: u8| (c as i32 + shade).clamp(0, 255) as u8;
    let (r, g, b) = colors::WALL;
    (shift(r), shift(g), shift(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backrooms_logic::config::FootstepConfig;

    #[test]
    fn test_carpet_alternates_with_room() {
        let panel = PanelConfig::default();
        let a = carpet_tiles(RoomCoordinate::new(0, 0), &panel);
        let b = carpet_tiles(RoomCoordinate::new(1, 0), &panel);
        let first = |tiles: &[DrawCommand]| match &tiles[0] {
            DrawCommand::FillRect { rect, .. } => (rect.x, rect.y),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(first(&a), (0.0, 40.0));
        assert_eq!(first(&b), (0.0, 0.0));
        // 48 x 27 tiles, half of them carpeted
        assert_eq!(a.len() + b.len(), 48 * 27);
    }

    #[test]
    fn test_carpet_negative_rooms() {
        let panel = PanelConfig::default();
        let a = carpet_tiles(RoomCoordinate::new(-1, 0), &panel);
        let b = carpet_tiles(RoomCoordinate::new(1, 0), &panel);
        assert_eq!(a, b);
    }

    #[test]
    fn test_wall_color_clamps() {
        assert_eq!(wall_color(0), colors::WALL);
        assert_eq!(wall_color(-8), (172, 162, 112));
        assert_eq!(wall_color(300), (255, 255, 255));
    }

    #[test]
    fn test_faded_ripple_not_drawn() {
        let mut ripple = FootstepRipple::new(5.0, 5.0, &FootstepConfig::default());
        assert!(ripple_ring(&ripple).is_some());
        ripple.age = 64;
        assert!(ripple_ring(&ripple).is_none());
    }
}
