//! Room generation — deterministic wall layout for one panel.
//!
//! Each call seeds its own `Xoshiro256PlusPlus` from the room coordinate, so
//! the result never depends on call order or on random draws made anywhere
//! else. Rooms for the same `(coordinate, start flag, panel config)` are
//! identical across calls and processes.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::config::PanelConfig;
use crate::constants::generation::*;
use crate::geometry::{RoomCoordinate, Wall};

/// Walls of one panel. Border segments come first, interior features after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub coordinate: RoomCoordinate,
    pub is_start: bool,
    pub walls: Vec<Wall>,
}

impl Room {
    /// The eight door-split border segments.
    pub fn border_walls(&self) -> &[Wall] {
        &self.walls[..BORDER_SEGMENTS.min(self.walls.len())]
    }

    /// Pillars and short wall segments.
    pub fn interior_walls(&self) -> &[Wall] {
        &self.walls[BORDER_SEGMENTS.min(self.walls.len())..]
    }
}

/// Seed for a room's private random stream, reduced to the 32-bit range.
///
/// SplitMix64 finalizer over the packed coordinate pair.
pub fn room_seed(coord: RoomCoordinate, world_seed: u64) -> u64 {
    let packed = ((coord.x as u32 as u64) << 32) | (coord.y as u32 as u64);
    let mut z = packed ^ world_seed.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    z & 0xFFFF_FFFF
}

/// Start offset of the door gap centered on a side of length `side`.
pub fn door_offset(side: i32) -> i32 {
    side / 2 - DOOR_WIDTH / 2
}

/// Generate the room for `coord`.
pub fn generate_room(coord: RoomCoordinate, is_start: bool, panel: &PanelConfig) -> Room {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(room_seed(coord, panel.world_seed));
    let mut walls = border_walls(panel.width, panel.height);

    if !is_start {
        let count = rng.gen_range(FEATURE_COUNT_MIN..=FEATURE_COUNT_MAX);
        for _ in 0..count {
            walls.push(interior_feature(&mut rng, panel.width, panel.height));
        }
    }

    Room {
        coordinate: coord,
        is_start,
        walls,
    }
}

/// Four sides, each split in two around a centered door gap.
fn border_walls(width: i32, height: i32) -> Vec<Wall> {
    let t = WALL_THICKNESS;
    let door_x = door_offset(width);
    let door_y = door_offset(height);
    let after_x = door_x + DOOR_WIDTH;
    let after_y = door_y + DOOR_WIDTH;

    vec![
        // Top
        Wall::new(0, 0, door_x, t),
        Wall::new(after_x, 0, width - after_x, t),
        // Bottom
        Wall::new(0, height - t, door_x, t),
        Wall::new(after_x, height - t, width - after_x, t),
        // Left
        Wall::new(0, 0, t, door_y),
        Wall::new(0, after_y, t, height - after_y),
        // Right
        Wall::new(width - t, 0, t, door_y),
        Wall::new(width - t, after_y, t, height - after_y),
    ]
}

/// One pillar or short wall segment, placed inside the panel margins.
/// Features may overlap each other.
fn interior_feature(rng: &mut impl Rng, width: i32, height: i32) -> Wall {
    if rng.gen::<f64>() < PILLAR_PROBABILITY {
        let size = rng.gen_range(PILLAR_SIZE_MIN..=PILLAR_SIZE_MAX);
        let x = rng.gen_range(PILLAR_MARGIN..=width - PILLAR_MARGIN - size);
        let y = rng.gen_range(PILLAR_MARGIN..=height - PILLAR_MARGIN - size);
        return Wall::new(x, y, size, size);
    }

    let length = rng.gen_range(SEGMENT_LENGTH_MIN..=SEGMENT_LENGTH_MAX);
    if rng.gen::<f64>() < HORIZONTAL_PROBABILITY {
        let x = rng.gen_range(SEGMENT_MARGIN_ALONG..=width - SEGMENT_MARGIN_ALONG - length);
        let y = rng.gen_range(SEGMENT_MARGIN_ACROSS..=height - SEGMENT_MARGIN_ACROSS);
        Wall::new(x, y, length, WALL_THICKNESS)
    } else {
        let x = rng.gen_range(SEGMENT_MARGIN_ACROSS..=width - SEGMENT_MARGIN_ACROSS);
        let y = rng.gen_range(SEGMENT_MARGIN_ALONG..=height - SEGMENT_MARGIN_ALONG - length);
        Wall::new(x, y, WALL_THICKNESS, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> PanelConfig {
        PanelConfig::default()
    }

    #[test]
    fn test_seed_is_stable() {
        let c = RoomCoordinate::new(12, -7);
        assert_eq!(room_seed(c, 0), room_seed(c, 0));
        assert!(room_seed(c, 0) <= u32::MAX as u64);
    }

    #[test]
    fn test_seed_distinguishes_neighbors() {
        let a = room_seed(RoomCoordinate::new(1, 0), 0);
        let b = room_seed(RoomCoordinate::new(0, 1), 0);
        let c = room_seed(RoomCoordinate::new(-1, 0), 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_world_seed_changes_rooms() {
        let coord = RoomCoordinate::new(4, 4);
        assert_ne!(room_seed(coord, 0), room_seed(coord, 99));
    }

    #[test]
    fn test_border_segments_cover_sides() {
        let p = panel();
        let walls = border_walls(p.width, p.height);
        assert_eq!(walls.len(), BORDER_SEGMENTS);
        // Top: both halves plus the door span the full width
        assert_eq!(walls[0].width + DOOR_WIDTH + walls[1].width, p.width);
        // Left: both halves plus the door span the full height
        assert_eq!(walls[4].height + DOOR_WIDTH + walls[5].height, p.height);
    }

    #[test]
    fn test_interior_features_respect_margins() {
        let p = panel();
        for x in -10..10 {
            for y in -10..10 {
                let room = generate_room(RoomCoordinate::new(x, y), false, &p);
                for wall in room.interior_walls() {
                    assert!(wall.x >= SEGMENT_MARGIN_ALONG, "{:?}", wall);
                    assert!(wall.y >= SEGMENT_MARGIN_ALONG, "{:?}", wall);
                    assert!(wall.right() <= p.width - SEGMENT_MARGIN_ALONG + WALL_THICKNESS);
                    assert!(wall.bottom() <= p.height - SEGMENT_MARGIN_ALONG + WALL_THICKNESS);
                    assert!(wall.within_panel(p.width, p.height));
                }
            }
        }
    }

    #[test]
    fn test_feature_count_in_range() {
        let p = panel();
        for x in 0..50 {
            let room = generate_room(RoomCoordinate::new(x, 3), false, &p);
            let n = room.interior_walls().len() as u32;
            assert!((FEATURE_COUNT_MIN..=FEATURE_COUNT_MAX).contains(&n));
        }
    }

    #[test]
    fn test_interior_sizes_in_range() {
        let p = panel();
        for y in 0..50 {
            let room = generate_room(RoomCoordinate::new(-2, y), false, &p);
            for wall in room.interior_walls() {
                let is_pillar = wall.width == wall.height
                    && (PILLAR_SIZE_MIN..=PILLAR_SIZE_MAX).contains(&wall.width);
                let is_horizontal = wall.height == WALL_THICKNESS
                    && (SEGMENT_LENGTH_MIN..=SEGMENT_LENGTH_MAX).contains(&wall.width);
                let is_vertical = wall.width == WALL_THICKNESS
                    && (SEGMENT_LENGTH_MIN..=SEGMENT_LENGTH_MAX).contains(&wall.height);
                assert!(is_pillar || is_horizontal || is_vertical, "{:?}", wall);
            }
        }
    }
}
