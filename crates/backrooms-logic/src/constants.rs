//! World constants — generation geometry, edge thresholds, palette.
//!
//! Plain `const` values with no runtime dependency. Generation constants are
//! not configurable: changing any of them changes every room.

/// Room generation geometry (pixels).
pub mod generation {
    pub const WALL_THICKNESS: i32 = 8;
    pub const DOOR_WIDTH: i32 = 80;

    /// Inclusive range for the number of interior features in a non-start room.
    pub const FEATURE_COUNT_MIN: u32 = 2;
    pub const FEATURE_COUNT_MAX: u32 = 5;

    /// Chance that an interior feature is a pillar rather than a wall segment.
    pub const PILLAR_PROBABILITY: f64 = 0.7;
    /// Chance that a wall segment is horizontal.
    pub const HORIZONTAL_PROBABILITY: f64 = 0.5;

    pub const PILLAR_SIZE_MIN: i32 = 20;
    pub const PILLAR_SIZE_MAX: i32 = 40;
    pub const PILLAR_MARGIN: i32 = 50;

    pub const SEGMENT_LENGTH_MIN: i32 = 60;
    pub const SEGMENT_LENGTH_MAX: i32 = 150;
    /// Margin along the segment's long axis.
    pub const SEGMENT_MARGIN_ALONG: i32 = 40;
    /// Margin across the segment's thin axis.
    pub const SEGMENT_MARGIN_ACROSS: i32 = 80;

    /// Number of border segments every room starts with.
    pub const BORDER_SEGMENTS: usize = 8;
}

/// Panel edge handling (pixels).
pub mod edges {
    /// Candidate positions within this distance of an edge trigger a transition.
    pub const EDGE_THRESHOLD: f32 = 10.0;
    /// Distance from the opposite edge at which the player re-enters.
    pub const REENTRY_OFFSET: f32 = 50.0;
}

/// Simulation timing.
pub mod timing {
    /// Fixed timestep: one tick is one rendered frame.
    pub const TICK_SECONDS: f32 = 1.0 / 60.0;
    /// How long a save/load status message stays on screen.
    pub const STATUS_MESSAGE_SECONDS: f32 = 3.0;
    /// Frames during which the navigation hint is shown.
    pub const HINT_FRAMES: u64 = 300;
}

/// RGB palette. Components are 0-255.
pub mod colors {
    pub type Rgb = (u8, u8, u8);

    pub const BACKGROUND: Rgb = (40, 35, 20);
    pub const WALL: Rgb = (180, 170, 120);
    pub const FLASHLIGHT: Rgb = (255, 240, 180);
    pub const SHADOW: Rgb = (20, 18, 10);
    pub const CARPET: Rgb = (60, 45, 25);
    pub const CEILING: Rgb = (200, 190, 140);
    pub const PLAYER: Rgb = (200, 100, 100);
    pub const PLAYER_MOVING: Rgb = (220, 120, 120);
    pub const PLAYER_OUTLINE: Rgb = (255, 255, 255);
    pub const RIPPLE: Rgb = (100, 80, 40);
    pub const HUD_TEXT: Rgb = (200, 200, 150);
    pub const STATUS_TEXT: Rgb = (100, 255, 100);
    pub const HINT_TEXT: Rgb = (255, 255, 100);
}

/// Floor carpet pattern.
pub mod carpet {
    pub const TILE_SIZE: i32 = 40;
}

/// Cosmetic wall tint jitter, inclusive on both ends.
pub const WALL_SHADE_JITTER: i32 = 8;
