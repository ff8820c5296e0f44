//! Flashlight lighting — a cone of discrete rays cast from the player.
//!
//! Each ray walks outward in fixed steps. A sample outside the panel or
//! whose probe square touches a wall ends the ray, which gives hard-edged
//! shadows. Surviving samples are painted into an [`IlluminationMask`],
//! a coarse brightness grid that the renderer multiplies over the frame.
//!
//! Rays share nothing but the mask, and painting takes the per-cell
//! maximum, so ray order does not change the result.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{LightingConfig, PanelConfig};
use crate::constants::colors::{Rgb, FLASHLIGHT, SHADOW};
use crate::geometry::{overlaps_any, Rect, Wall};

/// One illuminated point along a ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSample {
    pub x: f32,
    pub y: f32,
    pub distance: f32,
    /// `1 - distance / max_radius`, in `(0, 1]`.
    pub intensity: f32,
    /// Radius of the light spot painted at this sample (whole pixels).
    pub radius: f32,
}

impl LightSample {
    pub fn color(&self) -> Rgb {
        scale(FLASHLIGHT, self.intensity)
    }
}

fn scale(rgb: Rgb, factor: f32) -> Rgb {
    let f = factor.clamp(0.0, 1.0);
    (
        (rgb.0 as f32 * f) as u8,
        (rgb.1 as f32 * f) as u8,
        (rgb.2 as f32 * f) as u8,
    )
}

/// Angle from `origin` toward `target`, in radians.
pub fn aim_angle(origin: (f32, f32), target: (f32, f32)) -> f32 {
    (target.1 - origin.1).atan2(target.0 - origin.0)
}

/// Angles of every ray in the cone, symmetric about `aim`.
pub fn ray_angles(aim: f32, config: &LightingConfig) -> Vec<f32> {
    let n = config.ray_count;
    let center = n.saturating_sub(1) as f32 / 2.0;
    (0..n)
        .map(|i| aim + (i as f32 - center) * config.cone_angle / n as f32)
        .collect()
}

/// Walk a single ray and return its illuminated samples, nearest first.
pub fn cast_ray(
    origin: (f32, f32),
    angle: f32,
    walls: &[Wall],
    config: &LightingConfig,
    panel: &PanelConfig,
) -> Vec<LightSample> {
    let (cos, sin) = (angle.cos(), angle.sin());
    let half_probe = config.probe_size / 2.0;
    let mut samples = Vec::new();

    let mut k = 0u32;
    loop {
        let distance = config.min_offset + k as f32 * config.step;
        if distance >= config.max_radius {
            break;
        }
        k += 1;

        let x = origin.0 + cos * distance;
        let y = origin.1 + sin * distance;
        if !panel.contains(x, y) {
            break;
        }

        let probe = Rect::centered_square(x, y, half_probe);
        if overlaps_any(&probe, walls) {
            break;
        }

        let intensity = (1.0 - distance / config.max_radius).max(0.0);
        let radius = (config.spot_radius * intensity).trunc();
        if radius > 0.0 {
            samples.push(LightSample {
                x,
                y,
                distance,
                intensity,
                radius,
            });
        }
    }

    samples
}

/// Cast the full cone from `origin` toward `target` and paint it over an
/// ambient `floor`.
pub fn cast_cone(
    origin: (f32, f32),
    target: (f32, f32),
    walls: &[Wall],
    floor: f32,
    config: &LightingConfig,
    panel: &PanelConfig,
) -> IlluminationMask {
    let mut mask = IlluminationMask::new(panel, config.mask_cell, floor);
    let aim = aim_angle(origin, target);
    for angle in ray_angles(aim, config) {
        for sample in cast_ray(origin, angle, walls, config, panel) {
            mask.paint(sample);
        }
    }
    mask
}

/// Per-frame brightness grid covering one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlluminationMask {
    pub cols: usize,
    pub rows: usize,
    pub cell: f32,
    /// Ambient brightness applied everywhere, in `[0, 1]`.
    pub floor: f32,
    /// Flashlight brightness per cell, row-major. Zero where unlit.
    cells: Vec<f32>,
    samples: Vec<LightSample>,
}

impl IlluminationMask {
    pub fn new(panel: &PanelConfig, cell: f32, floor: f32) -> Self {
        let cols = (panel.width_f() / cell).ceil() as usize;
        let rows = (panel.height_f() / cell).ceil() as usize;
        Self {
            cols,
            rows,
            cell,
            floor: floor.clamp(0.0, 1.0),
            cells: vec![0.0; cols * rows],
            samples: Vec::new(),
        }
    }

    /// Every sample painted so far, in paint order.
    pub fn samples(&self) -> &[LightSample] {
        &self.samples
    }

    /// Brighten every cell the sample's spot touches, including the cell
    /// that holds the sample itself. Cells already brighter keep their value.
    pub fn paint(&mut self, sample: LightSample) {
        let r = sample.radius;
        let min_col = ((sample.x - r) / self.cell).floor().max(0.0) as usize;
        let min_row = ((sample.y - r) / self.cell).floor().max(0.0) as usize;
        let max_col =
            (((sample.x + r) / self.cell).floor() as usize).min(self.cols.saturating_sub(1));
        let max_row =
            (((sample.y + r) / self.cell).floor() as usize).min(self.rows.saturating_sub(1));

        for row in min_row..=max_row {
            let top = row as f32 * self.cell;
            let dy = sample.y.clamp(top, top + self.cell) - sample.y;
            for col in min_col..=max_col {
                // Distance to the nearest point of the cell
                let left = col as f32 * self.cell;
                let dx = sample.x.clamp(left, left + self.cell) - sample.x;
                if dx * dx + dy * dy <= r * r {
                    let slot = &mut self.cells[row * self.cols + col];
                    *slot = slot.max(sample.intensity);
                }
            }
        }
        self.samples.push(sample);
    }

    /// Flashlight brightness of one cell, ignoring the ambient floor.
    pub fn light_at_cell(&self, col: usize, row: usize) -> f32 {
        if col >= self.cols || row >= self.rows {
            return 0.0;
        }
        self.cells[row * self.cols + col]
    }

    /// Logical light level at a panel position: the flashlight value of its
    /// cell, or the ambient floor where that is higher. This is not the
    /// composited color; see [`IlluminationMask::overlay_rgb`] for that.
    pub fn brightness_at(&self, x: f32, y: f32) -> f32 {
        if x < 0.0 || y < 0.0 {
            return self.floor;
        }
        let col = (x / self.cell) as usize;
        let row = (y / self.cell) as usize;
        self.light_at_cell(col, row).max(self.floor)
    }

    /// Multiplicative overlay color for one cell: the shadow tint lifted by
    /// the ambient floor (`SHADOW * (1 + floor)`), or the flashlight color
    /// scaled by the cell's light where that is brighter.
    pub fn overlay_rgb(&self, col: usize, row: usize) -> Rgb {
        let light = scale(FLASHLIGHT, self.light_at_cell(col, row));
        let lift = 1.0 + self.floor;
        let ambient = (
            (SHADOW.0 as f32 * lift).round().min(255.0) as u8,
            (SHADOW.1 as f32 * lift).round().min(255.0) as u8,
            (SHADOW.2 as f32 * lift).round().min(255.0) as u8,
        );
        (
            light.0.max(ambient.0),
            light.1.max(ambient.1),
            light.2.max(ambient.2),
        )
    }

    pub fn lit_cell_count(&self) -> usize {
        self.cells.iter().filter(|v| **v > 0.0).count()
    }
}

/// Fluorescent flicker: a clamped random walk in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Flicker {
    pub value: f32,
}

impl Flicker {
    /// Advance one frame. Drifts slightly upward before clamping.
    pub fn step(&mut self, rng: &mut impl Rng) -> f32 {
        self.value += rng.gen_range(-0.1..=0.1f32);
        self.value = (self.value + 0.02).clamp(0.0, 1.0);
        self.value
    }

    /// Ambient floor for this frame.
    pub fn floor(&self, config: &LightingConfig) -> f32 {
        (config.ambient + self.value * config.flicker_gain).clamp(0.0, 1.0)
    }
}
