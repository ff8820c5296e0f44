//! Software rasterizer for engine frames.
//!
//! Paints [`DrawCommand`]s into an RGBA8 buffer the size of one panel. The
//! darkness layer is a per-pixel multiply, which sprites and gizmos cannot
//! express, so the whole panel is drawn here and uploaded as one texture.

use std::ops::Range;

use backrooms_core::render::{DrawCommand, Frame, Rgba};
use backrooms_logic::constants::colors::Rgb;
use backrooms_logic::geometry::Rect;
use backrooms_logic::lighting::IlluminationMask;

pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Raw RGBA8 pixels, rows top to bottom
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x as usize, y as usize);
        Some((self.data[idx], self.data[idx + 1], self.data[idx + 2]))
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * 4
    }

    pub fn draw_frame(&mut self, frame: &Frame) {
        for command in &frame.commands {
            self.draw(command);
        }
    }

    pub fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Fill { color } => {
                let full = Rect::new(0.0, 0.0, self.width as f32, self.height as f32);
                self.fill_rect(&full, *color);
            }
            DrawCommand::FillRect { rect, color } => self.fill_rect(rect, *color),
            DrawCommand::OutlineRect { rect, color, width } => {
                self.outline_rect(rect, *color, *width)
            }
            DrawCommand::Circle {
                x,
                y,
                radius,
                fill,
                outline,
                outline_width,
            } => {
                let (r, g, b) = *fill;
                self.disc(*x, *y, *radius, 0.0, (r, g, b, 255));
                let (r, g, b) = *outline;
                self.disc(*x, *y, *radius, *outline_width, (r, g, b, 255));
            }
            DrawCommand::Ring {
                x,
                y,
                radius,
                color,
                width,
            } => self.disc(*x, *y, *radius, *width, *color),
            DrawCommand::Darkness(mask) => self.multiply(mask),
        }
    }

    fn span(lo: f32, hi: f32, max: u32) -> Range<usize> {
        let start = (lo.max(0.0) as usize).min(max as usize);
        let end = (hi.max(0.0) as usize).min(max as usize);
        start..end
    }

    fn fill_rect(&mut self, rect: &Rect, (r, g, b): Rgb) {
        let xs = Self::span(rect.x, rect.right(), self.width);
        let ys = Self::span(rect.y, rect.bottom(), self.height);
        for y in ys {
            for x in xs.clone() {
                let idx = self.index(x, y);
                self.data[idx..idx + 4].copy_from_slice(&[r, g, b, 255]);
            }
        }
    }

    fn outline_rect(&mut self, rect: &Rect, color: Rgb, width: f32) {
        let w = width.min(rect.width / 2.0).min(rect.height / 2.0);
        let edges = [
            Rect::new(rect.x, rect.y, rect.width, w),
            Rect::new(rect.x, rect.bottom() - w, rect.width, w),
            Rect::new(rect.x, rect.y, w, rect.height),
            Rect::new(rect.right() - w, rect.y, w, rect.height),
        ];
        for edge in &edges {
            self.fill_rect(edge, color);
        }
    }

    /// Filled disc when `width` is 0, otherwise a ring `width` pixels thick
    /// just inside `radius`. Blends by the color's alpha.
    fn disc(&mut self, cx: f32, cy: f32, radius: f32, width: f32, (r, g, b, a): Rgba) {
        if radius <= 0.0 || a == 0 {
            return;
        }
        let outer = radius * radius;
        let inner = if width > 0.0 {
            (radius - width).max(0.0).powi(2)
        } else {
            -1.0
        };

        let xs = Self::span(cx - radius, cx + radius + 1.0, self.width);
        let ys = Self::span(cy - radius, cy + radius + 1.0, self.height);
        for y in ys {
            let dy = y as f32 + 0.5 - cy;
            for x in xs.clone() {
                let dx = x as f32 + 0.5 - cx;
                let d = dx * dx + dy * dy;
                if d > outer || d <= inner {
                    continue;
                }
                let idx = self.index(x, y);
                let alpha = a as u32;
                for (i, src) in [r, g, b].into_iter().enumerate() {
                    let dst = self.data[idx + i] as u32;
                    self.data[idx + i] = ((src as u32 * alpha + dst * (255 - alpha)) / 255) as u8;
                }
            }
        }
    }

    /// Multiply every pixel by its mask cell's overlay color.
    fn multiply(&mut self, mask: &IlluminationMask) {
        let mut overlay = Vec::with_capacity(mask.cols * mask.rows);
        for row in 0..mask.rows {
            for col in 0..mask.cols {
                overlay.push(mask.overlay_rgb(col, row));
            }
        }

        for y in 0..self.height as usize {
            let row = ((y as f32 / mask.cell) as usize).min(mask.rows.saturating_sub(1));
            for x in 0..self.width as usize {
                let col = ((x as f32 / mask.cell) as usize).min(mask.cols.saturating_sub(1));
                let Some(&(mr, mg, mb)) = overlay.get(row * mask.cols + col) else {
                    continue;
                };
                let idx = self.index(x, y);
                for (i, m) in [mr, mg, mb].into_iter().enumerate() {
                    self.data[idx + i] = (self.data[idx + i] as u32 * m as u32 / 255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backrooms_logic::config::PanelConfig;

    #[test]
    fn test_fill_rect_clips_to_canvas() {
        let mut canvas = Canvas::new(20, 10);
        canvas.draw(&DrawCommand::FillRect {
            rect: Rect::new(15.0, -5.0, 40.0, 8.0),
            color: (9, 8, 7),
        });
        assert_eq!(canvas.pixel(15, 0), Some((9, 8, 7)));
        assert_eq!(canvas.pixel(19, 2), Some((9, 8, 7)));
        assert_eq!(canvas.pixel(14, 0), Some((0, 0, 0)));
        assert_eq!(canvas.pixel(15, 3), Some((0, 0, 0)));
        assert_eq!(canvas.pixel(20, 0), None);
    }

    #[test]
    fn test_outline_leaves_center() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw(&DrawCommand::OutlineRect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            color: (200, 190, 140),
            width: 1.0,
        });
        assert_eq!(canvas.pixel(0, 5), Some((200, 190, 140)));
        assert_eq!(canvas.pixel(9, 9), Some((200, 190, 140)));
        assert_eq!(canvas.pixel(5, 5), Some((0, 0, 0)));
    }

    #[test]
    fn test_player_circle_has_outline() {
        let mut canvas = Canvas::new(40, 40);
        canvas.draw(&DrawCommand::Circle {
            x: 20.0,
            y: 20.0,
            radius: 8.0,
            fill: (200, 100, 100),
            outline: (255, 255, 255),
            outline_width: 2.0,
        });
        assert_eq!(canvas.pixel(20, 20), Some((200, 100, 100)));
        assert_eq!(canvas.pixel(27, 20), Some((255, 255, 255)));
        assert_eq!(canvas.pixel(29, 20), Some((0, 0, 0)));
    }

    #[test]
    fn test_ring_blends_alpha() {
        let mut canvas = Canvas::new(40, 40);
        canvas.draw(&DrawCommand::Ring {
            x: 20.0,
            y: 20.0,
            radius: 10.0,
            color: (254, 0, 0, 128),
            width: 2.0,
        });
        let (r, _, _) = canvas.pixel(29, 20).unwrap();
        assert_eq!(r, 127);
        assert_eq!(canvas.pixel(20, 20), Some((0, 0, 0)));
    }

    #[test]
    fn test_darkness_multiplies() {
        let panel = PanelConfig {
            width: 16,
            height: 16,
            world_seed: 0,
        };
        let mut canvas = Canvas::new(16, 16);
        canvas.draw(&DrawCommand::Fill {
            color: (255, 255, 255),
        });
        let mask = IlluminationMask::new(&panel, 8.0, 0.3);
        let expected = mask.overlay_rgb(0, 0);
        canvas.draw(&DrawCommand::Darkness(mask));
        assert_eq!(canvas.pixel(0, 0), Some(expected));
        assert_eq!(canvas.pixel(15, 15), Some(expected));
    }
}
