//! Graphics rendering functions
//!
//! Outlines used to annotate match results:
//! - Lines (Bresenham)
//! - Box outlines of a given thickness
//! - Cross markers

use super::{PixMut, PixelDepth};
use crate::box_::Box;
use crate::error::Result;
use crate::pta::Pta;

/// RGB color for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a new color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    /// White color
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };
    /// Red color
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };
    /// Green color
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };

    /// Convert to grayscale value (0-255)
    pub fn to_gray(&self) -> u8 {
        crate::color::luminance(self.r, self.g, self.b)
    }

    /// Compose as 32-bit RGBA pixel
    pub fn to_pixel32(&self) -> u32 {
        crate::color::compose_rgb(self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::RED
    }
}

/// Generate a point array for a line using integer Bresenham.
///
/// The line connects `(x1, y1)` to `(x2, y2)` with 8-connectivity,
/// both endpoints included.
pub fn generate_line_pta(x1: i32, y1: i32, x2: i32, y2: i32) -> Pta {
    let dx = (x2 - x1).abs();
    let dy = -(y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };

    let mut pta = Pta::with_capacity((dx.max(-dy) + 1) as usize);
    let (mut x, mut y) = (x1, y1);
    let mut err = dx + dy;
    loop {
        pta.push(x as f32, y as f32);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    pta
}

/// Generate a point array for a box outline.
///
/// Thickness grows inward: ring `i` is the outline of the box shrunk by
/// `i` on every side.
pub fn generate_box_pta(b: &Box, width: u32) -> Pta {
    let mut pta = Pta::new();
    for i in 0..width.max(1) as i32 {
        let (x0, y0) = (b.x + i, b.y + i);
        let (x1, y1) = (b.right() - 1 - i, b.bottom() - 1 - i);
        if x0 > x1 || y0 > y1 {
            break;
        }
        for (ax, ay, bx, by) in [
            (x0, y0, x1, y0),
            (x1, y0, x1, y1),
            (x1, y1, x0, y1),
            (x0, y1, x0, y0),
        ] {
            pta.extend(&generate_line_pta(ax, ay, bx, by));
        }
    }
    pta
}

impl PixMut {
    fn color_value(&self, color: Color) -> u32 {
        match self.depth() {
            PixelDepth::Bit1 => 1,
            PixelDepth::Bit8 => color.to_gray() as u32,
            PixelDepth::Bit32 => color.to_pixel32(),
        }
    }

    /// Render a point array with a specific RGB color.
    ///
    /// For non-32bpp images, the color is converted to grayscale.
    /// Points outside the image bounds are clipped.
    pub fn render_pta_color(&mut self, pta: &Pta, color: Color) -> Result<()> {
        let (w, h) = (self.width() as i32, self.height() as i32);
        let val = self.color_value(color);
        for (x, y) in pta.iter() {
            let (xi, yi) = (x.round() as i32, y.round() as i32);
            if xi < 0 || xi >= w || yi < 0 || yi >= h {
                continue;
            }
            self.set_pixel_unchecked(xi as u32, yi as u32, val);
        }
        Ok(())
    }

    /// Render a line with a specific color.
    pub fn render_line_color(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> Result<()> {
        self.render_pta_color(&generate_line_pta(x1, y1, x2, y2), color)
    }

    /// Render a box outline with a specific color.
    pub fn render_box_color(&mut self, b: &Box, width: u32, color: Color) -> Result<()> {
        self.render_pta_color(&generate_box_pta(b, width), color)
    }

    /// Render a `+` marker of half-length `arm` centered at (cx, cy).
    pub fn render_cross_color(&mut self, cx: i32, cy: i32, arm: i32, color: Color) -> Result<()> {
        self.render_line_color(cx - arm, cy, cx + arm, cy, color)?;
        self.render_line_color(cx, cy - arm, cx, cy + arm, color)
    }
}
