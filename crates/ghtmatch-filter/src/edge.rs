//! Gradient and edge detection
//!
//! - [`sobel_gradients`] - 3x3 Sobel derivatives with replicated borders
//! - [`gradient_magnitude`] / [`gradient_direction`] - per-pixel polar form
//! - [`canny`] - Canny edge detector producing a 1 bpp mask
//!
//! Direction is `atan2(gy, gx)` in image coordinates (y grows downward), so
//! it points from dark toward bright.

use crate::{FilterError, FilterResult, check_grayscale};
use ghtmatch_core::{Error as CoreError, FPix, Pix, PixMut, PixelDepth};

/// tan(22.5°), the boundary between axis-aligned and diagonal sectors
const TAN_22_5_DEG: f32 = 0.414_213_56;

/// Norm used to combine the two derivatives into a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientNorm {
    /// `|gx| + |gy|`
    #[default]
    L1,
    /// `sqrt(gx² + gy²)`
    L2,
}

/// Compute horizontal and vertical Sobel derivatives.
///
/// Returns `(gx, gy)`.
pub fn sobel_gradients(pix: &Pix) -> FilterResult<(FPix, FPix)> {
    check_grayscale(pix)?;
    let (w, h) = pix.dimensions();
    let mut gx = FPix::new(w, h)?;
    let mut gy = FPix::new(w, h)?;

    let at = |x: i32, y: i32| -> f32 {
        let sx = x.clamp(0, w as i32 - 1) as u32;
        let sy = y.clamp(0, h as i32 - 1) as u32;
        pix.get_pixel_unchecked(sx, sy) as f32
    };

    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let dx = (at(x + 1, y - 1) + 2.0 * at(x + 1, y) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2.0 * at(x - 1, y) + at(x - 1, y + 1));
            let dy = (at(x - 1, y + 1) + 2.0 * at(x, y + 1) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2.0 * at(x, y - 1) + at(x + 1, y - 1));
            gx.set_pixel_unchecked(x as u32, y as u32, dx);
            gy.set_pixel_unchecked(x as u32, y as u32, dy);
        }
    }

    Ok((gx, gy))
}

fn check_same_size(gx: &FPix, gy: &FPix) -> FilterResult<()> {
    if gx.dimensions() != gy.dimensions() {
        return Err(CoreError::DimensionMismatch {
            expected: gx.dimensions(),
            actual: gy.dimensions(),
        }
        .into());
    }
    Ok(())
}

/// Combine derivatives into a magnitude field.
pub fn gradient_magnitude(gx: &FPix, gy: &FPix, norm: GradientNorm) -> FilterResult<FPix> {
    check_same_size(gx, gy)?;
    let data = gx
        .data()
        .iter()
        .zip(gy.data())
        .map(|(&dx, &dy)| match norm {
            GradientNorm::L1 => dx.abs() + dy.abs(),
            GradientNorm::L2 => dx.hypot(dy),
        })
        .collect();
    Ok(FPix::from_data(gx.width(), gx.height(), data)?)
}

/// Per-pixel gradient direction `atan2(gy, gx)` in `(-π, π]`.
///
/// A zero gradient yields `0.0`.
pub fn gradient_direction(gx: &FPix, gy: &FPix) -> FilterResult<FPix> {
    check_same_size(gx, gy)?;
    let data = gx
        .data()
        .iter()
        .zip(gy.data())
        .map(|(&dx, &dy)| dy.atan2(dx))
        .collect();
    Ok(FPix::from_data(gx.width(), gx.height(), data)?)
}

/// Canny edge detection with the L1 gradient norm.
///
/// See [`canny_with_norm`].
pub fn canny(pix: &Pix, threshold1: f32, threshold2: f32) -> FilterResult<Pix> {
    canny_with_norm(pix, threshold1, threshold2, GradientNorm::L1)
}

/// Canny edge detection.
///
/// The smaller threshold links edges, the larger one seeds them; their
/// order does not matter. Pipeline:
///
/// 1. Sobel derivatives and magnitude under `norm`
/// 2. Non-maximum suppression along the gradient quantized to 4 sectors
/// 3. Hysteresis: pixels above the high threshold seed edges that grow
///    through 8-connected suppressed-survivors above the low threshold
///
/// Returns a 1 bpp mask with 1 on edges.
///
/// # Errors
///
/// Fails on non-8 bpp input or negative / non-finite thresholds.
pub fn canny_with_norm(
    pix: &Pix,
    threshold1: f32,
    threshold2: f32,
    norm: GradientNorm,
) -> FilterResult<Pix> {
    for t in [threshold1, threshold2] {
        if !t.is_finite() || t < 0.0 {
            return Err(FilterError::InvalidParameters(format!(
                "Canny threshold must be finite and non-negative, got {}",
                t
            )));
        }
    }
    let (low, high) = if threshold1 <= threshold2 {
        (threshold1, threshold2)
    } else {
        (threshold2, threshold1)
    };

    let (gx, gy) = sobel_gradients(pix)?;
    let mag = gradient_magnitude(&gx, &gy, norm)?;
    let (w, h) = (pix.width() as i64, pix.height() as i64);
    let m = |x: i64, y: i64| -> f32 {
        if x < 0 || y < 0 || x >= w || y >= h {
            0.0
        } else {
            mag.get_pixel_unchecked(x as u32, y as u32)
        }
    };

    const NONE: u8 = 0;
    const WEAK: u8 = 1;
    const STRONG: u8 = 2;
    let mut state = vec![NONE; (w * h) as usize];
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let v = m(x, y);
            if v <= low {
                continue;
            }
            let dx = gx.get_pixel_unchecked(x as u32, y as u32);
            let dy = gy.get_pixel_unchecked(x as u32, y as u32);
            let (ax, ay) = (dx.abs(), dy.abs());

            let is_max = if ay <= ax * TAN_22_5_DEG {
                v > m(x - 1, y) && v >= m(x + 1, y)
            } else if ax <= ay * TAN_22_5_DEG {
                v > m(x, y - 1) && v >= m(x, y + 1)
            } else {
                // same signs point down-right in image coordinates
                let s = if (dx < 0.0) == (dy < 0.0) { 1 } else { -1 };
                v > m(x - s, y - 1) && v > m(x + s, y + 1)
            };
            if !is_max {
                continue;
            }

            let idx = (y * w + x) as usize;
            if v > high {
                state[idx] = STRONG;
                stack.push((x, y));
            } else {
                state[idx] = WEAK;
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        for ny in (y - 1)..=(y + 1) {
            for nx in (x - 1)..=(x + 1) {
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let idx = (ny * w + nx) as usize;
                if state[idx] == WEAK {
                    state[idx] = STRONG;
                    stack.push((nx, ny));
                }
            }
        }
    }

    let mut out = PixMut::new(pix.width(), pix.height(), PixelDepth::Bit1)?;
    for (dst, &s) in out.data_mut().iter_mut().zip(&state) {
        *dst = (s == STRONG) as u32;
    }
    Ok(out.into())
}
