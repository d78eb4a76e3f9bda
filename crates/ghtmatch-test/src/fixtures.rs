//! Synthetic fixtures
//!
//! Small generated images, so the regression tests need no data files.

use crate::error::TestResult;
use ghtmatch_core::{Box, Pix, PixMut, PixelDepth};

/// An 8 bpp `width` x `height` image with `rect` filled with `value`
/// on a zero background. The rectangle is clipped to the image.
pub fn filled_rect(width: u32, height: u32, rect: Box, value: u8) -> TestResult<Pix> {
    let mut pm = PixMut::new(width, height, PixelDepth::Bit8)?;
    let (x0, x1) = (rect.x.max(0), rect.right().min(width as i32));
    let (y0, y1) = (rect.y.max(0), rect.bottom().min(height as i32));
    if x0 < x1 {
        for y in y0..y1 {
            pm.row_mut(y as u32)[x0 as usize..x1 as usize].fill(value as u32);
        }
    }
    Ok(pm.into())
}

/// Perimeter pixels of a `w` x `h` rectangle at (x, y), in raster order.
pub fn rect_outline(x: u32, y: u32, w: u32, h: u32) -> Vec<(u32, u32)> {
    let mut pts = Vec::new();
    for yy in y..y + h {
        for xx in x..x + w {
            if yy == y || yy == y + h - 1 || xx == x || xx == x + w - 1 {
                pts.push((xx, yy));
            }
        }
    }
    pts
}

/// A 1 bpp mask with the given points set.
///
/// Points outside the image are ignored.
pub fn binary_from_points(width: u32, height: u32, points: &[(u32, u32)]) -> TestResult<Pix> {
    let mut pm = PixMut::new(width, height, PixelDepth::Bit1)?;
    for &(x, y) in points {
        if x < width && y < height {
            pm.set_pixel_unchecked(x, y, 1);
        }
    }
    Ok(pm.into())
}
