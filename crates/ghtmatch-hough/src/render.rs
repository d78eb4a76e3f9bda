//! Detection overlays

use crate::error::GhtResult;
use crate::peak::Detection;
use ghtmatch_core::{Color, Pix};

/// Half-length of the origin marker, in pixels.
const MARKER_ARM: i32 = 3;

/// Draw each detection onto a 32 bpp copy of `pix`.
///
/// Every detection gets the outline of its [`Detection::bounding_box`]
/// with thickness `line_width`, plus a small cross on its origin. Parts
/// outside the image are clipped.
pub fn render_detections(
    pix: &Pix,
    detections: &[Detection],
    template_w: u32,
    template_h: u32,
    color: Color,
    line_width: u32,
) -> GhtResult<Pix> {
    let rgb = pix.convert_to_32()?;
    let mut out = rgb.try_into_mut().unwrap_or_else(|shared| shared.to_mut());
    for det in detections {
        let b = det.bounding_box(template_w, template_h);
        out.render_box_color(&b, line_width, color)?;
        out.render_cross_color(det.x as i32, det.y as i32, MARKER_ARM, color)?;
    }
    Ok(out.into())
}
