//! Edge fields
//!
//! An [`EdgeField`] is everything the voting core needs from an image: a
//! 1 bpp edge mask and a gradient-direction field on the same grid.
//! [`EdgeDetector`] is the seam to whatever produces it; the stock
//! implementation is [`CannyEdgeDetector`].

use crate::angle::{NO_DIRECTION, encode_direction, is_direction};
use crate::error::{GhtError, GhtResult};
use ghtmatch_core::{FPix, Pix, PixMut, PixelDepth};
use ghtmatch_filter::{box_blur, canny, gradient_direction, sobel_gradients};

/// One edge pixel and its gradient direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePoint {
    pub x: u32,
    pub y: u32,
    /// Radians in `(-π, π]`, or [`NO_DIRECTION`]
    pub direction: f32,
}

/// Binary edge mask plus per-pixel gradient direction.
#[derive(Debug, Clone)]
pub struct EdgeField {
    mask: Pix,
    direction: FPix,
}

impl EdgeField {
    /// Pair a mask with a direction field.
    ///
    /// # Errors
    ///
    /// - [`GhtError::InvalidParameter`] if `mask` is not 1 bpp
    /// - [`GhtError::DimensionMismatch`] if the sizes differ
    pub fn new(mask: Pix, direction: FPix) -> GhtResult<Self> {
        if mask.depth() != PixelDepth::Bit1 {
            return Err(GhtError::InvalidParameter(format!(
                "edge mask must be 1 bpp, got {} bpp",
                mask.depth().bits()
            )));
        }
        if mask.dimensions() != direction.dimensions() {
            return Err(GhtError::DimensionMismatch {
                mask: mask.dimensions(),
                direction: direction.dimensions(),
            });
        }
        Ok(Self { mask, direction })
    }

    /// Build a field from explicit `(x, y, direction)` samples.
    ///
    /// Directions go through [`encode_direction`]. Samples outside the grid
    /// are ignored; a repeated pixel keeps its last direction.
    pub fn from_points(width: u32, height: u32, points: &[(u32, u32, f32)]) -> GhtResult<Self> {
        let mut mask = PixMut::new(width, height, PixelDepth::Bit1)?;
        let mut direction = FPix::new(width, height)?;
        for &(x, y, phi) in points {
            if x < width && y < height {
                mask.set_pixel_unchecked(x, y, 1);
                direction.set_pixel_unchecked(x, y, encode_direction(phi));
            }
        }
        Self::new(mask.into(), direction)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    pub fn mask(&self) -> &Pix {
        &self.mask
    }

    pub fn direction(&self) -> &FPix {
        &self.direction
    }

    /// Number of edge pixels in the mask.
    pub fn edge_count(&self) -> usize {
        self.mask.count_pixels() as usize
    }

    /// Number of edge pixels that carry a usable direction.
    pub fn voting_count(&self) -> usize {
        self.edge_points().filter(|p| is_direction(p.direction)).count()
    }

    /// Whether the mask has no edge pixels.
    pub fn is_empty(&self) -> bool {
        self.mask.data().iter().all(|&v| v == 0)
    }

    /// Edge pixels in raster order.
    pub fn edge_points(&self) -> impl Iterator<Item = EdgePoint> + '_ {
        let w = self.width() as usize;
        self.mask
            .data()
            .iter()
            .zip(self.direction.data())
            .enumerate()
            .filter(|&(_, (&m, _))| m != 0)
            .map(move |(i, (_, &direction))| EdgePoint {
                x: (i % w) as u32,
                y: (i / w) as u32,
                direction,
            })
    }
}

/// Anything that can turn an image into an [`EdgeField`].
pub trait EdgeDetector {
    fn detect(&self, pix: &Pix) -> GhtResult<EdgeField>;
}

/// Grayscale, box blur, Canny, then Sobel directions on the blurred image.
///
/// Directions are stored only on edge pixels; everything else holds
/// [`NO_DIRECTION`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyEdgeDetector {
    /// First Canny hysteresis threshold (default: 60)
    pub threshold1: f32,
    /// Second Canny hysteresis threshold (default: 100)
    pub threshold2: f32,
    /// Box blur radius; 1 gives a 3x3 window (default: 1)
    pub blur_radius: u32,
}

impl Default for CannyEdgeDetector {
    fn default() -> Self {
        Self {
            threshold1: 60.0,
            threshold2: 100.0,
            blur_radius: 1,
        }
    }
}

impl CannyEdgeDetector {
    pub fn new(threshold1: f32, threshold2: f32) -> Self {
        Self {
            threshold1,
            threshold2,
            ..Self::default()
        }
    }

    pub fn with_blur_radius(mut self, radius: u32) -> Self {
        self.blur_radius = radius;
        self
    }
}

impl EdgeDetector for CannyEdgeDetector {
    fn detect(&self, pix: &Pix) -> GhtResult<EdgeField> {
        let gray = pix.convert_to_8()?;
        let blurred = box_blur(&gray, self.blur_radius)?;
        let mask = canny(&blurred, self.threshold1, self.threshold2)?;
        let (gx, gy) = sobel_gradients(&blurred)?;
        let mut direction = gradient_direction(&gx, &gy)?;
        for (phi, &m) in direction.data_mut().iter_mut().zip(mask.data()) {
            *phi = if m != 0 {
                encode_direction(*phi)
            } else {
                NO_DIRECTION
            };
        }
        EdgeField::new(mask, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghtmatch_core::Box;

    #[test]
    fn test_new_validates() {
        let mask = Pix::new(4, 3, PixelDepth::Bit1).unwrap();
        assert!(matches!(
            EdgeField::new(mask.clone(), FPix::new(3, 4).unwrap()),
            Err(GhtError::DimensionMismatch { .. })
        ));
        let gray = Pix::new(4, 3, PixelDepth::Bit8).unwrap();
        assert!(matches!(
            EdgeField::new(gray, FPix::new(4, 3).unwrap()),
            Err(GhtError::InvalidParameter(_))
        ));
        assert!(EdgeField::new(mask, FPix::new(4, 3).unwrap()).is_ok());
    }

    #[test]
    fn test_edge_points_raster_order() {
        let field =
            EdgeField::from_points(5, 4, &[(3, 2, 1.0), (1, 0, 0.0), (4, 0, -2.0), (9, 9, 1.0)])
                .unwrap();
        let pts: Vec<_> = field.edge_points().map(|p| (p.x, p.y)).collect();
        assert_eq!(pts, vec![(1, 0), (4, 0), (3, 2)]);
        assert_eq!(field.edge_count(), 3);
        // exact zero was nudged off the sentinel
        assert_eq!(field.voting_count(), 3);
    }

    #[test]
    fn test_mask_without_direction_does_not_vote() {
        let mut mask = PixMut::new(3, 3, PixelDepth::Bit1).unwrap();
        mask.set_pixel(1, 1, 1).unwrap();
        let field = EdgeField::new(mask.into(), FPix::new(3, 3).unwrap()).unwrap();
        assert_eq!(field.edge_count(), 1);
        assert_eq!(field.voting_count(), 0);
        assert!(!field.is_empty());
    }

    #[test]
    fn test_canny_detector_on_square() {
        let mut pm = PixMut::new(40, 40, PixelDepth::Bit8).unwrap();
        let b = Box::new_unchecked(10, 10, 20, 20);
        for y in b.y..b.bottom() {
            pm.row_mut(y as u32)[b.x as usize..b.right() as usize].fill(220);
        }
        let pix: Pix = pm.into();
        let field = CannyEdgeDetector::default().detect(&pix).unwrap();
        assert!(field.edge_count() > 40);
        assert_eq!(field.voting_count(), field.edge_count());
        // off-edge pixels carry no direction
        assert_eq!(field.direction().get_pixel(0, 0), Some(NO_DIRECTION));
        assert_eq!(field.direction().get_pixel(20, 20), Some(NO_DIRECTION));
        // color input goes through grayscale conversion
        let rgb = pix.convert_to_32().unwrap();
        let field_rgb = CannyEdgeDetector::default().detect(&rgb).unwrap();
        assert_eq!(field_rgb.mask().data(), field.mask().data());
    }
}
