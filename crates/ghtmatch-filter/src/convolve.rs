//! Convolution operations
//!
//! Border pixels are handled by replication: samples outside the image
//! take the value of the nearest edge pixel.

use crate::{FilterResult, check_grayscale};
use ghtmatch_core::{Pix, PixMut, PixelDepth};

/// Mean filter over a `(2 * radius + 1)` square window.
///
/// `radius = 1` gives the 3x3 blur applied before edge detection.
/// `radius = 0` returns a copy.
///
/// # Errors
///
/// Returns [`crate::FilterError::UnsupportedDepth`] unless `pix` is 8 bpp.
pub fn box_blur(pix: &Pix, radius: u32) -> FilterResult<Pix> {
    check_grayscale(pix)?;
    if radius == 0 {
        return Ok(pix.deep_clone());
    }

    let (w, h) = pix.dimensions();
    let r = radius as i32;
    let area = ((2 * r + 1) * (2 * r + 1)) as u32;
    let clamp_x = |x: i32| x.clamp(0, w as i32 - 1) as usize;

    // Horizontal pass keeps integer window sums per row
    let mut row_sums = vec![0u32; (w as usize) * (h as usize)];
    for y in 0..h {
        let src = pix.row(y);
        let dst = &mut row_sums[y as usize * w as usize..(y as usize + 1) * w as usize];
        for (x, d) in dst.iter_mut().enumerate() {
            let x = x as i32;
            *d = (x - r..=x + r).map(|sx| src[clamp_x(sx)]).sum();
        }
    }

    let mut out = PixMut::new(w, h, PixelDepth::Bit8)?;
    for y in 0..h as i32 {
        let dst = out.row_mut(y as u32);
        for (x, d) in dst.iter_mut().enumerate() {
            let sum: u32 = (y - r..=y + r)
                .map(|sy| row_sums[sy.clamp(0, h as i32 - 1) as usize * w as usize + x])
                .sum();
            *d = (sum + area / 2) / area;
        }
    }

    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterError;

    #[test]
    fn test_blur_constant_image() {
        let pix = Pix::from_data(4, 3, PixelDepth::Bit8, vec![77; 12]).unwrap();
        let out = box_blur(&pix, 1).unwrap();
        assert!(out.data().iter().all(|&v| v == 77));
    }

    #[test]
    fn test_blur_single_spike() {
        let mut data = vec![0u32; 25];
        data[12] = 90;
        let pix = Pix::from_data(5, 5, PixelDepth::Bit8, data).unwrap();
        let out = box_blur(&pix, 1).unwrap();
        assert_eq!(out.get_pixel(2, 2), Some(10));
        assert_eq!(out.get_pixel(1, 1), Some(10));
        assert_eq!(out.get_pixel(0, 0), Some(0));
    }

    #[test]
    fn test_blur_replicates_border() {
        let pix = Pix::from_data(3, 1, PixelDepth::Bit8, vec![90, 0, 0]).unwrap();
        let out = box_blur(&pix, 1).unwrap();
        // window at x=0 is [90, 90, 0] on each of three replicated rows
        assert_eq!(out.get_pixel(0, 0), Some(60));
        assert_eq!(out.get_pixel(2, 0), Some(0));
    }

    #[test]
    fn test_blur_rejects_rgb() {
        let pix = Pix::new(3, 3, PixelDepth::Bit32).unwrap();
        assert!(matches!(
            box_blur(&pix, 1),
            Err(FilterError::UnsupportedDepth { actual: 32, .. })
        ));
    }
}
