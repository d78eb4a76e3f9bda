//! R-table construction and transformation
//!
//! An [`RTable`] stores, for each orientation bin, the displacements from
//! template edge pixels to the template origin. Transformations return new
//! tables and leave the input untouched, so one template table can be
//! shared read-only by every hypothesis.

use crate::angle::{bin_index, bin_shift};
use crate::edge_field::EdgeField;
use crate::error::{GhtError, GhtResult};
use crate::params::ScaleMode;
use log::debug;

/// Vector from an edge pixel to the origin: `origin - pixel`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    pub dx: f32,
    pub dy: f32,
}

impl Displacement {
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Rotate by the angle whose cosine and sine are given.
    #[inline]
    pub fn rotated(self, cos: f64, sin: f64) -> Self {
        let (dx, dy) = (self.dx as f64, self.dy as f64);
        Self {
            dx: (cos * dx - sin * dy) as f32,
            dy: (sin * dx + cos * dy) as f32,
        }
    }

    /// Scale each component independently.
    #[inline]
    pub fn scaled(self, sx: f64, sy: f64) -> Self {
        Self {
            dx: (self.dx as f64 * sx) as f32,
            dy: (self.dy as f64 * sy) as f32,
        }
    }
}

/// Orientation-indexed displacement table.
#[derive(Debug, Clone, PartialEq)]
pub struct RTable {
    bins: Vec<Vec<Displacement>>,
}

impl RTable {
    /// Create an empty table with `bin_count` bins.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::InvalidParameter`] if `bin_count` is zero.
    pub fn new(bin_count: usize) -> GhtResult<Self> {
        if bin_count == 0 {
            return Err(GhtError::InvalidParameter(
                "bin_count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            bins: vec![Vec::new(); bin_count],
        })
    }

    /// Build the table of a template edge field around `origin`.
    ///
    /// Every edge pixel contributes one displacement to the bin of its
    /// direction; a raw 0.0 direction falls in the bin of angle 0. An empty
    /// field gives an empty table.
    pub fn build(field: &EdgeField, origin: (i32, i32), bin_count: usize) -> GhtResult<Self> {
        let mut table = Self::new(bin_count)?;
        for p in field.edge_points() {
            let d = Displacement::new(
                (origin.0 as i64 - p.x as i64) as f32,
                (origin.1 as i64 - p.y as i64) as f32,
            );
            table.insert(p.direction as f64, d);
        }
        debug!(
            "R-table: {} displacements in {} bins around ({}, {})",
            table.len(),
            bin_count,
            origin.0,
            origin.1
        );
        Ok(table)
    }

    /// Append a displacement to the bin of direction `phi`.
    pub fn insert(&mut self, phi: f64, d: Displacement) {
        let bin = bin_index(phi, self.bins.len());
        self.bins[bin].push(d);
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Displacements of bin `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= bin_count()`.
    #[inline]
    pub fn bin(&self, index: usize) -> &[Displacement] {
        &self.bins[index]
    }

    /// Number of displacements in each bin.
    pub fn bin_sizes(&self) -> Vec<usize> {
        self.bins.iter().map(Vec::len).collect()
    }

    /// Total number of displacements.
    pub fn len(&self) -> usize {
        self.bins.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.iter().all(Vec::is_empty)
    }

    /// Rotate the table by `angle` radians (clockwise on screen, since image
    /// y grows downward).
    ///
    /// Each displacement is rotated by `(cos, -sin; sin, cos)`. Bin `i`
    /// moves by `round(angle / bin_width)` bins, half away from zero, which
    /// is the bin its center orientation lands in after rotation.
    pub fn rotate(&self, angle: f64) -> RTable {
        let n = self.bins.len();
        let shift = bin_shift(angle, n).rem_euclid(n as i64);
        let (sin, cos) = angle.sin_cos();
        let mut bins = vec![Vec::new(); n];
        for (i, bin) in self.bins.iter().enumerate() {
            let target = (i as i64 + shift).rem_euclid(n as i64) as usize;
            bins[target] = bin.iter().map(|d| d.rotated(cos, sin)).collect();
        }
        RTable { bins }
    }

    /// Scale every displacement by `ratio` in both axes.
    pub fn scale(&self, ratio: f64) -> RTable {
        self.scale_xy(ratio, ratio)
    }

    /// Scale x components by `sx` and y components by `sy`.
    pub fn scale_xy(&self, sx: f64, sy: f64) -> RTable {
        RTable {
            bins: self
                .bins
                .iter()
                .map(|bin| bin.iter().map(|d| d.scaled(sx, sy)).collect())
                .collect(),
        }
    }

    /// Rotate, then scale under `mode`.
    pub fn transform(&self, rotation: f64, scale: f64, mode: ScaleMode) -> RTable {
        let rotated = self.rotate(rotation);
        match mode {
            ScaleMode::Isotropic => rotated.scale(scale),
            ScaleMode::XOnly => rotated.scale_xy(scale, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghtmatch_core::{FPix, Pix, PixelDepth};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn sorted(bin: &[Displacement]) -> Vec<(i64, i64)> {
        let mut v: Vec<_> = bin
            .iter()
            .map(|d| (d.dx.round() as i64, d.dy.round() as i64))
            .collect();
        v.sort();
        v
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(RTable::new(0).is_err());
    }

    #[test]
    fn test_build_displacements() {
        // template edge pixel (2, 3) pointing right, origin (5, 5)
        let field = EdgeField::from_points(10, 10, &[(2, 3, 0.1), (7, 5, -3.0)]).unwrap();
        let table = RTable::build(&field, (5, 5), 4).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.bin(2), &[Displacement::new(3.0, 2.0)]);
        assert_eq!(table.bin(0), &[Displacement::new(-2.0, 0.0)]);
        assert_eq!(table.bin_sizes(), vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_build_keeps_zero_direction() {
        let mask = Pix::from_data(3, 1, PixelDepth::Bit1, vec![1, 0, 1]).unwrap();
        let mut direction = FPix::new(3, 1).unwrap();
        direction.set_pixel_unchecked(2, 0, 0.0);
        direction.set_pixel_unchecked(0, 0, -2.0);
        let field = EdgeField::new(mask, direction).unwrap();
        let table = RTable::build(&field, (1, 0), 4).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.bin(bin_index(0.0, 4)), &[Displacement::new(-1.0, 0.0)]);
    }

    #[test]
    fn test_build_empty_field() {
        let field = EdgeField::from_points(6, 6, &[]).unwrap();
        let table = RTable::build(&field, (3, 3), 8).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.bin_count(), 8);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let mut t = RTable::new(8).unwrap();
        t.insert(0.3, Displacement::new(1.5, -2.0));
        t.insert(-2.0, Displacement::new(4.0, 1.0));
        assert_eq!(t.rotate(0.0), t);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut t = RTable::new(4).unwrap();
        // bin 2 covers [0, π/2)
        t.insert(0.5, Displacement::new(10.0, 0.0));
        let r = t.rotate(FRAC_PI_2);
        assert_eq!(r.bin_count(), 4);
        assert!(r.bin(2).is_empty());
        assert_eq!(sorted(r.bin(3)), vec![(0, 10)]);
        // input untouched
        assert_eq!(t.bin(2), &[Displacement::new(10.0, 0.0)]);
    }

    #[test]
    fn test_rotate_inverse_restores_bins() {
        let mut t = RTable::new(96).unwrap();
        for k in 0..40 {
            let phi = -3.1 + k as f64 * 0.155;
            t.insert(phi, Displacement::new(k as f32, (40 - k) as f32 * 0.5));
        }
        for angle in [0.5, -1.3, PI, 0.0327, 7.0] {
            let back = t.rotate(angle).rotate(-angle);
            assert_eq!(back.bin_sizes(), t.bin_sizes());
            for i in 0..96 {
                assert_eq!(sorted(back.bin(i)), sorted(t.bin(i)));
            }
        }
    }

    #[test]
    fn test_rotate_huge_angle() {
        let mut t = RTable::new(8).unwrap();
        t.insert(0.3, Displacement::new(1.0, 2.0));
        let r = t.rotate(1e30);
        assert_eq!(r.bin_count(), 8);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn test_scale_inverse_restores() {
        let mut t = RTable::new(8).unwrap();
        for k in 0..20 {
            let phi = -3.0 + k as f64 * 0.3;
            t.insert(phi, Displacement::new(k as f32 - 7.0, (k * k) as f32 * 0.25 - 12.0));
        }
        for ratio in [0.37, 1.5, 3.0] {
            let back = t.scale(ratio).scale(1.0 / ratio);
            assert_eq!(back.bin_sizes(), t.bin_sizes());
            for i in 0..t.bin_count() {
                for (a, b) in back.bin(i).iter().zip(t.bin(i)) {
                    assert!((a.dx - b.dx).abs() < 1e-4, "dx {} vs {}", a.dx, b.dx);
                    assert!((a.dy - b.dy).abs() < 1e-4, "dy {} vs {}", a.dy, b.dy);
                }
            }
        }
    }

    #[test]
    fn test_scale_modes() {
        let mut t = RTable::new(4).unwrap();
        t.insert(0.5, Displacement::new(4.0, -2.0));
        assert_eq!(t.scale(1.5).bin(2), &[Displacement::new(6.0, -3.0)]);
        assert_eq!(t.scale_xy(0.5, 2.0).bin(2), &[Displacement::new(2.0, -4.0)]);
        assert_eq!(
            t.transform(0.0, 2.0, ScaleMode::XOnly).bin(2),
            &[Displacement::new(8.0, -2.0)]
        );
        assert_eq!(
            t.transform(0.0, 2.0, ScaleMode::Isotropic).bin(2),
            &[Displacement::new(8.0, -4.0)]
        );
        assert_eq!(t.scale(1.0), t);
    }
}
