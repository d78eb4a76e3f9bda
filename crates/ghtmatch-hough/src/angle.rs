//! Orientation binning
//!
//! Gradient directions are radians in `(-π, π]`. The full circle is split
//! into `n` equal bins, bin 0 starting at `-π`:
//!
//! ```text
//! bin(φ) = floor((φ + π) / 2π · n) mod n
//! ```
//!
//! A direction of exactly `0.0` means "no gradient" and is never binned.

use std::f64::consts::{PI, TAU};

/// Sentinel stored in direction fields where there is no gradient.
pub const NO_DIRECTION: f32 = 0.0;

/// Whether `phi` carries a usable direction (nonzero and finite).
///
/// `-0.0` compares equal to `0.0` and is treated as the sentinel too.
#[inline]
pub fn is_direction(phi: f32) -> bool {
    phi != NO_DIRECTION && phi.is_finite()
}

/// Wrap an angle into `(-π, π]` and keep it clear of the sentinel.
///
/// A genuine direction of exactly zero becomes the smallest positive
/// `f32`, which lands in the same bin for every bin count. Non-finite
/// input maps to [`NO_DIRECTION`].
pub fn encode_direction(phi: f32) -> f32 {
    if !phi.is_finite() {
        return NO_DIRECTION;
    }
    let pi = std::f32::consts::PI;
    let mut a = phi;
    if !(a > -pi && a <= pi) {
        a = a.rem_euclid(std::f32::consts::TAU);
        if a > pi {
            a -= std::f32::consts::TAU;
        }
    }
    if a == 0.0 { f32::MIN_POSITIVE } else { a }
}

/// Angular width of one bin.
#[inline]
pub fn bin_width(bin_count: usize) -> f64 {
    TAU / bin_count as f64
}

/// Bin index of direction `phi` among `bin_count` bins.
#[inline]
pub fn bin_index(phi: f64, bin_count: usize) -> usize {
    let n = bin_count as i64;
    let t = ((phi + PI) / TAU * bin_count as f64).floor() as i64;
    t.rem_euclid(n) as usize
}

/// Center orientation of bin `index`.
#[inline]
pub fn bin_center(index: usize, bin_count: usize) -> f64 {
    -PI + (index as f64 + 0.5) * bin_width(bin_count)
}

/// Number of whole bins a rotation by `angle` moves a bin center.
///
/// Rounds half away from zero, so `bin_shift(-a) == -bin_shift(a)`.
#[inline]
pub fn bin_shift(angle: f64, bin_count: usize) -> i64 {
    (angle / bin_width(bin_count)).round() as i64
}

/// Bin count derived from the rotation step: `floor(2π / delta)`, at
/// least 1.
///
/// A relative tolerance absorbs the rounding of steps such as `π / 48`,
/// so they divide the circle exactly.
pub fn bin_count_for_step(delta_rotation: f64) -> usize {
    let n = TAU / delta_rotation;
    ((n * (1.0 + 1e-12)).floor() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_index_edges() {
        assert_eq!(bin_index(-PI, 4), 0);
        assert_eq!(bin_index(-PI / 2.0, 4), 1);
        assert_eq!(bin_index(-1e-9, 4), 1);
        assert_eq!(bin_index(0.0, 4), 2);
        assert_eq!(bin_index(PI / 2.0 + 1e-9, 4), 3);
        // +π wraps onto the same bin as -π
        assert_eq!(bin_index(PI, 4), 0);
        assert_eq!(bin_index(std::f32::consts::PI as f64, 4), 0);
    }

    #[test]
    fn test_bin_index_in_range() {
        for n in [1, 2, 7, 96] {
            for k in -50..=50 {
                let phi = k as f64 * 0.0629;
                assert!(bin_index(phi, n) < n);
            }
        }
    }

    #[test]
    fn test_bin_center_roundtrip() {
        for n in [1, 3, 96] {
            for i in 0..n {
                assert_eq!(bin_index(bin_center(i, n), n), i);
            }
        }
    }

    #[test]
    fn test_bin_shift_symmetric() {
        let n = 8;
        let w = bin_width(n);
        assert_eq!(bin_shift(0.0, n), 0);
        assert_eq!(bin_shift(w * 0.5, n), 1);
        assert_eq!(bin_shift(-w * 0.5, n), -1);
        assert_eq!(bin_shift(w * 2.4, n), 2);
        for k in -20..=20 {
            let a = k as f64 * 0.173;
            assert_eq!(bin_shift(-a, n), -bin_shift(a, n));
        }
    }

    #[test]
    fn test_bin_count_for_step() {
        assert_eq!(bin_count_for_step(PI / 48.0), 96);
        assert_eq!(bin_count_for_step(PI / 2.0), 4);
        assert_eq!(bin_count_for_step(1.0), 6);
        assert_eq!(bin_count_for_step(10.0), 1);
    }

    #[test]
    fn test_encode_direction() {
        let pi = std::f32::consts::PI;
        assert_eq!(encode_direction(0.0), f32::MIN_POSITIVE);
        assert_eq!(encode_direction(-0.0), f32::MIN_POSITIVE);
        assert_eq!(encode_direction(-pi), pi);
        assert_eq!(encode_direction(1.25), 1.25);
        assert_eq!(encode_direction(f32::NAN), NO_DIRECTION);
        assert!(is_direction(encode_direction(0.0)));
        assert!(!is_direction(-0.0));
        let wrapped = encode_direction(pi + 1.0);
        assert!((wrapped - (1.0 - pi)).abs() < 1e-5);
    }
}
