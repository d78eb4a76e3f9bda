//! Matching options
//!
//! [`GhtOptions`] holds every tunable of a matching session. It loads from
//! JSON with missing fields taking their defaults:
//!
//! ```
//! use ghtmatch_hough::GhtOptions;
//!
//! let opts: GhtOptions = serde_json::from_str(r#"{ "max_rotation": 1.0 }"#).unwrap();
//! assert_eq!(opts.min_rotation, 0.5);
//! assert_eq!(opts.max_rotation, 1.0);
//! opts.validate().unwrap();
//! ```

use crate::angle::bin_count_for_step;
use crate::error::{GhtError, GhtResult};
use crate::sweep::range_count;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// How a scale ratio is applied to R-table displacements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Both components are multiplied by the ratio
    #[default]
    Isotropic,
    /// Only the x component is scaled
    XOnly,
}

/// Options for a matching session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhtOptions {
    /// First Canny threshold (default: 60)
    pub canny_threshold1: f32,
    /// Second Canny threshold (default: 100)
    pub canny_threshold2: f32,

    /// Smallest rotation tried, radians (default: 0.5)
    pub min_rotation: f64,
    /// Largest rotation tried, radians (default: 0.5)
    pub max_rotation: f64,
    /// Rotation step, radians (default: π/48)
    pub delta_rotation: f64,

    /// Smallest scale ratio tried (default: 1.5)
    pub min_scale: f64,
    /// Largest scale ratio tried (default: 1.5)
    pub max_scale: f64,
    /// Scale step (default: 0.01)
    pub delta_scale: f64,

    /// Template reference point; `None` means `(width / 2, height / 2)`
    pub origin: Option<(i32, i32)>,
    /// Minimum distance between detections; `None` means template width / 4
    pub suppression_radius: Option<f64>,
    /// Orientation bins; `None` means `floor(2π / delta_rotation)`
    pub bin_count: Option<usize>,
    /// How scale ratios are applied (default: isotropic)
    pub scale_mode: ScaleMode,

    /// Build accumulators on the rayon pool (default: true)
    pub parallel: bool,
    /// Return every accumulator with the result (default: false)
    pub keep_accumulators: bool,
}

impl Default for GhtOptions {
    fn default() -> Self {
        Self {
            canny_threshold1: 60.0,
            canny_threshold2: 100.0,
            min_rotation: 0.5,
            max_rotation: 0.5,
            delta_rotation: PI / 48.0,
            min_scale: 1.5,
            max_scale: 1.5,
            delta_scale: 0.01,
            origin: None,
            suppression_radius: None,
            bin_count: None,
            scale_mode: ScaleMode::Isotropic,
            parallel: true,
            keep_accumulators: false,
        }
    }
}

/// Upper bound on the number of values in one search range.
pub const MAX_RANGE_STEPS: usize = 1 << 20;

/// Upper bound on the orientation bin count, explicit or derived.
pub const MAX_BIN_COUNT: usize = 1 << 20;

impl GhtOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both Canny thresholds
    pub fn with_canny_thresholds(mut self, threshold1: f32, threshold2: f32) -> Self {
        self.canny_threshold1 = threshold1;
        self.canny_threshold2 = threshold2;
        self
    }

    /// Set the rotation range and step, radians
    pub fn with_rotation_range(mut self, min: f64, max: f64, delta: f64) -> Self {
        self.min_rotation = min;
        self.max_rotation = max;
        self.delta_rotation = delta;
        self
    }

    /// Set the scale range and step
    pub fn with_scale_range(mut self, min: f64, max: f64, delta: f64) -> Self {
        self.min_scale = min;
        self.max_scale = max;
        self.delta_scale = delta;
        self
    }

    /// Set a fixed rotation (a single-value range)
    pub fn with_rotation(self, angle: f64) -> Self {
        let delta = self.delta_rotation;
        self.with_rotation_range(angle, angle, delta)
    }

    /// Set a fixed scale (a single-value range)
    pub fn with_scale(self, ratio: f64) -> Self {
        let delta = self.delta_scale;
        self.with_scale_range(ratio, ratio, delta)
    }

    /// Set the template origin
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin = Some((x, y));
        self
    }

    /// Set the suppression radius
    pub fn with_suppression_radius(mut self, radius: f64) -> Self {
        self.suppression_radius = Some(radius);
        self
    }

    /// Set the number of orientation bins
    pub fn with_bin_count(mut self, bins: usize) -> Self {
        self.bin_count = Some(bins);
        self
    }

    /// Set the scale mode
    pub fn with_scale_mode(mut self, mode: ScaleMode) -> Self {
        self.scale_mode = mode;
        self
    }

    /// Enable or disable parallel accumulation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Keep every accumulator in the result
    pub fn with_keep_accumulators(mut self, keep: bool) -> Self {
        self.keep_accumulators = keep;
        self
    }

    /// Validate options
    pub fn validate(&self) -> GhtResult<()> {
        for t in [self.canny_threshold1, self.canny_threshold2] {
            if !t.is_finite() || t < 0.0 {
                return Err(GhtError::InvalidParameter(format!(
                    "Canny thresholds must be finite and non-negative, got {}",
                    t
                )));
            }
        }
        check_range(
            "rotation",
            self.min_rotation,
            self.max_rotation,
            self.delta_rotation,
        )?;
        check_range("scale", self.min_scale, self.max_scale, self.delta_scale)?;
        if self.min_scale <= 0.0 {
            return Err(GhtError::InvalidParameter(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if let Some(r) = self.suppression_radius
            && (!r.is_finite() || r < 0.0)
        {
            return Err(GhtError::InvalidParameter(format!(
                "suppression_radius must be finite and non-negative, got {}",
                r
            )));
        }
        if self.bin_count == Some(0) {
            return Err(GhtError::InvalidParameter(
                "bin_count must be at least 1".to_string(),
            ));
        }
        let bins = self.effective_bin_count();
        if bins > MAX_BIN_COUNT {
            return Err(GhtError::InvalidParameter(format!(
                "{} orientation bins exceeds the limit of {}",
                bins, MAX_BIN_COUNT
            )));
        }
        Ok(())
    }

    /// Bin count in effect: explicit, or derived from the rotation step.
    pub fn effective_bin_count(&self) -> usize {
        self.bin_count
            .unwrap_or_else(|| bin_count_for_step(self.delta_rotation))
    }

    /// Origin in effect for a template of the given size.
    pub fn effective_origin(&self, template_w: u32, template_h: u32) -> (i32, i32) {
        self.origin
            .unwrap_or(((template_w / 2) as i32, (template_h / 2) as i32))
    }

    /// Suppression radius in effect for a template of the given width.
    pub fn effective_suppression_radius(&self, template_w: u32) -> f64 {
        self.suppression_radius
            .unwrap_or(template_w as f64 / 4.0)
    }
}

fn check_range(name: &'static str, min: f64, max: f64, delta: f64) -> GhtResult<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(GhtError::InvalidRange { name, min, max });
    }
    if !delta.is_finite() || delta <= 0.0 {
        return Err(GhtError::InvalidStep { name, step: delta });
    }
    if range_count(min, max, delta) > MAX_RANGE_STEPS as f64 {
        return Err(GhtError::InvalidParameter(format!(
            "{} range {}..={} with step {} has too many values",
            name, min, max, delta
        )));
    }
    Ok(())
}
