//! Pose hypothesis enumeration
//!
//! Hypotheses are ordered rotation-major: every scale is tried for the
//! first rotation before the rotation advances. This is the canonical
//! order for votes, suppression and reporting.

use crate::error::GhtResult;
use crate::params::GhtOptions;

/// Slack that lets the last step of a range overshoot `max` slightly.
/// Capped at half a step so a tiny step cannot add values.
const RANGE_TOLERANCE: f64 = 1e-4;

/// One `(rotation, scale)` pair under test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hypothesis {
    /// Position in canonical order
    pub index: usize,
    pub rotation_index: usize,
    pub scale_index: usize,
    /// Radians
    pub rotation: f64,
    pub scale: f64,
}

/// How many values [`range_steps`] yields, as `f64` so it can be bounded
/// before anything is allocated.
pub(crate) fn range_count(min: f64, max: f64, delta: f64) -> f64 {
    if min == max {
        return 1.0;
    }
    let tolerance = RANGE_TOLERANCE.min(delta * 0.5);
    ((max - min + tolerance) / delta).floor().max(0.0) + 1.0
}

/// Values `min + k * delta` for every `k` that does not pass `max` by more
/// than the range tolerance. `min == max` gives exactly `[min]`.
pub fn range_steps(min: f64, max: f64, delta: f64) -> Vec<f64> {
    let count = range_count(min, max, delta) as usize;
    (0..count).map(|k| min + k as f64 * delta).collect()
}

/// Cartesian product of the rotation and scale ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct HypothesisGrid {
    rotations: Vec<f64>,
    scales: Vec<f64>,
}

impl HypothesisGrid {
    pub fn new(rotations: Vec<f64>, scales: Vec<f64>) -> Self {
        Self { rotations, scales }
    }

    /// Enumerate the ranges of validated `options`.
    pub fn from_options(options: &GhtOptions) -> GhtResult<Self> {
        options.validate()?;
        Ok(Self::new(
            range_steps(
                options.min_rotation,
                options.max_rotation,
                options.delta_rotation,
            ),
            range_steps(options.min_scale, options.max_scale, options.delta_scale),
        ))
    }

    pub fn rotations(&self) -> &[f64] {
        &self.rotations
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn len(&self) -> usize {
        self.rotations.len() * self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hypothesis at canonical position `index`.
    pub fn get(&self, index: usize) -> Option<Hypothesis> {
        (index < self.len()).then(|| self.at(index))
    }

    /// Hypotheses in canonical order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Hypothesis> + '_ {
        (0..self.len()).map(|i| self.at(i))
    }

    fn at(&self, index: usize) -> Hypothesis {
        let ns = self.scales.len();
        let (ri, si) = (index / ns, index % ns);
        Hypothesis {
            index,
            rotation_index: ri,
            scale_index: si,
            rotation: self.rotations[ri],
            scale: self.scales[si],
        }
    }
}
