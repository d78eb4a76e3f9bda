//! Detection selection
//!
//! Two policies pick detections out of accumulators:
//!
//! - [`PeakSelector`] runs during the sweep and keeps at most one point per
//!   hypothesis, away from everything accepted before it
//! - [`find_peaks`] runs afterwards over retained accumulators and may
//!   report several peaks per hypothesis

use crate::error::{GhtError, GhtResult};
use crate::sweep::Hypothesis;
use crate::vote::Accumulator;
use ghtmatch_core::Box;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A located template instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Origin position in the target
    pub x: u32,
    pub y: u32,
    /// Radians
    pub rotation: f64,
    pub scale: f64,
    /// Votes at `(x, y)`
    pub hits: u32,
}

impl Detection {
    /// Template extent at this detection's scale, centered on it.
    pub fn bounding_box(&self, template_w: u32, template_h: u32) -> Box {
        Box::from_center(
            self.x as i32,
            self.y as i32,
            (template_w as f64 * self.scale).round() as i32,
            (template_h as f64 * self.scale).round() as i32,
        )
    }

    fn distance_to(&self, x: u32, y: u32) -> f64 {
        let dx = self.x as f64 - x as f64;
        let dy = self.y as f64 - y as f64;
        dx.hypot(dy)
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] scale: {}, rotation: {:.2}°, hits: {}",
            self.x,
            self.y,
            self.scale,
            self.rotation.to_degrees(),
            self.hits
        )
    }
}

/// Online one-per-hypothesis selection with distance suppression.
///
/// For each hypothesis the selector keeps the cell a sequential vote scan
/// would end on: among cells at least `radius` away from every accepted
/// detection, the highest count wins, and ties go to the cell voted for
/// last.
#[derive(Debug, Clone)]
pub struct PeakSelector {
    radius: f64,
    accepted: Vec<Detection>,
}

impl PeakSelector {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            accepted: Vec::new(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Detections accepted so far, in acceptance order.
    pub fn accepted(&self) -> &[Detection] {
        &self.accepted
    }

    pub fn into_accepted(self) -> Vec<Detection> {
        self.accepted
    }

    /// Whether `(x, y)` is far enough from every accepted detection.
    pub fn is_eligible(&self, x: u32, y: u32) -> bool {
        self.accepted
            .iter()
            .all(|d| d.distance_to(x, y) >= self.radius)
    }

    /// Pick and accept the best eligible cell of `acc`.
    ///
    /// Returns `None`, accepting nothing, if no eligible cell has votes.
    pub fn select(&mut self, acc: &Accumulator, hypothesis: &Hypothesis) -> Option<Detection> {
        let w = acc.width() as usize;
        let mut best: Option<(u32, u64, usize)> = None;
        for (i, (&v, &last)) in acc.data().iter().zip(acc.last_votes()).enumerate() {
            if v == 0 || best.is_some_and(|(bv, bl, _)| (v, last) <= (bv, bl)) {
                continue;
            }
            if self.is_eligible((i % w) as u32, (i / w) as u32) {
                best = Some((v, last, i));
            }
        }
        let (hits, _, i) = best?;
        let det = Detection {
            x: (i % w) as u32,
            y: (i / w) as u32,
            rotation: hypothesis.rotation,
            scale: hypothesis.scale,
            hits,
        };
        self.accepted.push(det);
        Some(det)
    }
}

/// Options for [`find_peaks`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakOptions {
    /// Minimum votes for a peak (default: 1)
    pub threshold: u32,
    /// Minimum distance between reported peaks (default: 0)
    pub radius: f64,
    /// Upper bound on the number of peaks (default: unlimited)
    pub max_peaks: Option<usize>,
}

impl Default for PeakOptions {
    fn default() -> Self {
        Self {
            threshold: 1,
            radius: 0.0,
            max_peaks: None,
        }
    }
}

impl PeakOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_max_peaks(mut self, max_peaks: usize) -> Self {
        self.max_peaks = Some(max_peaks);
        self
    }

    pub fn validate(&self) -> GhtResult<()> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(GhtError::InvalidParameter(format!(
                "peak radius must be finite and non-negative, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

/// Local maxima of one accumulator: cells with at least `threshold` votes
/// (and at least one) that no 8-neighbor exceeds.
fn local_maxima(acc: &Accumulator, threshold: u32) -> Vec<(u32, u32, u32)> {
    let (w, h) = (acc.width() as i64, acc.height() as i64);
    let data = acc.data();
    let at = |x: i64, y: i64| -> u32 {
        if x < 0 || y < 0 || x >= w || y >= h {
            0
        } else {
            data[(y * w + x) as usize]
        }
    };
    let mut out = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let v = at(x, y);
            if v == 0 || v < threshold {
                continue;
            }
            let dominated = (-1..=1)
                .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
                .filter(|&d| d != (0, 0))
                .any(|(dx, dy)| at(x + dx, y + dy) > v);
            if !dominated {
                out.push((x as u32, y as u32, v));
            }
        }
    }
    out
}

/// Extract every well-separated peak across a set of accumulators.
///
/// Candidates are the local maxima of every accumulator. They are ranked
/// by hits, then by hypothesis order, then raster order, and accepted
/// greedily when at least `radius` away from every peak accepted before.
///
/// # Errors
///
/// Fails if the slices differ in length or the options are invalid.
pub fn find_peaks(
    accumulators: &[Accumulator],
    hypotheses: &[Hypothesis],
    options: &PeakOptions,
) -> GhtResult<Vec<Detection>> {
    options.validate()?;
    if accumulators.len() != hypotheses.len() {
        return Err(GhtError::InvalidParameter(format!(
            "{} accumulators for {} hypotheses",
            accumulators.len(),
            hypotheses.len()
        )));
    }

    let mut candidates: Vec<(usize, Detection)> = Vec::new();
    for (order, (acc, hyp)) in accumulators.iter().zip(hypotheses).enumerate() {
        candidates.extend(
            local_maxima(acc, options.threshold)
                .into_iter()
                .map(|(x, y, hits)| {
                    (
                        order,
                        Detection {
                            x,
                            y,
                            rotation: hyp.rotation,
                            scale: hyp.scale,
                            hits,
                        },
                    )
                }),
        );
    }
    // stable sort keeps raster order inside each hypothesis
    candidates.sort_by(|a, b| b.1.hits.cmp(&a.1.hits).then(a.0.cmp(&b.0)));

    let limit = options.max_peaks.unwrap_or(usize::MAX);
    let mut peaks: Vec<Detection> = Vec::new();
    for (_, det) in candidates {
        if peaks.len() >= limit {
            break;
        }
        if peaks
            .iter()
            .all(|p| p.distance_to(det.x, det.y) >= options.radius)
        {
            peaks.push(det);
        }
    }
    Ok(peaks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hyp(index: usize, rotation: f64, scale: f64) -> Hypothesis {
        Hypothesis {
            index,
            rotation_index: index,
            scale_index: 0,
            rotation,
            scale,
        }
    }

    /// Accumulator with the given `(x, y, votes)` cells; each cell's last
    /// vote ordinal is its position in `cells` plus one.
    fn acc_with(w: u32, h: u32, cells: &[(u32, u32, u32)]) -> Accumulator {
        use crate::edge_field::EdgeField;
        use crate::rtable::{Displacement, RTable};
        // one edge pixel per vote at the origin, each displacement aiming at
        // its cell, in cell order
        let mut table = RTable::new(1).unwrap();
        for &(x, y, votes) in cells {
            for _ in 0..votes {
                table.insert(1.0, Displacement::new(x as f32, y as f32));
            }
        }
        let field = EdgeField::from_points(w, h, &[(0, 0, 1.0)]).unwrap();
        crate::vote::cast_votes(&table, &field)
    }

    #[test]
    fn test_display_format() {
        let d = Detection {
            x: 25,
            y: 20,
            rotation: std::f64::consts::FRAC_PI_6,
            scale: 1.5,
            hits: 36,
        };
        assert_eq!(d.to_string(), "[25, 20] scale: 1.5, rotation: 30.00°, hits: 36");
    }

    #[test]
    fn test_bounding_box_uses_detected_scale() {
        let d = Detection {
            x: 50,
            y: 40,
            rotation: 0.0,
            scale: 1.5,
            hits: 1,
        };
        let b = d.bounding_box(20, 10);
        assert_eq!((b.w, b.h), (30, 15));
        assert_eq!((b.x, b.y), (35, 33));
        let b = Detection { scale: 1.0, ..d }.bounding_box(20, 10);
        assert_eq!((b.x, b.y, b.w, b.h), (40, 35, 20, 10));
    }

    #[test]
    fn test_select_prefers_count_then_last_vote() {
        // (5,1) and (2,3) both reach 3; (2,3) is voted for later
        let acc = acc_with(8, 6, &[(5, 1, 3), (1, 1, 1), (2, 3, 3)]);
        let mut sel = PeakSelector::new(2.0);
        let d = sel.select(&acc, &hyp(0, 0.0, 1.0)).unwrap();
        assert_eq!((d.x, d.y, d.hits), (2, 3, 3));
        assert_eq!(sel.accepted().len(), 1);
    }

    #[test]
    fn test_select_suppresses_near_accepted() {
        let acc = acc_with(10, 10, &[(4, 4, 5), (5, 4, 4), (8, 8, 2)]);
        let mut sel = PeakSelector::new(3.0);
        let first = sel.select(&acc, &hyp(0, 0.0, 1.0)).unwrap();
        assert_eq!((first.x, first.y), (4, 4));
        // same accumulator again: both strong cells are within 3 px
        let second = sel.select(&acc, &hyp(1, 0.1, 1.0)).unwrap();
        assert_eq!((second.x, second.y, second.hits), (8, 8, 2));
        assert_eq!(second.rotation, 0.1);
        // nothing eligible with votes left
        let third = sel.select(&acc, &hyp(2, 0.2, 1.0));
        assert!(third.is_none());
        assert_eq!(sel.accepted().len(), 2);
        for a in sel.accepted() {
            for b in sel.accepted() {
                if a != b {
                    assert!(a.distance_to(b.x, b.y) >= 3.0);
                }
            }
        }
    }

    #[test]
    fn test_select_empty_accumulator() {
        let mut sel = PeakSelector::new(1.0);
        assert!(sel.select(&Accumulator::new(4, 4), &hyp(0, 0.0, 1.0)).is_none());
        assert!(sel.accepted().is_empty());
    }

    #[test]
    fn test_zero_radius_allows_repeats() {
        let acc = acc_with(4, 4, &[(1, 2, 2)]);
        let mut sel = PeakSelector::new(0.0);
        assert!(sel.select(&acc, &hyp(0, 0.0, 1.0)).is_some());
        assert!(sel.select(&acc, &hyp(1, 0.0, 1.0)).is_some());
    }

    #[test]
    fn test_find_peaks_across_hypotheses() {
        let a = acc_with(20, 20, &[(3, 3, 5), (4, 3, 2), (15, 15, 4)]);
        let b = acc_with(20, 20, &[(3, 4, 6), (10, 2, 1)]);
        let hyps = [hyp(0, 0.0, 1.0), hyp(1, 0.5, 1.0)];
        let accs = [a, b];

        let all = find_peaks(&accs, &hyps, &PeakOptions::new()).unwrap();
        let got: Vec<_> = all.iter().map(|d| (d.x, d.y, d.hits)).collect();
        assert_eq!(got, vec![(3, 4, 6), (3, 3, 5), (15, 15, 4), (10, 2, 1)]);
        assert_eq!(all[0].rotation, 0.5);

        let opts = PeakOptions::new().with_radius(5.0).with_threshold(2);
        let got: Vec<_> = find_peaks(&accs, &hyps, &opts)
            .unwrap()
            .iter()
            .map(|d| (d.x, d.y))
            .collect();
        assert_eq!(got, vec![(3, 4), (15, 15)]);

        let capped = find_peaks(&accs, &hyps, &PeakOptions::new().with_max_peaks(1)).unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn test_find_peaks_rejects_mismatch() {
        let accs = [Accumulator::new(2, 2)];
        assert!(find_peaks(&accs, &[], &PeakOptions::new()).is_err());
        let bad = PeakOptions::new().with_radius(-1.0);
        assert!(find_peaks(&[], &[], &bad).is_err());
    }
}
