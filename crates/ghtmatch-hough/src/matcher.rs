//! Matching sessions
//!
//! A [`GeneralizedHough`] session owns the R-table of one template and
//! sweeps every `(rotation, scale)` hypothesis of its options over a
//! target:
//!
//! 1. Transform the template table (rotate, then scale)
//! 2. Vote with the target edge field into a fresh accumulator
//! 3. Select at most one detection under distance suppression
//!
//! Accumulators are built a chunk at a time (one per rayon thread when
//! `parallel` is set) and reduced in canonical order, so the detections
//! do not depend on the thread count.
//!
//! # Example
//!
//! ```
//! use ghtmatch_hough::{EdgeField, GeneralizedHough, GhtOptions};
//!
//! let template = EdgeField::from_points(8, 8, &[(2, 2, 0.8), (5, 5, -2.4)]).unwrap();
//! let target = EdgeField::from_points(40, 30, &[(12, 7, 0.8), (15, 10, -2.4)]).unwrap();
//! let opts = GhtOptions::new().with_rotation(0.0).with_scale(1.0);
//! let session = GeneralizedHough::from_edge_field(&template, opts).unwrap();
//! let result = session.match_edges(&target).unwrap();
//! let best = result.detections[0];
//! assert_eq!((best.x, best.y, best.hits), (14, 9, 2));
//! ```

use crate::edge_field::{CannyEdgeDetector, EdgeDetector, EdgeField};
use crate::error::{GhtError, GhtResult};
use crate::params::GhtOptions;
use crate::peak::{Detection, PeakOptions, PeakSelector, find_peaks};
use crate::rtable::RTable;
use crate::sweep::{Hypothesis, HypothesisGrid};
use crate::vote::{Accumulator, cast_votes};
use ghtmatch_core::Pix;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag that stops a running sweep between chunks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What the observer sees after each hypothesis is reduced.
#[derive(Debug, Clone, Copy)]
pub struct HypothesisReport<'a> {
    pub hypothesis: Hypothesis,
    /// The detection accepted for this hypothesis, if any
    pub detection: Option<Detection>,
    pub accumulator: &'a Accumulator,
}

/// Result of one hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HypothesisOutcome {
    pub hypothesis: Hypothesis,
    pub detection: Option<Detection>,
}

/// Result of a sweep.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Accepted detections in hypothesis order
    pub detections: Vec<Detection>,
    /// One entry per hypothesis, in canonical order
    pub outcomes: Vec<HypothesisOutcome>,
    /// Every accumulator, when `keep_accumulators` was set
    pub accumulators: Option<Vec<Accumulator>>,
    /// The template had no edge pixels with a direction
    pub empty_template: bool,
}

impl MatchResult {
    /// Run [`find_peaks`] over the retained accumulators.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::InvalidParameter`] if the sweep did not keep
    /// its accumulators.
    pub fn find_peaks(&self, options: &PeakOptions) -> GhtResult<Vec<Detection>> {
        let accs = self.accumulators.as_deref().ok_or_else(|| {
            GhtError::InvalidParameter(
                "find_peaks needs accumulators; enable keep_accumulators".to_string(),
            )
        })?;
        let hyps: Vec<Hypothesis> = self.outcomes.iter().map(|o| o.hypothesis).collect();
        find_peaks(accs, &hyps, options)
    }
}

/// A template prepared for matching.
#[derive(Debug, Clone)]
pub struct GeneralizedHough {
    options: GhtOptions,
    table: RTable,
    origin: (i32, i32),
    template_size: (u32, u32),
    grid: HypothesisGrid,
    suppression_radius: f64,
}

impl GeneralizedHough {
    /// Prepare a template image with the Canny thresholds of `options`.
    pub fn from_template(template: &Pix, options: GhtOptions) -> GhtResult<Self> {
        let detector = canny_for(&options);
        Self::from_template_with(template, options, &detector)
    }

    /// Prepare a template image with a custom edge detector.
    pub fn from_template_with<D: EdgeDetector + ?Sized>(
        template: &Pix,
        options: GhtOptions,
        detector: &D,
    ) -> GhtResult<Self> {
        options.validate()?;
        let field = detector.detect(template)?;
        Self::from_edge_field(&field, options)
    }

    /// Prepare a template from its edge field.
    ///
    /// An empty field is accepted; every sweep then reports no detections
    /// and sets [`MatchResult::empty_template`].
    pub fn from_edge_field(template: &EdgeField, options: GhtOptions) -> GhtResult<Self> {
        let grid = HypothesisGrid::from_options(&options)?;
        let (tw, th) = template.dimensions();
        let origin = options.effective_origin(tw, th);
        let table = RTable::build(template, origin, options.effective_bin_count())?;
        if table.is_empty() {
            warn!("template {}x{} has no directed edge pixels", tw, th);
        }
        debug!("R-table bin sizes: {:?}", table.bin_sizes());
        let suppression_radius = options.effective_suppression_radius(tw);
        Ok(Self {
            options,
            table,
            origin,
            template_size: (tw, th),
            grid,
            suppression_radius,
        })
    }

    pub fn options(&self) -> &GhtOptions {
        &self.options
    }

    /// The untransformed template table.
    pub fn table(&self) -> &RTable {
        &self.table
    }

    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    pub fn template_size(&self) -> (u32, u32) {
        self.template_size
    }

    pub fn grid(&self) -> &HypothesisGrid {
        &self.grid
    }

    pub fn suppression_radius(&self) -> f64 {
        self.suppression_radius
    }

    /// Detect edges in `image` with the session's Canny thresholds and sweep.
    pub fn match_image(&self, image: &Pix) -> GhtResult<MatchResult> {
        self.match_image_with(image, &canny_for(&self.options))
    }

    /// Detect edges in `image` with `detector` and sweep.
    pub fn match_image_with<D: EdgeDetector + ?Sized>(
        &self,
        image: &Pix,
        detector: &D,
    ) -> GhtResult<MatchResult> {
        let field = detector.detect(image)?;
        self.match_edges(&field)
    }

    /// Sweep every hypothesis over a target edge field.
    pub fn match_edges(&self, target: &EdgeField) -> GhtResult<MatchResult> {
        self.match_edges_with(target, &CancelToken::new(), |_| {})
    }

    /// Sweep with cancellation and a per-hypothesis observer.
    ///
    /// `observer` runs after each hypothesis is reduced, in canonical
    /// order. `cancel` is checked before each chunk.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Cancelled`] if `cancel` is set before the sweep
    /// finishes.
    pub fn match_edges_with<F>(
        &self,
        target: &EdgeField,
        cancel: &CancelToken,
        mut observer: F,
    ) -> GhtResult<MatchResult>
    where
        F: FnMut(&HypothesisReport<'_>),
    {
        let hypotheses: Vec<Hypothesis> = self.grid.iter().collect();
        let chunk_size = if self.options.parallel {
            rayon::current_num_threads().max(1)
        } else {
            1
        };
        let mut selector = PeakSelector::new(self.suppression_radius);
        let mut outcomes = Vec::with_capacity(hypotheses.len());
        let mut kept = self
            .options
            .keep_accumulators
            .then(|| Vec::with_capacity(hypotheses.len()));

        for chunk in hypotheses.chunks(chunk_size) {
            if cancel.is_cancelled() {
                info!("sweep cancelled after {} hypotheses", outcomes.len());
                return Err(GhtError::Cancelled);
            }
            let accs: Vec<Accumulator> = if self.options.parallel {
                chunk.par_iter().map(|h| self.accumulate(h, target)).collect()
            } else {
                chunk.iter().map(|h| self.accumulate(h, target)).collect()
            };

            for (h, acc) in chunk.iter().zip(accs) {
                let detection = selector.select(&acc, h);
                match &detection {
                    Some(d) => debug!(
                        "rotation {:.2}° scale {:.0}%: {}",
                        h.rotation.to_degrees(),
                        h.scale * 100.0,
                        d
                    ),
                    None => debug!(
                        "rotation {:.2}° scale {:.0}%: no eligible votes",
                        h.rotation.to_degrees(),
                        h.scale * 100.0
                    ),
                }
                observer(&HypothesisReport {
                    hypothesis: *h,
                    detection,
                    accumulator: &acc,
                });
                outcomes.push(HypothesisOutcome {
                    hypothesis: *h,
                    detection,
                });
                if let Some(k) = kept.as_mut() {
                    k.push(acc);
                }
            }
        }

        let detections = selector.into_accepted();
        info!(
            "{} hypotheses over {}x{} target, {} detections",
            outcomes.len(),
            target.width(),
            target.height(),
            detections.len()
        );
        Ok(MatchResult {
            detections,
            outcomes,
            accumulators: kept,
            empty_template: self.table.is_empty(),
        })
    }

    /// Vote for one hypothesis.
    pub fn accumulate(&self, hypothesis: &Hypothesis, target: &EdgeField) -> Accumulator {
        let table = self.table.transform(
            hypothesis.rotation,
            hypothesis.scale,
            self.options.scale_mode,
        );
        cast_votes(&table, target)
    }
}

fn canny_for(options: &GhtOptions) -> CannyEdgeDetector {
    CannyEdgeDetector::new(options.canny_threshold1, options.canny_threshold2)
}
