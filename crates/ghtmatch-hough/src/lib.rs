//! ghtmatch-hough - Generalized Hough Transform shape matching
//!
//! Finds instances of a template shape in a target image under rotation
//! and scaling:
//!
//! - [`EdgeField`] - edge mask plus gradient direction, from any
//!   [`EdgeDetector`]
//! - [`RTable`] - orientation-binned displacements from template edges to
//!   the template origin
//! - [`GeneralizedHough`] - the matching session: one accumulator per
//!   `(rotation, scale)` hypothesis, one suppressed detection per
//!   hypothesis
//! - [`find_peaks`] - multi-peak extraction over retained accumulators
//! - [`render_detections`] - box overlays on the target
//!
//! # Example
//!
//! ```no_run
//! use ghtmatch_hough::{GeneralizedHough, GhtOptions};
//! # fn load(_: &str) -> ghtmatch_core::Pix { unimplemented!() }
//!
//! let template = load("template.png");
//! let image = load("image.png");
//! let opts = GhtOptions::new()
//!     .with_rotation_range(-0.5, 0.5, std::f64::consts::PI / 48.0)
//!     .with_scale_range(0.8, 1.2, 0.05);
//! let session = GeneralizedHough::from_template(&template, opts).unwrap();
//! for det in session.match_image(&image).unwrap().detections {
//!     println!("{}", det);
//! }
//! ```

pub mod angle;
pub mod edge_field;
mod error;
pub mod matcher;
pub mod params;
pub mod peak;
pub mod render;
pub mod rtable;
pub mod sweep;
pub mod vote;

pub use error::{GhtError, GhtResult};

pub use edge_field::{CannyEdgeDetector, EdgeDetector, EdgeField, EdgePoint};
pub use matcher::{
    CancelToken, GeneralizedHough, HypothesisOutcome, HypothesisReport, MatchResult,
};
pub use params::{GhtOptions, ScaleMode};
pub use peak::{Detection, PeakOptions, PeakSelector, find_peaks};
pub use render::render_detections;
pub use rtable::{Displacement, RTable};
pub use sweep::{Hypothesis, HypothesisGrid, range_steps};
pub use vote::{Accumulator, cast_votes};
