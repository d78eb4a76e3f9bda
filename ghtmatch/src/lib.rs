//! ghtmatch - Shape matching with the Generalized Hough Transform
//!
//! Locates a template shape in an image under rotation and scaling by
//! voting with template edge geometry.
//!
//! # Overview
//!
//! - Image buffers and drawing ([`Pix`], [`FPix`], [`Box`])
//! - Image I/O (PNG, JPEG, PNM) in [`io`]
//! - Blur, Sobel and Canny in [`filter`]
//! - R-tables, voting and detection in [`hough`]
//!
//! # Example
//!
//! ```
//! use ghtmatch::hough::{EdgeField, GeneralizedHough, GhtOptions};
//!
//! let template = EdgeField::from_points(8, 8, &[(2, 2, 0.8), (5, 5, -2.4)]).unwrap();
//! let session = GeneralizedHough::from_edge_field(
//!     &template,
//!     GhtOptions::new().with_rotation(0.0).with_scale(1.0),
//! )
//! .unwrap();
//! let result = session.match_edges(&template).unwrap();
//! assert_eq!((result.detections[0].x, result.detections[0].y), (4, 4));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use ghtmatch_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use ghtmatch_filter as filter;
pub use ghtmatch_hough as hough;
pub use ghtmatch_io as io;
