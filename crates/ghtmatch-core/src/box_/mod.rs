//! Rectangles
//!
//! Axis-aligned boxes frame detections on the target image. `right()` and
//! `bottom()` are exclusive; clipping happens when a box is drawn.

use crate::error::{Error, Result};

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Box {
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a negative width or height.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "box size must be non-negative, got {}x{}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// A `w` x `h` box centered on `(cx, cy)`; negative sizes become 0.
    ///
    /// For even sizes the center is the pixel just right of / below the
    /// midline.
    pub fn from_center(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        let (w, h) = (w.max(0), h.max(0));
        Self::new_unchecked(cx - w / 2, cy - h / 2, w, h)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}
