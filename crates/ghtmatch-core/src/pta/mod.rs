//! Point arrays
//!
//! [`Pta`] collects pixel coordinates: rasterized outlines to draw, or the
//! foreground of a mask. Coordinates live in two parallel vectors.

use std::iter::{Copied, Zip};
use std::slice;

/// Ordered list of `(x, y)` points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pta {
    x: Vec<f32>,
    y: Vec<f32>,
}

/// Iterator over the points of a [`Pta`].
pub type PtaIter<'a> = Zip<Copied<slice::Iter<'a, f32>>, Copied<slice::Iter<'a, f32>>>;

impl Pta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Point `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<(f32, f32)> {
        Some((*self.x.get(index)?, *self.y.get(index)?))
    }

    pub fn push(&mut self, x: f32, y: f32) {
        self.x.push(x);
        self.y.push(y);
    }

    /// Append every point of `other`.
    pub fn extend(&mut self, other: &Pta) {
        self.x.extend_from_slice(&other.x);
        self.y.extend_from_slice(&other.y);
    }

    /// Points in insertion order.
    pub fn iter(&self) -> PtaIter<'_> {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

impl<'a> IntoIterator for &'a Pta {
    type Item = (f32, f32);
    type IntoIter = PtaIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(f32, f32)> for Pta {
    fn from_iter<I: IntoIterator<Item = (f32, f32)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut pta = Pta::with_capacity(iter.size_hint().0);
        for (x, y) in iter {
            pta.push(x, y);
        }
        pta
    }
}
