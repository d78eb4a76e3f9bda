//! Vote accumulation
//!
//! Every target edge pixel looks up the R-table bin of its direction and
//! casts one vote per displacement at `pixel + round(displacement)`.
//! Votes landing outside the image are dropped.
//!
//! Besides the count, each cell remembers the ordinal of the last vote it
//! received. Ordinals follow raster order over the target edge pixels,
//! then storage order inside the bin, so they reproduce the moment a
//! sequential scan would have last touched the cell.

use crate::angle::{bin_index, is_direction};
use crate::edge_field::EdgeField;
use crate::error::GhtResult;
use crate::rtable::RTable;
use ghtmatch_core::{FPix, Pix};

/// Per-hypothesis vote grid with the size of the target image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator {
    width: u32,
    height: u32,
    votes: Vec<u32>,
    /// Ordinal of the last vote per cell, 0 if never voted
    last_vote: Vec<u64>,
}

impl Accumulator {
    /// Create an all-zero accumulator.
    pub fn new(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            votes: vec![0; n],
            last_vote: vec![0; n],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Vote count at `(x, y)`, or `None` outside the grid.
    pub fn votes_at(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.votes[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Ordinal of the last vote at `(x, y)`; 0 if the cell has none.
    pub fn last_vote_at(&self, x: u32, y: u32) -> Option<u64> {
        if x < self.width && y < self.height {
            Some(self.last_vote[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Row-major vote counts.
    pub fn data(&self) -> &[u32] {
        &self.votes
    }

    /// Row-major last-vote ordinals.
    pub fn last_votes(&self) -> &[u64] {
        &self.last_vote
    }

    /// Sum of all cells.
    pub fn total_votes(&self) -> u64 {
        self.votes.iter().map(|&v| v as u64).sum()
    }

    /// Highest count and its first position in raster order.
    ///
    /// Returns `None` if no cell has a vote.
    pub fn max(&self) -> Option<(u32, u32, u32)> {
        let mut best: Option<(u32, usize)> = None;
        for (i, &v) in self.votes.iter().enumerate() {
            if v > 0 && best.is_none_or(|(b, _)| v > b) {
                best = Some((v, i));
            }
        }
        let w = self.width as usize;
        best.map(|(v, i)| (v, (i % w) as u32, (i / w) as u32))
    }

    #[inline]
    fn cast(&mut self, index: usize, ordinal: u64) {
        self.votes[index] += 1;
        self.last_vote[index] = ordinal;
    }

    /// Counts as a float field.
    pub fn to_fpix(&self) -> GhtResult<FPix> {
        let data = self.votes.iter().map(|&v| v as f32).collect();
        Ok(FPix::from_data(self.width, self.height, data)?)
    }

    /// 8 bpp view of the counts, stretched so the maximum is 255.
    pub fn to_pix(&self) -> GhtResult<Pix> {
        Ok(self.to_fpix()?.to_pix_normalized()?)
    }
}

/// Accumulate the votes of `field` against `table`.
///
/// An empty field gives an all-zero accumulator.
pub fn cast_votes(table: &RTable, field: &EdgeField) -> Accumulator {
    let (w, h) = field.dimensions();
    let mut acc = Accumulator::new(w, h);
    let offsets: Vec<Vec<(i64, i64)>> = (0..table.bin_count())
        .map(|b| {
            table
                .bin(b)
                .iter()
                .map(|d| (d.dx.round() as i64, d.dy.round() as i64))
                .collect()
        })
        .collect();

    let mut ordinal = 0u64;
    for p in field.edge_points() {
        if !is_direction(p.direction) {
            continue;
        }
        let bin = bin_index(p.direction as f64, offsets.len());
        for &(dx, dy) in &offsets[bin] {
            let (vx, vy) = (p.x as i64 + dx, p.y as i64 + dy);
            if vx < 0 || vy < 0 || vx >= w as i64 || vy >= h as i64 {
                continue;
            }
            ordinal += 1;
            acc.cast((vy * w as i64 + vx) as usize, ordinal);
        }
    }
    acc
}
