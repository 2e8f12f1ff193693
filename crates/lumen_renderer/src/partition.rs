//! Static work partitioning for render workers.
//!
//! Worker `w` of `n` owns image columns `w, w + n, w + 2n, ...` in every row.
//! Interleaving spreads expensive and cheap regions of the image evenly over
//! workers without a work queue, and makes pixel ownership a pure function of
//! `x`, so no two workers ever write the same pixel.

/// The set of columns one worker renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnInterleave {
    /// First column owned by the worker
    pub start_x: u32,
    /// Distance between owned columns (the worker count)
    pub stride: u32,
}

impl ColumnInterleave {
    /// Create the partition for worker `start_x` of `stride` workers.
    pub fn new(start_x: u32, stride: u32) -> Self {
        Self {
            start_x,
            stride: stride.max(1),
        }
    }

    /// Owned columns of an image `width` pixels wide, left to right.
    pub fn columns(&self, width: u32) -> impl Iterator<Item = u32> {
        (self.start_x..width).step_by(self.stride as usize)
    }

    /// Number of pixels this worker renders per pass.
    pub fn pixel_count(&self, width: u32, height: u32) -> u64 {
        self.columns(width).count() as u64 * height as u64
    }
}

/// One partition per worker, in worker order.
pub fn interleave_columns(workers: u32) -> Vec<ColumnInterleave> {
    (0..workers.max(1))
        .map(|w| ColumnInterleave::new(w, workers))
        .collect()
}
