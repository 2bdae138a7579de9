//! Windowing primitives for local smoothing.
//!
//! This module provides the symmetric index window used by the moving-average
//! and Gaussian smoothers. Windows are clipped to the array bounds rather than
//! padded, so edge points only see their in-bounds neighbours.

// Inclusive window bounds `[left, right]` around a center index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Window {
    // Left boundary index (inclusive).
    pub left: usize,

    // Right boundary index (inclusive).
    pub right: usize,
}

impl Window {
    // Symmetric window of `radius` around `center`, clipped to `[0, n - 1]`.
    #[inline]
    pub fn centered(center: usize, radius: usize, n: usize) -> Self {
        debug_assert!(center < n, "centered: center index out of bounds");

        Self {
            left: center.saturating_sub(radius),
            right: center.saturating_add(radius).min(n - 1),
        }
    }

    // Radius covered by a window size: `floor(window_size / 2)`.
    #[inline]
    pub fn radius_for(window_size: usize) -> usize {
        window_size / 2
    }

    // Get the number of points in the window.
    #[inline]
    pub fn len(&self) -> usize {
        self.right - self.left + 1
    }

    // Check if the window is empty.
    #[allow(dead_code)]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Index range covered by the window.
    #[inline]
    pub fn range(&self) -> core::ops::RangeInclusive<usize> {
        self.left..=self.right
    }

    // Iterate `(index, signed offset from center)` pairs.
    #[inline]
    pub fn offsets(&self, center: usize) -> impl Iterator<Item = (usize, isize)> {
        self.range().map(move |j| (j, j as isize - center as isize))
    }
}
