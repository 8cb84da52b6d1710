// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-processing effects attached to display nodes.
//!
//! Filters are opaque to the tree: a node's filter list is handed to the
//! accelerated backend's [`FilterStack`](crate::backend::FilterStack) as a
//! unit, and everything drawn until the matching pop is rendered into an
//! offscreen target that the filters then process. The immediate backend has
//! no filter stack and ignores them.

/// A post-processing effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Filter {
    /// Horizontal screen-space blur.
    Blur(BlurFilter),
}

/// Parameters for a horizontal blur.
///
/// The kernel samples [`TAPS`](Self::TAPS) points spread across a normalized
/// horizontal offset in `[-1, 1]`, scaled by [`radius`](Self::radius). Each
/// pixel jitters its sample positions by a pseudo-random amount derived from
/// its coordinates and [`seed`](Self::seed), which hides banding when the
/// radius is large compared to the tap spacing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurFilter {
    /// Half-width of the kernel in pixels.
    pub radius: f32,
    /// Offset mixed into the per-pixel dither hash.
    pub seed: f32,
    /// Whether sample positions are dithered at all.
    pub dither: bool,
}

impl BlurFilter {
    /// Number of samples taken per output pixel.
    pub const TAPS: usize = 61;

    /// Creates a dithered blur with the given radius and a zero seed.
    #[inline]
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self {
            radius,
            seed: 0.0,
            dither: true,
        }
    }

    /// Returns a copy with the given dither seed.
    #[inline]
    #[must_use]
    pub const fn with_seed(mut self, seed: f32) -> Self {
        self.seed = seed;
        self
    }

    /// Returns a copy with dithering disabled.
    #[inline]
    #[must_use]
    pub const fn without_dither(mut self) -> Self {
        self.dither = false;
        self
    }

    /// Normalized horizontal offset of tap `i`, in `[-1, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= TAPS`.
    #[inline]
    #[must_use]
    pub fn tap_offset(i: usize) -> f32 {
        assert!(i < Self::TAPS, "tap {i} out of range (taps {})", Self::TAPS);
        let half = (Self::TAPS / 2) as f32;
        (i as f32 - half) / half
    }
}

impl Default for BlurFilter {
    fn default() -> Self {
        Self::new(8.0)
    }
}
