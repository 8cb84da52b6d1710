// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU reference for the blur leaf effect.
//!
//! Accelerated backends run the blur as a fragment shader; this module
//! computes the same thing on the CPU so backends can be checked against it
//! and the immediate backend can pre-filter snapshots.
//!
//! The kernel takes [`BlurFilter::TAPS`] samples spread evenly across the
//! normalized offset range `[-1, 1]`, scaled by the filter radius. Weights
//! follow a Gaussian with `sigma = 1/3` in normalized units and sum to one.
//! When dithering is enabled, every output pixel shifts all of its sample
//! positions by up to half a tap spacing, using a hash of the pixel
//! coordinates and the filter seed.

use arbor_core::filter::BlurFilter;

/// A straight RGBA pixel with `f32` channels.
pub type Rgba = [f32; 4];

const TAPS: usize = BlurFilter::TAPS;

/// Standard deviation in normalized offset units.
const SIGMA: f32 = 1.0 / 3.0;

/// Precomputed tap offsets and weights for a [`BlurFilter`].
#[derive(Clone, Debug)]
pub struct BlurKernel {
    filter: BlurFilter,
    offsets: [f32; TAPS],
    weights: [f32; TAPS],
}

impl BlurKernel {
    /// Builds the kernel for `filter`.
    #[must_use]
    pub fn new(filter: BlurFilter) -> Self {
        let offsets: [f32; TAPS] = core::array::from_fn(BlurFilter::tap_offset);
        let denom = 2.0 * SIGMA * SIGMA;
        let raw = offsets.map(|x| (-x * x / denom).exp());
        let sum: f32 = raw.iter().sum();
        let weights = raw.map(|w| w / sum);
        Self {
            filter,
            offsets,
            weights,
        }
    }

    /// Returns the filter parameters this kernel was built from.
    #[must_use]
    pub fn filter(&self) -> BlurFilter {
        self.filter
    }

    /// Normalized tap offsets, ascending from `-1` to `1`.
    #[must_use]
    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    /// Tap weights; they sum to one.
    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Pseudo-random value in `[0, 1)` for the pixel at `(x, y)`.
    ///
    /// `fract(sin(dot(p + seed, (12.9898, 78.233))) * 43758.5453)`, with a
    /// floor-based `fract` so negative products still land in `[0, 1)`.
    #[must_use]
    pub fn dither(&self, x: f32, y: f32) -> f32 {
        let seed = self.filter.seed;
        let dot = (x + seed) * 12.9898 + (y + seed) * 78.233;
        let v = dot.sin() * 43758.5453;
        let f = v - v.floor();
        // Rounding can push `f` up to exactly 1.0 for large `v`.
        if f >= 1.0 { 0.0 } else { f }
    }

    /// Blurs `src` horizontally into `dst`.
    ///
    /// Both buffers hold `width * height` pixels in row-major order. Samples
    /// outside a row are clamped to its edge pixels and fractional positions
    /// are linearly interpolated.
    ///
    /// # Panics
    ///
    /// Panics if either buffer does not hold exactly `width * height` pixels.
    pub fn apply_horizontal(&self, src: &[Rgba], dst: &mut [Rgba], width: usize, height: usize) {
        let len = width * height;
        assert_eq!(src.len(), len, "source holds {} pixels, expected {len}", src.len());
        assert_eq!(dst.len(), len, "destination holds {} pixels, expected {len}", dst.len());
        if len == 0 {
            return;
        }

        let radius = self.filter.radius;
        let spacing = 2.0 / (TAPS - 1) as f32;
        for y in 0..height {
            let row = &src[y * width..(y + 1) * width];
            let out = &mut dst[y * width..(y + 1) * width];
            for (x, px) in out.iter_mut().enumerate() {
                let jitter = if self.filter.dither {
                    (self.dither(x as f32, y as f32) - 0.5) * spacing
                } else {
                    0.0
                };
                let mut acc = [0.0_f32; 4];
                for (offset, weight) in self.offsets.iter().zip(&self.weights) {
                    let s = sample(row, x as f32 + (offset + jitter) * radius);
                    for (a, v) in acc.iter_mut().zip(s) {
                        *a += v * weight;
                    }
                }
                *px = acc;
            }
        }
    }
}

/// Edge-clamped, linearly interpolated read of `row` at position `sx`.
fn sample(row: &[Rgba], sx: f32) -> Rgba {
    let last = row.len() - 1;
    let sx = sx.clamp(0.0, last as f32);
    #[expect(
        clippy::cast_possible_truncation,
        reason = "sx is clamped to [0, last], so its floor fits in usize"
    )]
    let x0 = sx.floor() as usize;
    let x1 = (x0 + 1).min(last);
    let t = sx - x0 as f32;
    let (a, b) = (row[x0], row[x1]);
    core::array::from_fn(|c| a[c] + (b[c] - a[c]) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn offsets_span_unit_range() {
        let k = BlurKernel::new(BlurFilter::default());
        assert_eq!(k.offsets().len(), 61);
        assert_eq!(k.offsets()[0], -1.0);
        assert_eq!(k.offsets()[30], 0.0);
        assert_eq!(k.offsets()[60], 1.0);
        assert!(k.offsets().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn weights_are_normalized_and_symmetric() {
        let k = BlurKernel::new(BlurFilter::default());
        let sum: f32 = k.weights().iter().sum();
        assert!((sum - 1.0).abs() < EPS, "sum = {sum}");
        for i in 0..TAPS {
            assert!((k.weights()[i] - k.weights()[TAPS - 1 - i]).abs() < 1e-7);
        }
        let peak = k.weights()[30];
        assert!(k.weights().iter().all(|&w| w <= peak));
    }

    #[test]
    fn dither_stays_in_unit_interval() {
        let k = BlurKernel::new(BlurFilter::new(4.0).with_seed(0.37));
        for y in -20..20 {
            for x in -20..20 {
                let d = k.dither(x as f32 * 3.1, y as f32 * 1.7);
                assert!((0.0..1.0).contains(&d), "dither({x}, {y}) = {d}");
            }
        }
    }

    #[test]
    fn seed_changes_dither() {
        let a = BlurKernel::new(BlurFilter::new(4.0));
        let b = BlurKernel::new(BlurFilter::new(4.0).with_seed(1.5));
        let differs = (0..16).any(|x| a.dither(x as f32, 3.0) != b.dither(x as f32, 3.0));
        assert!(differs);
    }

    #[test]
    fn uniform_image_is_unchanged() {
        let (w, h) = (16, 4);
        let src = vec![[0.2, 0.4, 0.6, 1.0]; w * h];
        let mut dst = vec![[0.0; 4]; w * h];
        BlurKernel::new(BlurFilter::new(6.0)).apply_horizontal(&src, &mut dst, w, h);
        for px in &dst {
            for (a, b) in px.iter().zip(&src[0]) {
                assert!((a - b).abs() < EPS, "{px:?}");
            }
        }
    }

    #[test]
    fn zero_radius_is_identity() {
        let (w, h) = (8, 2);
        let src: Vec<Rgba> = (0..w * h).map(|i| [i as f32, 0.0, 1.0, 1.0]).collect();
        let mut dst = vec![[0.0; 4]; w * h];
        BlurKernel::new(BlurFilter::new(0.0)).apply_horizontal(&src, &mut dst, w, h);
        for (a, b) in src.iter().zip(&dst) {
            assert!(
                a.iter().zip(b).all(|(x, y)| (x - y).abs() < EPS),
                "{a:?} != {b:?}"
            );
        }
    }

    #[test]
    fn impulse_spreads_and_conserves_energy() {
        let (w, h) = (32, 1);
        let mut src = vec![[0.0; 4]; w];
        src[16] = [1.0, 1.0, 1.0, 1.0];
        let mut dst = vec![[0.0; 4]; w];
        BlurKernel::new(BlurFilter::new(5.0).without_dither()).apply_horizontal(&src, &mut dst, w, h);

        assert!(dst[16][0] < 1.0);
        assert!(dst[14][0] > 0.0 && dst[18][0] > 0.0);
        assert!((dst[14][0] - dst[18][0]).abs() < EPS, "blur is symmetric");
        assert_eq!(dst[5][0], 0.0);
        let total: f32 = dst.iter().map(|p| p[0]).sum();
        assert!((total - 1.0).abs() < 1e-3, "total = {total}");
    }

    #[test]
    fn rows_are_independent() {
        let (w, h) = (8, 2);
        let mut src = vec![[0.0; 4]; w * h];
        for px in &mut src[w..] {
            *px = [1.0; 4];
        }
        let mut dst = vec![[0.5; 4]; w * h];
        BlurKernel::new(BlurFilter::new(3.0)).apply_horizontal(&src, &mut dst, w, h);
        assert!(dst[..w].iter().all(|p| p[0].abs() < EPS));
        assert!(dst[w..].iter().all(|p| (p[0] - 1.0).abs() < EPS));
    }

    #[test]
    #[should_panic(expected = "source holds")]
    fn mismatched_buffer_panics() {
        let src = vec![[0.0; 4]; 3];
        let mut dst = vec![[0.0; 4]; 4];
        BlurKernel::new(BlurFilter::default()).apply_horizontal(&src, &mut dst, 2, 2);
    }
}
