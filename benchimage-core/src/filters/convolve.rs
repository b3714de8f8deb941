// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Generic 2D convolution with toroidal wrap-around.
//!
//! Neighbours that fall off an edge are read from the opposite edge
//! (indices taken modulo width/height), never clamped or zero-padded.

use crate::error::{BenchError, BenchResult};
use crate::pixel::{pack_color, unpack, PixelBuffer};

/// Odd-sized convolution kernel, stored row-major (row = vertical offset).
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Build a kernel from its rows. Every row must have the same odd length
    /// and there must be an odd number of rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> BenchResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);

        if height == 0 || width == 0 {
            return Err(BenchError::invalid_dimensions("kernel must be non-empty"));
        }
        if let Some(bad) = rows.iter().position(|r| r.as_ref().len() != width) {
            return Err(BenchError::invalid_dimensions(format!(
                "kernel row {} has {} weights, expected {}",
                bad,
                rows[bad].as_ref().len(),
                width
            )));
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(BenchError::invalid_dimensions(format!(
                "kernel must have odd dimensions, got {}x{}",
                width, height
            )));
        }

        let weights = rows
            .iter()
            .flat_map(|r| r.as_ref().iter().copied())
            .collect();
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// The 1x1 identity kernel.
    pub fn identity() -> Self {
        Self {
            width: 1,
            height: 1,
            weights: vec![1.0],
        }
    }

    /// `[[1,2,1],[2,4,2],[1,2,1]]`
    pub fn gaussian_3x3() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0],
        }
    }

    /// 3x3 of ones.
    pub fn box_3x3() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![1.0; 9],
        }
    }

    /// `[[0,-1,0],[-1,5,-1],[0,-1,0]]`
    pub fn sharpen_3x3() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Weight at column `fx`, row `fy`.
    #[inline]
    pub fn weight(&self, fx: usize, fy: usize) -> f64 {
        self.weights[fy * self.width + fx]
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Convolve every channel of `source` with `kernel`.
///
/// Each output channel is `clamp(round(factor * sum + offset), 0, 255)`.
/// Reads come from the untouched source and writes go to a separate
/// destination, so no output pixel ever feeds a neighbour in the same pass.
pub fn convolve(
    source: PixelBuffer,
    kernel: &Kernel,
    factor: f64,
    offset: f64,
) -> BenchResult<PixelBuffer> {
    let w = source.width() as usize;
    let h = source.height() as usize;
    let kw = kernel.width();
    let kh = kernel.height();

    // Wrapped column for every (x, fx) and row for every (y, fy).
    let cols = wrap_table(w, kw);
    let rows = wrap_table(h, kh);

    let src = source.as_slice();
    let mut out = Vec::with_capacity(src.len());

    for y in 0..h {
        for x in 0..w {
            let (mut sr, mut sg, mut sb) = (0.0f64, 0.0f64, 0.0f64);
            for fy in 0..kh {
                let row_base = rows[y * kh + fy] * w;
                for fx in 0..kw {
                    let k = kernel.weight(fx, fy);
                    let (r, g, b) = unpack(src[row_base + cols[x * kw + fx]]);
                    sr += r as f64 * k;
                    sg += g as f64 * k;
                    sb += b as f64 * k;
                }
            }
            out.push(pack_color(
                finish(sr, factor, offset),
                finish(sg, factor, offset),
                finish(sb, factor, offset),
            ));
        }
    }

    PixelBuffer::new(source.width(), source.height(), out)
}

/// `table[i * k + f]` is `(i - k/2 + f) mod n`.
fn wrap_table(n: usize, k: usize) -> Vec<usize> {
    let n = n as i64;
    let half = (k / 2) as i64;
    let mut table = Vec::with_capacity(n as usize * k);
    for i in 0..n {
        for f in 0..k as i64 {
            table.push((i - half + f).rem_euclid(n) as usize);
        }
    }
    table
}

#[inline]
fn finish(sum: f64, factor: f64, offset: f64) -> i32 {
    (factor * sum + offset).round().clamp(0.0, 255.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        PixelBuffer::from_fn(5, 4, |x, y| pack_color((x * 50) as i32, (y * 60) as i32, 128))
            .unwrap()
    }

    #[test]
    fn test_identity_kernel() {
        let src = sample();
        let out = convolve(src.clone(), &Kernel::identity(), 1.0, 0.0).unwrap();
        assert_eq!(out, src);

        let from_rows = Kernel::from_rows(&[[1.0]]).unwrap();
        assert_eq!(convolve(src.clone(), &from_rows, 1.0, 0.0).unwrap(), src);
    }

    #[test]
    fn test_single_pixel_wraps_onto_itself() {
        let src = PixelBuffer::new(1, 1, vec![pack_color(10, 20, 30)]).unwrap();
        let kernel =
            Kernel::from_rows(&[[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]]).unwrap();
        let out = convolve(src, &kernel, 1.0 / 16.0, 0.0).unwrap();
        assert_eq!(unpack(out.as_slice()[0]), (10, 20, 30));

        let src = PixelBuffer::new(1, 1, vec![pack_color(10, 20, 30)]).unwrap();
        let out = convolve(src, &kernel, 1.0, 0.0).unwrap();
        // 16x the single sample, clamped
        assert_eq!(unpack(out.as_slice()[0]), (160, 255, 255));
    }

    #[test]
    fn test_wraps_across_edges() {
        // Horizontal "take left neighbour" kernel on a 3x1 row.
        let src = PixelBuffer::new(3, 1, vec![0x000001, 0x000002, 0x000003]).unwrap();
        let kernel = Kernel::from_rows(&[[1.0, 0.0, 0.0]]).unwrap();
        let out = convolve(src, &kernel, 1.0, 0.0).unwrap();
        assert_eq!(out.as_slice(), &[0x000003, 0x000001, 0x000002]);
    }

    #[test]
    fn test_vertical_wrap_uses_rows() {
        let src = PixelBuffer::new(1, 3, vec![0x010000, 0x020000, 0x030000]).unwrap();
        let kernel = Kernel::from_rows(&[[0.0], [0.0], [1.0]]).unwrap();
        let out = convolve(src, &kernel, 1.0, 0.0).unwrap();
        assert_eq!(out.as_slice(), &[0x020000, 0x030000, 0x010000]);
    }

    #[test]
    fn test_reads_frozen_source() {
        // Box blur of a single bright pixel spreads evenly; an in-place pass
        // would smear the already-written values further.
        let mut src = PixelBuffer::filled(3, 3, 0).unwrap();
        src.set(1, 1, pack_color(90, 90, 90)).unwrap();
        let kernel = Kernel::from_rows(&[[1.0; 3]; 3]).unwrap();
        let out = convolve(src, &kernel, 1.0 / 9.0, 0.0).unwrap();
        assert!(out.as_slice().iter().all(|&c| c == pack_color(10, 10, 10)));
    }

    #[test]
    fn test_offset_and_clamp() {
        let src = PixelBuffer::filled(2, 2, pack_color(100, 0, 250)).unwrap();
        let out = convolve(src, &Kernel::identity(), 1.0, 10.0).unwrap();
        assert_eq!(unpack(out.as_slice()[0]), (110, 10, 255));

        let src = PixelBuffer::filled(2, 2, pack_color(100, 0, 250)).unwrap();
        let out = convolve(src, &Kernel::identity(), -1.0, 0.0).unwrap();
        assert_eq!(unpack(out.as_slice()[0]), (0, 0, 0));
    }

    #[test]
    fn test_rounds_to_nearest() {
        let src = PixelBuffer::filled(1, 1, pack_color(3, 5, 7)).unwrap();
        let out = convolve(src, &Kernel::identity(), 0.5, 0.0).unwrap();
        // 1.5 -> 2, 2.5 -> 3 (half away from zero), 3.5 -> 4
        assert_eq!(unpack(out.as_slice()[0]), (2, 3, 4));
    }

    #[test]
    fn test_kernel_validation() {
        let empty: [[f64; 0]; 0] = [];
        assert!(Kernel::from_rows(&empty).is_err());
        assert!(Kernel::from_rows(&[[1.0, 1.0]]).is_err());
        assert!(Kernel::from_rows(&[vec![1.0, 1.0, 1.0], vec![1.0]]).is_err());
        assert!(Kernel::from_rows(&[[1.0; 3]; 2]).is_err());
        let k = Kernel::from_rows(&[[1.0; 5]; 3]).unwrap();
        assert_eq!((k.width(), k.height()), (5, 3));
        assert_eq!(k.sum(), 15.0);
    }
}
