// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Raw pixel data model.
//!
//! A `PixelBuffer` owns a row-major grid of packed `0x00RRGGBB` samples.
//! Compressed formats never reach this module; see [`crate::codec`].

use crate::error::{BenchError, BenchResult};

/// Pack three channels into `0x00RRGGBB`, clamping each to [0, 255].
#[inline]
pub fn pack_color(r: i32, g: i32, b: i32) -> u32 {
    let r = r.clamp(0, 255) as u32;
    let g = g.clamp(0, 255) as u32;
    let b = b.clamp(0, 255) as u32;
    (r << 16) | (g << 8) | b
}

/// Split a packed color into its channels.
#[inline]
pub fn unpack(color: u32) -> (u8, u8, u8) {
    (red(color), green(color), blue(color))
}

#[inline]
pub fn red(color: u32) -> u8 {
    ((color >> 16) & 0xFF) as u8
}

#[inline]
pub fn green(color: u32) -> u8 {
    ((color >> 8) & 0xFF) as u8
}

#[inline]
pub fn blue(color: u32) -> u8 {
    (color & 0xFF) as u8
}

/// Width x height grid of packed RGB samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<u32>,
}

impl PixelBuffer {
    /// Build a buffer from explicit dimensions and samples.
    /// Rejects empty dimensions and a sample count other than `width * height`.
    pub fn new(width: u32, height: u32, samples: Vec<u32>) -> BenchResult<Self> {
        if width == 0 || height == 0 {
            return Err(BenchError::invalid_dimensions(format!(
                "buffer must be non-empty, got {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(BenchError::invalid_dimensions(format!(
                "{}x{} buffer needs {} samples, got {}",
                width,
                height,
                expected,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Buffer with every sample set to `color`.
    pub fn filled(width: u32, height: u32, color: u32) -> BenchResult<Self> {
        Self::new(width, height, vec![color; width as usize * height as usize])
    }

    /// Buffer whose sample at `(x, y)` is `f(x, y)`.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> BenchResult<Self>
    where
        F: FnMut(u32, u32) -> u32,
    {
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self::new(width, height, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of samples (`width * height`).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed buffer; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> BenchResult<usize> {
        if x >= self.width || y >= self.height {
            return Err(BenchError::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Packed color at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> BenchResult<u32> {
        let idx = self.index(x, y)?;
        Ok(self.samples[idx])
    }

    /// Overwrite the packed color at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, color: u32) -> BenchResult<()> {
        let idx = self.index(x, y)?;
        self.samples[idx] = color;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.samples
    }

    /// Apply `f` to every sample in place.
    pub fn map_in_place<F>(&mut self, f: F)
    where
        F: Fn(u32) -> u32,
    {
        for sample in &mut self.samples {
            *sample = f(*sample);
        }
    }

    /// Iterate `(x, y, color)` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        let width = self.width;
        self.samples
            .iter()
            .enumerate()
            .map(move |(i, &c)| ((i as u32) % width, (i as u32) / width, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let c = pack_color(0x12, 0x34, 0x56);
        assert_eq!(c, 0x123456);
        assert_eq!(unpack(c), (0x12, 0x34, 0x56));
    }

    #[test]
    fn test_pack_clamps_channels() {
        assert_eq!(pack_color(300, -5, 255), 0xFF00FF);
    }

    #[test]
    fn test_unpack_masks_high_bits() {
        assert_eq!(unpack(0xAB_10_20_30), (0x10, 0x20, 0x30));
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 3, vec![]),
            Err(BenchError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            PixelBuffer::new(2, 2, vec![0; 3]),
            Err(BenchError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_row_major_indexing() {
        let mut buf = PixelBuffer::filled(3, 2, 0).unwrap();
        buf.set(2, 1, 0xFFFFFF).unwrap();
        assert_eq!(buf.as_slice()[5], 0xFFFFFF);
        assert_eq!(buf.get(2, 1).unwrap(), 0xFFFFFF);
        assert_eq!(buf.get(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buf = PixelBuffer::filled(2, 2, 0).unwrap();
        assert!(matches!(
            buf.get(2, 0),
            Err(BenchError::IndexOutOfBounds { x: 2, y: 0, .. })
        ));
        assert!(buf.set(0, 2, 1).is_err());
    }

    #[test]
    fn test_pixels_iterator_coordinates() {
        let buf = PixelBuffer::from_fn(2, 2, |x, y| x + 10 * y).unwrap();
        let coords: Vec<_> = buf.pixels().collect();
        assert_eq!(coords, vec![(0, 0, 0), (1, 0, 1), (0, 1, 10), (1, 1, 11)]);
    }
}
