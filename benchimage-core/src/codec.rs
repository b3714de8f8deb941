// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Image codecs: compressed bytes <-> [`PixelBuffer`].
//!
//! The filter engine never touches compressed formats itself. Strategies and
//! tasks go through a [`Codec`], which keeps JPEG lossiness out of tests that
//! need exact pixels (use [`RawCodec`] there).

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};

use crate::error::{BenchError, BenchResult};
use crate::pixel::{pack_color, unpack, PixelBuffer};
use crate::types::JpegQuality;

/// Encoder/decoder for one image format.
pub trait Codec: Send + Sync + std::fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Decode compressed bytes. Fails with `Decode`.
    fn decode(&self, bytes: &[u8]) -> BenchResult<PixelBuffer>;

    /// Encode a buffer at the given quality. Fails with `Encode`.
    fn encode(&self, buffer: &PixelBuffer, quality: JpegQuality) -> BenchResult<Vec<u8>>;
}

/// Convert an `image` RGB image into a pixel buffer.
pub fn from_rgb_image(image: &RgbImage) -> BenchResult<PixelBuffer> {
    let samples = image
        .pixels()
        .map(|Rgb([r, g, b])| pack_color(*r as i32, *g as i32, *b as i32))
        .collect();
    PixelBuffer::new(image.width(), image.height(), samples)
}

/// Convert a pixel buffer into an `image` RGB image.
pub fn to_rgb_image(buffer: &PixelBuffer) -> RgbImage {
    let samples = buffer.as_slice();
    let width = buffer.width();
    RgbImage::from_fn(buffer.width(), buffer.height(), |x, y| {
        let (r, g, b) = unpack(samples[(y * width + x) as usize]);
        Rgb([r, g, b])
    })
}

/// JPEG codec backed by the `image` crate.
///
/// Decoding sniffs the format, so PNG or BMP assets load as well; encoding
/// always produces baseline JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCodec;

impl Codec for JpegCodec {
    fn name(&self) -> &'static str {
        "jpeg"
    }

    fn decode(&self, bytes: &[u8]) -> BenchResult<PixelBuffer> {
        let image = image::load_from_memory(bytes).map_err(|e| BenchError::Decode {
            reason: e.to_string(),
        })?;
        from_rgb_image(&image.to_rgb8())
    }

    fn encode(&self, buffer: &PixelBuffer, quality: JpegQuality) -> BenchResult<Vec<u8>> {
        let rgb = to_rgb_image(buffer);
        let mut out = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut out, quality.get())
            .encode_image(&rgb)
            .map_err(|e| BenchError::Encode {
                reason: e.to_string(),
            })?;
        Ok(out.into_inner())
    }
}

const RAW_HEADER_LEN: usize = 8;

/// Uncompressed, lossless codec.
///
/// Layout: little-endian `u32` width, little-endian `u32` height, then one
/// `r, g, b` byte triplet per pixel in row-major order. Quality is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl Codec for RawCodec {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn decode(&self, bytes: &[u8]) -> BenchResult<PixelBuffer> {
        if bytes.len() < RAW_HEADER_LEN {
            return Err(BenchError::Decode {
                reason: format!("raw image truncated: {} header bytes", bytes.len()),
            });
        }
        let width = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let height = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let body = &bytes[RAW_HEADER_LEN..];

        let expected = width as usize * height as usize * 3;
        if body.len() != expected {
            return Err(BenchError::Decode {
                reason: format!(
                    "raw {}x{} image needs {} body bytes, got {}",
                    width,
                    height,
                    expected,
                    body.len()
                ),
            });
        }

        let samples = body
            .chunks_exact(3)
            .map(|p| pack_color(p[0] as i32, p[1] as i32, p[2] as i32))
            .collect();
        PixelBuffer::new(width, height, samples).map_err(|e| BenchError::Decode {
            reason: e.to_string(),
        })
    }

    fn encode(&self, buffer: &PixelBuffer, _quality: JpegQuality) -> BenchResult<Vec<u8>> {
        let mut out = Vec::with_capacity(RAW_HEADER_LEN + buffer.len() * 3);
        out.extend_from_slice(&buffer.width().to_le_bytes());
        out.extend_from_slice(&buffer.height().to_le_bytes());
        for &c in buffer.as_slice() {
            let (r, g, b) = unpack(c);
            out.extend_from_slice(&[r, g, b]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                pack_color(250, 10, 10)
            } else {
                pack_color(10, 10, 250)
            }
        })
        .unwrap()
    }

    #[test]
    fn test_raw_round_trip_is_exact() {
        let buf = checker(7, 5);
        let bytes = RawCodec.encode(&buf, JpegQuality::OUTPUT).unwrap();
        assert_eq!(bytes.len(), 8 + 7 * 5 * 3);
        assert_eq!(RawCodec.decode(&bytes).unwrap(), buf);
    }

    #[test]
    fn test_raw_rejects_truncated() {
        assert!(matches!(RawCodec.decode(&[1, 0, 0]), Err(BenchError::Decode { .. })));

        let mut bytes = RawCodec.encode(&checker(2, 2), JpegQuality::OUTPUT).unwrap();
        bytes.pop();
        assert!(matches!(RawCodec.decode(&bytes), Err(BenchError::Decode { .. })));
    }

    #[test]
    fn test_raw_rejects_zero_sized() {
        let bytes = [0u8, 0, 0, 0, 4, 0, 0, 0];
        assert!(matches!(RawCodec.decode(&bytes), Err(BenchError::Decode { .. })));
    }

    #[test]
    fn test_jpeg_round_trip_keeps_dimensions() {
        let buf = PixelBuffer::filled(16, 8, pack_color(120, 120, 120)).unwrap();
        let bytes = JpegCodec.encode(&buf, JpegQuality::SOURCE).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = JpegCodec.decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
        let (r, g, b) = unpack(decoded.as_slice()[0]);
        assert!((r as i32 - 120).abs() <= 3);
        assert!((g as i32 - 120).abs() <= 3);
        assert!((b as i32 - 120).abs() <= 3);
    }

    #[test]
    fn test_jpeg_rejects_garbage() {
        assert!(matches!(
            JpegCodec.decode(b"definitely not an image"),
            Err(BenchError::Decode { .. })
        ));
    }

    #[test]
    fn test_rgb_image_conversion() {
        let buf = checker(3, 2);
        let rgb = to_rgb_image(&buf);
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([10, 10, 250]));
        assert_eq!(from_rgb_image(&rgb).unwrap(), buf);
    }
}
