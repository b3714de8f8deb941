// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Per-pixel color transforms: grayscale, sepia, inversion and tone mapping.

use crate::error::{BenchError, BenchResult};
use crate::pixel::{blue, green, pack_color, red, unpack, PixelBuffer};

/// Minimum tone-map width: one column per channel value.
pub const TONE_MAP_WIDTH: u32 = 256;

/// Luma of one packed color, `floor(0.299r + 0.587g + 0.114b)`.
///
/// Evaluated in integer thousandths so a gray pixel maps to itself exactly.
#[inline]
pub fn luma(color: u32) -> u8 {
    let (r, g, b) = unpack(color);
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// Replace every channel with the pixel's luma.
pub fn grayscale(mut source: PixelBuffer) -> PixelBuffer {
    source.map_in_place(|c| {
        let gray = luma(c) as i32;
        pack_color(gray, gray, gray)
    });
    source
}

/// Apply the fixed sepia matrix, clamping each channel at 255.
pub fn sepia(mut source: PixelBuffer) -> PixelBuffer {
    source.map_in_place(|c| {
        let (r, g, b) = unpack(c);
        let (r, g, b) = (r as f64, g as f64, b as f64);
        let sr = (r * 0.393 + g * 0.769 + b * 0.189) as i32;
        let sg = (r * 0.349 + g * 0.686 + b * 0.168) as i32;
        let sb = (r * 0.272 + g * 0.534 + b * 0.131) as i32;
        pack_color(sr.min(255), sg.min(255), sb.min(255))
    });
    source
}

/// Negate every channel (`255 - c`).
pub fn invert(mut source: PixelBuffer) -> PixelBuffer {
    source.map_in_place(|c| 0x00FF_FFFF & !c);
    source
}

/// Remap channels through a lookup buffer.
///
/// A single-row map sends every channel through the red component of row 0.
/// A taller map sends red through row 0 (red), green through row 1 (green)
/// and blue through row 2 (blue).
///
/// The map must be at least [`TONE_MAP_WIDTH`] wide and either one or at
/// least three rows tall, otherwise `InvalidDimensions`.
pub fn tone_map(mut source: PixelBuffer, map: &PixelBuffer) -> BenchResult<PixelBuffer> {
    if map.width() < TONE_MAP_WIDTH {
        return Err(BenchError::invalid_dimensions(format!(
            "tone map must be at least {} wide, got {}",
            TONE_MAP_WIDTH,
            map.width()
        )));
    }
    if map.height() == 2 {
        return Err(BenchError::invalid_dimensions(
            "tone map must have one row or one row per channel",
        ));
    }

    let lut = map.as_slice();
    let stride = map.width() as usize;
    let single_row = map.height() == 1;

    source.map_in_place(|c| {
        let (r, g, b) = unpack(c);
        let (r, g, b) = if single_row {
            (
                red(lut[r as usize]),
                red(lut[g as usize]),
                red(lut[b as usize]),
            )
        } else {
            (
                red(lut[r as usize]),
                green(lut[stride + g as usize]),
                blue(lut[2 * stride + b as usize]),
            )
        };
        pack_color(r as i32, g as i32, b as i32)
    });
    Ok(source)
}
