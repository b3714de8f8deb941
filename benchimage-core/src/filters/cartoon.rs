// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Cartoonizer: grayscale → invert → gaussian blur → color dodge.

use crate::error::{BenchError, BenchResult};
use crate::filters::color::{grayscale, invert};
use crate::filters::convolve::{convolve, Kernel};
use crate::pixel::{pack_color, unpack, PixelBuffer};

/// Divisor of the blur stage. Slightly above the kernel sum (16), which
/// darkens the blurred layer a touch.
pub const CARTOON_BLUR_DIVISOR: f64 = 16.02;

/// Color dodge of one channel.
///
/// `base` comes from the grayscale layer and drives the denominator;
/// `blend` comes from the blurred layer and is the numerator.
#[inline]
pub fn color_dodge(base: u8, blend: u8) -> u8 {
    if base == 255 {
        return 255;
    }
    let divisor = (255 - base as u32).max(1);
    (((blend as u32) << 8) / divisor).min(255) as u8
}

/// Dodge `blended` over `base`, channel by channel. The two layers must
/// have the same dimensions.
pub fn color_dodge_blend(blended: PixelBuffer, base: &PixelBuffer) -> BenchResult<PixelBuffer> {
    if blended.width() != base.width() || blended.height() != base.height() {
        return Err(BenchError::invalid_dimensions(format!(
            "blend layers differ: {}x{} vs {}x{}",
            blended.width(),
            blended.height(),
            base.width(),
            base.height()
        )));
    }

    let mut out = blended;
    for (dst, &b) in out.as_mut_slice().iter_mut().zip(base.as_slice()) {
        let (lr, lg, lb) = unpack(*dst);
        let (br, bg, bb) = unpack(b);
        *dst = pack_color(
            color_dodge(br, lr) as i32,
            color_dodge(bg, lg) as i32,
            color_dodge(bb, lb) as i32,
        );
    }
    Ok(out)
}

/// Full cartoonizer pipeline. Stage order is fixed:
///
/// 1. `gray = grayscale(source)`, kept for the final blend
/// 2. `inverted = invert(gray)`
/// 3. `blurred = convolve(inverted, [[1,2,1],[2,4,2],[1,2,1]], 1/16.02, 0)`
/// 4. `color_dodge_blend(blurred, gray)`
pub fn cartoonize(source: PixelBuffer) -> BenchResult<PixelBuffer> {
    let gray = grayscale(source);
    let inverted = invert(gray.clone());
    let blurred = convolve(inverted, &Kernel::gaussian_3x3(), 1.0 / CARTOON_BLUR_DIVISOR, 0.0)?;
    color_dodge_blend(blurred, &gray)
}
