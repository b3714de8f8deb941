// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Filter algorithms over [`PixelBuffer`].
//!
//! Every algorithm takes the buffer by value and hands back the transformed
//! buffer, which may or may not reuse the same storage.

pub mod cartoon;
pub mod color;
pub mod convolve;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use cartoon::{cartoonize, color_dodge, color_dodge_blend};
pub use color::{grayscale, invert, luma, sepia, tone_map};
pub use convolve::{convolve, Kernel};

use crate::error::BenchResult;
use crate::pixel::PixelBuffer;
use crate::types::FilterName;

/// A pixel transform a strategy can run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    #[default]
    GreyScale,
    Sepia,
    /// 3x3 box blur, factor 1/9.
    Blur,
    /// 3x3 sharpen, factor 1.
    Sharpen,
    Cartoonizer,
}

impl FilterKind {
    /// The transform behind a requested filter. `Original` and `Benchmark`
    /// are not transforms.
    pub fn from_name(name: FilterName) -> Option<Self> {
        match name {
            FilterName::GreyScale => Some(Self::GreyScale),
            FilterName::Sepia => Some(Self::Sepia),
            FilterName::Blur => Some(Self::Blur),
            FilterName::Sharpen => Some(Self::Sharpen),
            FilterName::Cartoonizer => Some(Self::Cartoonizer),
            FilterName::Original | FilterName::Benchmark => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::GreyScale => "GreyScale",
            Self::Sepia => "Sepia",
            Self::Blur => "Blur",
            Self::Sharpen => "Sharpen",
            Self::Cartoonizer => "Cartoonizer",
        }
    }

    /// Run the transform.
    pub fn apply(self, source: PixelBuffer) -> BenchResult<PixelBuffer> {
        match self {
            Self::GreyScale => Ok(grayscale(source)),
            Self::Sepia => Ok(sepia(source)),
            Self::Blur => convolve(source, &Kernel::box_3x3(), 1.0 / 9.0, 0.0),
            Self::Sharpen => convolve(source, &Kernel::sharpen_3x3(), 1.0, 0.0),
            Self::Cartoonizer => cartoonize(source),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::pack_color;

    #[test]
    fn test_from_name() {
        assert_eq!(FilterKind::from_name(FilterName::Sepia), Some(FilterKind::Sepia));
        assert_eq!(FilterKind::from_name(FilterName::Original), None);
        assert_eq!(FilterKind::from_name(FilterName::Benchmark), None);
    }

    #[test]
    fn test_flat_field_is_fixed_by_blur_and_sharpen() {
        let flat = PixelBuffer::filled(4, 3, pack_color(40, 80, 120)).unwrap();
        assert_eq!(FilterKind::Blur.apply(flat.clone()).unwrap(), flat);
        assert_eq!(FilterKind::Sharpen.apply(flat.clone()).unwrap(), flat);
    }

    #[test]
    fn test_every_kind_preserves_dimensions() {
        let src = PixelBuffer::from_fn(7, 3, |x, y| pack_color((x * 30) as i32, (y * 70) as i32, 5))
            .unwrap();
        for kind in [
            FilterKind::GreyScale,
            FilterKind::Sepia,
            FilterKind::Blur,
            FilterKind::Sharpen,
            FilterKind::Cartoonizer,
        ] {
            let out = kind.apply(src.clone()).unwrap();
            assert_eq!((out.width(), out.height()), (7, 3), "{}", kind);
        }
    }
}
