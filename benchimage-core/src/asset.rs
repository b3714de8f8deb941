// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Asset sources: where a task gets the encoded bytes of its input image.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::codec::Codec;
use crate::error::{BenchError, BenchResult};
use crate::pixel::{pack_color, PixelBuffer};
use crate::types::{ImageId, JpegQuality, SizeLabel};

/// Loads encoded images by identifier and size.
pub trait AssetSource: Send + Sync + fmt::Debug {
    /// Encoded bytes of `image` at `size`. Fails with `NotFound`.
    fn load(&self, image: &ImageId, size: SizeLabel) -> BenchResult<Vec<u8>>;
}

fn not_found(image: &ImageId, size: SizeLabel) -> BenchError {
    BenchError::NotFound {
        image_id: image.to_string(),
        size,
    }
}

/// Preloaded assets keyed by image and size.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssetSource {
    assets: HashMap<(ImageId, SizeLabel), Arc<[u8]>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the bytes for `image` at `size`.
    pub fn insert(&mut self, image: ImageId, size: SizeLabel, bytes: impl Into<Arc<[u8]>>) {
        self.assets.insert((image, size), bytes.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, image: ImageId, size: SizeLabel, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(image, size, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetSource for MemoryAssetSource {
    fn load(&self, image: &ImageId, size: SizeLabel) -> BenchResult<Vec<u8>> {
        self.assets
            .get(&(image.clone(), size.concrete()))
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| not_found(image, size))
    }
}

/// Assets on disk, one directory per size: `{root}/{0_3mp|1mp|2mp|4mp|8mp}/{image}`.
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path the asset would be read from.
    pub fn path_for(&self, image: &ImageId, size: SizeLabel) -> PathBuf {
        self.root
            .join(size.concrete().dir_name())
            .join(image.as_str())
    }
}

impl AssetSource for DirAssetSource {
    fn load(&self, image: &ImageId, size: SizeLabel) -> BenchResult<Vec<u8>> {
        let path = self.path_for(image, size);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Asset missing");
                Err(not_found(image, size))
            }
            Err(e) => Err(BenchError::Io {
                context: "reading asset",
                source: e,
            }),
        }
    }
}

/// Renders a deterministic test card at the size's nominal dimensions and
/// encodes it, so runs need no image files. Every identifier resolves.
#[derive(Debug, Clone)]
pub struct SyntheticAssetSource {
    codec: Arc<dyn Codec>,
    quality: JpegQuality,
    /// Divides both dimensions; 1 renders full size.
    scale_down: u32,
}

impl SyntheticAssetSource {
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self {
            codec,
            quality: JpegQuality::SOURCE,
            scale_down: 1,
        }
    }

    /// Shrink every rendered image by `factor` in both dimensions.
    pub fn scale_down(mut self, factor: u32) -> Self {
        self.scale_down = factor.max(1);
        self
    }

    /// Pixel buffer the source renders for `size`.
    pub fn render(&self, size: SizeLabel) -> BenchResult<PixelBuffer> {
        let (w, h) = size.concrete().dimensions();
        let (w, h) = ((w / self.scale_down).max(1), (h / self.scale_down).max(1));
        PixelBuffer::from_fn(w, h, |x, y| {
            let r = (x * 255 / w) as i32;
            let g = (y * 255 / h) as i32;
            let b = if (x / 16 + y / 16) % 2 == 0 { 200 } else { 40 };
            pack_color(r, g, b)
        })
    }
}

impl AssetSource for SyntheticAssetSource {
    fn load(&self, _image: &ImageId, size: SizeLabel) -> BenchResult<Vec<u8>> {
        let buffer = self.render(size)?;
        self.codec.encode(&buffer, self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RawCodec;
    use tempfile::TempDir;

    fn id(name: &str) -> ImageId {
        ImageId::new(name).unwrap()
    }

    #[test]
    fn test_memory_source_lookup() {
        let source = MemoryAssetSource::new().with(id("img1.jpg"), SizeLabel::Mp2, vec![1u8, 2, 3]);
        assert_eq!(source.load(&id("img1.jpg"), SizeLabel::Mp2).unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            source.load(&id("img1.jpg"), SizeLabel::Mp4),
            Err(BenchError::NotFound { size: SizeLabel::Mp4, .. })
        ));
    }

    #[test]
    fn test_memory_source_all_resolves_to_1mp() {
        let source = MemoryAssetSource::new().with(id("a"), SizeLabel::Mp1, vec![9u8]);
        assert_eq!(source.load(&id("a"), SizeLabel::All).unwrap(), vec![9]);
    }

    #[test]
    fn test_dir_source_layout() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("0_3mp")).unwrap();
        std::fs::write(temp_dir.path().join("0_3mp").join("img5.jpg"), b"jpeg").unwrap();

        let source = DirAssetSource::new(temp_dir.path());
        assert_eq!(source.load(&id("img5.jpg"), SizeLabel::Mp03).unwrap(), b"jpeg");
        assert!(matches!(
            source.load(&id("img5.jpg"), SizeLabel::Mp8),
            Err(BenchError::NotFound { .. })
        ));
    }

    #[test]
    fn test_synthetic_source_dimensions() {
        let source = SyntheticAssetSource::new(Arc::new(RawCodec)).scale_down(16);
        let bytes = source.load(&id("anything"), SizeLabel::Mp03).unwrap();
        let decoded = RawCodec.decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));

        // deterministic
        assert_eq!(bytes, source.load(&id("other"), SizeLabel::Mp03).unwrap());
    }
}
