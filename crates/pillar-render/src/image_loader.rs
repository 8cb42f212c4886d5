//! Image loading: read, detect format, and decode into a [`Raster`].
//!
//! 1. **Detect** - [`detect_format()`] decides between SVG and raster from
//!    the file extension, then by sniffing the leading bytes.
//! 2. **Decode** - the [`ImageDecoder`] trait, with [`SvgDecoder`] and
//!    [`RasterDecoder`] implementations.
//!
//! [`ImageLoaderPipeline`] ties these together; [`load_image`] reads a local
//! file through the default pipeline.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};

use crate::Raster;

/// Detected image format.
///
/// The `image` crate sniffs raster sub-formats (PNG, JPEG, GIF, ...) itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// SVG vector image (decoded via usvg + resvg).
    Svg,
    /// Raster image (decoded via the `image` crate).
    Raster,
}

/// Detect whether `bytes` are an SVG or a raster image.
///
/// A `.svg` extension on `path` wins; otherwise the first 256 bytes after
/// leading whitespace are checked for `<?xml` or `<svg`. Anything else is
/// [`ImageFormat::Raster`].
#[must_use]
pub fn detect_format(path: &Path, bytes: &[u8]) -> ImageFormat {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    {
        return ImageFormat::Svg;
    }

    let trimmed = bytes
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(256)
        .copied()
        .collect::<Vec<u8>>();

    if trimmed.starts_with(b"<?xml") || trimmed.starts_with(b"<svg") {
        return ImageFormat::Svg;
    }

    ImageFormat::Raster
}

/// A decoder that turns raw bytes into RGBA pixels.
pub trait ImageDecoder {
    /// Human-readable name (for diagnostics).
    fn name(&self) -> &'static str;

    /// Whether this decoder handles the given format.
    fn supports(&self, format: ImageFormat) -> bool;

    /// Attempt to decode `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the bytes cannot be decoded by this decoder.
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, String>;
}

/// Rasterizes SVG documents at their intrinsic size.
pub struct SvgDecoder;

impl ImageDecoder for SvgDecoder {
    fn name(&self) -> &'static str {
        "SVG (resvg)"
    }

    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Svg
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, String> {
        let opts = usvg::Options::default();
        let tree =
            usvg::Tree::from_data(bytes, &opts).map_err(|e| format!("failed to parse SVG: {e}"))?;

        let size = tree.size();
        let (w, h) = (size.width().ceil() as u32, size.height().ceil() as u32);
        if w == 0 || h == 0 {
            return Err("SVG has zero-size dimensions".to_string());
        }

        let mut pixmap = tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| "failed to allocate pixmap for SVG".to_string())?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied color
        let mut image = RgbaImage::new(w, h);
        for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
            let color = src.demultiply();
            *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        Ok(image)
    }
}

/// Decodes raster images (PNG, JPEG, GIF, WebP, ...) via the `image` crate.
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn name(&self) -> &'static str {
        "Raster (image crate)"
    }

    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Raster
    }

    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, String> {
        let dynamic_img =
            image::load_from_memory(bytes).map_err(|e| format!("could not decode image ({e})"))?;
        Ok(dynamic_img.to_rgba8())
    }
}

/// Detects the format of image bytes and dispatches to a decoder.
pub struct ImageLoaderPipeline {
    decoders: Vec<Box<dyn ImageDecoder>>,
}

impl ImageLoaderPipeline {
    /// Create a pipeline with the default decoders (SVG + raster).
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: vec![Box::new(SvgDecoder), Box::new(RasterDecoder)],
        }
    }

    /// Detect the format of `bytes` (using `path` for its extension) and
    /// decode them.
    ///
    /// # Errors
    ///
    /// Returns an error string if no decoder supports the detected format or
    /// if decoding fails.
    pub fn decode(&self, bytes: &[u8], path: &Path) -> Result<Raster, String> {
        let format = detect_format(path, bytes);

        for decoder in &self.decoders {
            if decoder.supports(format) {
                tracing::debug!(decoder = decoder.name(), path = %path.display(), "decoding image");
                return decoder.decode(bytes).map(Arc::new);
            }
        }

        Err(format!("no decoder available for format {format:?}"))
    }
}

impl Default for ImageLoaderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and decode the image file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_image(path: &Path) -> Result<Raster> {
    let bytes = fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    ImageLoaderPipeline::new()
        .decode(&bytes, path)
        .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_svg_by_extension() {
        assert_eq!(
            detect_format(Path::new("logo.SVG"), b"\x89PNG"),
            ImageFormat::Svg
        );
    }

    #[test]
    fn test_detect_svg_by_content() {
        let bytes = b"  \n<svg xmlns='http://www.w3.org/2000/svg'/>";
        assert_eq!(detect_format(Path::new("logo"), bytes), ImageFormat::Svg);
        assert_eq!(
            detect_format(Path::new("doc.xml"), b"<?xml version='1.0'?>"),
            ImageFormat::Svg
        );
    }

    #[test]
    fn test_detect_raster_by_default() {
        assert_eq!(
            detect_format(Path::new("photo.png"), b"\x89PNG\r\n"),
            ImageFormat::Raster
        );
    }
}
