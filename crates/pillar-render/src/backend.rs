//! Raster image and text backend.
//!
//! [`RasterBackend`] implements the layout core's [`ImageBackend`] and
//! [`TextBackend`] on top of the `image` crate and `fontdue`. Payloads are
//! [`Raster`] handles, so cloning one into an instruction is a reference
//! count bump.

use std::path::Path;
use std::sync::Arc;

use fontdue::Font;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use pillar_layout::{ImageBackend, LayoutError, PixelBox, TextBackend};

use crate::Raster;
use crate::fonts::FontBook;

/// Sum of advance widths for `text`, skipping control characters.
fn advance_width(font: &Font, text: &str, pixel_size: f32) -> f32 {
    text.chars()
        .filter(|ch| !ch.is_control())
        .map(|ch| font.metrics(ch, pixel_size).advance_width)
        .sum()
}

/// Baseline offset and line box height for one line at `pixel_size`.
fn line_box(font: &Font, pixel_size: f32) -> (f32, f32) {
    font.horizontal_line_metrics(pixel_size)
        .map_or((pixel_size, pixel_size), |metrics| {
            (metrics.ascent, metrics.ascent - metrics.descent)
        })
}

/// Image and text backend producing RGBA rasters.
#[derive(Debug)]
pub struct RasterBackend {
    fonts: FontBook,
    text_color: Rgba<u8>,
}

impl Default for RasterBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend {
    /// Backend drawing black text, with an empty [`FontBook`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            fonts: FontBook::new(),
            text_color: Rgba([0, 0, 0, 255]),
        }
    }

    /// Set the color glyphs are drawn in.
    #[must_use]
    pub const fn with_text_color(mut self, color: Rgba<u8>) -> Self {
        self.text_color = color;
        self
    }

    /// Register the font file at `path` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn register_font_file(&self, key: impl Into<String>, path: &Path) -> anyhow::Result<()> {
        self.fonts.register_file(key, path)
    }

    /// The fonts this backend resolves text keys against.
    #[must_use]
    pub const fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Draw one rasterized glyph coverage map into `block` at `(x, y)`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    fn draw_glyph(&self, block: &mut RgbaImage, x: i32, y: i32, width: usize, coverage: &[u8]) {
        let Rgba([r, g, b, a]) = self.text_color;
        for (i, &alpha) in coverage.iter().enumerate() {
            if alpha == 0 {
                continue;
            }
            let px = x + (i % width) as i32;
            let py = y + (i / width) as i32;
            if px < 0 || py < 0 || px as u32 >= block.width() || py as u32 >= block.height() {
                continue;
            }
            let ink = ((u16::from(alpha) * u16::from(a)) / 255) as u8;
            let pixel = block.get_pixel_mut(px as u32, py as u32);
            // overlapping glyphs keep the stronger coverage
            *pixel = Rgba([r, g, b, pixel[3].max(ink)]);
        }
    }
}

impl ImageBackend for RasterBackend {
    type Image = Raster;

    fn native_size(&self, image: &Raster) -> (u32, u32) {
        image.dimensions()
    }

    fn resize(&self, image: &Raster, width: u32, height: u32) -> Result<Raster, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::Backend(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        Ok(Arc::new(imageops::resize(
            &**image,
            width,
            height,
            FilterType::CatmullRom,
        )))
    }
}

impl TextBackend for RasterBackend {
    fn measure_width(&self, text: &str, font: &str, pixel_size: f32) -> Result<f32, LayoutError> {
        let font = self.fonts.resolve(font)?;
        Ok(advance_width(&font, text, pixel_size))
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn render_lines(
        &self,
        lines: &[String],
        font: &str,
        pixel_size: f32,
        line_spacing: f32,
    ) -> Result<Raster, LayoutError> {
        let font = self.fonts.resolve(font)?;
        let (ascent, line_height) = line_box(&font, pixel_size);
        let pitch = line_height + line_spacing;

        let width = lines
            .iter()
            .map(|line| advance_width(&font, line, pixel_size))
            .fold(0.0_f32, f32::max)
            .ceil();
        let count = lines.len() as f32;
        let height = count.mul_add(pitch, -line_spacing).ceil();
        let mut block = RgbaImage::new(width.max(1.0) as u32, height.max(1.0) as u32);

        for (row, line) in lines.iter().enumerate() {
            let baseline = (row as f32).mul_add(pitch, ascent);
            let mut cursor_x = 0.0_f32;
            for ch in line.chars() {
                if ch.is_control() {
                    continue;
                }
                let (metrics, bitmap) = font.rasterize(ch, pixel_size);
                let glyph_x = cursor_x as i32 + metrics.xmin;
                let glyph_y = baseline as i32
                    - metrics.ymin
                    - i32::try_from(metrics.height).unwrap_or(i32::MAX);
                if metrics.width > 0 {
                    self.draw_glyph(&mut block, glyph_x, glyph_y, metrics.width, &bitmap);
                }
                cursor_x += metrics.advance_width;
            }
        }
        tracing::debug!(
            lines = lines.len(),
            width = block.width(),
            height = block.height(),
            "rendered text block"
        );
        Ok(Arc::new(block))
    }

    fn tight_bounds(&self, rendered: &Raster) -> Option<PixelBox> {
        let mut bounds: Option<PixelBox> = None;
        for (x, y, pixel) in rendered.enumerate_pixels() {
            if pixel[3] == 0 {
                continue;
            }
            let (x, y) = (i64::from(x), i64::from(y));
            let b = bounds.get_or_insert(PixelBox {
                left: x,
                top: y,
                right: x + 1,
                bottom: y + 1,
            });
            b.left = b.left.min(x);
            b.top = b.top.min(y);
            b.right = b.right.max(x + 1);
            b.bottom = b.bottom.max(y + 1);
        }
        bounds
    }

    fn crop(&self, image: &Raster, bounds: PixelBox) -> Raster {
        let clamp = |v: i64| u32::try_from(v.max(0)).unwrap_or(u32::MAX);
        let cropped = imageops::crop_imm(
            &**image,
            clamp(bounds.left),
            clamp(bounds.top),
            clamp(bounds.width()),
            clamp(bounds.height()),
        );
        Arc::new(cropped.to_image())
    }
}
