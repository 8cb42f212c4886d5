//! In-memory RGBA compositing target.

use std::path::Path;

use anyhow::Result;
use image::{Rgba, RgbaImage};
use pillar_layout::Canvas;

use crate::Raster;

/// Alpha blend a foreground color onto a background color.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;
    let out_alpha = f32::from(bg[3]).mul_add(inv_a, f32::from(alpha));

    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        out_alpha.round().min(255.0) as u8,
    ])
}

/// A pixel buffer that payloads are pasted onto in paint order.
#[derive(Debug, Clone)]
pub struct RgbaCanvas {
    buffer: RgbaImage,
}

impl RgbaCanvas {
    /// A `width` by `height` canvas filled with `background`.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            buffer: RgbaImage::from_pixel(width, height, background),
        }
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// The composited pixels.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Consume the canvas, returning its pixels.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    /// Write the canvas to `path`; the format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be encoded or written.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer
            .save(path)
            .map_err(|e| anyhow::anyhow!("failed to save image to '{}': {e}", path.display()))?;
        Ok(())
    }
}

impl Canvas for RgbaCanvas {
    type Image = Raster;

    /// Pixels falling outside the canvas are dropped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn paste(&mut self, image: &Raster, top_left: (i64, i64)) {
        let (dest_x, dest_y) = top_left;
        let (width, height) = (i64::from(self.width()), i64::from(self.height()));
        for (sx, sy, &src) in image.enumerate_pixels() {
            let px = dest_x + i64::from(sx);
            let py = dest_y + i64::from(sy);
            if px < 0 || py < 0 || px >= width || py >= height {
                continue;
            }
            let alpha = src[3];
            if alpha == 0 {
                continue;
            }
            let pixel = self.buffer.get_pixel_mut(px as u32, py as u32);
            *pixel = if alpha == 255 {
                src
            } else {
                alpha_blend(src, *pixel, alpha)
            };
        }
    }
}
