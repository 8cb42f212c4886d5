//! Boundary with the external collaborators.
//!
//! The layout core never decodes, resamples, rasterizes or composites pixels
//! itself. Leaves ask an [`ImageBackend`] for native sizes and a
//! [`TextBackend`] for glyph metrics and rendered text blocks; the caller
//! hands the final list to a [`Canvas`] through
//! [`render_instructions`](crate::composite::render_instructions).
//!
//! [`GeometryOnly`] is a backend with no image type at all, for trees made of
//! boxes and containers only.

use std::convert::Infallible;

use crate::error::LayoutError;
use crate::instruction::PixelBox;

/// Image operations the core relies on.
pub trait ImageBackend {
    /// Opaque image handle carried as instruction payload. Cloned once per
    /// emitted instruction, so it should be cheap to clone (an `Arc`).
    type Image: Clone;

    /// Native `(width, height)` in pixels.
    fn native_size(&self, image: &Self::Image) -> (u32, u32);

    /// Resample to exactly `width` by `height` pixels, without cropping.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Backend`] if the backend cannot resample.
    fn resize(&self, image: &Self::Image, width: u32, height: u32)
    -> Result<Self::Image, LayoutError>;
}

/// Text operations the core relies on.
pub trait TextBackend: ImageBackend {
    /// Advance width of `text` in pixels.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Backend`] if `font` cannot be resolved.
    fn measure_width(&self, text: &str, font: &str, pixel_size: f32) -> Result<f32, LayoutError>;

    /// Rasterize `lines` top to bottom, `line_spacing` pixels apart, into one
    /// block with its origin at the top-left of the first line.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Backend`] if `font` cannot be resolved.
    fn render_lines(
        &self,
        lines: &[String],
        font: &str,
        pixel_size: f32,
        line_spacing: f32,
    ) -> Result<Self::Image, LayoutError>;

    /// Tight bounding box of the inked pixels, or `None` if nothing was drawn.
    fn tight_bounds(&self, rendered: &Self::Image) -> Option<PixelBox>;

    /// Copy of `image` restricted to `bounds`.
    fn crop(&self, image: &Self::Image, bounds: PixelBox) -> Self::Image;
}

/// Compositing sink that receives payloads in paint order.
pub trait Canvas {
    /// Image type accepted by [`Canvas::paste`].
    type Image;

    /// Draw `image` with its top-left corner at `top_left` (pixels). Later
    /// pastes draw over earlier ones.
    fn paste(&mut self, image: &Self::Image, top_left: (i64, i64));
}

/// Backend for geometry-only trees (boxes, containers and transforms).
///
/// Its image type is uninhabited, so no instruction can carry a payload.
/// Text nodes fail with [`LayoutError::Backend`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryOnly;

impl ImageBackend for GeometryOnly {
    type Image = Infallible;

    fn native_size(&self, image: &Infallible) -> (u32, u32) {
        match *image {}
    }

    fn resize(&self, image: &Infallible, _: u32, _: u32) -> Result<Infallible, LayoutError> {
        match *image {}
    }
}

impl TextBackend for GeometryOnly {
    fn measure_width(&self, _: &str, _: &str, _: f32) -> Result<f32, LayoutError> {
        Err(LayoutError::Backend(
            "geometry-only backend cannot measure text".to_string(),
        ))
    }

    fn render_lines(&self, _: &[String], _: &str, _: f32, _: f32) -> Result<Infallible, LayoutError> {
        Err(LayoutError::Backend(
            "geometry-only backend cannot render text".to_string(),
        ))
    }

    fn tight_bounds(&self, rendered: &Infallible) -> Option<PixelBox> {
        match *rendered {}
    }

    fn crop(&self, image: &Infallible, _: PixelBox) -> Infallible {
        match *image {}
    }
}
