//! Deterministic backends shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::convert::Infallible;

use pillar_layout::{
    Canvas, Dim, GeometryOnly, GeometryNode, ImageBackend, Instruction, LayoutContext,
    LayoutError, LengthUnit, PixelBox, TextBackend,
};

/// Advance of every glyph, as a fraction of the pixel size.
pub const ADVANCE: f32 = 0.5;

/// A stand-in image: just a size and a tag to tell sources apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeImage {
    pub width: u32,
    pub height: u32,
    pub tag: &'static str,
}

impl FakeImage {
    pub const fn new(width: u32, height: u32, tag: &'static str) -> Self {
        Self { width, height, tag }
    }
}

/// Monospace text metrics and size-only images. Counts resizes.
#[derive(Debug, Default)]
pub struct MonoBackend {
    pub resizes: Cell<usize>,
}

impl ImageBackend for MonoBackend {
    type Image = FakeImage;

    fn native_size(&self, image: &FakeImage) -> (u32, u32) {
        (image.width, image.height)
    }

    fn resize(&self, image: &FakeImage, width: u32, height: u32) -> Result<FakeImage, LayoutError> {
        self.resizes.set(self.resizes.get() + 1);
        Ok(FakeImage::new(width, height, image.tag))
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
impl TextBackend for MonoBackend {
    fn measure_width(&self, text: &str, font: &str, pixel_size: f32) -> Result<f32, LayoutError> {
        if font.is_empty() {
            return Err(LayoutError::Backend("no font".to_string()));
        }
        Ok(text.chars().count() as f32 * pixel_size * ADVANCE)
    }

    fn render_lines(
        &self,
        lines: &[String],
        _font: &str,
        pixel_size: f32,
        line_spacing: f32,
    ) -> Result<FakeImage, LayoutError> {
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = (longest as f32 * pixel_size * ADVANCE) as u32;
        let n = lines.len() as f32;
        let height = (n * pixel_size + (n - 1.0).max(0.0) * line_spacing) as u32;
        Ok(FakeImage::new(width, height, "text"))
    }

    fn tight_bounds(&self, rendered: &FakeImage) -> Option<PixelBox> {
        (rendered.width > 0 && rendered.height > 0).then(|| PixelBox {
            left: 0,
            top: 0,
            right: i64::from(rendered.width),
            bottom: i64::from(rendered.height),
        })
    }

    fn crop(&self, image: &FakeImage, bounds: PixelBox) -> FakeImage {
        FakeImage::new(
            bounds.width() as u32,
            bounds.height() as u32,
            image.tag,
        )
    }
}

/// Canvas that records every paste.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub pastes: Vec<(FakeImage, (i64, i64))>,
}

impl Canvas for RecordingCanvas {
    type Image = FakeImage;

    fn paste(&mut self, image: &FakeImage, top_left: (i64, i64)) {
        self.pastes.push((image.clone(), top_left));
    }
}

/// Compute a geometry-only tree in inches at 1 dpi.
pub fn compute(node: &GeometryNode, width: f64, height: f64) -> Vec<Instruction<Infallible>> {
    compute_dim(node, &Dim::inches(width, height))
}

/// Compute a geometry-only tree against `constraint` at 1 dpi.
pub fn compute_dim(node: &GeometryNode, constraint: &Dim) -> Vec<Instruction<Infallible>> {
    node.compute(constraint, &LayoutContext::new(&GeometryOnly, 1.0))
        .unwrap()
        .into_vec()
}

/// Payload-less instruction in inches.
pub fn tlbr(top: f64, left: f64, bottom: f64, right: f64) -> Instruction<Infallible> {
    Instruction::tlbr(top, left, bottom, right, LengthUnit::Inch)
}
