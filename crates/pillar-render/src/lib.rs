//! Raster backend for the pillar layout engine.
//!
//! # Scope
//!
//! This crate provides:
//! - **Image backend** - native sizes and single-pass resampling of RGBA
//!   rasters
//! - **Text backend** - glyph metrics and rasterized text blocks via
//!   `fontdue`, with system font fallback
//! - **Compositing** - an RGBA canvas with alpha blending and edge clipping
//! - **Image loading** - local raster and SVG files
//!
//! # Not Yet Implemented
//!
//! - Loading images over the network
//! - Bold and italic font variants

/// Raster image and text backend.
pub mod backend;
/// RGBA compositing canvas.
pub mod canvas;
/// Font lookup and system font fallback.
pub mod fonts;
/// Reading and decoding image files.
pub mod image_loader;

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use pillar_layout::{
    Dim, Direction, Extent, InstructionList, LayoutContext, LayoutError, Node, render_instructions,
};

pub use backend::RasterBackend;
pub use canvas::RgbaCanvas;
pub use fonts::FontBook;
pub use image_loader::{ImageLoaderPipeline, load_image};

/// Shared RGBA raster: the payload type of [`RasterBackend`].
pub type Raster = Arc<RgbaImage>;

/// The result of laying out and compositing one tree.
#[derive(Debug)]
pub struct Rendered {
    /// The composited pixels.
    pub canvas: RgbaCanvas,
    /// The placements the canvas was painted from.
    pub instructions: InstructionList<Raster>,
    /// How many payloads were pasted.
    pub pasted: usize,
}

/// Fill each unconstrained axis of `constraint` with the extent the
/// computed list actually covers.
fn canvas_dim(constraint: &Dim, list: &InstructionList<Raster>) -> Result<Dim, LayoutError> {
    let axis = |extent: Extent, direction| match extent {
        Extent::Defined(unit) => Ok(unit),
        Extent::Unconstrained => list.extent_or_zero(direction),
    };
    Ok(Dim::new(
        axis(constraint.width, Direction::Horizontal)?,
        axis(constraint.height, Direction::Vertical)?,
    ))
}

/// Compute `node` against `constraint` and composite the result onto a
/// fresh canvas filled with `background`.
///
/// The canvas takes the constraint's pixel size; an unconstrained axis is
/// sized to the content.
///
/// # Errors
///
/// Returns any [`LayoutError`] raised while computing or compositing.
pub fn render_to_canvas(
    node: &Node<Raster>,
    constraint: &Dim,
    cx: &LayoutContext<'_, RasterBackend>,
    background: Rgba<u8>,
) -> Result<Rendered, LayoutError> {
    let instructions = node.compute(constraint, cx)?;
    let (width, height) = canvas_dim(constraint, &instructions)?.pixel_size(cx.resolution())?;
    tracing::debug!(width, height, count = instructions.len(), "compositing");

    let mut canvas = RgbaCanvas::new(width, height, background);
    let pasted = render_instructions(&instructions, cx.backend(), &mut canvas, cx.resolution())?;
    Ok(Rendered {
        canvas,
        instructions,
        pasted,
    })
}
