//! Feeding a computed instruction list to a [`Canvas`].

use std::borrow::Cow;

use pillar_common::warning::warn_once;

use crate::backend::{Canvas, ImageBackend};
use crate::error::LayoutError;
use crate::instruction::InstructionList;

/// Paste every payload-carrying instruction of `list` onto `canvas`, in list
/// order, and return how many were pasted.
///
/// Each payload is resampled at most once, straight from its source to the
/// instruction's final pixel size; a payload already at that size is pasted
/// as is. Instructions whose pixel size truncates to nothing (including the
/// negative sizes a starved flex slot produces) are skipped with a warning.
///
/// # Errors
///
/// Returns [`LayoutError::Backend`] if the backend fails to resample, or
/// [`LayoutError::UnitMismatch`] if an instruction's edges disagree on units.
pub fn render_instructions<B, C>(
    list: &InstructionList<B::Image>,
    backend: &B,
    canvas: &mut C,
    resolution: f64,
) -> Result<usize, LayoutError>
where
    B: ImageBackend,
    C: Canvas<Image = B::Image>,
{
    let mut pasted = 0;
    for inst in list.drawable() {
        let Some(payload) = inst.payload.as_ref() else {
            continue;
        };
        let size = inst.size()?;
        let px = size.to_px(resolution)?;
        let (width, height) = px.defined_size("composite")?;
        if width.value() < 1.0 || height.value() < 1.0 {
            warn_once(
                "composite",
                &format!("skipping instruction too small to draw: {inst}"),
            );
            continue;
        }
        let size_px = size.pixel_size(resolution)?;

        let sized = if backend.native_size(payload) == size_px {
            Cow::Borrowed(payload)
        } else {
            tracing::debug!(?size_px, "resizing payload for paste");
            Cow::Owned(backend.resize(payload, size_px.0, size_px.1)?)
        };
        canvas.paste(&sized, inst.top_left_px(resolution));
        pasted += 1;
    }
    Ok(pasted)
}
