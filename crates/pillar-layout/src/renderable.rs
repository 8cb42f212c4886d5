//! Leaf nodes: invisible boxes, images and wrapped text.
//!
//! Leaves terminate the tree. They ask the backend for native sizes (and, for
//! text, glyph metrics and a rendered block) and report one instruction sized
//! to fit the constraint.

use pillar_common::warning::warn_once;

use crate::backend::{ImageBackend, TextBackend};
use crate::context::LayoutContext;
use crate::error::LayoutError;
use crate::instruction::{Instruction, InstructionList};
use crate::trace::TracePath;
use crate::units::{Dim, Extent, LengthUnit, Unit};

/// Scale `size` to fit inside `container`, preserving its aspect ratio.
///
/// An unconstrained container axis does not limit the scale; a fully
/// unconstrained container returns `size` unchanged. With `can_expand` false
/// the scale is capped at 1, so content is never enlarged. A zero-sized
/// `size` axis gives no usable ratio and is also returned unchanged.
///
/// # Errors
///
/// Returns [`LayoutError::Unconstrained`] if `size` is not fully defined, or
/// [`LayoutError::UnitMismatch`] if `size` and `container` disagree on units.
pub fn scaled_dim(size: &Dim, container: &Dim, can_expand: bool) -> Result<Dim, LayoutError> {
    let (width, height) = size.defined_size("scaled size")?;
    let ratio = match (container.width, container.height) {
        (Extent::Unconstrained, Extent::Unconstrained) => return Ok(*size),
        (Extent::Unconstrained, Extent::Defined(h)) => h.ratio(height)?,
        (Extent::Defined(w), Extent::Unconstrained) => w.ratio(width)?,
        (Extent::Defined(w), Extent::Defined(h)) => w.ratio(width)?.min(h.ratio(height)?),
    };
    if !ratio.is_finite() {
        return Ok(*size);
    }
    let ratio = if can_expand { ratio } else { ratio.min(1.0) };
    Ok(*size * ratio)
}

/// Unit the leaves report native sizes in: the constraint's own unit, or the
/// context's default when the constraint carries none.
fn report_unit<B>(
    constraint: &Dim,
    cx: &LayoutContext<'_, B>,
) -> Result<LengthUnit, LayoutError> {
    Ok(constraint.unit()?.unwrap_or(cx.default_unit()))
}

fn single<I>(instruction: Instruction<I>) -> InstructionList<I> {
    InstructionList::from(vec![instruction])
}

/// An invisible box with a size. Used as a spacer or placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmptyBox {
    /// Native width.
    pub width: Unit,
    /// Native height.
    pub height: Unit,
    /// Whether the box may scale up to fill its constraint.
    pub can_expand: bool,
    /// Whether containers leave this box's size alone when shrinking.
    pub is_spacer: bool,
}

impl EmptyBox {
    /// A spacer box of native size `width` by `height` that never enlarges.
    #[must_use]
    pub const fn new(width: Unit, height: Unit) -> Self {
        Self {
            width,
            height,
            can_expand: false,
            is_spacer: true,
        }
    }

    /// [`EmptyBox::new`] in inches.
    #[must_use]
    pub const fn inches(width: f64, height: f64) -> Self {
        Self::new(Unit::inches(width), Unit::inches(height))
    }

    /// A square box `side` inches wide.
    #[must_use]
    pub const fn square(side: f64) -> Self {
        Self::inches(side, side)
    }

    /// Set whether containers may shrink this box.
    #[must_use]
    pub const fn with_spacer(mut self, is_spacer: bool) -> Self {
        self.is_spacer = is_spacer;
        self
    }

    /// Set whether this box may scale up to fill its constraint.
    #[must_use]
    pub const fn with_expand(mut self, can_expand: bool) -> Self {
        self.can_expand = can_expand;
        self
    }

    /// Native (unscaled) size.
    #[must_use]
    pub fn dim(&self) -> Dim {
        Dim::new(self.width, self.height)
    }

    /// One payload-less instruction of the native size scaled to fit
    /// `constraint`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the box and the constraint
    /// disagree on units.
    pub fn compute<I, B: ImageBackend>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
        path: &TracePath,
    ) -> Result<InstructionList<I>, LayoutError> {
        let size = scaled_dim(&self.dim(), constraint, self.can_expand)?;
        let instruction = Instruction::from_dim(&size, None)?.with_trace(cx.trace(path));
        Ok(single(instruction))
    }
}

/// An image leaf. Always allowed to scale up.
#[derive(Debug, Clone)]
pub struct ImageRenderable<I> {
    /// Source image, passed through unresized as the payload. The final
    /// resample happens once, at compositing time.
    pub image: I,
}

impl<I: Clone> ImageRenderable<I> {
    /// Wrap a backend image.
    #[must_use]
    pub const fn new(image: I) -> Self {
        Self { image }
    }

    /// Native size, converted from pixels to `unit`.
    ///
    /// # Errors
    ///
    /// Propagates unit conversion failures.
    pub fn dim<B: ImageBackend<Image = I>>(
        &self,
        unit: LengthUnit,
        cx: &LayoutContext<'_, B>,
    ) -> Result<Dim, LayoutError> {
        let (width, height) = cx.backend().native_size(&self.image);
        Dim::pixels(f64::from(width), f64::from(height)).to_unit(unit, cx.resolution())
    }

    /// One instruction carrying the image, scaled to fit `constraint`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the constraint's axes
    /// disagree on units.
    pub fn compute<B: ImageBackend<Image = I>>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
        path: &TracePath,
    ) -> Result<InstructionList<I>, LayoutError> {
        let native = self.dim(report_unit(constraint, cx)?, cx)?;
        let size = scaled_dim(&native, constraint, true)?;
        let instruction =
            Instruction::from_dim(&size, Some(self.image.clone()))?.with_trace(cx.trace(path));
        Ok(single(instruction))
    }
}

/// Words packed onto one line while wrapping.
#[derive(Debug, Default)]
struct Line<'t> {
    words: Vec<&'t str>,
    total: f64,
}

impl<'t> Line<'t> {
    #[allow(clippy::cast_precision_loss)]
    fn overflows(&self, width: f64, space: f64, available: f64) -> bool {
        self.total + self.words.len() as f64 * space + width > available
    }

    fn add(&mut self, word: &'t str, width: f64) {
        self.words.push(word);
        self.total += width;
    }

    fn join(&self) -> String {
        self.words.join(" ")
    }
}

/// A block of text wrapped to the constraint's width.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRenderable {
    /// The text. Existing newlines are treated as ordinary whitespace.
    pub text: String,
    /// Font key understood by the text backend (usually a font file path).
    pub font: String,
    /// Font size (the em size, not the line box).
    pub size: Unit,
}

impl TextRenderable {
    /// Text in `font` at `size`.
    #[must_use]
    pub fn new(text: impl Into<String>, font: impl Into<String>, size: Unit) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            size,
        }
    }

    /// Font size in whole pixels at `resolution`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pixel_size(&self, resolution: f64) -> f32 {
        self.size.to_px(resolution).value().trunc() as f32
    }

    /// Split the text into lines that fit the constraint's pixel width.
    ///
    /// Runs of whitespace, newlines included, collapse to single spaces. The
    /// whole text stays on one line if it fits, or if the constraint is fully
    /// unconstrained. Otherwise words are packed greedily. A word wider than
    /// the line is placed alone on its line and reported.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Backend`] if the font cannot be resolved.
    pub fn wrap<B: TextBackend>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
    ) -> Result<Vec<String>, LayoutError> {
        let words: Vec<&str> = self.text.split_whitespace().collect();
        let text = words.join(" ");
        if constraint.is_unconstrained() {
            return Ok(vec![text]);
        }
        let backend = cx.backend();
        let px = self.pixel_size(cx.resolution());
        let (available, _) = constraint
            .to_px(cx.resolution())?
            .defined_size("text wrap")?;
        let available = available.value();

        let measure = |text: &str| -> Result<f64, LayoutError> {
            Ok(f64::from(backend.measure_width(text, &self.font, px)?))
        };

        if measure(&text)? <= available {
            return Ok(vec![text]);
        }

        let space = measure(" ")?;
        let mut lines = Vec::new();
        let mut line = Line::default();
        for word in words {
            let width = measure(word)?;
            if width > available {
                warn_once(
                    "layout",
                    &format!("word '{word}' ({width}px) is wider than the {available}px line"),
                );
            }
            if !line.words.is_empty() && line.overflows(width, space, available) {
                lines.push(std::mem::take(&mut line).join());
            }
            line.add(word, width);
        }
        if !line.words.is_empty() {
            lines.push(line.join());
        }
        Ok(lines)
    }

    /// Wrap, render and crop the text into one instruction of its inked
    /// size. Blank text yields a single zero-size instruction with no
    /// payload.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Backend`] if the font cannot be resolved.
    pub fn compute<B: TextBackend>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
        path: &TracePath,
    ) -> Result<InstructionList<B::Image>, LayoutError> {
        let trace = cx.trace(path);
        let empty = || -> Result<InstructionList<B::Image>, LayoutError> {
            let size = Dim::new(Unit::zero(), Unit::zero());
            Ok(single(Instruction::from_dim(&size, None)?.with_trace(trace.clone())))
        };
        if self.text.trim().is_empty() {
            return empty();
        }

        let backend = cx.backend();
        let lines = self.wrap(constraint, cx)?;
        let px = self.pixel_size(cx.resolution());
        let line_spacing = (px / 8.0).trunc();
        let rendered = backend.render_lines(&lines, &self.font, px, line_spacing)?;
        let Some(bounds) = backend
            .tight_bounds(&rendered)
            .filter(|bounds| !bounds.is_empty())
        else {
            return empty();
        };
        tracing::debug!(lines = lines.len(), %bounds, "text rendered");

        let cropped = backend.crop(&rendered, bounds);
        #[allow(clippy::cast_precision_loss)]
        let size = Dim::pixels(bounds.width() as f64, bounds.height() as f64)
            .to_unit(report_unit(constraint, cx)?, cx.resolution())?;
        Ok(single(
            Instruction::from_dim(&size, Some(cropped))?.with_trace(trace),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_overflow_counts_spaces() {
        let mut line = Line::default();
        line.add("ab", 2.0);
        line.add("cd", 2.0);
        // 4 + 2 spaces + 1 = 7
        assert!(!line.overflows(1.0, 1.0, 7.0));
        assert!(line.overflows(1.0, 1.0, 6.9));
        assert_eq!(line.join(), "ab cd");
    }

    #[test]
    fn test_scaled_dim_zero_axis_is_unchanged() {
        let size = Dim::inches(0.0, 1.0);
        let scaled = scaled_dim(&size, &Dim::new(Unit::inches(2.0), Extent::Unconstrained), true)
            .unwrap();
        assert_eq!(scaled, size);
    }
}
