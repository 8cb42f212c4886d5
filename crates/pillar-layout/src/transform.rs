//! Single-child wrappers that change the constraint passed down and the
//! instructions passed back up.

use crate::backend::TextBackend;
use crate::context::LayoutContext;
use crate::error::LayoutError;
use crate::instruction::{Instruction, InstructionList};
use crate::node::Node;
use crate::trace::TracePath;
use crate::units::{Align, Dim, Direction, Extent, Unit};

/// Insets its child by `pad` on every side.
///
/// The result always ends with a payload-less instruction covering the
/// whole outer constraint, so the padded node reports its full footprint to
/// the container around it.
#[derive(Debug, Clone)]
pub struct Padding<I> {
    /// The wrapped node.
    pub child: Box<Node<I>>,
    /// Inset applied on each side.
    pub pad: Unit,
}

impl<I: Clone> Padding<I> {
    /// Pad `child` by `pad` on every side.
    #[must_use]
    pub fn new(child: impl Into<Node<I>>, pad: Unit) -> Self {
        Self {
            child: Box::new(child.into()),
            pad,
        }
    }

    /// The constraint handed to the child: `outer` minus `2 * pad` on each
    /// defined axis.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NegativeExtent`] if the padding does not fit, or
    /// [`LayoutError::UnitMismatch`] if `pad` and `outer` disagree on units.
    pub fn inner(&self, outer: &Dim) -> Result<Dim, LayoutError> {
        let pad2 = self.pad * 2.0;
        Dim {
            width: outer.width.try_map(|w| w.try_sub(pad2))?,
            height: outer.height.try_map(|h| h.try_sub(pad2))?,
        }
        .nonnegative()
    }

    /// Lay the child out inside the padded constraint.
    ///
    /// # Errors
    ///
    /// See [`Padding::inner`]; child failures propagate.
    pub fn compute<B: TextBackend<Image = I>>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
        path: &TracePath,
    ) -> Result<InstructionList<I>, LayoutError> {
        let inner = self.inner(constraint)?;
        tracing::debug!(outer = %constraint, pad = %self.pad, %inner, "padding");
        let list = self
            .child
            .compute_at(&inner, cx, &cx.wrapped_path(path, self.child.kind()))?;

        // An unconstrained outer axis takes its footprint from the content.
        let pad2 = self.pad * 2.0;
        let footprint_axis = |extent: Extent, direction: Direction| -> Result<Unit, LayoutError> {
            match extent {
                Extent::Defined(outer) => Ok(outer),
                Extent::Unconstrained => list.extent_or_zero(direction)?.try_add(pad2),
            }
        };
        let footprint = Dim::new(
            footprint_axis(constraint.width, Direction::Horizontal)?,
            footprint_axis(constraint.height, Direction::Vertical)?,
        );

        let mut list = list.offset2(&Dim::new(self.pad, self.pad))?;
        list.push(Instruction::from_dim(&footprint, None)?.with_trace(cx.trace(path)));
        Ok(list)
    }
}

/// Restricts its child to a viewport of fixed aspect ratio inside the outer
/// constraint, then aligns the result within the outer constraint.
#[derive(Debug, Clone)]
pub struct AspectRatio<I> {
    /// The wrapped node.
    pub child: Box<Node<I>>,
    /// Target height divided by width.
    pub height_over_width: f64,
    /// Horizontal placement within the outer constraint.
    pub halign: Align,
    /// Vertical placement within the outer constraint.
    pub valign: Align,
}

impl<I: Clone> AspectRatio<I> {
    /// Constrain `child` to `height_over_width`, aligned at the start on both
    /// axes.
    #[must_use]
    pub fn new(child: impl Into<Node<I>>, height_over_width: f64) -> Self {
        Self {
            child: Box::new(child.into()),
            height_over_width,
            halign: Align::Start,
            valign: Align::Start,
        }
    }

    /// Set the horizontal alignment.
    #[must_use]
    pub const fn with_halign(mut self, halign: Align) -> Self {
        self.halign = halign;
        self
    }

    /// Set the vertical alignment.
    #[must_use]
    pub const fn with_valign(mut self, valign: Align) -> Self {
        self.valign = valign;
        self
    }

    /// The largest viewport of the target ratio that fits inside `outer`. A
    /// single unconstrained axis is derived from the other.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unconstrained`] if both axes of `outer` are
    /// unconstrained.
    pub fn inner(&self, outer: &Dim) -> Result<Dim, LayoutError> {
        let ratio = self.height_over_width;
        match (outer.width, outer.height) {
            (Extent::Unconstrained, Extent::Unconstrained) => {
                Err(LayoutError::Unconstrained("aspect ratio"))
            }
            (Extent::Unconstrained, Extent::Defined(h)) => Ok(Dim::new(h / ratio, h)),
            (Extent::Defined(w), Extent::Unconstrained) => Ok(Dim::new(w, w * ratio)),
            (Extent::Defined(w), Extent::Defined(h)) => {
                if h.ratio(w)? > ratio {
                    Ok(Dim::new(w, w * ratio))
                } else {
                    Ok(Dim::new(h / ratio, h))
                }
            }
        }
    }

    /// Lay the child out in the viewport and align it.
    ///
    /// # Errors
    ///
    /// See [`AspectRatio::inner`]; child failures propagate.
    pub fn compute<B: TextBackend<Image = I>>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
        path: &TracePath,
    ) -> Result<InstructionList<I>, LayoutError> {
        let inner = self.inner(constraint)?;
        tracing::debug!(outer = %constraint, %inner, "aspect ratio");
        let list = self
            .child
            .compute_at(&inner, cx, &cx.wrapped_path(path, self.child.kind()))?;
        let list = align(list, Direction::Horizontal, constraint, self.halign)?;
        align(list, Direction::Vertical, constraint, self.valign)
    }
}

fn align<I>(
    list: InstructionList<I>,
    direction: Direction,
    outer: &Dim,
    align: Align,
) -> Result<InstructionList<I>, LayoutError> {
    match align {
        Align::Start => Ok(list),
        Align::Middle => list.align(direction, outer, true),
        Align::End => list.align(direction, outer, false),
    }
}
