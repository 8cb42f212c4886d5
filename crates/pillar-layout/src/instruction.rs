//! Placement instructions: the output of a layout pass.
//!
//! An [`Instruction`] is an absolute rectangle plus an optional payload for
//! the compositing backend. An [`InstructionList`] is the ordered result of
//! computing one node; containers translate and concatenate their children's
//! lists. Instructions without a payload only report size (for example the
//! footprint marker a [`Padding`](crate::transform::Padding) node appends).

use std::fmt;
use std::sync::Arc;

use crate::error::LayoutError;
use crate::trace::TracePath;
use crate::units::{Dim, Direction, Extent, LengthUnit, Unit};

/// Integer pixel rectangle in left, top, right, bottom order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelBox {
    /// Left edge (inclusive).
    pub left: i64,
    /// Top edge (inclusive).
    pub top: i64,
    /// Right edge (exclusive).
    pub right: i64,
    /// Bottom edge (exclusive).
    pub bottom: i64,
}

impl PixelBox {
    /// Horizontal size; negative for an inverted box.
    #[must_use]
    pub const fn width(&self) -> i64 {
        self.right - self.left
    }

    /// Vertical size; negative for an inverted box.
    #[must_use]
    pub const fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Whether the box covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// As an `(left, top, right, bottom)` tuple.
    #[must_use]
    pub const fn ltrb(&self) -> (i64, i64, i64, i64) {
        (self.left, self.top, self.right, self.bottom)
    }
}

impl fmt::Display for PixelBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[allow(clippy::cast_possible_truncation)]
fn trunc_px(unit: Unit, resolution: f64) -> i64 {
    unit.to_px(resolution).value() as i64
}

/// An absolute placement with an optional payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction<I> {
    /// Top edge.
    pub top: Unit,
    /// Left edge.
    pub left: Unit,
    /// Bottom edge.
    pub bottom: Unit,
    /// Right edge.
    pub right: Unit,
    /// Content to paste, or `None` for size-only instructions.
    pub payload: Option<I>,
    /// Node that emitted this instruction, when tracing is enabled.
    pub trace: Option<Arc<TracePath>>,
}

impl<I> Instruction<I> {
    /// An instruction of size `dim` with its top-left corner at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unconstrained`] if either axis of `dim` is
    /// unconstrained, or [`LayoutError::UnitMismatch`] if its axes disagree.
    pub fn from_dim(dim: &Dim, payload: Option<I>) -> Result<Self, LayoutError> {
        let _ = dim.unit()?;
        let (width, height) = dim.defined_size("instruction")?;
        Ok(Self {
            top: Unit::zero(),
            left: Unit::zero(),
            bottom: height,
            right: width,
            payload,
            trace: None,
        })
    }

    /// A payload-less instruction from raw edges in `unit`.
    #[must_use]
    pub const fn tlbr(top: f64, left: f64, bottom: f64, right: f64, unit: LengthUnit) -> Self {
        Self {
            top: Unit::new(top, unit),
            left: Unit::new(left, unit),
            bottom: Unit::new(bottom, unit),
            right: Unit::new(right, unit),
            payload: None,
            trace: None,
        }
    }

    /// Attach (or clear) the originating trace.
    #[must_use]
    pub fn with_trace(mut self, trace: Option<Arc<TracePath>>) -> Self {
        self.trace = trace;
        self
    }

    /// Horizontal size.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the edges disagree on units.
    pub fn width(&self) -> Result<Unit, LayoutError> {
        self.right.try_sub(self.left)
    }

    /// Vertical size.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the edges disagree on units.
    pub fn height(&self) -> Result<Unit, LayoutError> {
        self.bottom.try_sub(self.top)
    }

    /// Width by height.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the edges disagree on units.
    pub fn size(&self) -> Result<Dim, LayoutError> {
        Ok(Dim::new(self.width()?, self.height()?))
    }

    /// Leading edge along `direction` (left or top).
    #[must_use]
    pub const fn near(&self, direction: Direction) -> Unit {
        match direction {
            Direction::Horizontal => self.left,
            Direction::Vertical => self.top,
        }
    }

    /// Trailing edge along `direction` (right or bottom).
    #[must_use]
    pub const fn far(&self, direction: Direction) -> Unit {
        match direction {
            Direction::Horizontal => self.right,
            Direction::Vertical => self.bottom,
        }
    }

    /// Top-left corner in whole pixels `(x, y)`, truncated.
    #[must_use]
    pub fn top_left_px(&self, resolution: f64) -> (i64, i64) {
        (
            trunc_px(self.left, resolution),
            trunc_px(self.top, resolution),
        )
    }

    /// The rectangle in whole pixels, truncated.
    #[must_use]
    pub fn box_px(&self, resolution: f64) -> PixelBox {
        PixelBox {
            left: trunc_px(self.left, resolution),
            top: trunc_px(self.top, resolution),
            right: trunc_px(self.right, resolution),
            bottom: trunc_px(self.bottom, resolution),
        }
    }

    /// Translated copy, moved by `offset` along `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if `offset` disagrees on units.
    pub fn offset(mut self, offset: Unit, direction: Direction) -> Result<Self, LayoutError> {
        match direction {
            Direction::Horizontal => {
                self.left = self.left.try_add(offset)?;
                self.right = self.right.try_add(offset)?;
            }
            Direction::Vertical => {
                self.top = self.top.try_add(offset)?;
                self.bottom = self.bottom.try_add(offset)?;
            }
        }
        Ok(self)
    }

    /// Translated copy, moved by `offset.width` horizontally and
    /// `offset.height` vertically. An unconstrained axis does not move.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if `offset` disagrees on units.
    pub fn offset2(self, offset: &Dim) -> Result<Self, LayoutError> {
        let dx = offset.width.defined().unwrap_or_default();
        let dy = offset.height.defined().unwrap_or_default();
        self.offset(dx, Direction::Horizontal)?
            .offset(dy, Direction::Vertical)
    }

    /// Copy scaled by `ratio` about its top-left corner.
    ///
    /// Only the geometry changes. The payload is resized once, when the final
    /// list is composited, so repeated shrinking never resamples it twice.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the edges disagree on units.
    pub fn shrink(mut self, ratio: f64) -> Result<Self, LayoutError> {
        let width = self.width()? * ratio;
        let height = self.height()? * ratio;
        self.right = self.left.try_add(width)?;
        self.bottom = self.top.try_add(height)?;
        Ok(self)
    }
}

impl<I> fmt::Display for Instruction<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "top-left ({}, {})", self.top, self.left)?;
        if let Ok(size) = self.size() {
            write!(f, ", size {size}")?;
        }
        if self.payload.is_some() {
            f.write_str(", payload")?;
        }
        if let Some(trace) = &self.trace {
            write!(f, ", source {trace}")?;
        }
        Ok(())
    }
}

/// Ordered list of instructions produced by computing one node.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionList<I> {
    instructions: Vec<Instruction<I>>,
}

impl<I> Default for InstructionList<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> InstructionList<I> {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instructions: Vec::new(),
        }
    }

    /// Append one instruction.
    pub fn push(&mut self, instruction: Instruction<I>) {
        self.instructions.push(instruction);
    }

    /// Iterate in paint order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction<I>> {
        self.instructions.iter()
    }

    /// The instructions in paint order.
    #[must_use]
    pub fn as_slice(&self) -> &[Instruction<I>] {
        &self.instructions
    }

    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the list has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Unwrap into the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Instruction<I>> {
        self.instructions
    }

    /// Bounding extent along `direction`: farthest trailing edge minus
    /// nearest leading edge.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyList`] for an empty list, or
    /// [`LayoutError::UnitMismatch`] if members disagree on units.
    pub fn extent(&self, direction: Direction) -> Result<Unit, LayoutError> {
        let mut iter = self.instructions.iter();
        let first = iter.next().ok_or(LayoutError::EmptyList)?;
        let (mut near, mut far) = (first.near(direction), first.far(direction));
        for inst in iter {
            near = near.try_min(inst.near(direction))?;
            far = far.try_max(inst.far(direction))?;
        }
        far.try_sub(near)
    }

    /// [`InstructionList::extent`], but zero for an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if members disagree on units.
    pub fn extent_or_zero(&self, direction: Direction) -> Result<Unit, LayoutError> {
        if self.is_empty() {
            Ok(Unit::zero())
        } else {
            self.extent(direction)
        }
    }

    /// Bounding width.
    ///
    /// # Errors
    ///
    /// See [`InstructionList::extent`].
    pub fn width(&self) -> Result<Unit, LayoutError> {
        self.extent(Direction::Horizontal)
    }

    /// Bounding height.
    ///
    /// # Errors
    ///
    /// See [`InstructionList::extent`].
    pub fn height(&self) -> Result<Unit, LayoutError> {
        self.extent(Direction::Vertical)
    }

    /// Bounding width by height.
    ///
    /// # Errors
    ///
    /// See [`InstructionList::extent`].
    pub fn dim(&self) -> Result<Dim, LayoutError> {
        Ok(Dim::new(self.width()?, self.height()?))
    }

    /// Every instruction moved by `offset` along `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if `offset` disagrees on units.
    pub fn offset(self, offset: Unit, direction: Direction) -> Result<Self, LayoutError> {
        self.instructions
            .into_iter()
            .map(|inst| inst.offset(offset, direction))
            .collect()
    }

    /// Every instruction moved by both axes of `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if `offset` disagrees on units.
    pub fn offset2(self, offset: &Dim) -> Result<Self, LayoutError> {
        self.instructions
            .into_iter()
            .map(|inst| inst.offset2(offset))
            .collect()
    }

    /// Every instruction scaled by `ratio` about its own top-left corner.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if an instruction's edges
    /// disagree on units.
    pub fn shrink(self, ratio: f64) -> Result<Self, LayoutError> {
        self.instructions
            .into_iter()
            .map(|inst| inst.shrink(ratio))
            .collect()
    }

    /// Shift the list to the center (`middle`) or trailing edge of `outer`
    /// along `direction`.
    ///
    /// The shift is applied only when positive: content already larger than
    /// `outer` stays put. An empty list, or an unconstrained `outer` axis,
    /// is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if `outer` disagrees on units.
    pub fn align(self, direction: Direction, outer: &Dim, middle: bool) -> Result<Self, LayoutError> {
        let Extent::Defined(outer_extent) = outer.along(direction) else {
            return Ok(self);
        };
        if self.is_empty() {
            return Ok(self);
        }
        let slack = outer_extent.try_sub(self.extent(direction)?)?;
        let offset = if middle { slack / 2.0 } else { slack };
        if offset.value() > 0.0 {
            self.offset(offset, direction)
        } else {
            Ok(self)
        }
    }

    /// Join several lists in order.
    #[must_use]
    pub fn concat(lists: impl IntoIterator<Item = Self>) -> Self {
        lists.into_iter().flatten().collect()
    }

    /// Instructions that carry a payload.
    pub fn drawable(&self) -> impl Iterator<Item = &Instruction<I>> {
        self.instructions.iter().filter(|inst| inst.payload.is_some())
    }
}

impl<I> From<Vec<Instruction<I>>> for InstructionList<I> {
    fn from(instructions: Vec<Instruction<I>>) -> Self {
        Self { instructions }
    }
}

impl<I> FromIterator<Instruction<I>> for InstructionList<I> {
    fn from_iter<T: IntoIterator<Item = Instruction<I>>>(iter: T) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl<I> Extend<Instruction<I>> for InstructionList<I> {
    fn extend<T: IntoIterator<Item = Instruction<I>>>(&mut self, iter: T) {
        self.instructions.extend(iter);
    }
}

impl<I> IntoIterator for InstructionList<I> {
    type Item = Instruction<I>;
    type IntoIter = std::vec::IntoIter<Instruction<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}

impl<'a, I> IntoIterator for &'a InstructionList<I> {
    type Item = &'a Instruction<I>;
    type IntoIter = std::slice::Iter<'a, Instruction<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl<I> std::ops::Index<usize> for InstructionList<I> {
    type Output = Instruction<I>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.instructions[index]
    }
}

/// Sum of the extents of several lists along `direction`. Empty lists
/// contribute nothing.
///
/// # Errors
///
/// Returns [`LayoutError::UnitMismatch`] if the lists disagree on units.
pub fn sum_extent<'a, I: 'a>(
    lists: impl IntoIterator<Item = &'a InstructionList<I>>,
    direction: Direction,
) -> Result<Unit, LayoutError> {
    lists
        .into_iter()
        .try_fold(Unit::zero(), |total, list| {
            total.try_add(list.extent_or_zero(direction)?)
        })
}

/// Lay lists out one after another along `direction`, with `spacing` between
/// neighbours: list `i` moves by the extents of lists `0..i` plus
/// `spacing * i`.
///
/// # Errors
///
/// Returns [`LayoutError::UnitMismatch`] if the lists or `spacing` disagree on
/// units.
pub fn apply_offsets<I>(
    lists: Vec<InstructionList<I>>,
    direction: Direction,
    spacing: Unit,
) -> Result<Vec<InstructionList<I>>, LayoutError> {
    let mut consumed = Unit::zero();
    let mut placed = Vec::with_capacity(lists.len());
    for (i, list) in lists.into_iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let offset = consumed.try_add(spacing * i as f64)?;
        let extent = list.extent_or_zero(direction)?;
        placed.push(list.offset(offset, direction)?);
        consumed = consumed.try_add(extent)?;
    }
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(top: f64, left: f64, bottom: f64, right: f64) -> Instruction<()> {
        Instruction::tlbr(top, left, bottom, right, LengthUnit::Inch)
    }

    #[test]
    fn test_pixel_box_truncates() {
        let b = inst(0.0, 0.55, 1.0, 1.59).box_px(10.0);
        assert_eq!(b.ltrb(), (5, 0, 15, 10));
    }

    #[test]
    fn test_offset2_ignores_unconstrained_axis() {
        let moved = inst(0.0, 0.0, 1.0, 1.0)
            .offset2(&Dim::new(Unit::inches(0.5), Extent::Unconstrained))
            .unwrap();
        assert_eq!(moved, inst(0.0, 0.5, 1.0, 1.5));
    }
}
