//! Sequential containers.
//!
//! [`Axis`] lays its children out one after another along a main axis,
//! shrinking them when they overflow and spreading any leftover space evenly
//! between them. [`Flex`] does the same after giving one designated child
//! whatever main-axis space the others leave.

use std::cmp::Ordering;

use pillar_common::warning::warn_once;

use crate::backend::TextBackend;
use crate::context::LayoutContext;
use crate::error::LayoutError;
use crate::instruction::{Instruction, InstructionList, apply_offsets, sum_extent};
use crate::node::Node;
use crate::trace::TracePath;
use crate::units::{Dim, Direction, Extent, Unit};

/// Which children are exempt from shrinking.
fn spacer_mask<I>(children: &[Node<I>]) -> Vec<bool> {
    children.iter().map(Node::is_spacer).collect()
}

/// Compute every child against `constraint`, skipping the child at `skip`
/// (its slot is left empty).
fn compute_children<I, B>(
    children: &[Node<I>],
    constraint: &Dim,
    cx: &LayoutContext<'_, B>,
    path: &TracePath,
    skip: Option<usize>,
) -> Result<Vec<InstructionList<I>>, LayoutError>
where
    I: Clone,
    B: TextBackend<Image = I>,
{
    children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            if skip == Some(i) {
                Ok(InstructionList::new())
            } else {
                child.compute_at(constraint, cx, &cx.child_path(path, i, child.kind()))
            }
        })
        .collect()
}

/// Fit already-computed child lists into `main` along `direction`.
///
/// When the lists overflow `main` (or `force_expand` is set) every list not
/// marked in `fixed` is scaled by a common ratio so the total fits exactly.
/// Returns the uniform spacing to put between neighbours together with the
/// possibly shrunk lists. The spacing is negative when content still
/// overflows; neighbours then overlap.
///
/// Fewer than two lists, or an unconstrained `main`, are returned untouched
/// with zero spacing.
///
/// # Errors
///
/// Returns [`LayoutError::UnitMismatch`] if the lists and `main` disagree on
/// units.
pub fn space_lists<I>(
    main: Extent,
    direction: Direction,
    fixed: &[bool],
    lists: Vec<InstructionList<I>>,
    force_expand: bool,
) -> Result<(Unit, Vec<InstructionList<I>>), LayoutError> {
    if lists.len() < 2 {
        return Ok((Unit::zero(), lists));
    }
    let Extent::Defined(main) = main else {
        return Ok((Unit::zero(), lists));
    };

    let mut lists = lists;
    let mut total = sum_extent(&lists, direction)?;
    let overflow = total.try_cmp(main)? == Ordering::Greater;

    if overflow || force_expand {
        let is_fixed = |i: usize| matches!(fixed.get(i), Some(true));
        let shrinkable = sum_extent(
            lists.iter().enumerate().filter(|(i, _)| !is_fixed(*i)).map(|(_, list)| list),
            direction,
        )?;
        let fixed_extent = sum_extent(
            lists.iter().enumerate().filter(|(i, _)| is_fixed(*i)).map(|(_, list)| list),
            direction,
        )?;

        if shrinkable.is_zero() {
            if overflow {
                warn_once(
                    "layout",
                    &format!(
                        "children ({total}) overflow the axis ({main}) with nothing to shrink; they will overlap"
                    ),
                );
            } else {
                tracing::debug!("no shrinkable children");
            }
        } else {
            let ratio = main.try_sub(fixed_extent)?.ratio(shrinkable)?;
            tracing::debug!(ratio, %total, %shrinkable, fixed = %fixed_extent, "shrink to fit");
            lists = lists
                .into_iter()
                .enumerate()
                .map(|(i, list)| if is_fixed(i) { Ok(list) } else { list.shrink(ratio) })
                .collect::<Result<_, _>>()?;
            total = sum_extent(&lists, direction)?;
        }
    }

    let extra = main.try_sub(total)?;
    tracing::debug!(%extra, "axis extra space");
    #[allow(clippy::cast_precision_loss)]
    let spacing = extra / (lists.len() - 1) as f64;
    Ok((spacing, lists))
}

/// Children laid out in sequence along one axis.
///
/// Each child is computed with the main axis unconstrained, so it sizes
/// itself from the cross axis. Overflowing children are shrunk to fit;
/// leftover space goes evenly between them.
#[derive(Debug, Clone)]
pub struct Axis<I> {
    /// Main axis.
    pub direction: Direction,
    /// Children in layout order.
    pub children: Vec<Node<I>>,
    /// Always rescale shrinkable children to fill the main axis exactly,
    /// even when they would fit.
    pub expand: bool,
}

impl<I: Clone> Axis<I> {
    /// An axis over `children`.
    #[must_use]
    pub const fn new(direction: Direction, children: Vec<Node<I>>) -> Self {
        Self {
            direction,
            children,
            expand: false,
        }
    }

    /// Set the force-expand flag.
    #[must_use]
    pub const fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    /// Lay the children out inside `constraint`.
    ///
    /// # Errors
    ///
    /// Propagates child failures and unit mismatches.
    pub fn compute<B: TextBackend<Image = I>>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
        path: &TracePath,
    ) -> Result<InstructionList<I>, LayoutError> {
        let sub = constraint.partial(self.direction, Extent::Unconstrained);
        let lists = compute_children(&self.children, &sub, cx, path, None)?;
        let (spacing, lists) = space_lists(
            constraint.along(self.direction),
            self.direction,
            &spacer_mask(&self.children),
            lists,
            self.expand,
        )?;
        Ok(InstructionList::concat(apply_offsets(
            lists,
            self.direction,
            spacing,
        )?))
    }
}

/// Children laid out in sequence, with exactly one child taking whatever
/// main-axis space the others leave.
#[derive(Debug, Clone)]
pub struct Flex<I> {
    /// Main axis.
    pub direction: Direction,
    /// Children in layout order.
    pub children: Vec<Node<I>>,
    /// One marker per child; exactly one must be set.
    pub expand: Vec<bool>,
}

impl<I: Clone> Flex<I> {
    /// A flex container with explicit expand markers.
    #[must_use]
    pub const fn new(direction: Direction, children: Vec<Node<I>>, expand: Vec<bool>) -> Self {
        Self {
            direction,
            children,
            expand,
        }
    }

    /// A flex container where the child at `index` expands.
    #[must_use]
    pub fn with_expanding(direction: Direction, children: Vec<Node<I>>, index: usize) -> Self {
        let expand = (0..children.len()).map(|i| i == index).collect();
        Self::new(direction, children, expand)
    }

    fn expanding_index(&self) -> Result<usize, LayoutError> {
        let count = self.expand.iter().filter(|&&expand| expand).count();
        if count != 1 {
            return Err(LayoutError::ExpandCount(count));
        }
        if self.expand.len() != self.children.len() {
            return Err(LayoutError::ExpandLength {
                markers: self.expand.len(),
                children: self.children.len(),
            });
        }
        self.expand
            .iter()
            .position(|&expand| expand)
            .ok_or(LayoutError::ExpandCount(0))
    }

    /// Compute the children and return the flex area (the constraint given
    /// to the expanding child) with the per-child lists, before spacing.
    ///
    /// The expanding child's list ends with a payload-less instruction the
    /// size of the flex area, so its slot reports the full area even when
    /// its content is smaller. A negative remainder is logged and layout
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ExpandCount`] or [`LayoutError::ExpandLength`]
    /// for bad markers, and [`LayoutError::Unconstrained`] if the main axis
    /// of `constraint` is unconstrained.
    pub fn render_flex<B: TextBackend<Image = I>>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
        path: &TracePath,
    ) -> Result<(Dim, Vec<InstructionList<I>>), LayoutError> {
        let expanding = self.expanding_index()?;
        let direction = self.direction;
        let main = constraint.along(direction).require("flex")?;

        let sub = constraint.partial(direction, Extent::Unconstrained);
        let mut lists = compute_children(&self.children, &sub, cx, path, Some(expanding))?;

        let remainder = main.try_sub(sum_extent(&lists, direction)?)?;
        if remainder.value() < 0.0 {
            warn_once(
                "layout",
                &format!("flex remainder {remainder} is negative; children will overlap"),
            );
        }
        let area = constraint.partial(direction, Extent::Defined(remainder));
        tracing::debug!(%area, "flex area");

        let child = &self.children[expanding];
        let mut slot =
            child.compute_at(&area, cx, &cx.child_path(path, expanding, child.kind()))?;
        let cross = direction.cross();
        let marker = if area.along(cross).is_unconstrained() {
            area.partial(cross, Extent::Defined(slot.extent_or_zero(cross)?))
        } else {
            area
        };
        slot.push(Instruction::from_dim(&marker, None)?.with_trace(cx.trace(path)));
        lists[expanding] = slot;
        Ok((area, lists))
    }

    /// Lay the children out inside `constraint`.
    ///
    /// # Errors
    ///
    /// See [`Flex::render_flex`].
    pub fn compute<B: TextBackend<Image = I>>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
        path: &TracePath,
    ) -> Result<InstructionList<I>, LayoutError> {
        let (_, lists) = self.render_flex(constraint, cx, path)?;
        let (spacing, lists) = space_lists(
            constraint.along(self.direction),
            self.direction,
            &spacer_mask(&self.children),
            lists,
            true,
        )?;
        Ok(InstructionList::concat(apply_offsets(
            lists,
            self.direction,
            spacing,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::LengthUnit;

    fn list(extent: f64) -> InstructionList<()> {
        InstructionList::from(vec![Instruction::tlbr(0.0, 0.0, 1.0, extent, LengthUnit::Inch)])
    }

    #[test]
    fn test_fixed_lists_are_not_shrunk() {
        let (spacing, lists) = space_lists(
            Extent::Defined(Unit::inches(2.0)),
            Direction::Horizontal,
            &[true, false],
            vec![list(1.0), list(2.0)],
            false,
        )
        .unwrap();
        assert_eq!(lists[0].width().unwrap(), Unit::inches(1.0));
        assert_eq!(lists[1].width().unwrap(), Unit::inches(1.0));
        assert!(spacing.is_zero());
    }

    #[test]
    fn test_single_list_passes_through() {
        let (spacing, lists) = space_lists(
            Extent::Defined(Unit::inches(0.5)),
            Direction::Horizontal,
            &[],
            vec![list(3.0)],
            true,
        )
        .unwrap();
        assert!(spacing.is_zero());
        assert_eq!(lists[0].width().unwrap(), Unit::inches(3.0));
    }
}
