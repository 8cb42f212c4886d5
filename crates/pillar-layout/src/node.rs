//! The layout tree.
//!
//! [`Node`] is a closed set of node kinds sharing one operation,
//! [`Node::compute`]: given a constraint and a [`LayoutContext`], produce an
//! [`InstructionList`] in the node's own coordinate frame (top-left at the
//! origin). Trees are immutable values; computing one has no side effects
//! beyond calls into the backend and `tracing` diagnostics.

use crate::axis::{Axis, Flex};
use crate::backend::TextBackend;
use crate::context::LayoutContext;
use crate::error::LayoutError;
use crate::instruction::InstructionList;
use crate::renderable::{EmptyBox, ImageRenderable, TextRenderable};
use crate::trace::TracePath;
use crate::transform::{AspectRatio, Padding};
use crate::units::Dim;

/// A layout node. `I` is the image type of the backend the tree is computed
/// with.
#[derive(Debug, Clone)]
pub enum Node<I> {
    /// Invisible sized box.
    Box(EmptyBox),
    /// Image leaf.
    Image(ImageRenderable<I>),
    /// Wrapped text leaf.
    Text(TextRenderable),
    /// Sequential container with shrink-to-fit and space distribution.
    Axis(Axis<I>),
    /// Sequential container with one expanding child.
    Flex(Flex<I>),
    /// Inset transform.
    Padding(Padding<I>),
    /// Aspect-ratio viewport with alignment.
    AspectRatio(AspectRatio<I>),
}

impl<I: Clone> Node<I> {
    /// Lay this tree out inside `constraint`.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the tree is structurally invalid (see the
    /// individual node kinds) or the backend fails.
    pub fn compute<B>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
    ) -> Result<InstructionList<I>, LayoutError>
    where
        B: TextBackend<Image = I>,
    {
        self.compute_at(constraint, cx, &cx.root_path(self.kind()))
    }

    /// [`Node::compute`] for a node reached through `path`.
    ///
    /// # Errors
    ///
    /// See [`Node::compute`].
    pub fn compute_at<B>(
        &self,
        constraint: &Dim,
        cx: &LayoutContext<'_, B>,
        path: &TracePath,
    ) -> Result<InstructionList<I>, LayoutError>
    where
        B: TextBackend<Image = I>,
    {
        let cx = &cx.within(constraint);
        match self {
            Self::Box(node) => node.compute(constraint, cx, path),
            Self::Image(node) => node.compute(constraint, cx, path),
            Self::Text(node) => node.compute(constraint, cx, path),
            Self::Axis(node) => node.compute(constraint, cx, path),
            Self::Flex(node) => node.compute(constraint, cx, path),
            Self::Padding(node) => node.compute(constraint, cx, path),
            Self::AspectRatio(node) => node.compute(constraint, cx, path),
        }
    }
}

impl<I> Node<I> {
    /// Kind name used in traces and diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Box(_) => "Box",
            Self::Image(_) => "Image",
            Self::Text(_) => "Text",
            Self::Axis(_) => "Axis",
            Self::Flex(_) => "Flex",
            Self::Padding(_) => "Padding",
            Self::AspectRatio(_) => "AspectRatio",
        }
    }

    /// Whether containers must leave this node's size alone when shrinking
    /// (only spacer boxes are exempt).
    #[must_use]
    pub const fn is_spacer(&self) -> bool {
        matches!(self, Self::Box(node) if node.is_spacer)
    }
}

impl<I> From<EmptyBox> for Node<I> {
    fn from(node: EmptyBox) -> Self {
        Self::Box(node)
    }
}

impl<I> From<ImageRenderable<I>> for Node<I> {
    fn from(node: ImageRenderable<I>) -> Self {
        Self::Image(node)
    }
}

impl<I> From<TextRenderable> for Node<I> {
    fn from(node: TextRenderable) -> Self {
        Self::Text(node)
    }
}

impl<I> From<Axis<I>> for Node<I> {
    fn from(node: Axis<I>) -> Self {
        Self::Axis(node)
    }
}

impl<I> From<Flex<I>> for Node<I> {
    fn from(node: Flex<I>) -> Self {
        Self::Flex(node)
    }
}

impl<I> From<Padding<I>> for Node<I> {
    fn from(node: Padding<I>) -> Self {
        Self::Padding(node)
    }
}

impl<I> From<AspectRatio<I>> for Node<I> {
    fn from(node: AspectRatio<I>) -> Self {
        Self::AspectRatio(node)
    }
}
