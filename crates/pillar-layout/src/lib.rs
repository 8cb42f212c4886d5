//! Static box layout for images and text blocks.
//!
//! A caller builds a tree of [`Node`]s, computes it once against an outer
//! [`Dim`] at a given resolution, and receives a flat [`InstructionList`] of
//! absolute placements. Compositing the list is a separate step
//! ([`render_instructions`]) driven by an external backend.
//!
//! # Scope
//!
//! - **Units**: lengths tagged with a unit (pixels or inches), with a
//!   unit-agnostic zero, and two-axis sizes whose axes may be unconstrained
//! - **Instructions**: absolute rectangles with an optional payload, and the
//!   list operations containers need (extent, offset, shrink, align)
//! - **Leaves**: invisible boxes, images and wrapped text
//! - **Containers**: [`Axis`] (shrink to fit, spread leftover space) and
//!   [`Flex`] (one child takes the remaining space)
//! - **Transforms**: [`Padding`] and [`AspectRatio`]
//!
//! # Not Implemented
//!
//! - Incremental relayout
//! - Serialization of layout trees

/// Sequential containers.
pub mod axis;
/// Boundary traits for image, text and compositing backends.
pub mod backend;
/// Compositing a computed list onto a canvas.
pub mod composite;
/// Per-pass configuration.
pub mod context;
/// The layout error type.
pub mod error;
/// Placement instructions and instruction lists.
pub mod instruction;
/// The layout node tree.
pub mod node;
/// Leaf nodes.
pub mod renderable;
/// Tree-position tracing.
pub mod trace;
/// Padding and aspect-ratio wrappers.
pub mod transform;
/// Units, extents and dims.
pub mod units;

use std::convert::Infallible;

// Re-exports for convenience
pub use axis::{Axis, Flex, space_lists};
pub use backend::{Canvas, GeometryOnly, ImageBackend, TextBackend};
pub use composite::render_instructions;
pub use context::{LayoutContext, LayoutOptions};
pub use error::LayoutError;
pub use instruction::{Instruction, InstructionList, PixelBox, apply_offsets, sum_extent};
pub use node::Node;
pub use renderable::{EmptyBox, ImageRenderable, TextRenderable, scaled_dim};
pub use trace::{TracePath, TraceSegment};
pub use transform::{AspectRatio, Padding};
pub use units::{Align, Dim, Direction, Extent, LengthUnit, ParseUnitError, Unit};

/// A tree that carries no images, computed with [`GeometryOnly`].
pub type GeometryNode = Node<Infallible>;
