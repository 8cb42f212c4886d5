//! Error type shared by every layout operation.
//!
//! Structural failures (unit confusion, invalid node configuration, geometry
//! that cannot be represented) and failures reported by an external backend
//! both surface as [`LayoutError`], so a caller can reject a whole tree with a
//! single match arm. Degenerate-but-drawable geometry is never an error; it is
//! reported through `tracing` and layout carries on.

use thiserror::Error;

use crate::units::Unit;

/// Fatal layout failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Two non-zero quantities with different unit tags were combined.
    #[error("unit mismatch: cannot combine {left} with {right}")]
    UnitMismatch {
        /// Left-hand operand.
        left: Unit,
        /// Right-hand operand.
        right: Unit,
    },

    /// A flex container did not have exactly one expanding child.
    #[error("flex must have exactly one expanding child, got {0}")]
    ExpandCount(usize),

    /// A flex container's expand markers do not line up with its children.
    #[error("flex has {markers} expand markers for {children} children")]
    ExpandLength {
        /// Number of expand markers.
        markers: usize,
        /// Number of children.
        children: usize,
    },

    /// An operation needed a defined extent but the axis (or both axes) was
    /// unconstrained. The payload names the operation.
    #[error("{0} needs at least one constrained axis")]
    Unconstrained(&'static str),

    /// A dimension went negative where that is not representable.
    #[error("negative {axis}: {value}")]
    NegativeExtent {
        /// `"width"` or `"height"`.
        axis: &'static str,
        /// The offending value.
        value: Unit,
    },

    /// The bounding extent of an instruction list with no members was
    /// requested.
    #[error("extent of an empty instruction list is undefined")]
    EmptyList,

    /// An image or text backend failed (missing font, undecodable image).
    #[error("backend error: {0}")]
    Backend(String),
}

impl LayoutError {
    /// Whether this error means the layout tree itself is invalid, as opposed
    /// to a failure inside an external backend.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !matches!(self, Self::Backend(_))
    }
}
