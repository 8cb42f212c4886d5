//! Explicit tree-position tracing for instructions.
//!
//! Each `compute` call receives the [`TracePath`] of the node being computed.
//! Containers and transforms extend it before recursing, and leaves attach it
//! to the instructions they emit when tracing is enabled for the pass.

use std::fmt;

/// One level of a [`TracePath`]: the node kind and, for children of a
/// container, the child's position in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSegment {
    /// Node kind (`"Box"`, `"Axis"`, ...).
    pub kind: &'static str,
    /// Position among the parent's children, if the parent is a container.
    pub index: Option<usize>,
}

impl fmt::Display for TraceSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{index}]", self.kind),
            None => f.write_str(self.kind),
        }
    }
}

/// Path from the root of a layout tree to one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracePath {
    segments: Vec<TraceSegment>,
}

impl TracePath {
    /// Path of a root node of kind `kind`.
    #[must_use]
    pub fn root(kind: &'static str) -> Self {
        Self {
            segments: vec![TraceSegment { kind, index: None }],
        }
    }

    /// Path of the `index`-th child (of kind `kind`) of this node.
    #[must_use]
    pub fn child(&self, index: usize, kind: &'static str) -> Self {
        self.extended(TraceSegment {
            kind,
            index: Some(index),
        })
    }

    /// Path of the single wrapped child (of kind `kind`) of this node.
    #[must_use]
    pub fn wrapped(&self, kind: &'static str) -> Self {
        self.extended(TraceSegment { kind, index: None })
    }

    fn extended(&self, segment: TraceSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// The segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[TraceSegment] {
        &self.segments
    }

    /// Depth in the tree (root is 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Kind of the node this path ends at.
    #[must_use]
    pub fn leaf_kind(&self) -> Option<&'static str> {
        self.segments.last().map(|segment| segment.kind)
    }
}

impl fmt::Display for TracePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
