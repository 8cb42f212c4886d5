//! Per-pass configuration threaded through every `compute` call.

use std::sync::Arc;

use crate::trace::TracePath;
use crate::units::{Dim, LengthUnit};

/// Options for one layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Attach the originating node's [`TracePath`] to every instruction.
    /// Has no effect on geometry.
    pub attach_trace: bool,
}

/// Everything a node needs besides its constraint: the external backend, the
/// resolution (pixels per inch), the pass options and the unit leaves report
/// in when their constraint carries none.
#[derive(Debug)]
pub struct LayoutContext<'a, B> {
    backend: &'a B,
    resolution: f64,
    options: LayoutOptions,
    unit: LengthUnit,
}

impl<B> Clone for LayoutContext<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for LayoutContext<'_, B> {}

impl<'a, B> LayoutContext<'a, B> {
    /// Context for a pass at `resolution` pixels per inch, with default
    /// options.
    #[must_use]
    pub const fn new(backend: &'a B, resolution: f64) -> Self {
        Self {
            backend,
            resolution,
            options: LayoutOptions {
                attach_trace: false,
            },
            unit: LengthUnit::Inch,
        }
    }

    /// Set the unit used when a constraint is fully unconstrained.
    #[must_use]
    pub const fn with_default_unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Context for computing a node inside `constraint`: the default unit
    /// becomes the constraint's unit when it has one, so children of a
    /// container inherit the nearest defined unit.
    #[must_use]
    pub fn within(&self, constraint: &Dim) -> Self {
        match constraint.unit() {
            Ok(Some(unit)) => self.with_default_unit(unit),
            _ => *self,
        }
    }

    /// Replace the pass options.
    #[must_use]
    pub const fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Enable or disable trace attachment.
    #[must_use]
    pub const fn with_trace(mut self, attach_trace: bool) -> Self {
        self.options.attach_trace = attach_trace;
        self
    }

    /// The external image/text backend.
    #[must_use]
    pub const fn backend(&self) -> &'a B {
        self.backend
    }

    /// Pixels per inch.
    #[must_use]
    pub const fn resolution(&self) -> f64 {
        self.resolution
    }

    /// The pass options.
    #[must_use]
    pub const fn options(&self) -> LayoutOptions {
        self.options
    }

    /// Unit leaves report sizes in when their constraint carries none.
    #[must_use]
    pub const fn default_unit(&self) -> LengthUnit {
        self.unit
    }

    /// Path of the `index`-th child of the node at `path`. Empty unless
    /// tracing is enabled.
    #[must_use]
    pub fn child_path(&self, path: &TracePath, index: usize, kind: &'static str) -> TracePath {
        if self.options.attach_trace {
            path.child(index, kind)
        } else {
            TracePath::default()
        }
    }

    /// Path of the single child wrapped by the node at `path`. Empty unless
    /// tracing is enabled.
    #[must_use]
    pub fn wrapped_path(&self, path: &TracePath, kind: &'static str) -> TracePath {
        if self.options.attach_trace {
            path.wrapped(kind)
        } else {
            TracePath::default()
        }
    }

    /// Path of a root node. Empty unless tracing is enabled.
    #[must_use]
    pub fn root_path(&self, kind: &'static str) -> TracePath {
        if self.options.attach_trace {
            TracePath::root(kind)
        } else {
            TracePath::default()
        }
    }

    /// The trace to attach to an instruction emitted at `path`, if tracing is
    /// enabled.
    #[must_use]
    pub fn trace(&self, path: &TracePath) -> Option<Arc<TracePath>> {
        self.options
            .attach_trace
            .then(|| Arc::new(path.clone()))
    }
}
