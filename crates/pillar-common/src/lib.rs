//! Common utilities for the pillar layout engine.
//!
//! This crate provides shared infrastructure used by the layout core, the
//! render backends and the CLI:
//! - **Warning System** - deduplicated warnings routed through `tracing`

pub mod warning;
