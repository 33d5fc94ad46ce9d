//! Pipeline dependency graph: batch construction, node handles, and
//! transitive traversal.
//!
//! A [`PipelineGraph`] is built once from a full `pipeline_groups` fetch
//! and is read-only afterwards. Predecessor edges are derived from each
//! pipeline's own materials at construction time; descendant edges are
//! inferred by inverting predecessor edges across the whole batch, so
//! they are only meaningful on a completely built graph.

mod builder;
mod node;
mod walk;

pub use builder::{PipelineGraph, PipelineNode};
pub use node::{Direction, GraphNode};
pub use walk::depth_walk;
