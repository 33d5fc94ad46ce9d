use std::hash::Hash;

use crate::graph::walk::depth_walk;

/// Edge direction within a dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the pipelines a node depends on (its pipeline materials)
    Upstream,
    /// Toward the pipelines that depend on a node
    Downstream,
}

/// A node in a dependency graph with direction-parameterized neighbor
/// access and transitive traversal.
///
/// Identity is deliberately separate from value equality: two nodes can
/// carry identical data yet be distinct vertices, so traversal keys its
/// visited set on [`GraphNode::id`].
pub trait GraphNode: Copy {
    type Id: Copy + Eq + Hash;

    fn id(&self) -> Self::Id;

    /// Direct neighbors in the given direction, in edge insertion order.
    fn neighbors(&self, direction: Direction) -> Vec<Self>;

    /// Every node reachable in the given direction, in depth-first
    /// pre-order, excluding the node itself.
    ///
    /// Terminates on cyclic graphs and yields each reachable node exactly
    /// once; a node that (transitively) depends on itself does not appear
    /// in its own closure.
    fn transitive(&self, direction: Direction) -> Vec<Self> {
        let mut closure = depth_walk(vec![*self], |node| node.neighbors(direction));
        closure.retain(|node| node.id() != self.id());
        closure
    }
}
