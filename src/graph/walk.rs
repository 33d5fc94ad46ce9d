use std::collections::HashSet;

use crate::graph::node::GraphNode;

/// Depth-first expansion of `start` under a caller-supplied neighbor
/// accessor.
///
/// Returns every reachable node exactly once, in pre-order: each start
/// node is followed by its subtree before the next start node, and the
/// first level keeps the insertion order of `start`. A visited set keyed
/// on node identity guards each expansion, so diamonds are not
/// double-counted and cycles terminate. Output order is deterministic for
/// a given graph.
pub fn depth_walk<N, F>(start: Vec<N>, neighbors: F) -> Vec<N>
where
    N: GraphNode,
    F: Fn(&N) -> Vec<N>,
{
    let mut visited: HashSet<N::Id> = HashSet::new();
    let mut order = Vec::new();

    // Explicit stack; children are pushed in reverse so the leftmost
    // neighbor is expanded first.
    let mut stack = start;
    stack.reverse();

    while let Some(node) = stack.pop() {
        if !visited.insert(node.id()) {
            continue;
        }

        let mut next = neighbors(&node);
        next.reverse();
        stack.extend(next);

        order.push(node);
    }

    order
}
