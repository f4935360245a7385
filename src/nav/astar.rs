// A* over the dual graph.
//
// The open set is ordered either by heuristic alone (greedy best-first, the
// stock behaviour) or by g + h (textbook A*); see `SearchOrder`. Both relax
// g-scores and parent links the same way.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};

use super::config::SearchOrder;
use super::geometry::Point;
use super::graph::{NodeGraph, NodeId};

/// Open-set entry.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    node: NodeId,
    /// Priority key: h or g + h depending on the search order.
    key: f64,
}

impl Eq for SearchNode {}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.key.total_cmp(&other.key) == Ordering::Equal
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; lower id wins ties
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Node path from `start` to `goal`, both inclusive.
///
/// Returns `[start]` when they are equal and an empty vec when either node is
/// unknown or the goal is unreachable.
pub fn find_node_path(
    graph: &NodeGraph,
    start: NodeId,
    goal: NodeId,
    order: SearchOrder,
) -> Vec<NodeId> {
    trace!("[AStar] find_node_path: start={:?} goal={:?} order={:?}", start, goal, order);

    let (Some(_), Some(goal_node)) = (graph.node(start), graph.node(goal)) else {
        debug!("[AStar] FAILED: start or goal node not in graph");
        return Vec::new();
    };
    if start == goal {
        return vec![start];
    }

    let goal_pos = goal_node.position;
    let heuristic = |id: NodeId| {
        graph
            .node(id)
            .map_or(f64::INFINITY, |n| n.position.distance(goal_pos))
    };
    let key = |g: f64, h: f64| match order {
        SearchOrder::Heuristic => h,
        SearchOrder::Canonical => g + h,
    };

    let n = graph.len();
    let mut g_score = vec![f64::INFINITY; n];
    let mut came_from: Vec<Option<NodeId>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut open = BinaryHeap::new();

    g_score[start.0] = 0.0;
    open.push(SearchNode {
        node: start,
        key: key(0.0, heuristic(start)),
    });

    let mut expanded = 0usize;
    while let Some(SearchNode { node, .. }) = open.pop() {
        if closed[node.0] {
            continue;
        }
        if node == goal {
            let path = reconstruct_path(&came_from, goal);
            debug!(
                "[AStar] SUCCESS: {} nodes, cost {:.3}, expanded {}",
                path.len(),
                g_score[goal.0],
                expanded
            );
            return path;
        }
        closed[node.0] = true;
        expanded += 1;

        for edge in graph.neighbors(node) {
            let next = edge.target;
            if closed[next.0] {
                continue;
            }
            let tentative = g_score[node.0] + edge.cost;
            if tentative < g_score[next.0] {
                g_score[next.0] = tentative;
                came_from[next.0] = Some(node);
                open.push(SearchNode {
                    node: next,
                    key: key(tentative, heuristic(next)),
                });
            }
        }
    }

    debug!(
        "[AStar] FAILED: no path from {:?} to {:?} after expanding {} nodes",
        start, goal, expanded
    );
    Vec::new()
}

fn reconstruct_path(came_from: &[Option<NodeId>], goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = came_from[current.0] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Node centroids along a node path.
pub fn node_path_points(graph: &NodeGraph, path: &[NodeId]) -> Vec<Point> {
    path.iter()
        .filter_map(|&id| graph.node(id).map(|n| n.position))
        .collect()
}
