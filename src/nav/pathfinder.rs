// Full query pipeline: locate nodes, search the dual graph, smooth.

use log::debug;

use super::astar::find_node_path;
use super::config::PathConfig;
use super::funnel::string_pull_with;
use super::graph::NodeGraph;
use super::navmesh::NavMesh;
use super::obstacle::Obstacle;
use super::path::{Path, PathQuery};

/// Route `query` across `mesh`.
///
/// Start and goal snap to the node whose triangle contains them, or to the
/// nearest node otherwise. Empty graph, unreachable goal: empty path.
pub fn find_path(
    mesh: &NavMesh,
    graph: &NodeGraph,
    obstacles: &[Obstacle],
    query: &PathQuery,
    config: &PathConfig,
) -> Path {
    let (Some(start), Some(goal)) = (graph.locate(mesh, query.start), graph.locate(mesh, query.goal))
    else {
        debug!("[Pathfinder] no start/goal node (graph has {} nodes)", graph.len());
        return Path::empty();
    };

    let corridor = find_node_path(graph, start, goal, config.search_order);
    if corridor.is_empty() {
        return Path::empty();
    }

    let path = string_pull_with(
        mesh,
        graph,
        &corridor,
        query,
        obstacles,
        config.line_of_sight_shortcut,
    );
    debug!(
        "[Pathfinder] {:?} -> {:?}: {} nodes, {} waypoints, length {:.3}",
        query.start,
        query.goal,
        corridor.len(),
        path.len(),
        path.length()
    );
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::config::NavMeshConfig;
    use crate::nav::geometry::{points_equal, Point};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_empty_graph_gives_empty_path() {
        let mesh = NavMesh::default();
        let graph = NodeGraph::from_navmesh(&mesh);
        let query = PathQuery::new(p(0.0, 0.0), p(1.0, 1.0));
        assert!(find_path(&mesh, &graph, &[], &query, &PathConfig::default()).is_empty());
    }

    #[test]
    fn test_open_room_is_direct() {
        let room = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(5.0, 5.0)];
        let mesh = NavMesh::build(&room, &[], &NavMeshConfig::default());
        let graph = NodeGraph::from_navmesh(&mesh);
        let query = PathQuery::new(p(1.0, 2.0), p(9.0, 7.0));

        let path = find_path(&mesh, &graph, &[], &query, &PathConfig::default());
        assert_eq!(path.len(), 2);
        assert!(points_equal(path.points()[0], query.start));
        assert!(points_equal(path.points()[1], query.goal));
    }
}
