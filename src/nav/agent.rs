// A point agent that plans with the pathfinder and walks its waypoints.

use log::trace;

use super::config::PathConfig;
use super::geometry::{points_equal, Point};
use super::graph::NodeGraph;
use super::navmesh::NavMesh;
use super::obstacle::Obstacle;
use super::path::{Path, PathQuery};
use super::pathfinder::find_path;

#[derive(Debug, Clone, PartialEq)]
pub struct PathAgent {
    pub position: Point,
    pub target: Point,
    /// Clearance kept from portal edges.
    pub radius: f64,
    /// Distance covered per unit of time.
    pub speed: f64,
    path: Path,
    /// Index of the waypoint being walked towards.
    next: usize,
}

impl PathAgent {
    pub fn new(position: Point, radius: f64, speed: f64) -> Self {
        Self {
            position,
            target: position,
            radius,
            speed,
            path: Path::empty(),
            next: 0,
        }
    }

    /// Plan a route to `target`. Returns false (and stays put) if none exists.
    pub fn go_to(
        &mut self,
        target: Point,
        mesh: &NavMesh,
        graph: &NodeGraph,
        obstacles: &[Obstacle],
        config: &PathConfig,
    ) -> bool {
        self.target = target;
        let query = PathQuery::new(self.position, target).with_radius(self.radius);
        self.path = find_path(mesh, graph, obstacles, &query, config);
        // Waypoint 0 is the current position.
        self.next = 1.min(self.path.len());
        !self.path.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Waypoints not yet reached.
    pub fn remaining(&self) -> &[Point] {
        self.path.points().get(self.next..).unwrap_or(&[])
    }

    pub fn is_idle(&self) -> bool {
        self.remaining().is_empty()
    }

    /// Final waypoint, or the current position when idle.
    pub fn path_end(&self) -> Point {
        self.remaining().last().copied().unwrap_or(self.position)
    }

    /// Move along the path for `dt`, consuming waypoints as they are reached.
    /// Leftover distance carries over to the next segment.
    pub fn advance(&mut self, dt: f64) {
        let mut budget = self.speed * dt;
        while budget > 0.0 {
            let Some(&waypoint) = self.path.points().get(self.next) else {
                break;
            };
            let to_go = self.position.distance(waypoint);
            if to_go <= budget || points_equal(self.position, waypoint) {
                self.position = waypoint;
                self.next += 1;
                budget -= to_go;
                trace!("[PathAgent] reached waypoint {:?}", waypoint);
            } else {
                self.position += (waypoint - self.position) / to_go * budget;
                budget = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::config::NavMeshConfig;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn open_room() -> (NavMesh, NodeGraph) {
        let room = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        let mesh = NavMesh::build(&room, &[], &NavMeshConfig::default());
        let graph = NodeGraph::from_navmesh(&mesh);
        (mesh, graph)
    }

    #[test]
    fn test_new_agent_is_idle() {
        let agent = PathAgent::new(p(1.0, 1.0), 0.5, 2.0);
        assert!(agent.is_idle());
        assert_eq!(agent.path_end(), p(1.0, 1.0));
    }

    #[test]
    fn test_advance_walks_to_target() {
        let (mesh, graph) = open_room();
        let mut agent = PathAgent::new(p(1.0, 1.0), 0.0, 1.0);
        assert!(agent.go_to(p(4.0, 5.0), &mesh, &graph, &[], &PathConfig::default()));
        assert!(points_equal(agent.path_end(), p(4.0, 5.0)));

        agent.advance(2.5);
        assert!((agent.position.distance(p(1.0, 1.0)) - 2.5).abs() < 1e-9);
        assert!(!agent.is_idle());

        agent.advance(10.0);
        assert!(points_equal(agent.position, p(4.0, 5.0)));
        assert!(agent.is_idle());
    }

    #[test]
    fn test_go_to_without_mesh_fails() {
        let mut agent = PathAgent::new(p(1.0, 1.0), 0.0, 1.0);
        let ok = agent.go_to(
            p(4.0, 5.0),
            &NavMesh::default(),
            &NodeGraph::new(),
            &[],
            &PathConfig::default(),
        );
        assert!(!ok);
        assert!(agent.is_idle());
        assert_eq!(agent.position, p(1.0, 1.0));
    }
}
