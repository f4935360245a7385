// Path smoothing: portals from a triangle corridor, radius inset, and the
// simple stupid funnel algorithm with line-of-sight early exits.

use log::{debug, trace};

use super::geometry::{cross, points_equal, Point};
use super::graph::{NodeGraph, NodeId};
use super::navmesh::NavMesh;
use super::obstacle::{line_of_sight, point_in_obstacles, Obstacle};
use super::path::{Path, PathQuery};

/// Shared edge between two consecutive corridor triangles, oriented as seen
/// when walking through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Portal {
    pub left: Point,
    pub right: Point,
}

impl Portal {
    /// Degenerate portal at a single point (start or goal).
    pub fn point(p: Point) -> Self {
        Self { left: p, right: p }
    }

    pub fn midpoint(&self) -> Point {
        (self.left + self.right) * 0.5
    }

    pub fn width(&self) -> f64 {
        self.left.distance(self.right)
    }

    /// Pull both ends toward the middle by `radius`. Portals no wider than
    /// `2 * radius` collapse to their midpoint.
    pub fn inset(&self, radius: f64) -> Self {
        if radius <= 0.0 {
            return *self;
        }
        let width = self.width();
        if width <= 2.0 * radius {
            return Self::point(self.midpoint());
        }
        let step = (self.right - self.left) / width * radius;
        Self {
            left: self.left + step,
            right: self.right - step,
        }
    }
}

/// Portals between consecutive corridor nodes. Pairs that do not share an
/// edge are skipped.
pub fn portals(mesh: &NavMesh, graph: &NodeGraph, corridor: &[NodeId]) -> Vec<Portal> {
    corridor
        .windows(2)
        .filter_map(|w| {
            let from = mesh.triangle(graph.node(w[0])?.triangle)?;
            let to = mesh.triangle(graph.node(w[1])?.triangle)?;
            let (p, q) = from.shared_edge(to)?;
            let c = from.centroid();
            if cross(p - c, q - c) < 0.0 {
                Some(Portal { left: p, right: q })
            } else {
                Some(Portal { left: q, right: p })
            }
        })
        .collect()
}

/// Smooth a node corridor into a polyline from `query.start` to the goal.
pub fn string_pull(
    mesh: &NavMesh,
    graph: &NodeGraph,
    corridor: &[NodeId],
    query: &PathQuery,
    obstacles: &[Obstacle],
) -> Path {
    string_pull_with(mesh, graph, corridor, query, obstacles, true)
}

/// [`string_pull`] with the line-of-sight shortcuts optionally disabled.
///
/// A goal outside the mesh or inside an obstacle is replaced by the centroid
/// of the corridor's last triangle.
pub fn string_pull_with(
    mesh: &NavMesh,
    graph: &NodeGraph,
    corridor: &[NodeId],
    query: &PathQuery,
    obstacles: &[Obstacle],
    shortcut: bool,
) -> Path {
    let Some(last) = corridor.last().and_then(|&id| graph.node(id)) else {
        return Path::empty();
    };

    let start = query.start;
    let goal = if mesh.triangle_containing(query.goal).is_none()
        || point_in_obstacles(query.goal, obstacles)
    {
        debug!("[Funnel] goal {:?} unreachable, aiming at {:?}", query.goal, last.position);
        last.position
    } else {
        query.goal
    };

    if shortcut && line_of_sight(start, goal, obstacles) {
        trace!("[Funnel] direct line of sight");
        return Path::new(vec![start, goal]);
    }

    let mut gates = Vec::with_capacity(corridor.len() + 1);
    gates.push(Portal::point(start));
    gates.extend(
        portals(mesh, graph, corridor)
            .iter()
            .map(|p| p.inset(query.radius)),
    );
    gates.push(Portal::point(goal));

    let points = run_funnel(&gates, goal, obstacles, shortcut);
    trace!("[Funnel] {} portals -> {} waypoints", gates.len(), points.len());
    Path::new(points)
}

fn push_unique(points: &mut Vec<Point>, p: Point) {
    if points.last().is_none_or(|&last| !points_equal(last, p)) {
        points.push(p);
    }
}

/// Funnel over `gates`, the first of which is the start point and the last
/// the goal point. Left is the counter-clockwise side.
fn run_funnel(gates: &[Portal], goal: Point, obstacles: &[Obstacle], shortcut: bool) -> Vec<Point> {
    let Some(first) = gates.first() else {
        return Vec::new();
    };

    let mut points = vec![first.left];
    let (mut apex, mut left, mut right) = (first.left, first.left, first.right);
    let (mut left_i, mut right_i) = (0, 0);

    let mut i = 1;
    while i < gates.len() {
        let Portal { left: l, right: r } = gates[i];
        let mut commit = None;

        // Right side
        if cross(right - apex, r - apex) >= 0.0 {
            if points_equal(apex, right) || cross(left - apex, r - apex) < 0.0 {
                right = r;
                right_i = i;
            } else {
                commit = Some((left, left_i));
            }
        }

        // Left side
        if commit.is_none() && cross(left - apex, l - apex) <= 0.0 {
            if points_equal(apex, left) || cross(right - apex, l - apex) > 0.0 {
                left = l;
                left_i = i;
            } else {
                commit = Some((right, right_i));
            }
        }

        if let Some((corner, corner_i)) = commit {
            apex = corner;
            push_unique(&mut points, apex);
            if shortcut && line_of_sight(apex, goal, obstacles) {
                break;
            }
            left = apex;
            right = apex;
            left_i = corner_i;
            right_i = corner_i;
            i = corner_i + 1;
            continue;
        }
        i += 1;
    }

    push_unique(&mut points, goal);
    points
}
