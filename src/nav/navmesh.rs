// NavMesh: the final triangle list. Built in one shot from points and
// obstacles; a rebuild replaces the whole mesh.

use std::collections::HashSet;

use log::{info, warn};

use super::config::NavMeshConfig;
use super::constraints::{apply_constraints, remove_obstacle_triangles};
use super::geometry::Point;
use super::obstacle::Obstacle;
use super::triangle::Triangle;
use super::triangulation::Triangulation;
use super::weld::{edge_faces, edge_key, index_triangles};

/// A mesh edge with its incident triangles (indices into [`NavMesh::triangles`]).
/// One incident triangle means a boundary edge; two means interior.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub a: Point,
    pub b: Point,
    pub triangles: Vec<usize>,
}

impl Edge {
    pub fn is_boundary(&self) -> bool {
        self.triangles.len() == 1
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavMesh {
    triangles: Vec<Triangle>,
}

impl NavMesh {
    /// Triangulate `points` plus every obstacle vertex, force obstacle
    /// outlines in, and cut the obstacles out.
    ///
    /// Obstacles with fewer than three vertices are ignored.
    pub fn build(points: &[Point], obstacles: &[Obstacle], config: &NavMeshConfig) -> Self {
        let (valid, degenerate): (Vec<&Obstacle>, Vec<&Obstacle>) =
            obstacles.iter().partition(|o| !o.is_degenerate());
        if !degenerate.is_empty() {
            warn!("[NavMesh] ignoring {} degenerate obstacles", degenerate.len());
        }
        let valid: Vec<Obstacle> = valid.into_iter().cloned().collect();

        let mut all_points = points.to_vec();
        for obstacle in &valid {
            all_points.extend_from_slice(obstacle.points());
        }

        let mut tri = Triangulation::build(&all_points, config);
        apply_constraints(&mut tri, &valid);
        remove_obstacle_triangles(&mut tri, &valid);
        tri.compact();

        let mesh = Self::from_triangles(tri.triangles());
        info!(
            "[NavMesh] built {} triangles from {} points and {} obstacles (area {:.3})",
            mesh.len(),
            points.len(),
            valid.len(),
            mesh.total_area()
        );
        mesh
    }

    /// Replace this mesh with a freshly built one.
    pub fn rebuild(&mut self, points: &[Point], obstacles: &[Obstacle], config: &NavMeshConfig) {
        *self = Self::build(points, obstacles, config);
    }

    /// Wrap an existing triangle list, e.g. a hand-built corridor.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Index of the first triangle containing `p` (boundary inclusive).
    pub fn triangle_containing(&self, p: Point) -> Option<usize> {
        self.triangles.iter().position(|t| t.contains_point(p))
    }

    pub fn total_area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Distinct vertices, in first-seen order.
    pub fn vertices(&self) -> Vec<Point> {
        index_triangles(&self.triangles).0.points().to_vec()
    }

    /// Every edge with its incident triangles, recomputed from the triangle
    /// list. Ordered by first appearance.
    pub fn edges(&self) -> Vec<Edge> {
        let (weld, faces) = index_triangles(&self.triangles);
        let incident = edge_faces(&faces);

        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for face in &faces {
            for i in 0..3 {
                let key = edge_key(face[i], face[(i + 1) % 3]);
                if !seen.insert(key) {
                    continue;
                }
                edges.push(Edge {
                    a: weld.point(key.0),
                    b: weld.point(key.1),
                    triangles: incident.get(&key).cloned().unwrap_or_default(),
                });
            }
        }
        edges
    }
}
