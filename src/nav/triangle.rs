// Triangle value type. Always stored clockwise; "mutating" a triangle means
// replacing it in its containing collection.

use super::geometry::{
    centroid, circumcircle_contains, cross, is_collinear, point_in_triangle, points_equal, Point,
};

/// Three points in clockwise winding order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    points: [Point; 3],
}

impl Triangle {
    /// Build a triangle, swapping the last two points if the input is
    /// counter-clockwise (positive signed area).
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        if cross(b - a, c - a) > 0.0 {
            Self { points: [a, c, b] }
        } else {
            Self { points: [a, b, c] }
        }
    }

    #[inline]
    pub fn points(&self) -> [Point; 3] {
        self.points
    }

    /// The three edges as consecutive vertex pairs (wrapping).
    pub fn edges(&self) -> [(Point, Point); 3] {
        let [a, b, c] = self.points;
        [(a, b), (b, c), (c, a)]
    }

    pub fn centroid(&self) -> Point {
        let [a, b, c] = self.points;
        centroid(a, b, c)
    }

    pub fn area(&self) -> f64 {
        let [a, b, c] = self.points;
        cross(b - a, c - a).abs() * 0.5
    }

    /// Collinear within tolerance.
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.points;
        is_collinear(a, b, c)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        let [a, b, c] = self.points;
        point_in_triangle(p, a, b, c)
    }

    pub fn has_vertex(&self, p: Point) -> bool {
        self.points.iter().any(|&v| points_equal(v, p))
    }

    pub fn circumcircle_contains(&self, p: Point) -> bool {
        let [a, b, c] = self.points;
        circumcircle_contains(a, b, c, p)
    }

    /// Vertices of `self` that also appear in `other`.
    pub fn common_vertices(&self, other: &Triangle) -> Vec<Point> {
        self.points
            .iter()
            .copied()
            .filter(|&v| other.has_vertex(v))
            .collect()
    }

    /// The full edge shared with `other`, if they have exactly two common vertices.
    pub fn shared_edge(&self, other: &Triangle) -> Option<(Point, Point)> {
        match self.common_vertices(other).as_slice() {
            &[a, b] => Some((a, b)),
            _ => None,
        }
    }

    /// Same three vertices, in any order.
    pub fn same_vertices(&self, other: &Triangle) -> bool {
        self.points.iter().all(|&v| other.has_vertex(v))
    }
}
