// Obstacles: closed polygons to route around. Never assumed convex.

use super::geometry::{
    crossing_param, param_on_segment, point_in_polygon, points_equal, polygon_signed_area,
    segments_intersect, Point,
};

/// An ordered polygon (hole) that agents must avoid.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    points: Vec<Point>,
}

impl Obstacle {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle, counter-clockwise from `min`.
    pub fn rectangle(min: Point, max: Point) -> Self {
        Self::new(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ])
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Fewer than three vertices: no interior, no usable boundary.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Boundary edges as consecutive vertex pairs, wrapping.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn contains_point(&self, p: Point) -> bool {
        !self.is_degenerate() && point_in_polygon(p, &self.points)
    }

    pub fn area(&self) -> f64 {
        polygon_signed_area(&self.points).abs()
    }

    /// True if segment a-b properly crosses any boundary edge.
    pub fn crosses_segment(&self, a: Point, b: Point) -> bool {
        !self.is_degenerate() && self.edges().any(|(p, q)| segments_intersect(a, b, p, q))
    }

    /// True if segment a-b passes through the obstacle.
    ///
    /// Catches proper edge crossings and also segments that enter the
    /// interior through vertices (e.g. a diagonal running corner to corner),
    /// which a pure crossing test misses. The segment is cut at every
    /// boundary contact and each piece's midpoint is tested for containment.
    pub fn blocks_segment(&self, a: Point, b: Point) -> bool {
        if self.is_degenerate() {
            return false;
        }
        if self.crosses_segment(a, b) {
            return true;
        }

        let mut cuts = vec![0.0, 1.0];
        cuts.extend(self.points.iter().filter_map(|&v| param_on_segment(v, a, b)));
        cuts.extend(self.edges().filter_map(|(p, q)| crossing_param(a, b, p, q)));
        cuts.sort_by(f64::total_cmp);

        cuts.windows(2)
            .filter(|w| w[1] > w[0])
            .map(|w| a.lerp(b, (w[0] + w[1]) * 0.5))
            .any(|mid| !self.on_boundary(mid) && self.contains_point(mid))
    }

    fn on_boundary(&self, p: Point) -> bool {
        self.edges()
            .any(|(q, r)| points_equal(p, q) || param_on_segment(p, q, r).is_some())
    }
}

// ============================================================================
// OBSTACLE SET QUERIES
// ============================================================================

/// True if `p` is inside any obstacle.
pub fn point_in_obstacles(p: Point, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|o| o.contains_point(p))
}

/// Unobstructed straight line from `a` to `b`.
pub fn line_of_sight(a: Point, b: Point, obstacles: &[Obstacle]) -> bool {
    !obstacles.iter().any(|o| o.blocks_segment(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn square() -> Obstacle {
        Obstacle::rectangle(p(4.0, 4.0), p(6.0, 6.0))
    }

    #[test]
    fn test_edges_wrap() {
        let edges: Vec<_> = square().edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].1, p(4.0, 4.0));
    }

    #[test]
    fn test_contains_point() {
        let ob = square();
        assert!(ob.contains_point(p(5.0, 5.0)));
        assert!(!ob.contains_point(p(1.0, 1.0)));
        assert!((ob.area() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_blocks_segment_proper_crossing() {
        let ob = square();
        assert!(ob.blocks_segment(p(5.0, 0.0), p(5.0, 10.0)));
        assert!(!ob.blocks_segment(p(0.0, 0.0), p(10.0, 0.0)));
    }

    #[test]
    fn test_blocks_segment_through_corners() {
        // Runs exactly through (4,4) and (6,6); no edge is properly crossed.
        let ob = square();
        assert!(!ob.crosses_segment(p(1.0, 1.0), p(9.0, 9.0)));
        assert!(ob.blocks_segment(p(1.0, 1.0), p(9.0, 9.0)));
    }

    #[test]
    fn test_grazing_a_corner_is_not_blocked() {
        let ob = square();
        // Touches only the (4,4) corner.
        assert!(!ob.blocks_segment(p(2.0, 6.0), p(6.0, 2.0)));
        // Runs along the bottom edge.
        assert!(!ob.blocks_segment(p(3.0, 4.0), p(7.0, 4.0)));
        assert!(!ob.blocks_segment(p(2.0, 4.0), p(4.0, 2.0)));
    }

    #[test]
    fn test_degenerate_obstacle_is_inert() {
        let ob = Obstacle::new(vec![p(0.5, 0.5)]);
        assert!(ob.is_degenerate());
        assert!(!ob.contains_point(p(0.5, 0.5)));
        assert!(line_of_sight(p(0.0, 0.0), p(1.0, 1.0), &[ob]));
    }
}
