// Geometry kernel: 2D orientation, containment and intersection predicates.
// Pure functions, no state. Every point comparison goes through EPSILON;
// nothing in this crate compares coordinates with `==`.

use glam::DVec2;

/// A 2D coordinate. Value type; compare with [`points_equal`], not `==`.
pub type Point = DVec2;

/// Shared tolerance for point equality and collinearity.
pub const EPSILON: f64 = 1e-4;

/// Orientation values smaller than this are treated as "on the line" by the
/// strict segment crossing test.
const ORIENTATION_EPSILON: f64 = EPSILON * EPSILON;

// ============================================================================
// PRIMITIVES
// ============================================================================

/// 2D pseudo-cross product: a.x·b.y − a.y·b.x.
/// Positive when `b` is counter-clockwise of `a`, negative when clockwise.
#[inline]
pub fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Tolerance-based point equality (per axis, strictly below EPSILON).
#[inline]
pub fn points_equal(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

/// True if the three points lie on one line within tolerance.
#[inline]
pub fn is_collinear(a: Point, b: Point, c: Point) -> bool {
    cross(b - a, c - a).abs() < EPSILON
}

/// Arithmetic mean of three points.
#[inline]
pub fn centroid(a: Point, b: Point, c: Point) -> Point {
    (a + b + c) / 3.0
}

#[inline]
fn orientation(value: f64) -> i8 {
    if value > ORIENTATION_EPSILON {
        1
    } else if value < -ORIENTATION_EPSILON {
        -1
    } else {
        0
    }
}

// ============================================================================
// CONTAINMENT
// ============================================================================

/// True if `p` lies inside or on the boundary of triangle (a, b, c).
///
/// The three edge orientations must all be non-negative or all non-positive,
/// so either winding works. Values within EPSILON of zero count as "on the
/// edge", the same threshold the triangulator uses to flag collinear splits.
pub fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let one = cross(p - a, b - a);
    let two = cross(p - b, c - b);
    let three = cross(p - c, a - c);

    (one <= EPSILON && two <= EPSILON && three <= EPSILON)
        || (one >= -EPSILON && two >= -EPSILON && three >= -EPSILON)
}

/// Even-odd ray cast: true if `p` is inside the closed polygon.
/// Points exactly on the boundary may land on either side.
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

// ============================================================================
// CIRCUMCIRCLE
// ============================================================================

/// Circumcenter and circumradius of triangle (a, b, c).
///
/// Center from the closed-form determinant formula; radius from the side
/// lengths and Heron's area (R = abc / 4K). Returns `None` for collinear
/// input, where the determinant would divide by ~0.
pub fn circumcircle(a: Point, b: Point, c: Point) -> Option<(Point, f64)> {
    if is_collinear(a, b, c) {
        return None;
    }

    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    let a_sq = a.length_squared();
    let b_sq = b.length_squared();
    let c_sq = c.length_squared();
    let center = Point::new(
        (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d,
        (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d,
    );

    let ab = a.distance(b);
    let bc = b.distance(c);
    let ca = c.distance(a);
    let area = heron_area(ab, bc, ca);
    if area <= 0.0 {
        return None;
    }

    Some((center, (ab * bc * ca) / (4.0 * area)))
}

/// Heron's formula in its cancellation-safe form (sides sorted descending).
fn heron_area(x: f64, y: f64, z: f64) -> f64 {
    let mut s = [x, y, z];
    s.sort_by(|l, r| r.total_cmp(l));
    let [a, b, c] = s;
    let product = (a + (b + c)) * (c - (a - b)) * (c + (a - b)) * (a + (b - c));
    0.25 * product.max(0.0).sqrt()
}

/// True iff `p` lies inside or on the circumcircle of (a, b, c).
/// Collinear triangles have no circumcircle and never contain anything.
pub fn circumcircle_contains(a: Point, b: Point, c: Point, p: Point) -> bool {
    match circumcircle(a, b, c) {
        Some((center, radius)) => p.distance(center) <= radius,
        None => false,
    }
}

/// True iff `p` lies inside the circumcircle by more than EPSILON.
/// Used where cocircular ties must not count as violations.
pub fn circumcircle_strictly_contains(a: Point, b: Point, c: Point, p: Point) -> bool {
    match circumcircle(a, b, c) {
        Some((center, radius)) => p.distance(center) < radius - EPSILON,
        None => false,
    }
}

// ============================================================================
// SEGMENTS
// ============================================================================

/// Strict crossing test for segments p1-p2 and q1-q2.
///
/// Segments that share an endpoint, touch at an endpoint, or overlap
/// collinearly do NOT intersect.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    if points_equal(p1, q1) || points_equal(p1, q2) || points_equal(p2, q1) || points_equal(p2, q2)
    {
        return false;
    }

    let d1 = orientation(cross(p2 - p1, q1 - p1));
    let d2 = orientation(cross(p2 - p1, q2 - p1));
    let d3 = orientation(cross(q2 - q1, p1 - q1));
    let d4 = orientation(cross(q2 - q1, p2 - q1));

    d1 * d2 < 0 && d3 * d4 < 0
}

/// Parameter t in [0, 1] of `p` along a-b if `p` lies on the segment
/// (within tolerance), excluding points equal to either endpoint.
pub fn param_on_segment(p: Point, a: Point, b: Point) -> Option<f64> {
    if points_equal(p, a) || points_equal(p, b) {
        return None;
    }
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= 0.0 || cross(ab, p - a).abs() >= EPSILON * ab.length() {
        return None;
    }
    let t = (p - a).dot(ab) / len_sq;
    (t > 0.0 && t < 1.0).then_some(t)
}

/// Parameter t along a-b where it properly crosses c-d.
pub fn crossing_param(a: Point, b: Point, c: Point, d: Point) -> Option<f64> {
    if !segments_intersect(a, b, c, d) {
        return None;
    }
    let r = b - a;
    let s = d - c;
    let denom = cross(r, s);
    if denom == 0.0 {
        return None;
    }
    Some(cross(c - a, s) / denom)
}

/// Signed area of a closed polygon (shoelace). Positive for counter-clockwise.
pub fn polygon_signed_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        sum += cross(polygon[i], polygon[(i + 1) % n]);
    }
    sum * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_cross_orientation() {
        assert!(cross(p(1.0, 0.0), p(0.0, 1.0)) > 0.0);
        assert!(cross(p(0.0, 1.0), p(1.0, 0.0)) < 0.0);
        assert_eq!(cross(p(2.0, 2.0), p(1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_points_equal_uses_tolerance() {
        assert!(points_equal(p(1.0, 1.0), p(1.00005, 0.99995)));
        assert!(!points_equal(p(1.0, 1.0), p(1.0002, 1.0)));
    }

    #[test]
    fn test_point_in_triangle_either_winding() {
        let (a, b, c) = (p(0.0, 0.0), p(0.0, 4.0), p(4.0, 0.0));
        assert!(point_in_triangle(p(1.0, 1.0), a, b, c));
        assert!(point_in_triangle(p(1.0, 1.0), a, c, b));
        assert!(!point_in_triangle(p(3.0, 3.0), a, b, c));
        // On an edge counts as inside.
        assert!(point_in_triangle(p(2.0, 0.0), a, b, c));
    }

    #[test]
    fn test_circumcircle_right_triangle() {
        let (center, radius) = circumcircle(p(0.0, 0.0), p(0.0, 2.0), p(2.0, 0.0)).unwrap();
        assert!(points_equal(center, p(1.0, 1.0)));
        assert!((radius - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_circumcircle_contains_boundary_and_inside() {
        let (a, b, c) = (p(0.0, 0.0), p(0.0, 1.0), p(1.0, 0.0));
        assert!(circumcircle_contains(a, b, c, p(0.5, 0.5)));
        assert!(circumcircle_contains(a, b, c, p(1.0, 1.0)));
        assert!(!circumcircle_strictly_contains(a, b, c, p(1.0, 1.0)));
        assert!(!circumcircle_contains(a, b, c, p(2.0, 2.0)));
    }

    #[test]
    fn test_circumcircle_rejects_collinear() {
        assert!(circumcircle(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)).is_none());
        assert!(!circumcircle_contains(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), p(1.0, 1.0)));
    }

    #[test]
    fn test_segments_intersect_strict() {
        assert!(segments_intersect(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0)));
        // Shared endpoint
        assert!(!segments_intersect(p(0.0, 0.0), p(2.0, 2.0), p(2.0, 2.0), p(3.0, 0.0)));
        // T-junction: endpoint touches the other segment
        assert!(!segments_intersect(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)));
        // Collinear overlap
        assert!(!segments_intersect(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(3.0, 0.0)));
        // Disjoint
        assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)));
    }

    #[test]
    fn test_point_in_polygon_concave() {
        // L-shape
        let poly = [p(0.0, 0.0), p(4.0, 0.0), p(4.0, 1.0), p(1.0, 1.0), p(1.0, 4.0), p(0.0, 4.0)];
        assert!(point_in_polygon(p(0.5, 3.0), &poly));
        assert!(point_in_polygon(p(3.0, 0.5), &poly));
        assert!(!point_in_polygon(p(3.0, 3.0), &poly));
    }

    #[test]
    fn test_param_on_segment() {
        let t = param_on_segment(p(1.0, 1.0), p(0.0, 0.0), p(4.0, 4.0)).unwrap();
        assert!((t - 0.25).abs() < 1e-12);
        assert!(param_on_segment(p(1.0, 1.5), p(0.0, 0.0), p(4.0, 4.0)).is_none());
        assert!(param_on_segment(p(0.0, 0.0), p(0.0, 0.0), p(4.0, 4.0)).is_none());
    }

    #[test]
    fn test_polygon_area() {
        let square = [p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)];
        assert!((polygon_signed_area(&square) - 4.0).abs() < 1e-12);
    }
}
