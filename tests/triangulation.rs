//! Mesh construction scenarios: Delaunay property, coverage, winding,
//! constraint insertion and rebuild stability.

use navmesh::geometry::{circumcircle_strictly_contains, cross, points_equal};
use navmesh::{NavMesh, NavMeshConfig, Obstacle, Point, Triangle, Triangulation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn random_points(seed: u64, count: usize, size: f64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| p(rng.gen_range(0.0..size), rng.gen_range(0.0..size)))
        .collect()
}

/// Area of the convex hull (monotone chain).
fn hull_area(points: &[Point]) -> f64 {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    let mut hull: Vec<Point> = Vec::new();
    for pass in 0..2 {
        let start = hull.len();
        for &q in &pts {
            while hull.len() >= start + 2 {
                let (a, b) = (hull[hull.len() - 2], hull[hull.len() - 1]);
                if cross(b - a, q - a) <= 0.0 {
                    hull.pop();
                } else {
                    break;
                }
            }
            hull.push(q);
        }
        hull.pop();
        if pass == 0 {
            pts.reverse();
        }
    }
    let n = hull.len();
    (0..n).map(|i| cross(hull[i], hull[(i + 1) % n])).sum::<f64>().abs() * 0.5
}

fn room(size: f64) -> Vec<Point> {
    vec![p(0.0, 0.0), p(size, 0.0), p(size, size), p(0.0, size)]
}

fn has_mesh_edge(mesh: &NavMesh, a: Point, b: Point) -> bool {
    mesh.edges().iter().any(|e| {
        (points_equal(e.a, a) && points_equal(e.b, b)) || (points_equal(e.a, b) && points_equal(e.b, a))
    })
}

fn total_area(triangles: &[Triangle]) -> f64 {
    triangles.iter().map(Triangle::area).sum()
}

fn distance_to_segment(q: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let t = ((q - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
    q.distance(a + ab * t)
}

/// Points hugging each wall of a `size` room, `gap` inside it.
fn wall_huggers(size: f64, gap: f64) -> Vec<Point> {
    let mut points = Vec::new();
    for t in [0.23, 0.45, 0.71] {
        let s = size * t;
        points.extend([p(s, gap), p(size - gap, s), p(size - s, size - gap), p(gap, size - s)]);
    }
    points
}

// ============================================================================
// UNCONSTRAINED TRIANGULATION
// ============================================================================

#[test]
fn test_random_points_are_delaunay() {
    init();
    for seed in [1, 2, 3] {
        let points = random_points(seed, 60, 100.0);
        let tri = Triangulation::build(&points, &NavMeshConfig::default());
        assert!(!tri.is_empty());

        for t in tri.triangles() {
            let [a, b, c] = t.points();
            for &q in &points {
                if t.has_vertex(q) {
                    continue;
                }
                assert!(
                    !circumcircle_strictly_contains(a, b, c, q),
                    "seed {}: {:?} inside circumcircle of {:?}",
                    seed,
                    q,
                    t
                );
            }
        }
    }
}

#[test]
fn test_random_points_cover_hull() {
    init();
    let points = random_points(17, 80, 50.0);
    let tri = Triangulation::build(&points, &NavMeshConfig::default());
    let area = total_area(&tri.triangles());
    assert!((area - hull_area(&points)).abs() < 1e-6, "area {} vs hull {}", area, hull_area(&points));
}

#[test]
fn test_points_hugging_hull_edges_keep_coverage() {
    init();
    for gap in [3e-4, 1e-3] {
        let mut points = room(20.0);
        points.extend(wall_huggers(20.0, gap));
        for config in [NavMeshConfig::default(), NavMeshConfig::default().with_super_triangle_scale(100.0)] {
            let tri = Triangulation::build(&points, &config);
            let area = total_area(&tri.triangles());
            assert!((area - 400.0).abs() < 1e-6, "gap {}: area {}", gap, area);
        }
    }
}

#[test]
fn test_capped_restoration_still_gives_valid_mesh() {
    init();
    let points = random_points(23, 50, 30.0);
    for cap in [0, 1] {
        let config = NavMeshConfig::default().with_max_restore_sweeps(cap);
        let mut tri = Triangulation::build(&points, &config);
        assert!(!tri.is_empty());
        for t in tri.triangles() {
            let [a, b, c] = t.points();
            assert!(cross(b - a, c - a) < 0.0, "cap {}: {:?} not clockwise", cap, t);
            assert!(!t.is_degenerate());
        }
        let area = total_area(&tri.triangles());
        assert!((area - hull_area(&points)).abs() < 1e-6, "cap {}: area {}", cap, area);
        assert!(tri.restore_delaunay() <= cap);
    }

    let mut full = Triangulation::build(&points, &NavMeshConfig::default());
    assert_eq!(full.restore_delaunay(), 0);
}

#[test]
fn test_every_triangle_is_clockwise() {
    init();
    let tri = Triangulation::build(&random_points(5, 40, 20.0), &NavMeshConfig::default());
    for t in tri.triangles() {
        let [a, b, c] = t.points();
        assert!(cross(b - a, c - a) <= 0.0);
        assert!(!t.is_degenerate());
    }
}

#[test]
fn test_grid_points_with_cocircular_quads() {
    init();
    let mut points = Vec::new();
    for y in 0..5 {
        for x in 0..5 {
            points.push(p(x as f64, y as f64));
        }
    }
    let tri = Triangulation::build(&points, &NavMeshConfig::default());
    assert_eq!(tri.len(), 32);
    assert!((total_area(&tri.triangles()) - 16.0).abs() < 1e-9);
}

// ============================================================================
// NAVMESH SCENARIOS
// ============================================================================

#[test]
fn test_unit_square_with_point_obstacle() {
    init();
    let obstacle = Obstacle::new(vec![p(0.25, 0.25)]);
    let mesh = NavMesh::build(&room(1.0), &[obstacle], &NavMeshConfig::default());

    assert_eq!(mesh.len(), 2);
    // The fourth corner sits on each circumcircle, never strictly inside.
    for t in mesh.triangles() {
        let [a, b, c] = t.points();
        for q in room(1.0).into_iter().filter(|&q| !t.has_vertex(q)) {
            assert!(!circumcircle_strictly_contains(a, b, c, q));
        }
    }
    assert!((mesh.total_area() - 1.0).abs() < 1e-9);
}

#[test]
fn test_square_room_with_square_obstacle() {
    init();
    let obstacle = Obstacle::rectangle(p(4.0, 4.0), p(6.0, 6.0));
    let mesh = NavMesh::build(&room(10.0), &[obstacle.clone()], &NavMeshConfig::default());

    assert!((mesh.total_area() - 96.0).abs() < 1e-6);
    for (a, b) in obstacle.edges() {
        assert!(has_mesh_edge(&mesh, a, b), "obstacle edge {:?}-{:?} missing", a, b);
    }
    for t in mesh.triangles() {
        assert!(!obstacle.contains_point(t.centroid()));
        assert!(!t.is_degenerate());
    }
}

#[test]
fn test_thin_obstacle_needs_multi_triangle_constraints() {
    init();
    let obstacle = Obstacle::new(vec![
        p(1.3, 4.8),
        p(8.7, 4.9),
        p(8.6, 5.2),
        p(1.2, 5.15),
    ]);
    let mut points = room(10.0);
    points.extend([p(5.1, 2.9), p(4.9, 7.2)]);
    let mesh = NavMesh::build(&points, &[obstacle.clone()], &NavMeshConfig::default());

    assert!((mesh.total_area() - (100.0 - obstacle.area())).abs() < 1e-6);
    for (a, b) in obstacle.edges() {
        assert!(has_mesh_edge(&mesh, a, b), "obstacle edge {:?}-{:?} missing", a, b);
    }
    for t in mesh.triangles() {
        assert!(!obstacle.contains_point(t.centroid()));
    }
}

#[test]
fn test_concave_obstacle() {
    init();
    // U-shape opening upward.
    let obstacle = Obstacle::new(vec![
        p(3.0, 3.0),
        p(7.0, 3.0),
        p(7.0, 7.0),
        p(6.0, 7.0),
        p(6.0, 4.0),
        p(4.0, 4.0),
        p(4.0, 7.0),
        p(3.0, 7.0),
    ]);
    let mut points = room(10.0);
    points.push(p(5.0, 6.0));
    let mesh = NavMesh::build(&points, &[obstacle.clone()], &NavMeshConfig::default());

    assert!((mesh.total_area() - (100.0 - obstacle.area())).abs() < 1e-6);
    assert!(mesh.triangle_containing(p(5.0, 5.5)).is_some());
    assert!(mesh.triangle_containing(p(3.5, 5.0)).is_none());
}

#[test]
fn test_random_rooms_with_rotated_obstacle_keep_coverage() {
    init();
    let obstacle = Obstacle::new(vec![p(7.0, 6.0), p(13.0, 8.0), p(12.0, 13.0), p(6.0, 11.0)]);
    let free_area = 400.0 - obstacle.area();

    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = rng.gen_range(5..=40);
        let mut points = room(20.0);
        points.extend(random_points(1_000 + seed, count, 20.0).into_iter().filter(|&q| {
            !obstacle.contains_point(q) && obstacle.edges().all(|(a, b)| distance_to_segment(q, a, b) > 0.05)
        }));

        let mesh = NavMesh::build(&points, &[obstacle.clone()], &NavMeshConfig::default());
        assert!(
            (mesh.total_area() - free_area).abs() < 1e-6,
            "seed {}: area {} vs {}",
            seed,
            mesh.total_area(),
            free_area
        );
    }
}

#[test]
fn test_rebuild_is_idempotent() {
    init();
    let obstacles = vec![
        Obstacle::rectangle(p(4.0, 4.0), p(6.0, 6.0)),
        Obstacle::rectangle(p(1.0, 7.0), p(2.5, 8.5)),
    ];
    let mut points = room(10.0);
    points.extend(random_points(9, 20, 10.0).into_iter().filter(|&q| {
        obstacles.iter().all(|o| !o.contains_point(q))
    }));

    let first = NavMesh::build(&points, &obstacles, &NavMeshConfig::default());
    let mut second = NavMesh::default();
    second.rebuild(&points, &obstacles, &NavMeshConfig::default());

    assert_eq!(first.len(), second.len());
    assert!((first.total_area() - second.total_area()).abs() < 1e-9);
    for t in first.triangles() {
        assert!(second.triangles().iter().any(|u| u.same_vertices(t)));
    }
}

#[test]
fn test_collinear_input_gives_empty_mesh() {
    init();
    let points = [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0)];
    assert!(NavMesh::build(&points, &[], &NavMeshConfig::default()).is_empty());
}
