// Constraint resolver: forces obstacle outlines into the triangulation, then
// excises whatever ends up inside an obstacle.
//
// For each boundary edge u-v missing from the mesh, the faces it properly
// crosses form a corridor ("cavity"). The cavity's vertices are split by
// side of u-v, each side is re-triangulated from an owned point copy with
// the cavity outline and u-v forced in, and the pieces that fall inside the
// cavity are merged back.

use std::collections::HashMap;

use log::{debug, trace, warn};

use super::geometry::{point_in_triangle, segments_intersect, Point, EPSILON};
use super::obstacle::{point_in_obstacles, Obstacle};
use super::triangulation::{Face, TriangleId, Triangulation};
use super::weld::edge_key;

/// Force every obstacle boundary edge into `tri`.
///
/// Edges running through existing vertices are inserted piecewise between
/// them. Returns the number of edge pieces that could not be inserted;
/// those are logged and leave the mesh locally unconstrained.
pub fn apply_constraints(tri: &mut Triangulation, obstacles: &[Obstacle]) -> usize {
    let mut unresolved = 0;

    for (oi, obstacle) in obstacles.iter().enumerate() {
        if obstacle.is_degenerate() {
            continue;
        }
        for (a, b) in obstacle.edges() {
            let (Some(u), Some(v)) = (tri.vertex_index(a), tri.vertex_index(b)) else {
                warn!("[Constraints] obstacle {} edge {:?}-{:?} has no mesh vertex", oi, a, b);
                continue;
            };
            if u == v {
                continue;
            }

            let mut chain = vec![u];
            chain.extend(tri.vertices_on_segment(u, v));
            chain.push(v);
            for piece in chain.windows(2) {
                if !insert_constraint_edge(tri, piece[0], piece[1]) {
                    unresolved += 1;
                }
            }
        }
    }

    if unresolved > 0 {
        warn!("[Constraints] {} constraint edges left unresolved", unresolved);
    }
    unresolved
}

/// Make u-v a mesh edge. Returns whether it is present afterwards.
fn insert_constraint_edge(tri: &mut Triangulation, u: usize, v: usize) -> bool {
    if tri.has_edge(u, v) {
        return true;
    }

    let (pu, pv) = (tri.point(u), tri.point(v));
    let crossing: Vec<TriangleId> = tri
        .faces()
        .filter(|&(_, [a, b, c])| {
            [(a, b), (b, c), (c, a)]
                .iter()
                .any(|&(x, y)| segments_intersect(pu, pv, tri.point(x), tri.point(y)))
        })
        .map(|(id, _)| id)
        .collect();

    if crossing.is_empty() {
        debug!("[Constraints] edge {}-{} missing but crosses nothing", u, v);
        return false;
    }

    // Remove the corridor, remembering its shape and outline.
    let mut cavity: Vec<[Point; 3]> = Vec::with_capacity(crossing.len());
    let mut edge_use: HashMap<(usize, usize), usize> = HashMap::new();
    let mut vertices: Vec<usize> = Vec::new();
    for id in crossing {
        let Some(face) = tri.remove_face(id) else {
            continue;
        };
        cavity.push(face.map(|i| tri.point(i)));
        for i in 0..3 {
            *edge_use.entry(edge_key(face[i], face[(i + 1) % 3])).or_default() += 1;
            if !vertices.contains(&face[i]) {
                vertices.push(face[i]);
            }
        }
    }
    let mut outline: Vec<(usize, usize)> = edge_use
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(edge, _)| edge)
        .collect();
    outline.sort_unstable();

    let (left, right) = partition_by_side(tri, &vertices, u, v);
    trace!(
        "[Constraints] edge {}-{}: {} faces removed, sides {}/{}",
        u,
        v,
        cavity.len(),
        left.len(),
        right.len()
    );

    for side in [left, right] {
        retriangulate_side(tri, &side, &outline, &cavity, u, v);
    }

    let present = tri.has_edge(u, v);
    if !present {
        warn!("[Constraints] edge {}-{} still missing after re-triangulation", u, v);
    }
    present
}

/// Split vertices by side of u-v. Points within EPSILON of the line
/// (including u and v) go to both sides.
fn partition_by_side(
    tri: &Triangulation,
    vertices: &[usize],
    u: usize,
    v: usize,
) -> (Vec<usize>, Vec<usize>) {
    let (pu, pv) = (tri.point(u), tri.point(v));
    let mid = (pu + pv) * 0.5;
    let normal = (pv - pu).perp().normalize_or_zero();

    let mut left = Vec::new();
    let mut right = Vec::new();
    for &w in vertices {
        let side = (tri.point(w) - mid).dot(normal);
        if w == u || w == v || side.abs() <= EPSILON {
            left.push(w);
            right.push(w);
        } else if side > 0.0 {
            left.push(w);
        } else {
            right.push(w);
        }
    }
    (left, right)
}

/// Triangulate one side of the cavity on its own and merge back the
/// sub-triangles that lie inside the removed region.
fn retriangulate_side(
    tri: &mut Triangulation,
    side: &[usize],
    outline: &[(usize, usize)],
    cavity: &[[Point; 3]],
    u: usize,
    v: usize,
) {
    if side.len() < 3 {
        return;
    }

    let points: Vec<Point> = side.iter().map(|&w| tri.point(w)).collect();
    let mut local = Triangulation::build(&points, tri.config());

    let local_index = |local: &Triangulation, w: usize| local.vertex_index(tri.point(w));
    let forced = outline
        .iter()
        .copied()
        .filter(|(a, b)| side.contains(a) && side.contains(b))
        .chain(std::iter::once((u, v)));
    for (a, b) in forced {
        if let (Some(la), Some(lb)) = (local_index(&local, a), local_index(&local, b)) {
            local.force_edge(la, lb);
        }
    }

    let inside_cavity =
        |p: Point| cavity.iter().any(|&[a, b, c]| point_in_triangle(p, a, b, c));

    let mut merged = 0;
    let kept: Vec<Face> = local
        .faces()
        .map(|(_, face)| face)
        .filter(|&face| inside_cavity(local.to_triangle(face).centroid()))
        .collect();
    for face in kept {
        let corners = face.map(|i| tri.vertex_index(local.point(i)));
        let [Some(a), Some(b), Some(c)] = corners else {
            continue;
        };
        let global = [a, b, c];
        if tri.to_triangle(global).is_degenerate() || tri.contains_face(global) {
            continue;
        }
        tri.add_face(global);
        merged += 1;
    }
    trace!("[Constraints] merged {} sub-triangles", merged);
}

/// Drop faces whose centroid is inside any obstacle, and degenerate faces.
/// Returns the number removed.
pub fn remove_obstacle_triangles(tri: &mut Triangulation, obstacles: &[Obstacle]) -> usize {
    let doomed: Vec<TriangleId> = tri
        .faces()
        .filter(|&(_, face)| {
            let t = tri.to_triangle(face);
            t.is_degenerate() || point_in_obstacles(t.centroid(), obstacles)
        })
        .map(|(id, _)| id)
        .collect();

    for &id in &doomed {
        tri.remove_face(id);
    }
    debug!("[Constraints] removed {} obstructed/degenerate triangles", doomed.len());
    doomed.len()
}
