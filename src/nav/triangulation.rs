// Incremental Delaunay triangulation over welded vertex indices.
//
// Faces live in an arena (`Vec<Option<Face>>`) addressed by stable
// `TriangleId`s, with an edge → faces index kept in sync on every add and
// remove. Slots are only reclaimed by `compact`, which invalidates ids.
//
// Pipeline for `build`:
//   super-triangle → insert each point (split, fix collinear splits, local
//   flips) → global strict-Delaunay sweep → strip super faces → compact.

use std::collections::HashMap;

use log::{debug, trace, warn};

use super::config::NavMeshConfig;
use super::geometry::{
    circumcircle_contains, circumcircle_strictly_contains, cross, is_collinear, param_on_segment,
    point_in_triangle, segments_intersect, Point,
};
use super::triangle::Triangle;
use super::weld::{edge_key, VertexWeld};

/// Three vertex indices, clockwise.
pub type Face = [usize; 3];

/// Stable handle to a face slot. Invalidated by [`Triangulation::compact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(usize);

impl TriangleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The vertex of `face` that is neither `a` nor `b`.
#[inline]
fn third_vertex(face: Face, a: usize, b: usize) -> Option<usize> {
    face.iter().copied().find(|&v| v != a && v != b)
}

#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    weld: VertexWeld,
    faces: Vec<Option<Face>>,
    edges: HashMap<(usize, usize), Vec<TriangleId>>,
    super_vertices: Option<[usize; 3]>,
    config: NavMeshConfig,
}

impl Triangulation {
    pub fn new(config: &NavMeshConfig) -> Self {
        Self {
            config: config.clone(),
            ..Default::default()
        }
    }

    /// Delaunay triangulation of `points`.
    ///
    /// Tolerance-equal duplicates collapse to one vertex. Fewer than three
    /// distinct points, or all points collinear, yields no faces.
    pub fn build(points: &[Point], config: &NavMeshConfig) -> Self {
        let mut tri = Self::new(config);
        if points.is_empty() {
            return tri;
        }

        tri.add_super_triangle(points);
        for &p in points {
            tri.insert_point(p);
        }
        tri.restore_delaunay();
        tri.strip_super_triangle();
        tri.compact();

        debug!(
            "[Triangulation] {} points -> {} vertices, {} triangles",
            points.len(),
            tri.vertex_count(),
            tri.len()
        );
        tri
    }

    // ========================================================================
    // SUPER TRIANGLE
    // ========================================================================

    fn add_super_triangle(&mut self, points: &[Point]) {
        let (min, max) = points.iter().fold(
            (Point::splat(f64::INFINITY), Point::splat(f64::NEG_INFINITY)),
            |(lo, hi), &p| (lo.min(p), hi.max(p)),
        );
        let center = (min + max) * 0.5;
        let extent = (max - min).max_element().max(1.0);
        let s = extent * self.config.super_triangle_scale;

        let a = self.weld.insert(center + Point::new(-s, -s)).0;
        let b = self.weld.insert(center + Point::new(0.0, s)).0;
        let c = self.weld.insert(center + Point::new(s, -s)).0;
        self.super_vertices = Some([a, b, c]);
        self.add_face([a, b, c]);
    }

    fn is_super_vertex(&self, v: usize) -> bool {
        self.super_vertices.is_some_and(|sv| sv.contains(&v))
    }

    /// Remove every face touching a super-triangle vertex.
    fn strip_super_triangle(&mut self) {
        let doomed: Vec<TriangleId> = self
            .faces()
            .filter(|(_, f)| f.iter().any(|&v| self.is_super_vertex(v)))
            .map(|(id, _)| id)
            .collect();
        for id in doomed {
            self.remove_face(id);
        }
    }

    // ========================================================================
    // INSERTION
    // ========================================================================

    /// Insert one point. Duplicates and points outside every face are skipped.
    pub fn insert_point(&mut self, p: Point) -> Option<usize> {
        if let Some(existing) = self.weld.find(p) {
            trace!("[Triangulation] duplicate point {:?} -> vertex {}", p, existing);
            return Some(existing);
        }
        let Some(host) = self.locate(p) else {
            warn!("[Triangulation] no triangle contains {:?}, skipping", p);
            return None;
        };

        let (idx, _) = self.weld.insert(p);
        let Some([a, b, c]) = self.remove_face(host) else {
            return None;
        };

        let mut collinear = Vec::new();
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let id = self.add_face([idx, u, v]);
            if is_collinear(p, self.point(u), self.point(v)) {
                collinear.push((id, u, v));
            }
        }
        for (id, u, v) in collinear {
            self.resolve_collinear(id, idx, u, v);
        }

        self.legalize_around(idx);
        Some(idx)
    }

    /// First live face containing `p` (boundary inclusive).
    fn locate(&self, p: Point) -> Option<TriangleId> {
        self.faces().find_map(|(id, [a, b, c])| {
            point_in_triangle(p, self.point(a), self.point(b), self.point(c)).then_some(id)
        })
    }

    /// `p` landed on edge u-v: replace the sliver (p, u, v) and the face on
    /// the other side of u-v with two faces fanned from `p`.
    fn resolve_collinear(&mut self, sliver: TriangleId, p: usize, u: usize, v: usize) {
        if self.face(sliver).is_none() {
            return;
        }
        let neighbour = self
            .faces_on_edge(u, v)
            .iter()
            .copied()
            .find(|&id| id != sliver && self.face(id).is_some_and(|f| !f.contains(&p)));

        self.remove_face(sliver);
        let Some(neighbour) = neighbour else {
            return;
        };
        let Some(d) = self.remove_face(neighbour).and_then(|f| third_vertex(f, u, v)) else {
            return;
        };
        self.add_face([p, u, d]);
        self.add_face([p, v, d]);
    }

    /// Flip edges opposite `p` whose far triangle has `p` inside (or on) its
    /// circumcircle, until none remain. See [`Self::edge_is_illegal`] for
    /// edges touching the super-triangle. Every flip adds an edge incident to
    /// `p` and none are removed, so this terminates.
    fn legalize_around(&mut self, p: usize) {
        let mut flips = 0;
        while let Some((x, y)) = self.find_illegal_edge(p) {
            self.flip(x, y);
            flips += 1;
            if flips >= self.config.max_flips_per_point {
                warn!("[Triangulation] flip cap reached around vertex {}", p);
                break;
            }
        }
        if flips > 0 {
            trace!("[Triangulation] vertex {} legalized with {} flips", p, flips);
        }
    }

    fn find_illegal_edge(&self, p: usize) -> Option<(usize, usize)> {
        for (id, face) in self.faces().filter(|(_, f)| f.contains(&p)) {
            let Some([x, y]) = Self::opposite_edge(face, p) else {
                continue;
            };
            for &other in self.faces_on_edge(x, y) {
                if other == id {
                    continue;
                }
                let Some(w) = self.face(other).and_then(|f| third_vertex(f, x, y)) else {
                    continue;
                };
                if w == p {
                    continue;
                }
                if self.edge_is_illegal(x, y, w, p, false) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    fn opposite_edge(face: Face, p: usize) -> Option<[usize; 2]> {
        let i = face.iter().position(|&v| v == p)?;
        Some([face[(i + 1) % 3], face[(i + 2) % 3]])
    }

    // ========================================================================
    // FLIPS
    // ========================================================================

    /// Replace the two faces on edge a-b with the two faces on the opposite
    /// diagonal c-d. Returns the new edge, or `None` if a-b is not shared by
    /// exactly two faces.
    fn flip(&mut self, a: usize, b: usize) -> Option<(usize, usize)> {
        let (c, d) = self.quad_opposites(a, b)?;
        let ids = self.faces_on_edge(a, b).to_vec();
        for id in ids {
            self.remove_face(id);
        }
        self.add_face([c, d, a]);
        self.add_face([c, d, b]);
        Some((c, d))
    }

    /// Far vertices of the two faces sharing a-b.
    fn quad_opposites(&self, a: usize, b: usize) -> Option<(usize, usize)> {
        match self.faces_on_edge(a, b) {
            &[f1, f2] => {
                let c = self.face(f1).and_then(|f| third_vertex(f, a, b))?;
                let d = self.face(f2).and_then(|f| third_vertex(f, a, b))?;
                (c != d).then_some((c, d))
            }
            _ => None,
        }
    }

    /// Quad a-c-b-d is strictly convex: the diagonals properly cross.
    fn is_convex_quad(&self, a: usize, b: usize, c: usize, d: usize) -> bool {
        segments_intersect(self.point(c), self.point(d), self.point(a), self.point(b))
    }

    /// Sweep every interior edge and flip it if the far vertex of one face is
    /// strictly inside the other's circumcircle. Stops when a sweep makes no
    /// flips or after `max_restore_sweeps`. Returns the sweep count.
    pub fn restore_delaunay(&mut self) -> usize {
        for sweep in 0..self.config.max_restore_sweeps {
            let mut flipped = 0;
            let slots = self.faces.len();
            for slot in 0..slots {
                let Some(face) = self.faces[slot] else {
                    continue;
                };
                for i in 0..3 {
                    let (a, b) = (face[i], face[(i + 1) % 3]);
                    if self.is_strictly_illegal(a, b) {
                        self.flip(a, b);
                        flipped += 1;
                        break;
                    }
                }
            }
            if flipped == 0 {
                debug!("[Triangulation] Delaunay restored after {} sweeps", sweep);
                return sweep;
            }
            trace!("[Triangulation] sweep {} flipped {} edges", sweep, flipped);
        }
        warn!(
            "[Triangulation] sweep cap ({}) reached, result may not be fully Delaunay",
            self.config.max_restore_sweeps
        );
        self.config.max_restore_sweeps
    }

    fn is_strictly_illegal(&self, a: usize, b: usize) -> bool {
        let Some((c, d)) = self.quad_opposites(a, b) else {
            return false;
        };
        self.edge_is_illegal(a, b, c, d, true)
    }

    /// Whether edge a-b, with far vertices `c` and `d`, should flip to c-d.
    ///
    /// Super-triangle corners are symbolic and never win a circumcircle
    /// test: an edge touching a corner is illegal whenever both far vertices
    /// are real, and an edge with a corner on its far side is always legal.
    /// Only edges among four real vertices use the geometric test (`d`
    /// against the circumcircle of a, b, c). The quad must be convex.
    fn edge_is_illegal(&self, a: usize, b: usize, c: usize, d: usize, strict: bool) -> bool {
        let touches_corner = self.is_super_vertex(a) || self.is_super_vertex(b);
        let corner_beyond = self.is_super_vertex(c) || self.is_super_vertex(d);
        let illegal = match (touches_corner, corner_beyond) {
            (_, true) => false,
            (true, false) => true,
            (false, false) => {
                let (pa, pb, pc, pd) = (self.point(a), self.point(b), self.point(c), self.point(d));
                if strict {
                    circumcircle_strictly_contains(pa, pb, pc, pd)
                } else {
                    circumcircle_contains(pa, pb, pc, pd)
                }
            }
        };
        illegal && self.is_convex_quad(a, b, c, d)
    }

    /// Make u-v an edge by flipping the edges that cross it.
    ///
    /// Only crossing edges whose quad is convex are flipped; repeating this
    /// converges for any segment that no vertex lies on. Gives up (returning
    /// false) when no crossing edge is flippable or the flip cap is hit.
    pub fn force_edge(&mut self, u: usize, v: usize) -> bool {
        let (pu, pv) = (self.point(u), self.point(v));
        let mut flips = 0;

        while !self.has_edge(u, v) {
            let candidate = self.faces().find_map(|(_, face)| {
                (0..3).map(|i| (face[i], face[(i + 1) % 3])).find(|&(a, b)| {
                    segments_intersect(pu, pv, self.point(a), self.point(b))
                        && self
                            .quad_opposites(a, b)
                            .is_some_and(|(c, d)| self.is_convex_quad(a, b, c, d))
                })
            });
            let Some((a, b)) = candidate else {
                debug!("[Triangulation] cannot force edge {}-{}: no flippable crossing", u, v);
                return false;
            };
            self.flip(a, b);
            flips += 1;
            if flips >= self.config.max_flips_per_point {
                warn!("[Triangulation] flip cap reached forcing edge {}-{}", u, v);
                return false;
            }
        }
        true
    }

    // ========================================================================
    // ARENA
    // ========================================================================

    /// Add a face, reordering it clockwise. Degenerate faces are allowed.
    pub fn add_face(&mut self, face: Face) -> TriangleId {
        let [a, b, c] = face;
        let face = if cross(self.point(b) - self.point(a), self.point(c) - self.point(a)) > 0.0 {
            [a, c, b]
        } else {
            face
        };

        let id = TriangleId(self.faces.len());
        self.faces.push(Some(face));
        for i in 0..3 {
            self.edges
                .entry(edge_key(face[i], face[(i + 1) % 3]))
                .or_default()
                .push(id);
        }
        id
    }

    pub fn remove_face(&mut self, id: TriangleId) -> Option<Face> {
        let face = self.faces.get_mut(id.0)?.take()?;
        for i in 0..3 {
            let key = edge_key(face[i], face[(i + 1) % 3]);
            if let Some(ids) = self.edges.get_mut(&key) {
                ids.retain(|&other| other != id);
                if ids.is_empty() {
                    self.edges.remove(&key);
                }
            }
        }
        Some(face)
    }

    /// Drop empty slots and renumber. All previous ids are invalidated.
    pub fn compact(&mut self) {
        let live: Vec<Face> = self.faces.drain(..).flatten().collect();
        self.edges.clear();
        for face in live {
            self.faces.push(Some(face));
            let id = TriangleId(self.faces.len() - 1);
            for i in 0..3 {
                self.edges
                    .entry(edge_key(face[i], face[(i + 1) % 3]))
                    .or_default()
                    .push(id);
            }
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    #[inline]
    pub fn face(&self, id: TriangleId) -> Option<Face> {
        self.faces.get(id.0).copied().flatten()
    }

    /// Live faces in slot order.
    pub fn faces(&self) -> impl Iterator<Item = (TriangleId, Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.map(|f| (TriangleId(i), f)))
    }

    pub fn faces_on_edge(&self, a: usize, b: usize) -> &[TriangleId] {
        self.edges
            .get(&edge_key(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        !self.faces_on_edge(a, b).is_empty()
    }

    /// A live face with exactly these three vertices, in any order.
    pub fn contains_face(&self, [a, b, c]: Face) -> bool {
        self.faces_on_edge(a, b)
            .iter()
            .any(|&id| self.face(id).is_some_and(|f| f.contains(&c)))
    }

    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        self.weld.point(idx)
    }

    pub fn vertex_index(&self, p: Point) -> Option<usize> {
        self.weld.find(p)
    }

    /// Number of welded vertices, super-triangle corners included.
    pub fn vertex_count(&self) -> usize {
        self.weld.len()
    }

    /// Input vertices (super-triangle corners excluded).
    pub fn vertices(&self) -> Vec<Point> {
        (0..self.weld.len())
            .filter(|&v| !self.is_super_vertex(v))
            .map(|v| self.point(v))
            .collect()
    }

    /// Vertices strictly inside segment u-v, ordered from `u` to `v`.
    pub fn vertices_on_segment(&self, u: usize, v: usize) -> Vec<usize> {
        let (pu, pv) = (self.point(u), self.point(v));
        let mut hits: Vec<(f64, usize)> = (0..self.weld.len())
            .filter(|&w| w != u && w != v && !self.is_super_vertex(w))
            .filter_map(|w| param_on_segment(self.point(w), pu, pv).map(|t| (t, w)))
            .collect();
        hits.sort_by(|l, r| l.0.total_cmp(&r.0));
        hits.into_iter().map(|(_, w)| w).collect()
    }

    pub fn to_triangle(&self, [a, b, c]: Face) -> Triangle {
        Triangle::new(self.point(a), self.point(b), self.point(c))
    }

    /// Live faces as value triangles, in slot order.
    pub fn triangles(&self) -> Vec<Triangle> {
        self.faces().map(|(_, f)| self.to_triangle(f)).collect()
    }

    pub fn len(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> &NavMeshConfig {
        &self.config
    }
}
