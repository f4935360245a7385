// Vertex welding: a uniform spatial hash that maps tolerance-equal points to
// one vertex index. This is how every module turns "points equal within
// EPSILON" into integer identity, including when points are used as map keys.

use std::collections::HashMap;

use super::geometry::{points_equal, Point, EPSILON};
use super::triangle::Triangle;

// ============================================================================
// VERTEX WELD
// ============================================================================

/// Uniform spatial hash over vertex positions.
///
/// Cells are EPSILON wide, so any point tolerance-equal to `p` lives in the
/// 3x3 block of cells around `p`'s cell.
#[derive(Debug, Clone, Default)]
pub struct VertexWeld {
    cells: HashMap<(i64, i64), Vec<usize>>,
    points: Vec<Point>,
}

impl VertexWeld {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell_xy(p: Point) -> (i64, i64) {
        ((p.x / EPSILON).floor() as i64, (p.y / EPSILON).floor() as i64)
    }

    /// Index of the welded vertex tolerance-equal to `p`, if any.
    pub fn find(&self, p: Point) -> Option<usize> {
        let (cx, cy) = Self::cell_xy(p);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                if let Some(&idx) = bucket.iter().find(|&&i| points_equal(self.points[i], p)) {
                    return Some(idx);
                }
            }
        }
        None
    }

    /// Insert `p`, returning `(index, inserted)`.
    /// `inserted` is false when an equal vertex already existed.
    pub fn insert(&mut self, p: Point) -> (usize, bool) {
        if let Some(idx) = self.find(p) {
            return (idx, false);
        }
        let idx = self.points.len();
        self.points.push(p);
        self.cells.entry(Self::cell_xy(p)).or_default().push(idx);
        (idx, true)
    }

    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        self.points[idx]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ============================================================================
// EDGE UTILITIES
// ============================================================================

/// Canonical key for an undirected edge: always (min, max).
#[inline]
pub fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Weld the corners of a triangle list into shared vertex indices.
pub fn index_triangles(triangles: &[Triangle]) -> (VertexWeld, Vec<[usize; 3]>) {
    let mut weld = VertexWeld::new();
    let faces = triangles
        .iter()
        .map(|t| {
            let [a, b, c] = t.points();
            [weld.insert(a).0, weld.insert(b).0, weld.insert(c).0]
        })
        .collect();
    (weld, faces)
}

/// Edge → incident face indices, for faces given as vertex-index triples.
/// Interior edges map to 2 faces; boundary edges to 1.
pub fn edge_faces(faces: &[[usize; 3]]) -> HashMap<(usize, usize), Vec<usize>> {
    let mut map: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (fi, face) in faces.iter().enumerate() {
        for i in 0..3 {
            let key = edge_key(face[i], face[(i + 1) % 3]);
            let entry = map.entry(key).or_default();
            if !entry.contains(&fi) {
                entry.push(fi);
            }
        }
    }
    map
}
