// Dual graph: one node per navmesh triangle at its centroid, edges between
// triangles sharing a full mesh edge, weighted by centroid distance.

use log::debug;

use super::geometry::Point;
use super::navmesh::NavMesh;
use super::weld::{edge_faces, edge_key, index_triangles};

/// Handle to a node in a [`NodeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphEdge {
    pub target: NodeId,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub position: Point,
    /// Index of the triangle this node stands for in its [`NavMesh`].
    pub triangle: usize,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: Vec<Node>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node `i` stands for triangle `i`.
    pub fn from_navmesh(mesh: &NavMesh) -> Self {
        let mut graph = Self::new();
        for (i, t) in mesh.triangles().iter().enumerate() {
            graph.add_node(t.centroid(), i);
        }

        let (_, faces) = index_triangles(mesh.triangles());
        let incident = edge_faces(&faces);
        for (fi, face) in faces.iter().enumerate() {
            for i in 0..3 {
                let key = edge_key(face[i], face[(i + 1) % 3]);
                if let Some(&[a, b]) = incident.get(&key).map(Vec::as_slice) {
                    if a == fi {
                        let cost = graph.nodes[a].position.distance(graph.nodes[b].position);
                        graph.connect(NodeId(a), NodeId(b), cost);
                    }
                }
            }
        }

        debug!(
            "[NodeGraph] {} nodes, {} links",
            graph.len(),
            graph.nodes.iter().map(|n| n.edges.len()).sum::<usize>() / 2
        );
        graph
    }

    pub fn add_node(&mut self, position: Point, triangle: usize) -> NodeId {
        self.nodes.push(Node {
            position,
            triangle,
            edges: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Link two nodes both ways. Self-links, duplicates and unknown ids are ignored.
    pub fn connect(&mut self, a: NodeId, b: NodeId, cost: f64) {
        if a == b || a.0 >= self.nodes.len() || b.0 >= self.nodes.len() {
            return;
        }
        if self.nodes[a.0].edges.iter().any(|e| e.target == b) {
            return;
        }
        self.nodes[a.0].edges.push(GraphEdge { target: b, cost });
        self.nodes[b.0].edges.push(GraphEdge { target: a, cost });
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn neighbors(&self, id: NodeId) -> &[GraphEdge] {
        self.node(id).map(|n| n.edges.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Node whose triangle contains `pos`.
    pub fn node_at(&self, mesh: &NavMesh, pos: Point) -> Option<NodeId> {
        let triangle = mesh.triangle_containing(pos)?;
        self.nodes
            .iter()
            .position(|n| n.triangle == triangle)
            .map(NodeId)
    }

    /// Node with the nearest centroid.
    pub fn closest_node(&self, pos: Point) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_squared(pos)
                    .total_cmp(&b.position.distance_squared(pos))
            })
            .map(|(i, _)| NodeId(i))
    }

    /// [`Self::node_at`], falling back to [`Self::closest_node`].
    pub fn locate(&self, mesh: &NavMesh, pos: Point) -> Option<NodeId> {
        self.node_at(mesh, pos).or_else(|| self.closest_node(pos))
    }

    /// Summed edge cost along `path`, or `None` if two consecutive nodes
    /// are not linked.
    pub fn path_cost(&self, path: &[NodeId]) -> Option<f64> {
        path.windows(2).try_fold(0.0, |acc, w| {
            let edge = self.neighbors(w[0]).iter().find(|e| e.target == w[1])?;
            Some(acc + edge.cost)
        })
    }
}
