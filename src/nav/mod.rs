// Navigation mesh module - triangulation, dual graph, path search and smoothing
// Pipeline: points + obstacles -> Triangulation -> constraints -> NavMesh -> NodeGraph -> Path

pub mod agent;
pub mod astar;
pub mod config;
pub mod constraints;
pub mod funnel;
pub mod geometry;
pub mod graph;
pub mod navmesh;
pub mod obstacle;
pub mod path;
pub mod pathfinder;
pub mod sampling;
pub mod triangle;
pub mod triangulation;
pub mod weld;

// Re-export commonly used items
pub use agent::PathAgent;
pub use config::{NavMeshConfig, PathConfig, SamplingConfig, SearchOrder, MAX_RESTORE_SWEEPS};
pub use geometry::{Point, EPSILON};
pub use graph::{GraphEdge, Node, NodeGraph, NodeId};
pub use navmesh::{Edge, NavMesh};
pub use obstacle::{line_of_sight, Obstacle};
pub use path::{Path, PathQuery};
pub use pathfinder::find_path;
pub use triangle::Triangle;
pub use triangulation::{TriangleId, Triangulation};
