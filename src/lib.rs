// 2D navigation meshes: constrained Delaunay triangulation around obstacle
// polygons, a centroid dual graph, A* corridors and funnel-smoothed paths.

pub mod nav;

pub use nav::*;
