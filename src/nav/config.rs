// Tunables for mesh building, path search and sample generation.
// Every struct has a Default matching the stock behaviour, plus `with_*`
// builders for the fields callers typically override.

use super::geometry::Point;

/// Upper bound on global Delaunay restoration sweeps.
pub const MAX_RESTORE_SWEEPS: usize = 100;

// ============================================================================
// NAVMESH
// ============================================================================

/// Triangulation tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct NavMeshConfig {
    /// Super-triangle half-extent as a multiple of the input bounding box.
    pub super_triangle_scale: f64,
    /// Sweep cap for the global edge-flip pass.
    pub max_restore_sweeps: usize,
    /// Flip cap for local legalization after one insertion.
    pub max_flips_per_point: usize,
}

impl Default for NavMeshConfig {
    fn default() -> Self {
        Self {
            super_triangle_scale: 1000.0,
            max_restore_sweeps: MAX_RESTORE_SWEEPS,
            max_flips_per_point: 10_000,
        }
    }
}

impl NavMeshConfig {
    pub fn with_super_triangle_scale(mut self, scale: f64) -> Self {
        self.super_triangle_scale = scale;
        self
    }

    pub fn with_max_restore_sweeps(mut self, sweeps: usize) -> Self {
        self.max_restore_sweeps = sweeps;
        self
    }
}

// ============================================================================
// PATH SEARCH
// ============================================================================

/// Priority key used by the open set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    /// Expand by straight-line distance to the goal only (greedy best-first).
    /// Fast, not guaranteed shortest.
    #[default]
    Heuristic,
    /// Expand by cost-so-far plus heuristic (textbook A*). Optimal with the
    /// Euclidean heuristic.
    Canonical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathConfig {
    pub search_order: SearchOrder,
    /// Return the straight segment to the goal when nothing blocks it.
    pub line_of_sight_shortcut: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            search_order: SearchOrder::default(),
            line_of_sight_shortcut: true,
        }
    }
}

impl PathConfig {
    pub fn with_search_order(mut self, order: SearchOrder) -> Self {
        self.search_order = order;
        self
    }

    pub fn with_line_of_sight_shortcut(mut self, enabled: bool) -> Self {
        self.line_of_sight_shortcut = enabled;
        self
    }
}

// ============================================================================
// SAMPLING
// ============================================================================

/// Poisson-disk sample generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    /// Minimum distance between accepted samples.
    pub min_distance: f64,
    /// Outer radius of the annulus candidates are drawn from.
    pub max_distance: f64,
    /// Candidates tried around each open sample before it is retired.
    pub attempts: usize,
    pub bounds_min: Point,
    pub bounds_max: Point,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            max_distance: 5.0,
            attempts: 100,
            bounds_min: Point::new(0.5, 0.5),
            bounds_max: Point::new(18.5, 14.5),
        }
    }
}

impl SamplingConfig {
    pub fn with_distance(mut self, min: f64, max: f64) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_bounds(mut self, min: Point, max: Point) -> Self {
        self.bounds_min = min;
        self.bounds_max = max;
        self
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= self.bounds_min.x
            && p.x <= self.bounds_max.x
            && p.y >= self.bounds_min.y
            && p.y <= self.bounds_max.y
    }
}
