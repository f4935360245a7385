// Poisson-disk point sampling for navmesh interiors.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use log::{debug, warn};
use rand::Rng;

use super::config::SamplingConfig;
use super::geometry::{Point, EPSILON};
use super::obstacle::{point_in_obstacles, Obstacle};

/// Well-spaced points inside `config`'s bounds and outside every obstacle,
/// grown outward from `start`.
///
/// Candidates are drawn from the annulus `[min_distance, max_distance]`
/// around each open sample; a candidate is kept if it is in bounds, clear of
/// obstacles and at least `min_distance` from every kept point. The result
/// depends only on the inputs and the state of `rng`.
///
/// A `min_distance` below `EPSILON` would never saturate the bounds, so it is
/// rejected and nothing is sampled.
pub fn poisson_disk<R: Rng>(
    rng: &mut R,
    start: Point,
    obstacles: &[Obstacle],
    config: &SamplingConfig,
) -> Vec<Point> {
    let valid = |p: Point| config.in_bounds(p) && !point_in_obstacles(p, obstacles);
    if !valid(start) {
        warn!("[Sampling] start {:?} is out of bounds or obstructed", start);
        return Vec::new();
    }

    if config.min_distance.is_nan() || config.min_distance < EPSILON {
        warn!(
            "[Sampling] min_distance {} is below {}, nothing sampled",
            config.min_distance, EPSILON
        );
        return Vec::new();
    }

    let min = config.min_distance;
    let max = config.max_distance.max(min);
    let min_sq = min * min;

    let mut samples = vec![start];
    let mut open = VecDeque::from([start]);
    while let Some(current) = open.pop_front() {
        for _ in 0..config.attempts {
            let angle = rng.gen_range(0.0..TAU);
            let distance = rng.gen_range(min..=max);
            let candidate = current + Point::from_angle(angle) * distance;

            if valid(candidate) && samples.iter().all(|s| s.distance_squared(candidate) >= min_sq) {
                samples.push(candidate);
                open.push_back(candidate);
            }
        }
    }

    debug!("[Sampling] {} samples", samples.len());
    samples
}
