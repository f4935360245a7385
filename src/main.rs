// Headless navmesh demo: build a room with obstacles, plan a few agents
// across it and walk them to their targets, logging as it goes.
// Run with RUST_LOG=debug to see the pipeline internals.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use navmesh::sampling::poisson_disk;
use navmesh::{NavMesh, NavMeshConfig, NodeGraph, Obstacle, PathAgent, PathConfig, Point, SamplingConfig};

const SEED: u64 = 42;
const ROOM: (f64, f64) = (19.0, 15.0);
const TICK: f64 = 1.0 / 30.0;
const MAX_TICKS: usize = 10_000;

fn build_obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle::rectangle(Point::new(4.0, 3.0), Point::new(7.0, 9.0)),
        Obstacle::rectangle(Point::new(11.0, 6.0), Point::new(15.0, 8.0)),
        Obstacle::new(vec![
            Point::new(9.0, 11.0),
            Point::new(12.0, 12.5),
            Point::new(9.5, 13.5),
        ]),
    ]
}

fn main() {
    env_logger::init();

    let obstacles = build_obstacles();

    // Room corners plus a Poisson-disk interior.
    let mut points = vec![
        Point::new(0.0, 0.0),
        Point::new(ROOM.0, 0.0),
        Point::new(ROOM.0, ROOM.1),
        Point::new(0.0, ROOM.1),
    ];
    let mut rng = StdRng::seed_from_u64(SEED);
    points.extend(poisson_disk(
        &mut rng,
        Point::new(1.0, 1.0),
        &obstacles,
        &SamplingConfig::default(),
    ));

    let mesh = NavMesh::build(&points, &obstacles, &NavMeshConfig::default());
    let graph = NodeGraph::from_navmesh(&mesh);
    info!(
        "Mesh: {} points, {} triangles, {} nodes, walkable area {:.2}",
        points.len(),
        mesh.len(),
        graph.len(),
        mesh.total_area()
    );

    let config = PathConfig::default();
    let mut agents = vec![
        (PathAgent::new(Point::new(1.0, 1.0), 0.3, 3.0), Point::new(17.5, 13.5)),
        (PathAgent::new(Point::new(2.0, 12.0), 0.5, 2.0), Point::new(13.0, 2.0)),
        (PathAgent::new(Point::new(17.0, 1.5), 0.2, 4.0), Point::new(10.0, 12.0)),
    ];

    for (i, (agent, target)) in agents.iter_mut().enumerate() {
        if !agent.go_to(*target, &mesh, &graph, &obstacles, &config) {
            info!("Agent {}: no path to {:?}", i, target);
            continue;
        }
        info!(
            "Agent {}: {} waypoints, length {:.2}: {:?}",
            i,
            agent.path().len(),
            agent.path().length(),
            agent.path().points()
        );
    }

    let mut ticks = 0;
    while ticks < MAX_TICKS && agents.iter().any(|(agent, _)| !agent.is_idle()) {
        for (agent, _) in &mut agents {
            agent.advance(TICK);
        }
        ticks += 1;
    }

    for (i, (agent, target)) in agents.iter().enumerate() {
        info!(
            "Agent {} finished at {:?} (target {:?}) after {:.2}s",
            i,
            agent.position,
            target,
            ticks as f64 * TICK
        );
    }
}
