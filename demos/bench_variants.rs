use std::time::Instant;

use bf_core::{BellmanFord, Graph, RayonScheduler, Tunables, Variant};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

#[derive(Serialize)]
struct Row { variant: &'static str, n: usize, m: usize, millis: f64, rounds: usize, relaxations: u64, forks: u64 }

fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let n: u32 = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(20_000);
    let deg: u32 = std::env::args().nth(2).and_then(|s| s.parse().ok()).unwrap_or(8);
    let reps: u32 = std::env::var("BF_BENCH_REPS").ok().and_then(|v| v.parse().ok()).unwrap_or(3).max(1);
    let mut rng = SmallRng::seed_from_u64(0xB311);
    let edges: Vec<(u32, u32, i64)> = (0..n).flat_map(|u| (0..deg).map(move |_| u)).map(|u| (u, rng.gen_range(0..n), rng.gen_range(1..1000))).collect();
    let graph = Graph::from_edges(n as usize, &edges).expect("graph");
    let bf = BellmanFord::new(&graph, RayonScheduler::new(), Tunables::from_env().expect("tunables")).expect("solver");
    let mut baseline = None;
    for v in Variant::ALL {
        let mut best = f64::INFINITY;
        let mut last = None;
        for _ in 0..reps {
            let t = Instant::now();
            let sol = bf.solve(0, v).expect("solve");
            best = best.min(t.elapsed().as_secs_f64() * 1e3);
            last = Some(sol);
        }
        let sol = last.expect("at least one rep");
        match &baseline { None => baseline = Some(sol.distances.clone()), Some(b) => assert_eq!(b, &sol.distances, "{v} disagrees") }
        let row = Row { variant: v.name(), n: graph.nb_vertices(), m: graph.nb_edges(), millis: best, rounds: sol.stats.rounds, relaxations: sol.stats.relaxations, forks: sol.stats.forks };
        println!("{}", serde_json::to_string(&row).expect("row json"));
    }
}
