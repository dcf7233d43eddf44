use bf_core::{BellmanFord, BfError, Graph, RayonScheduler, Tunables, Variant, INF, MINUS_INF};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 5 { eprintln!("usage: run_one <n> <avg_degree> <seed> <variant> [min_weight]"); std::process::exit(1); }
    let n: u32 = args[1].parse().expect("n");
    let avg_deg: f32 = args[2].parse().expect("avg_degree");
    let seed: u64 = args[3].parse().expect("seed");
    let variant: Variant = args[4].parse().unwrap_or_else(|e| { eprintln!("{e}; one of {:?}", Variant::ALL.map(Variant::name)); std::process::exit(1) });
    let w_min: i64 = args.get(5).map(|s| s.parse().expect("min_weight")).unwrap_or(1);

    let mut rng = SmallRng::seed_from_u64(seed);
    let deg = avg_deg.max(1.0) as usize;
    let mut edges = Vec::with_capacity(n as usize * deg);
    for u in 0..n {
        for _ in 0..deg { edges.push((u, rng.gen_range(0..n), rng.gen_range(w_min..w_min + 100))); }
    }
    let graph = Graph::from_edges(n as usize, &edges).expect("graph");
    let tunables = Tunables::from_env().expect("BF_* tunables");
    let bf = BellmanFord::new(&graph, RayonScheduler::new(), tunables).expect("solver");

    let start = std::time::Instant::now();
    match bf.solve(0, variant) {
        Ok(sol) => {
            let reached = sol.distances.iter().filter(|&&d| d != INF).count();
            eprintln!("variant={variant} n={n} m={} reached={reached} elapsed_ms={:.3}", graph.nb_edges(), start.elapsed().as_secs_f64() * 1e3);
            println!("{}", serde_json::to_string(&sol.stats).expect("stats json"));
        }
        Err(BfError::NegativeCycle { affected, distances, stats }) => {
            let unbounded = distances.iter().filter(|&&d| d == MINUS_INF).count();
            eprintln!("variant={variant} negative cycle: affected={affected} unbounded={unbounded} rounds={}", stats.rounds);
            std::process::exit(2);
        }
        Err(e) => { eprintln!("error {}: {e}", e.code()); std::process::exit(1); }
    }
}
