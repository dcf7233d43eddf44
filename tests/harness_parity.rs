#[cfg(feature = "ffi")]
use bf_core::ffi::{bf_run, BfResultInfo};
use bf_core::{BellmanFord, BfError, Graph, RayonScheduler, Scheduler, SequentialScheduler, Tunables, Variant, INF, MINUS_INF};

// Edge list + vertex count; every generator is deterministic.
struct EdgeGraph { n: u32, edges: Vec<(u32, u32, i64)> }

impl EdgeGraph {
    fn build(&self) -> Graph { Graph::from_edges(self.n as usize, &self.edges).unwrap() }
    #[cfg(feature = "ffi")]
    fn csr(&self) -> (Vec<u32>, Vec<u32>, Vec<i64>) {
        let g = self.build();
        let out = g.out();
        let m = g.nb_edges();
        (out.offsets().to_vec(), (0..m).map(|e| out.target(e)).collect(), (0..m).map(|e| out.weight(e)).collect())
    }
}

fn path_graph(n: u32, w: i64) -> EdgeGraph { EdgeGraph { n, edges: (0..n.saturating_sub(1)).map(|u| (u, u + 1, w)).collect() } }

fn star_graph(k: u32, w: i64) -> EdgeGraph { // center 0, leaves 1..=k
    EdgeGraph { n: k + 1, edges: (1..=k).map(|leaf| (0, leaf, w)).collect() }
}

fn complete_graph(n: u32, w: i64) -> EdgeGraph {
    EdgeGraph { n, edges: (0..n).flat_map(|u| (0..n).filter(move |&v| v != u).map(move |v| (u, v, w))).collect() }
}

fn bridge_cliques(a: u32, b: u32, w: i64) -> EdgeGraph { // two cliques joined by a single bridge a-1 -> a
    let mut edges = complete_graph(a, w).edges;
    edges.push((a - 1, a, w));
    edges.extend(complete_graph(b, w).edges.into_iter().map(|(u, v, w)| (u + a, v + a, w)));
    EdgeGraph { n: a + b, edges }
}

fn next_u32(state: &mut u64) -> u32 { // xorshift64*
    *state ^= *state >> 12; *state ^= *state << 25; *state ^= *state >> 27; *state = state.wrapping_mul(2685821657736338717); (*state >> 32) as u32
}

// Random directed graph whose weights are shifted by vertex potentials:
// w'(u,v) = w + p(u) - p(v). Cycle weights are unchanged, so negative edges
// appear without any negative cycle.
fn pseudo_random_graph(n: u32, m: u32, seed: u64, w_max: u32, p_max: u32) -> EdgeGraph {
    assert!(n >= 2);
    let mut state = seed | 1;
    let pot: Vec<i64> = (0..n).map(|_| (next_u32(&mut state) % (p_max + 1)) as i64).collect();
    let mut edges = Vec::with_capacity(m as usize);
    while edges.len() < m as usize {
        let u = next_u32(&mut state) % n; let v = next_u32(&mut state) % n; if u == v { continue; }
        let w = 1 + (next_u32(&mut state) % w_max) as i64;
        edges.push((u, v, w + pot[u as usize] - pot[v as usize]));
    }
    EdgeGraph { n, edges }
}

fn hash_dist(dist: &[i64]) -> u64 { // FNV-style mixing; not cryptographic
    let mut h: u64 = 1469598103934665603;
    for (i, &d) in dist.iter().enumerate() { h ^= d as u64 ^ (i as u64).wrapping_mul(1099511628211); h = h.wrapping_mul(1099511628211); }
    h
}

fn assert_parity(base: &[i64], other: &[i64], what: &str) {
    let diffs: Vec<_> = base.iter().zip(other).enumerate().filter(|(_, (a, b))| a != b).take(16).collect();
    assert!(diffs.is_empty(), "{what}: distance parity mismatch; first differences {diffs:?} (n={})", base.len());
    assert_eq!(hash_dist(base), hash_dist(other), "{what}: hash mismatch");
}

fn check_all_variants<S: Scheduler>(g: &Graph, sched: S, tunables: Tunables, source: u32) {
    let bf = BellmanFord::new(g, sched, tunables).unwrap();
    let base = bf.solve(source, Variant::SeqClassic).unwrap();
    for v in Variant::ALL {
        let sol = bf.solve(source, v).unwrap();
        assert!(sol.stats.converged, "{v}");
        assert!(sol.stats.rounds <= g.nb_vertices(), "{v}");
        assert_parity(&base.distances, &sol.distances, v.name());
    }
}

#[test]
fn parity_core_small_graphs() {
    let graphs = [path_graph(10, 1), star_graph(12, 1), bridge_cliques(4, 4, 1), complete_graph(6, 1)];
    for eg in &graphs {
        let g = eg.build();
        check_all_variants(&g, SequentialScheduler::new(), Tunables::default(), 0);
        for cutoff in 1..4 { check_all_variants(&g, SequentialScheduler::with_heartbeat(1), Tunables::uniform(cutoff), 0); }
    }
    let sol = BellmanFord::new(&path_graph(10, 1).build(), SequentialScheduler::new(), Tunables::default()).unwrap().solve(0, Variant::ParBfs).unwrap();
    assert_eq!(sol.distances, (0..10).collect::<Vec<i64>>());
}

#[test]
fn parity_random_graphs_with_negative_edges() {
    let pool = RayonScheduler::with_threads(4).unwrap().with_heartbeat(1);
    for seed in 1..=5u64 {
        let eg = pseudo_random_graph(60, 300, seed * 7919, 20, 15);
        assert!(eg.edges.iter().any(|e| e.2 < 0), "seed {seed} has no negative edge");
        let g = eg.build();
        check_all_variants(&g, SequentialScheduler::with_heartbeat(2), Tunables::uniform(2), 0);
        check_all_variants(&g, &pool, Tunables::uniform(4), 0);
        check_all_variants(&g, RayonScheduler::new(), Tunables::default(), (seed % 60) as u32);
    }
    assert_eq!(pool.cooperation().blocked(), 0);
}

#[test]
fn lazy_frontier_forks_and_balances_rejects() {
    let g = star_graph(64, 3).build();
    let sched = SequentialScheduler::with_heartbeat(1);
    let t = Tunables { bfs_cutoff: 4, communicate_cutoff: 2, ..Tunables::uniform(4) };
    let bf = BellmanFord::new(&g, sched, t).unwrap();
    let sol = bf.solve(0, Variant::ParBfsLazy).unwrap();
    assert_eq!(sol.distances[0], 0);
    assert!(sol.distances[1..].iter().all(|&d| d == 3));
    assert!(sol.stats.forks > 0);
    assert_eq!(sol.stats.relaxations, 64);
    let coop = bf.scheduler().cooperation();
    assert_eq!(coop.blocked(), 0);
    assert!(coop.rejects() > 0);

    // Eager splitting forks by weight alone.
    let sol = bf.solve(0, Variant::ParBfs).unwrap();
    assert!(sol.stats.forks > 0);
    // Without a heartbeat the lazy path never forks.
    let quiet = BellmanFord::new(&g, SequentialScheduler::new(), t).unwrap();
    assert_eq!(quiet.solve(0, Variant::ParBfsLazy).unwrap().stats.forks, 0);
}

#[test]
fn unreachable_and_single_vertex() {
    let lone = Graph::from_edges(1, &[]).unwrap();
    let g = Graph::from_edges(4, &[(0, 1, 2), (2, 3, 1)]).unwrap();
    for v in Variant::ALL {
        let sol = bf_core::solve(&lone, 0, v).unwrap();
        assert_eq!(sol.distances, vec![0]);
        let sol = BellmanFord::new(&g, SequentialScheduler::new(), Tunables::uniform(1)).unwrap().solve(0, v).unwrap();
        assert_eq!(sol.distances, vec![0, 2, INF, INF], "{v}");
        assert_eq!(sol.distance(2), None);
    }
}

#[test]
fn huge_negative_weights_never_hit_the_cycle_sentinel() {
    let w = i64::MIN / 2 - 5;
    let g = Graph::from_edges(4, &[(0, 1, w), (1, 2, w), (2, 3, w)]).unwrap();
    let bf = BellmanFord::new(&g, SequentialScheduler::with_heartbeat(1), Tunables::uniform(1)).unwrap();
    for v in Variant::ALL {
        let sol = bf.solve(0, v).unwrap();
        assert!(sol.stats.converged, "{v}");
        assert_eq!(sol.distances, vec![0, w, MINUS_INF + 1, MINUS_INF + 1], "{v}");
    }
}

#[test]
fn negative_cycle_is_reported_by_every_variant() {
    // 0 -> 1 -> 2 -> 3 -> 1 (cycle weight -1), 3 -> 4; 0 -> 5 stays finite; 6 unreachable.
    let g = Graph::from_edges(7, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 1, -3), (3, 4, 2), (0, 5, 9)]).unwrap();
    let bf = BellmanFord::new(&g, SequentialScheduler::with_heartbeat(1), Tunables::uniform(1)).unwrap();
    for v in Variant::ALL {
        match bf.solve(0, v) {
            Err(BfError::NegativeCycle { affected, distances, stats }) => {
                assert_eq!(affected, 4, "{v}");
                assert!(!stats.converged && stats.relaxations > 0, "{v}");
                assert_eq!((stats.variant, stats.rounds), (v, 7), "{v}");
                assert_eq!(distances, vec![0, MINUS_INF, MINUS_INF, MINUS_INF, MINUS_INF, 9, INF], "{v}");
            }
            other => panic!("{v}: expected a negative cycle, got {other:?}"),
        }
    }
    // A cycle nobody reaches does not matter.
    let sol = bf.solve(5, Variant::ParBfs).unwrap();
    assert_eq!(sol.distances, vec![INF, INF, INF, INF, INF, 0, INF]);
}

#[test]
fn multi_source_matches_super_source() {
    let eg = pseudo_random_graph(40, 160, 31337, 10, 5);
    let g = eg.build();
    let seeds = [(3u32, 0i64), (17, -4), (29, 2)];
    // Same problem with an explicit super source 40.
    let mut edges = eg.edges.clone();
    edges.extend(seeds.iter().map(|&(v, d)| (40, v, d)));
    let sup = Graph::from_edges(41, &edges).unwrap();
    let reference = BellmanFord::new(&sup, SequentialScheduler::new(), Tunables::default()).unwrap().solve(40, Variant::SeqClassic).unwrap();
    let bf = BellmanFord::new(&g, RayonScheduler::new(), Tunables::uniform(3)).unwrap();
    for v in Variant::ALL {
        let sol = bf.solve_multi(&seeds, v).unwrap();
        assert_parity(&reference.distances[..40], &sol.distances, v.name());
    }
}

#[cfg(feature = "ffi")]
#[test]
fn ffi_parity_random_graphs() {
    for seed in 1..=3u64 {
        let eg = pseudo_random_graph(50, 200, seed * 104729, 8, 6);
        let (offsets, targets, weights) = eg.csr();
        let mut base = vec![0i64; eg.n as usize];
        let mut info = BfResultInfo::default();
        let rc = unsafe { bf_run(eg.n, offsets.as_ptr(), targets.as_ptr(), weights.as_ptr(), 0, 0, base.as_mut_ptr(), &mut info) };
        assert_eq!(rc, 0);
        for code in 1..Variant::ALL.len() as i32 {
            let mut dist = vec![0i64; eg.n as usize];
            let rc = unsafe { bf_run(eg.n, offsets.as_ptr(), targets.as_ptr(), weights.as_ptr(), 0, code, dist.as_mut_ptr(), &mut info) };
            assert_eq!(rc, 0, "variant {code} returned rc {rc}");
            assert_parity(&base, &dist, &format!("ffi variant {code} seed {seed}"));
        }
    }
}
