//! Property checks for the skeletons and the solver contract.

use std::collections::HashSet;

use bf_core::{BellmanFord, Frontier, Graph, RayonScheduler, Reducer, RoundView, ScanKind, Scheduler, SequentialScheduler, Tunables, Variant, INF};
use proptest::{
    collection::vec,
    prelude::{prop_assert, prop_assert_eq, Just, Strategy},
    proptest,
    test_runner::{Config as ProptestConfig, FileFailurePersistence, TestCaseError},
};

const PROP_CASES: u32 = 96;

fn prop_config() -> ProptestConfig {
    ProptestConfig {
        cases: PROP_CASES,
        failure_persistence: Some(Box::new(FileFailurePersistence::WithSource("property-regressions"))),
        ..ProptestConfig::default()
    }
}

type Edges = Vec<(u32, u32, i64)>;

/// Graph with `1..24` vertices and non-negative weights (no negative cycle).
fn graph_strategy() -> impl Strategy<Value = (usize, Edges)> {
    (1usize..24).prop_flat_map(|n| (Just(n), vec((0..n as u32, 0..n as u32, 0i64..40), 0..96)))
}

fn values() -> impl Strategy<Value = Vec<i64>> { vec(-1000i64..1000, 0..200) }

// Every round may only lower distances, and a round's next frontier holds
// each vertex at most once.
fn check_rounds<S: Scheduler>(g: &Graph, sched: S, cutoff: usize) -> Result<(), TestCaseError> {
    let n = g.nb_vertices();
    let bf = BellmanFord::new(g, sched, Tunables::uniform(cutoff)).unwrap();
    for v in Variant::ALL {
        let mut prev = vec![INF; n];
        prev[0] = 0;
        let mut monotone = true;
        let mut unique = true;
        let mut obs = |view: &RoundView<'_>| {
            let now = view.distances.snapshot();
            monotone &= now.iter().zip(&prev).all(|(a, b)| a <= b);
            prev = now;
            if let Some(next) = view.next_frontier {
                let mut seen = HashSet::new();
                unique &= next.vertices().all(|u| seen.insert(u));
            }
        };
        bf.solve_observed(&[(0, 0)], v, &mut obs).unwrap();
        prop_assert!(monotone, "{} raised a distance", v);
        prop_assert!(unique, "{} enqueued a vertex twice in one round", v);
    }
    Ok(())
}

proptest! {
    #![proptest_config(prop_config())]

    #[test]
    fn frontier_split_then_concat_is_identity((n, edges) in graph_strategy(), members in vec(0u32..24, 0..16), cut in 0usize..200) {
        let g = Graph::from_edges(n, &edges).unwrap();
        let mut f = Frontier::new(&g);
        for v in members.into_iter().filter(|&v| (v as usize) < n) { f.push_vertex_back(v); }
        let before: Vec<_> = f.edges().collect();
        let total = f.nb_outedges();
        let mut rest = f.split_off_edges(cut);
        prop_assert_eq!(f.nb_outedges(), cut.min(total));
        prop_assert_eq!(f.nb_outedges() + rest.nb_outedges(), total);
        prop_assert_eq!(f.edges().count(), f.nb_outedges());
        f.concat(&mut rest);
        prop_assert!(rest.is_empty());
        prop_assert_eq!(f.edges().collect::<Vec<_>>(), before);
    }

    #[test]
    fn reduce_matches_sequential_fold(xs in values(), cutoff in 1usize..64) {
        let s = SequentialScheduler::new();
        let r = Reducer::with_cutoff(&s, cutoff);
        prop_assert_eq!(r.reduce(&xs, 0, |a, b| a + b), xs.iter().sum::<i64>());
        prop_assert_eq!(r.reduce(&xs, i64::MIN, i64::max), xs.iter().copied().fold(i64::MIN, i64::max));
        let seq: Vec<i64> = xs.clone();
        let cat = r.map_reduce(&xs, Vec::new(), |mut a: Vec<i64>, b| { a.extend(b); a }, |_, x| vec![*x]);
        prop_assert_eq!(cat, seq);
    }

    #[test]
    fn scan_orderings_agree(xs in values(), cutoff in 1usize..64) {
        let s = SequentialScheduler::new();
        let r = Reducer::with_cutoff(&s, cutoff);
        let add = |a: &i64, b: &i64| a + b;
        let fe = r.scan(&xs, 0, add, ScanKind::ForwardExclusive);
        let fi = r.scan(&xs, 0, add, ScanKind::ForwardInclusive);
        let be = r.scan(&xs, 0, add, ScanKind::BackwardExclusive);
        for i in 0..xs.len() { prop_assert_eq!(fi[i], fe[i] + xs[i]); }
        let rev: Vec<i64> = xs.iter().rev().copied().collect();
        let mut mirrored = r.scan(&rev, 0, add, ScanKind::ForwardExclusive);
        mirrored.reverse();
        prop_assert_eq!(be, mirrored);
    }

    #[test]
    fn variants_agree_with_serial_classic((n, edges) in graph_strategy(), cutoff in 1usize..5, hb in 1u32..4) {
        let g = Graph::from_edges(n, &edges).unwrap();
        let bf = BellmanFord::new(&g, SequentialScheduler::with_heartbeat(hb), Tunables::uniform(cutoff)).unwrap();
        let base = bf.solve(0, Variant::SeqClassic).unwrap();
        prop_assert!(base.stats.converged);
        for v in Variant::ALL {
            let sol = bf.solve(0, v).unwrap();
            prop_assert_eq!(&sol.distances, &base.distances, "{}", v);
        }
        prop_assert_eq!(bf.scheduler().cooperation().blocked(), 0);
    }

    #[test]
    fn rounds_only_lower_distances_and_enqueue_once((n, edges) in graph_strategy(), cutoff in 1usize..5) {
        let g = Graph::from_edges(n, &edges).unwrap();
        let sched = SequentialScheduler::with_heartbeat(1);
        check_rounds(&g, &sched, cutoff)?;
        prop_assert_eq!(sched.cooperation().blocked(), 0);
    }

    #[test]
    fn pool_rounds_only_lower_distances_and_enqueue_once((n, edges) in graph_strategy(), cutoff in 1usize..5) {
        let g = Graph::from_edges(n, &edges).unwrap();
        let pool = RayonScheduler::with_threads(4).unwrap().with_heartbeat(1);
        check_rounds(&g, &pool, cutoff)?;
        prop_assert_eq!(pool.cooperation().blocked(), 0);
    }
}
