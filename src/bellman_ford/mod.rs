//! Parallel Bellman-Ford.
//!
//! Six variants share one contract: distances start at `INF` except the
//! seeds, every write is an atomic strict-minimum, rounds are separated by a
//! full join, and the loop stops after a round without change or after
//! `nb_vertices` rounds. A run that hits the cap goes through
//! [`normalize`] and, if a negative cycle is reachable, surfaces as
//! [`BfError::NegativeCycle`].

mod bfs;
mod normalize;
mod par;
mod seq;

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicU64;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::atomics::{DistArray, VisitedMarks};
use crate::config::Tunables;
use crate::error::{BfError, Result};
use crate::frontier::Frontier;
use crate::graph::{path_sum, Dist, Graph, VertexId, Weight, INF, MINUS_INF};
use crate::partition::PartitionPlan;
use crate::sched::{RayonScheduler, Scheduler};

pub use normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Relax every out-edge in vertex order each round.
    SeqClassic,
    /// Relax only out-edges of vertices improved in the previous round.
    SeqBfs,
    /// Pull over all in-edges, forking on the edge-balanced partition plan.
    ParAllEdges,
    /// Pull vertex by vertex; heavy in-lists get a data-parallel loop.
    ParVertexEdges,
    /// Two alternating frontiers, split and forked down to the BFS cutoff.
    ParBfs,
    /// As [`Variant::ParBfs`] but forks on the scheduler's communicate signal.
    ParBfsLazy,
}

impl Variant {
    pub const ALL: [Variant; 6] = [Variant::SeqClassic, Variant::SeqBfs, Variant::ParAllEdges, Variant::ParVertexEdges, Variant::ParBfs, Variant::ParBfsLazy];

    pub fn name(self) -> &'static str {
        match self {
            Variant::SeqClassic => "SerialClassic",
            Variant::SeqBfs => "SerialBFS",
            Variant::ParAllEdges => "ParClassicByAllEdges",
            Variant::ParVertexEdges => "ParClassicByVertexEdges",
            Variant::ParBfs => "ParBFS",
            Variant::ParBfsLazy => "ParBFSLazy",
        }
    }

    /// Index in [`Variant::ALL`]; the numbering used by the C entry points.
    pub fn from_code(code: i32) -> Option<Self> { usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied()) }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Variant {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.name().eq_ignore_ascii_case(s)).ok_or_else(|| format!("unknown variant {s:?}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    pub variant: Variant,
    pub rounds: usize,
    /// Successful strict-minimum writes.
    pub relaxations: u64,
    pub forks: u64,
    /// False only when the cap was hit and a negative cycle was found.
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution { pub distances: Vec<Dist>, pub stats: SolveStats }

impl Solution {
    /// `None` for unreachable vertices.
    pub fn distance(&self, v: VertexId) -> Option<Dist> {
        match self.distances.get(v as usize) { Some(&INF) | None => None, Some(&d) => Some(d) }
    }
}

/// State visible at a round barrier.
pub struct RoundView<'a> {
    /// 1-based round index.
    pub round: usize,
    pub distances: &'a DistArray,
    /// Frontier for the next round (frontier variants only).
    pub next_frontier: Option<&'a Frontier<'a>>,
}

/// Called on the solving thread after every round barrier.
pub trait RoundObserver: Send {
    fn on_round(&mut self, view: &RoundView<'_>);
}

impl<F> RoundObserver for F
where
    F: FnMut(&RoundView<'_>) + Send,
{
    fn on_round(&mut self, view: &RoundView<'_>) { self(view) }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoObserver;

impl RoundObserver for NoObserver {
    fn on_round(&mut self, _: &RoundView<'_>) {}
}

/// Shared by every task of one solve call.
pub(crate) struct Ctx<'a, S> {
    pub graph: &'a Graph,
    pub sched: &'a S,
    pub tunables: &'a Tunables,
    pub dist: &'a DistArray,
    pub visited: &'a VisitedMarks,
    pub relaxations: AtomicU64,
    pub forks: AtomicU64,
}

impl<'a, S: Scheduler> Ctx<'a, S> {
    /// Pushes `from -> to` and enqueues `to` into `next` the first time it improves in `round`.
    #[inline]
    pub fn relax_push(&self, from: VertexId, to: VertexId, w: Weight, round: u32, next: &mut Frontier<'a>, relaxed: &mut u64) {
        let df = self.dist.get(from);
        if df == INF { return; }
        if self.dist.try_update(to, path_sum(df, w)) {
            *relaxed += 1;
            if self.visited.try_claim(to, round) { next.push_vertex_back(to); }
        }
    }

    /// Pulls every in-edge of `v`; returns the number of improvements.
    #[inline]
    pub fn relax_pull(&self, v: VertexId) -> u64 {
        let mut relaxed = 0;
        for (u, w) in self.graph.in_edges(v) {
            let du = self.dist.get(u);
            if du != INF && self.dist.try_update(v, path_sum(du, w)) { relaxed += 1; }
        }
        relaxed
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Outcome { pub rounds: usize, pub relaxations: u64, pub forks: u64, pub converged: bool }

/// Solver bound to one graph, one scheduler and one set of tunables.
///
/// The partition plan for the all-edges variant is built on first use and
/// reused by later solves.
pub struct BellmanFord<'g, S: Scheduler = RayonScheduler> {
    graph: &'g Graph,
    sched: S,
    tunables: Tunables,
    plan: OnceLock<PartitionPlan>,
}

impl<'g, S: Scheduler> BellmanFord<'g, S> {
    pub fn new(graph: &'g Graph, sched: S, tunables: Tunables) -> Result<Self> {
        tunables.validate()?;
        Ok(Self { graph, sched, tunables, plan: OnceLock::new() })
    }

    pub fn graph(&self) -> &'g Graph { self.graph }
    pub fn scheduler(&self) -> &S { &self.sched }
    pub fn tunables(&self) -> &Tunables { &self.tunables }

    pub fn plan(&self) -> &PartitionPlan {
        self.plan.get_or_init(|| PartitionPlan::build(self.graph, self.tunables.serial_edge_cutoff))
    }

    pub fn solve(&self, source: VertexId, variant: Variant) -> Result<Solution> { self.solve_multi(&[(source, 0)], variant) }

    /// Seeds every `(vertex, initial distance)` before the first round.
    pub fn solve_multi(&self, seeds: &[(VertexId, Dist)], variant: Variant) -> Result<Solution> {
        self.solve_observed(seeds, variant, &mut NoObserver)
    }

    pub fn solve_observed<O: RoundObserver>(&self, seeds: &[(VertexId, Dist)], variant: Variant, observer: &mut O) -> Result<Solution> {
        self.check_seeds(seeds)?;
        let g = self.graph;
        let span = tracing::debug_span!("bellman_ford", %variant, n = g.nb_vertices(), m = g.nb_edges(), seeds = seeds.len());
        let _enter = span.enter();

        let dist = DistArray::new(g.nb_vertices());
        let visited = VisitedMarks::new(g.nb_vertices());
        let mut frontier = Frontier::new(g);
        for &(v, d) in seeds {
            dist.try_update(v, d);
            if visited.try_claim(v, 0) { frontier.push_vertex_back(v); }
        }
        if variant == Variant::ParAllEdges { self.plan(); }

        let ctx = Ctx { graph: g, sched: &self.sched, tunables: &self.tunables, dist: &dist, visited: &visited, relaxations: AtomicU64::new(0), forks: AtomicU64::new(0) };
        let obs: &mut dyn RoundObserver = observer;
        let outcome = self.sched.install(|| match variant {
            Variant::SeqClassic => seq::classic(&ctx, obs),
            Variant::SeqBfs => seq::bfs(&ctx, frontier, obs),
            Variant::ParAllEdges => par::all_edges(&ctx, self.plan(), obs),
            Variant::ParVertexEdges => par::vertex_edges(&ctx, obs),
            Variant::ParBfs => bfs::layered(&ctx, frontier, false, obs),
            Variant::ParBfsLazy => bfs::layered(&ctx, frontier, true, obs),
        });
        drop(ctx);

        let mut stats = SolveStats { variant, rounds: outcome.rounds, relaxations: outcome.relaxations, forks: outcome.forks, converged: outcome.converged };
        if !outcome.converged {
            let affected = normalize(g, &dist);
            if affected > 0 {
                tracing::warn!(rounds = stats.rounds, affected, "round cap reached with a reachable negative cycle");
                return Err(BfError::NegativeCycle { affected, distances: dist.into_vec(), stats });
            }
            // Capped exactly at the fixed point.
            stats.converged = true;
        }
        tracing::debug!(rounds = stats.rounds, relaxations = stats.relaxations, forks = stats.forks, "converged");
        Ok(Solution { distances: dist.into_vec(), stats })
    }

    fn check_seeds(&self, seeds: &[(VertexId, Dist)]) -> Result<()> {
        if seeds.is_empty() { return Err(BfError::NoSources); }
        let n = self.graph.nb_vertices();
        for &(vertex, dist) in seeds {
            if vertex as usize >= n { return Err(BfError::SourceOutOfRange { vertex, nb_vertices: n }); }
            if dist == INF || dist == MINUS_INF { return Err(BfError::InvalidSeedDistance { vertex, dist }); }
        }
        Ok(())
    }
}

/// Single-source solve on the global rayon pool with tunables from the environment.
pub fn solve(graph: &Graph, source: VertexId, variant: Variant) -> Result<Solution> {
    BellmanFord::new(graph, RayonScheduler::new(), Tunables::from_env()?)?.solve(source, variant)
}
