//! Pull-style parallel rounds over every vertex.

use std::sync::atomic::{AtomicU64, Ordering};

use super::{Ctx, Outcome, RoundObserver, RoundView};
use crate::graph::{path_sum, INF};
use crate::partition::PartitionPlan;
use crate::reduce::{reduce_input, Splittable};
use crate::sched::Scheduler;

/// Vertex range `[start, stop)` cut where the plan says.
struct PlanRange<'p> { plan: &'p PartitionPlan, start: usize, stop: usize }

impl<'p> Splittable for PlanRange<'p> {
    fn weight(&self) -> usize { self.plan.nb_edges(self.start, self.stop) as usize }
    // The plan carries its own cutoff.
    fn can_split(&self, _: usize) -> bool { self.plan.should_fork(self.start, self.stop) }
    fn split(&mut self) -> Self {
        let mid = self.plan.mid(self.start, self.stop);
        let right = Self { plan: self.plan, start: mid, stop: self.stop };
        self.stop = mid;
        right
    }
}

pub(crate) fn all_edges<S: Scheduler>(ctx: &Ctx<'_, S>, plan: &PartitionPlan, obs: &mut dyn RoundObserver) -> Outcome {
    let n = ctx.graph.nb_vertices();
    let mut out = Outcome::default();
    let identity = || 0u64;
    let combine = |acc: &mut u64, r: u64| *acc += r;
    let convert = |range: PlanRange<'_>, acc: &mut u64| {
        for v in range.start..range.stop { *acc += ctx.relax_pull(v as u32); }
    };
    while out.rounds < n {
        out.rounds += 1;
        let mut relaxed = 0u64;
        let forks = reduce_input(ctx.sched, plan.cutoff(), PlanRange { plan, start: 0, stop: n }, &mut relaxed, &identity, &combine, &convert);
        out.relaxations += relaxed;
        out.forks += forks as u64;
        tracing::trace!(round = out.rounds, relaxed, forks, "all-edges round");
        obs.on_round(&RoundView { round: out.rounds, distances: ctx.dist, next_frontier: None });
        if relaxed == 0 { out.converged = true; break; }
    }
    out
}

pub(crate) fn vertex_edges<S: Scheduler>(ctx: &Ctx<'_, S>, obs: &mut dyn RoundObserver) -> Outcome {
    let g = ctx.graph;
    let inc = g.inc();
    let inline_degree = ctx.tunables.inline_degree;
    let mut out = Outcome::default();
    while out.rounds < g.nb_vertices() {
        out.rounds += 1;
        let relaxed = AtomicU64::new(0);
        for v in g.vertices() {
            if g.in_degree(v) < inline_degree {
                let k = ctx.relax_pull(v);
                relaxed.fetch_add(k, Ordering::Relaxed);
                continue;
            }
            let (lo, hi) = inc.range(v);
            out.forks += 1;
            ctx.sched.parallel_for(lo, hi, |e| {
                let du = ctx.dist.get(inc.target(e));
                if du != INF && ctx.dist.try_update(v, path_sum(du, inc.weight(e))) { relaxed.fetch_add(1, Ordering::Relaxed); }
            });
        }
        let relaxed = relaxed.into_inner();
        out.relaxations += relaxed;
        tracing::trace!(round = out.rounds, relaxed, "vertex-edges round");
        obs.on_round(&RoundView { round: out.rounds, distances: ctx.dist, next_frontier: None });
        if relaxed == 0 { out.converged = true; break; }
    }
    out
}
