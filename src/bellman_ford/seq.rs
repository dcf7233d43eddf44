//! Single-threaded reference variants.

use super::{Ctx, Outcome, RoundObserver, RoundView};
use crate::frontier::Frontier;
use crate::graph::{path_sum, INF};
use crate::sched::Scheduler;

pub(crate) fn classic<S: Scheduler>(ctx: &Ctx<'_, S>, obs: &mut dyn RoundObserver) -> Outcome {
    let (g, dist) = (ctx.graph, ctx.dist);
    let mut out = Outcome::default();
    while out.rounds < g.nb_vertices() {
        out.rounds += 1;
        let mut changed = false;
        for u in g.vertices() {
            for (v, w) in g.out_edges(u) {
                let du = dist.get(u);
                if du == INF { break; }
                let cand = path_sum(du, w);
                if cand < dist.get(v) { dist.set(v, cand); out.relaxations += 1; changed = true; }
            }
        }
        tracing::trace!(round = out.rounds, changed, "serial round");
        obs.on_round(&RoundView { round: out.rounds, distances: dist, next_frontier: None });
        if !changed { out.converged = true; break; }
    }
    out
}

pub(crate) fn bfs<'a, S: Scheduler>(ctx: &Ctx<'a, S>, mut cur: Frontier<'a>, obs: &mut dyn RoundObserver) -> Outcome {
    let mut out = Outcome::default();
    while !cur.is_empty() && out.rounds < ctx.graph.nb_vertices() {
        out.rounds += 1;
        let round = out.rounds as u32;
        let mut next = Frontier::new(ctx.graph);
        cur.for_each_outedge(|from, to, w| ctx.relax_push(from, to, w, round, &mut next, &mut out.relaxations));
        tracing::trace!(round, next = next.len(), "serial bfs round");
        obs.on_round(&RoundView { round: out.rounds, distances: ctx.dist, next_frontier: Some(&next) });
        cur = next;
    }
    out.converged = cur.is_empty();
    out
}
