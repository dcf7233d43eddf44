//! Frontier-driven parallel rounds.
//!
//! Each round consumes the current frontier and builds the next one from the
//! vertices whose distance improved. A vertex enters the next frontier at
//! most once per round, through [`VisitedMarks::try_claim`].
//!
//! [`VisitedMarks::try_claim`]: crate::atomics::VisitedMarks::try_claim

use std::sync::atomic::Ordering;

use super::{Ctx, Outcome, RoundObserver, RoundView};
use crate::frontier::Frontier;
use crate::reduce::reduce_input;
use crate::sched::Scheduler;

pub(crate) fn layered<'a, S: Scheduler>(ctx: &Ctx<'a, S>, mut cur: Frontier<'a>, lazy: bool, obs: &mut dyn RoundObserver) -> Outcome {
    let mut rounds = 0usize;
    while !cur.is_empty() && rounds < ctx.graph.nb_vertices() {
        rounds += 1;
        let round = rounds as u32;
        let mut next = Frontier::new(ctx.graph);
        if cur.nb_outedges() <= ctx.tunables.bfs_cutoff {
            let mut relaxed = 0;
            cur.for_each_outedge(|from, to, w| ctx.relax_push(from, to, w, round, &mut next, &mut relaxed));
            ctx.relaxations.fetch_add(relaxed, Ordering::Relaxed);
        } else if lazy {
            process_layer_lazy(ctx, &mut cur, &mut next, round);
        } else {
            process_layer(ctx, cur, &mut next, round);
        }
        tracing::trace!(round, next = next.len(), next_edges = next.nb_outedges(), "frontier round");
        obs.on_round(&RoundView { round: rounds, distances: ctx.dist, next_frontier: Some(&next) });
        cur = next;
    }
    Outcome {
        rounds,
        relaxations: ctx.relaxations.load(Ordering::Relaxed),
        forks: ctx.forks.load(Ordering::Relaxed),
        converged: cur.is_empty(),
    }
}

/// Splits `prev` in halves by edge count down to the BFS cutoff and
/// concatenates the per-piece outputs in order.
fn process_layer<'a, S: Scheduler>(ctx: &Ctx<'a, S>, prev: Frontier<'a>, next: &mut Frontier<'a>, round: u32) {
    let identity = || Frontier::new(ctx.graph);
    let combine = |acc: &mut Frontier<'a>, mut right: Frontier<'a>| acc.concat(&mut right);
    let convert = |mut piece: Frontier<'a>, out: &mut Frontier<'a>| {
        let mut relaxed = 0;
        piece.for_each_outedge(|from, to, w| ctx.relax_push(from, to, w, round, out, &mut relaxed));
        ctx.relaxations.fetch_add(relaxed, Ordering::Relaxed);
    };
    let forks = reduce_input(ctx.sched, ctx.tunables.bfs_cutoff, prev, next, &identity, &combine, &convert);
    ctx.forks.fetch_add(forks as u64, Ordering::Relaxed);
}

/// Drains `prev` in batches of `communicate_cutoff` edges and forks only when
/// the scheduler asks for work while more than `bfs_cutoff` edges remain.
/// Once a piece is below the cutoff the worker declares a burst with
/// `reject` and closes it with `unblock` before returning.
fn process_layer_lazy<'a, S: Scheduler>(ctx: &Ctx<'a, S>, prev: &mut Frontier<'a>, next: &mut Frontier<'a>, round: u32) {
    let cutoff = ctx.tunables.bfs_cutoff;
    let batch = ctx.tunables.communicate_cutoff;
    let mut blocked = false;
    let mut relaxed = 0u64;
    let mut nb = prev.nb_outedges();
    while nb > 0 {
        if !blocked && nb <= cutoff {
            blocked = true;
            ctx.sched.reject();
        }
        if !blocked && ctx.sched.should_call_communicate() {
            ctx.relaxations.fetch_add(relaxed, Ordering::Relaxed);
            ctx.forks.fetch_add(1, Ordering::Relaxed);
            let mut fr_in = prev.split_off_edges(nb / 2);
            let mut fr_out = Frontier::new(ctx.graph);
            let (p, n) = (&mut *prev, &mut *next);
            let (fi, fo) = (&mut fr_in, &mut fr_out);
            ctx.sched.fork2(move || process_layer_lazy(ctx, p, n, round), move || process_layer_lazy(ctx, fi, fo, round));
            next.concat(&mut fr_out);
            return;
        }
        prev.for_at_most_nb_outedges(batch, |from, to, w| ctx.relax_push(from, to, w, round, next, &mut relaxed));
        nb = prev.nb_outedges();
    }
    // Segments of zero-degree vertices carry no edges.
    prev.clear();
    ctx.relaxations.fetch_add(relaxed, Ordering::Relaxed);
    if blocked { ctx.sched.unblock(); }
}
