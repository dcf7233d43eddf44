use crate::atomics::DistArray;
use crate::frontier::Frontier;
use crate::graph::{path_sum, Graph, INF, MINUS_INF};

/// Marks every vertex reachable from a negative cycle with `MINUS_INF`.
///
/// Meant for distances left by a run that hit the round cap: any edge that
/// can still be relaxed leads into a cycle's reach, and everything reachable
/// from there is unbounded. Returns the number of vertices marked.
pub fn normalize(graph: &Graph, dist: &DistArray) -> usize {
    let mut affected = 0;
    let mut frontier = Frontier::new(graph);
    for (u, v, w) in graph.edges() {
        let du = dist.get(u);
        if du == INF || du == MINUS_INF { continue; }
        let dv = dist.get(v);
        if dv != MINUS_INF && path_sum(du, w) < dv {
            dist.set(v, MINUS_INF);
            affected += 1;
            frontier.push_vertex_back(v);
        }
    }
    while !frontier.is_empty() {
        let mut next = Frontier::new(graph);
        frontier.for_each_outedge(|_, to, _| {
            if dist.get(to) != MINUS_INF {
                dist.set(to, MINUS_INF);
                affected += 1;
                next.push_vertex_back(to);
            }
        });
        frontier = next;
    }
    if affected > 0 { tracing::debug!(affected, "negative cycle reach marked"); }
    affected
}
