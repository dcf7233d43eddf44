//! Active vertex set bundled with its un-relaxed out-edges.
//!
//! A frontier is a deque of segments `(vertex, [lo, hi))` over the graph's
//! out-adjacency. Splitting by edge count may cut one vertex in two, so the
//! suffix carries the partially consumed remainder of that vertex. Throttled
//! iteration consumes edges from the front and leaves the cursor in place,
//! letting the caller poll the scheduler between batches.

use std::collections::VecDeque;

use crate::graph::{Graph, VertexId, Weight};
use crate::reduce::Splittable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment { vertex: VertexId, lo: u32, hi: u32 }

impl Segment {
    #[inline] fn len(&self) -> usize { (self.hi - self.lo) as usize }
}

#[derive(Debug, Clone)]
pub struct Frontier<'g> { graph: &'g Graph, segs: VecDeque<Segment>, nb_outedges: usize }

impl<'g> Frontier<'g> {
    pub fn new(graph: &'g Graph) -> Self { Self { graph, segs: VecDeque::new(), nb_outedges: 0 } }

    #[inline] pub fn graph(&self) -> &'g Graph { self.graph }
    #[inline] pub fn is_empty(&self) -> bool { self.segs.is_empty() }
    /// Number of segments; a vertex cut by a split counts once per side.
    #[inline] pub fn len(&self) -> usize { self.segs.len() }
    #[inline] pub fn nb_outedges(&self) -> usize { self.nb_outedges }

    pub fn push_vertex_back(&mut self, v: VertexId) {
        let (lo, hi) = self.graph.out().range(v);
        self.nb_outedges += hi - lo;
        self.segs.push_back(Segment { vertex: v, lo: lo as u32, hi: hi as u32 });
    }

    /// Moves every segment of `other` to the back of `self`.
    pub fn concat(&mut self, other: &mut Frontier<'g>) {
        self.nb_outedges += other.nb_outedges;
        other.nb_outedges = 0;
        self.segs.append(&mut other.segs);
    }

    pub fn clear(&mut self) { self.segs.clear(); self.nb_outedges = 0; }

    /// Keeps the first `nb` edges and returns a frontier holding the rest.
    pub fn split_off_edges(&mut self, nb: usize) -> Frontier<'g> {
        let mut rest = Frontier::new(self.graph);
        if nb >= self.nb_outedges { return rest; }
        let mut acc = 0usize;
        let mut cut = self.segs.len();
        for (i, s) in self.segs.iter().enumerate() {
            if acc + s.len() > nb { cut = i; break; }
            acc += s.len();
        }
        let partial = (nb - acc) as u32;
        if partial == 0 {
            rest.segs = self.segs.split_off(cut);
        } else {
            let mut tail = self.segs.split_off(cut + 1);
            let s = &mut self.segs[cut];
            tail.push_front(Segment { vertex: s.vertex, lo: s.lo + partial, hi: s.hi });
            s.hi = s.lo + partial;
            rest.segs = tail;
        }
        rest.nb_outedges = self.nb_outedges - nb;
        self.nb_outedges = nb;
        rest
    }

    /// Applies `f(from, to, weight)` to at most `k` edges from the front and
    /// returns how many were processed.
    pub fn for_at_most_nb_outedges<F>(&mut self, k: usize, mut f: F) -> usize
    where
        F: FnMut(VertexId, VertexId, Weight),
    {
        let out = self.graph.out();
        let mut done = 0usize;
        while done < k {
            let Some(seg) = self.segs.front_mut() else { break };
            let take = seg.len().min(k - done) as u32;
            for e in seg.lo..seg.lo + take { f(seg.vertex, out.target(e as usize), out.weight(e as usize)); }
            seg.lo += take;
            done += take as usize;
            if seg.lo == seg.hi { self.segs.pop_front(); }
        }
        self.nb_outedges -= done;
        done
    }

    /// Consumes every edge; the frontier is empty afterwards.
    pub fn for_each_outedge<F>(&mut self, f: F)
    where
        F: FnMut(VertexId, VertexId, Weight),
    {
        self.for_at_most_nb_outedges(usize::MAX, f);
        self.clear();
    }

    /// Segment vertices in order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ { self.segs.iter().map(|s| s.vertex) }

    /// Remaining edges as `(from, to, weight)` without consuming them.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, Weight)> + '_ {
        let out = self.graph.out();
        self.segs.iter().flat_map(move |s| (s.lo..s.hi).map(move |e| (s.vertex, out.target(e as usize), out.weight(e as usize))))
    }
}

impl<'g> Splittable for Frontier<'g> {
    #[inline] fn weight(&self) -> usize { self.nb_outedges }
    fn split(&mut self) -> Self { self.split_off_edges(self.nb_outedges / 2) }
}
