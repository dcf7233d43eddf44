//! Immutable CSR graph with both adjacency directions.
//!
//! Out-edges feed push-style relaxation (frontier variants), in-edges feed
//! pull-style relaxation (all-edges and per-vertex variants). Edge order
//! within a vertex follows insertion order; multi-edges and self-loops are
//! kept as given.

use crate::error::{BfError, Result};

pub type VertexId = u32;
pub type Weight = i64;
pub type Dist = i64;

/// Distance of a vertex not reached yet.
pub const INF: Dist = Dist::MAX;
/// Distance of a vertex reachable from a negative cycle.
pub const MINUS_INF: Dist = Dist::MIN;

/// `d + w` for a finite `d`, saturating short of both sentinels.
#[inline]
pub fn path_sum(d: Dist, w: Weight) -> Dist { d.saturating_add(w).clamp(MINUS_INF + 1, INF - 1) }

/// One direction of adjacency in CSR form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Csr { offsets: Vec<u32>, targets: Vec<VertexId>, weights: Vec<Weight> }

impl Csr {
    #[inline] pub fn degree(&self, v: VertexId) -> usize { (self.offsets[v as usize + 1] - self.offsets[v as usize]) as usize }
    #[inline] pub fn range(&self, v: VertexId) -> (usize, usize) { (self.offsets[v as usize] as usize, self.offsets[v as usize + 1] as usize) }
    #[inline] pub fn target(&self, e: usize) -> VertexId { self.targets[e] }
    #[inline] pub fn weight(&self, e: usize) -> Weight { self.weights[e] }
    #[inline] pub fn offsets(&self) -> &[u32] { &self.offsets }
    pub fn edges(&self, v: VertexId) -> impl Iterator<Item = (VertexId, Weight)> + '_ {
        let (s, e) = self.range(v);
        self.targets[s..e].iter().copied().zip(self.weights[s..e].iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph { nb_vertices: usize, out: Csr, inc: Csr }

// Counting sort of (key, other, w) triples into CSR, stable in input order.
fn bucket(n: usize, edges: &[(VertexId, VertexId, Weight)], key_is_src: bool) -> Csr {
    let key = |e: &(VertexId, VertexId, Weight)| (if key_is_src { e.0 } else { e.1 }) as usize;
    let mut offsets = vec![0u32; n + 1];
    for e in edges { offsets[key(e) + 1] += 1; }
    for i in 0..n { offsets[i + 1] += offsets[i]; }
    let mut cursor: Vec<u32> = offsets[..n].to_vec();
    let mut targets = vec![0; edges.len()];
    let mut weights = vec![0; edges.len()];
    for e in edges {
        let k = key(e);
        let slot = cursor[k] as usize; cursor[k] += 1;
        targets[slot] = if key_is_src { e.1 } else { e.0 };
        weights[slot] = e.2;
    }
    Csr { offsets, targets, weights }
}

impl Graph {
    /// Builds both adjacency directions from a `(from, to, weight)` list.
    pub fn from_edges(nb_vertices: usize, edges: &[(VertexId, VertexId, Weight)]) -> Result<Self> {
        if nb_vertices > VertexId::MAX as usize { return Err(BfError::MalformedGraph(format!("{nb_vertices} vertices exceed the id range"))); }
        if edges.len() > u32::MAX as usize { return Err(BfError::MalformedGraph(format!("{} edges exceed the offset range", edges.len()))); }
        if let Some(&(u, v, _)) = edges.iter().find(|&&(u, v, _)| u as usize >= nb_vertices || v as usize >= nb_vertices) {
            return Err(BfError::MalformedGraph(format!("edge {u}->{v} leaves [0, {nb_vertices})")));
        }
        Ok(Self { nb_vertices, out: bucket(nb_vertices, edges, true), inc: bucket(nb_vertices, edges, false) })
    }

    /// Builds from an out-adjacency CSR (`offsets.len() == n + 1`).
    pub fn from_csr(offsets: &[u32], targets: &[VertexId], weights: &[Weight]) -> Result<Self> {
        let n = offsets.len().checked_sub(1).ok_or_else(|| BfError::MalformedGraph("offsets must hold n + 1 entries".into()))?;
        if offsets[0] != 0 { return Err(BfError::MalformedGraph("offsets[0] must be 0".into())); }
        if offsets.windows(2).any(|w| w[0] > w[1]) { return Err(BfError::MalformedGraph("offsets are not monotone".into())); }
        let m = offsets[n] as usize;
        if targets.len() != m || weights.len() != m {
            return Err(BfError::MalformedGraph(format!("offsets[n]={m} but {} targets and {} weights", targets.len(), weights.len())));
        }
        let mut edges = Vec::with_capacity(m);
        for u in 0..n {
            for e in offsets[u] as usize..offsets[u + 1] as usize { edges.push((u as VertexId, targets[e], weights[e])); }
        }
        Self::from_edges(n, &edges)
    }

    #[inline] pub fn nb_vertices(&self) -> usize { self.nb_vertices }
    #[inline] pub fn nb_edges(&self) -> usize { self.out.targets.len() }
    #[inline] pub fn out(&self) -> &Csr { &self.out }
    #[inline] pub fn inc(&self) -> &Csr { &self.inc }
    #[inline] pub fn out_degree(&self, v: VertexId) -> usize { self.out.degree(v) }
    #[inline] pub fn in_degree(&self, v: VertexId) -> usize { self.inc.degree(v) }
    pub fn out_edges(&self, v: VertexId) -> impl Iterator<Item = (VertexId, Weight)> + '_ { self.out.edges(v) }
    pub fn in_edges(&self, v: VertexId) -> impl Iterator<Item = (VertexId, Weight)> + '_ { self.inc.edges(v) }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> { 0..self.nb_vertices as VertexId }

    /// Every edge as `(from, to, weight)` in out-adjacency order.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, Weight)> + '_ {
        self.vertices().flat_map(move |u| self.out_edges(u).map(move |(v, w)| (u, v, w)))
    }
}
