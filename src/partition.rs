//! Edge-balanced range split for the all-edges variant.
//!
//! Built once per (graph, cutoff) from a prefix sum over in-degrees. Each
//! range `[start, stop)` heavy enough to fork gets a cached midpoint close to
//! its half-edge point; the plan is read-only afterwards and shared by every
//! round and every solve on the same engine.

use rustc_hash::FxHashMap;

use crate::graph::Graph;

#[derive(Debug, Clone)]
pub struct PartitionPlan { pref: Vec<u64>, cutoff: usize, mids: FxHashMap<(u32, u32), u32> }

impl PartitionPlan {
    pub fn build(graph: &Graph, cutoff: usize) -> Self {
        let n = graph.nb_vertices();
        let mut pref = Vec::with_capacity(n + 1);
        pref.push(0u64);
        for v in graph.vertices() { pref.push(pref[v as usize] + graph.in_degree(v) as u64); }
        let mut plan = Self { pref, cutoff, mids: FxHashMap::default() };
        plan.fill(0, n);
        plan
    }

    fn fill(&mut self, start: usize, stop: usize) {
        if !self.should_fork(start, stop) { return; }
        let mid = balanced_mid(&self.pref, start, stop);
        self.mids.insert((start as u32, stop as u32), mid as u32);
        self.fill(start, mid);
        self.fill(mid, stop);
    }

    #[inline] pub fn nb_edges(&self, start: usize, stop: usize) -> u64 { self.pref[stop] - self.pref[start] }

    /// Same test the solver uses to decide fork vs. serial.
    #[inline] pub fn should_fork(&self, start: usize, stop: usize) -> bool { self.nb_edges(start, stop) >= self.cutoff as u64 && stop - start > 2 }

    /// Cached midpoint; ranges the plan never saw are bisected on the fly.
    pub fn mid(&self, start: usize, stop: usize) -> usize {
        match self.mids.get(&(start as u32, stop as u32)) { Some(&m) => m as usize, None => balanced_mid(&self.pref, start, stop) }
    }

    /// Number of forks one round of the all-edges variant performs.
    pub fn forks_per_round(&self) -> usize { self.mids.len() }
    pub fn cutoff(&self) -> usize { self.cutoff }
}

/// Largest index whose prefix is at most the half-weight point, clamped to
/// `[start + 1, stop - 1]` so both halves are non-empty whatever the weights.
pub fn balanced_mid(pref: &[u64], start: usize, stop: usize) -> usize {
    let half = (pref[start] + pref[stop]) / 2;
    let (mut left, mut right) = (start, stop);
    while right - left > 1 {
        let m = (left + right) / 2;
        if pref[m] <= half { left = m; } else { right = m; }
    }
    left.clamp(start + 1, stop - 1)
}
