//! Shared per-vertex state written concurrently during a round.
//!
//! Reads are relaxed: distances only decrease and claims are
//! idempotent-once, so a stale read costs at most a wasted CAS. Writes go
//! through compare-and-swap with acquire-release ordering.

use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use crate::graph::{Dist, VertexId, INF};

/// Distance per vertex, updated with an atomic minimum.
#[derive(Debug)]
pub struct DistArray { cells: Vec<AtomicI64> }

impl DistArray {
    /// Every vertex starts at `INF`.
    pub fn new(n: usize) -> Self { Self { cells: (0..n).map(|_| AtomicI64::new(INF)).collect() } }

    #[inline] pub fn len(&self) -> usize { self.cells.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.cells.is_empty() }
    #[inline] pub fn get(&self, v: VertexId) -> Dist { self.cells[v as usize].load(Ordering::Relaxed) }

    /// Unconditional write; only for single-owner phases (init, normalization).
    #[inline] pub fn set(&self, v: VertexId, d: Dist) { self.cells[v as usize].store(d, Ordering::Relaxed) }

    /// `dist[target] = min(dist[target], candidate)`; true iff the value strictly decreased.
    #[inline]
    pub fn try_update(&self, target: VertexId, candidate: Dist) -> bool {
        let cell = &self.cells[target as usize];
        let mut cur = cell.load(Ordering::Relaxed);
        while candidate < cur {
            match cell.compare_exchange_weak(cur, candidate, Ordering::AcqRel, Ordering::Relaxed) {
                Ok(_) => return true,
                Err(seen) => cur = seen,
            }
        }
        false
    }

    pub fn snapshot(&self) -> Vec<Dist> { self.cells.iter().map(|c| c.load(Ordering::Acquire)).collect() }
    pub fn into_vec(self) -> Vec<Dist> { self.cells.into_iter().map(AtomicI64::into_inner).collect() }
}

/// Round in which each vertex was last enqueued.
#[derive(Debug)]
pub struct VisitedMarks { marks: Vec<AtomicU32> }

impl VisitedMarks {
    pub const NEVER: u32 = u32::MAX;

    pub fn new(n: usize) -> Self { Self { marks: (0..n).map(|_| AtomicU32::new(Self::NEVER)).collect() } }

    #[inline] pub fn get(&self, v: VertexId) -> u32 { self.marks[v as usize].load(Ordering::Relaxed) }

    /// Moves `target` from "not claimed in `round`" to `round`; succeeds once per round.
    #[inline]
    pub fn try_claim(&self, target: VertexId, round: u32) -> bool {
        let cell = &self.marks[target as usize];
        let cur = cell.load(Ordering::Relaxed);
        if cur == round { return false; }
        cell.compare_exchange(cur, round, Ordering::AcqRel, Ordering::Relaxed).is_ok()
    }
}
